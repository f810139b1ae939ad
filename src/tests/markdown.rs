use super::{parse_heading, parse_markdown, to_markdown, MarkdownFormat};
use crate::formats::Format;
use crate::section::Section;
use proptest::prelude::*;

const EXAMPLE_MD: &str = "
Pretext

# Intro

Intro paragraph
# Second Section
## First subsection
some text
### First subsubsection
# Third Section
### Skipped level
Text
";

fn example_section() -> Section {
    let subsubsection = Section::leaf("First subsubsection", "");
    let subsection = Section::new("First subsection", "some text\n", vec![subsubsection]).unwrap();
    let skipped = Section::leaf("Skipped level", "Text\n");
    let placeholder = Section::new("", "", vec![skipped]).unwrap();
    Section::new(
        "Doc Title",
        "\nPretext\n\n",
        vec![
            Section::leaf("Intro", "\nIntro paragraph\n"),
            Section::new("Second Section", "", vec![subsection]).unwrap(),
            Section::new("Third Section", "", vec![placeholder]).unwrap(),
        ],
    )
    .unwrap()
}

#[test]
fn test_parse_empty() {
    let root = parse_markdown("Doc Title", "");
    assert_eq!(root, Section::leaf("Doc Title", ""));
}

#[test]
fn test_parse_builds_expected_tree() {
    assert_eq!(parse_markdown("Doc Title", EXAMPLE_MD), example_section());
}

#[test]
fn test_render_round_trips_example() {
    let root = parse_markdown("title", EXAMPLE_MD);
    assert_eq!(to_markdown(&root), EXAMPLE_MD);
}

#[test]
fn test_text_before_first_heading_is_root_body() {
    let root = parse_markdown("t", "preamble\nmore\n# A\n");
    assert_eq!(root.body_text(), "preamble\nmore\n");
    assert_eq!(root.children()[0].title(), "A");
}

#[test]
fn test_consecutive_headings_leave_empty_body() {
    let root = parse_markdown("t", "# A\n# B\nbody\n");
    assert_eq!(root.children().len(), 2);
    assert_eq!(root.children()[0].body_text(), "");
    assert_eq!(root.children()[1].body_text(), "body\n");
}

#[test]
fn test_skipped_level_inserts_single_placeholder() {
    let root = parse_markdown("t", "# A\n### B\n");
    let a = &root.children()[0];
    assert_eq!(a.title(), "A");
    assert_eq!(a.children().len(), 1);
    let placeholder = &a.children()[0];
    assert!(placeholder.is_placeholder());
    assert_eq!(placeholder.body_text(), "");
    assert_eq!(placeholder.children()[0].title(), "B");
    assert_eq!(root.qualified_names(), vec!["A", "A\\", "A\\\\B"]);
}

#[test]
fn test_deep_jump_nests_placeholders() {
    let root = parse_markdown("t", "###### Deep\n");
    let mut node = &root;
    for _ in 0..5 {
        assert_eq!(node.children().len(), 1);
        node = &node.children()[0];
        assert!(node.is_placeholder());
    }
    assert_eq!(node.children()[0].title(), "Deep");
    assert_eq!(to_markdown(&root), "###### Deep\n");
}

#[test]
fn test_shallower_heading_closes_placeholder_scope() {
    let root = parse_markdown("t", "# A\n### B\n## C\n");
    let a = &root.children()[0];
    assert_eq!(a.children().len(), 2);
    assert!(a.children()[0].is_placeholder());
    assert_eq!(a.children()[1].title(), "C");
    assert_eq!(to_markdown(&root), "# A\n### B\n## C\n");
}

#[test]
fn test_parse_section_number_first() {
    let markdown = "
Intro text

5.  # Section with number first

1.  ## Subsection with number first

content

## Subsection with no number
";
    let root = parse_markdown("title", markdown);
    assert_eq!(root.children()[0].title(), "5.   Section with number first");
    assert_eq!(
        root.qualified_names(),
        vec![
            "5.   Section with number first",
            "5.   Section with number first\\1.   Subsection with number first",
            "5.   Section with number first\\Subsection with no number",
        ]
    );
}

#[test]
fn test_ordinal_marker_kept_literally() {
    let root = parse_markdown("t", "5.  # Foo\n");
    assert_eq!(root.children()[0].title(), "5.   Foo");
}

#[test]
fn test_not_headings() {
    let text = "#NoSpace\n####### seven\n  # indented\ntext # hash\n";
    let root = parse_markdown("t", text);
    assert!(root.children().is_empty());
    assert_eq!(root.body_text(), text);
}

#[test]
fn test_trailing_whitespace_trimmed_from_title() {
    let root = parse_markdown("t", "## Padded   \t\n");
    assert_eq!(root.children()[0].children()[0].title(), "Padded");
}

#[test]
fn test_crlf_lines() {
    let root = parse_markdown("t", "# A\r\nbody\r\n");
    assert_eq!(root.children()[0].title(), "A");
    assert_eq!(root.children()[0].body_text(), "body\n");
}

#[test]
fn test_missing_final_newline_is_added() {
    let root = parse_markdown("t", "# A\nlast");
    assert_eq!(to_markdown(&root), "# A\nlast\n");
}

#[test]
fn test_tables_and_quotes_stay_in_body() {
    let markdown = "
> **Report**
>
> **Doc Number: 23947829**

**Bold text**

intro
# TITLE PAGE

+-------------------+-------------------+
| > **Title table** | > First section   |
+===================+===================+

# SUMMARY

| > **Authors**     | > Decapr          |
    ";
    let root = parse_markdown("title", markdown);
    assert_eq!(root.qualified_names(), vec!["TITLE PAGE", "SUMMARY"]);
}

#[test]
fn test_fill_and_render_template() {
    let mut root = parse_markdown("Title", "# Title\n\n# Comments\n\n## Average Rating\n\n");
    root.set_body_text_at(&[1, 0], "It was a 5\n").unwrap();
    let rendered = to_markdown(&root);
    let filled = "# Comments\n\n## Average Rating\nIt was a 5\n";
    assert!(rendered.contains(filled));
}

#[test]
fn test_format_trait_dispatch() {
    let format = MarkdownFormat;
    let root = format.parse("t", "# A\nx\n");
    assert_eq!(format.render(&root), "# A\nx\n");
}

fn label() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]([A-Za-z0-9 ,.]{0,12}[A-Za-z0-9])?"
}

/// Body text, including lines that come close to the heading pattern without matching it.
fn body_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9 #.,*>|+=-]{0,24}",
        "#{1,7}[a-z0-9]{1,8}",
        "####### [a-z ]{0,8}",
        " {1,3}#{1,6} [a-z]{1,8}",
        "[0-9]{1,2}\\. [a-z #]{0,10}",
    ]
    .prop_filter("not a heading", |line| parse_heading(line).is_none())
}

fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        (1usize..=6, label()).prop_map(|(level, label)| format!("{} {label}", "#".repeat(level))),
        body_line(),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(line(), 0..40).prop_map(|lines| {
        lines.iter().map(|line| format!("{line}\n")).collect()
    })
}

proptest! {
    /// Serialising a parsed document reproduces it byte for byte
    #[test]
    fn render_inverts_parse(text in document()) {
        let root = parse_markdown("Doc", &text);
        prop_assert_eq!(to_markdown(&root), text);
    }

    /// Re-parsing rendered output yields the same tree
    #[test]
    fn reparse_is_idempotent(text in document()) {
        let root = parse_markdown("Doc", &text);
        prop_assert_eq!(parse_markdown("Doc", &to_markdown(&root)), root);
    }

    /// Every qualified name resolves to the node at the matching path
    #[test]
    fn qualified_names_resolve_to_their_path(text in document()) {
        let root = parse_markdown("Doc", &text);
        prop_assume!(root.validate().is_ok());
        for (path, name) in root.outline() {
            let by_path = root.find_by_path(&path).unwrap();
            let by_name = root.find_by_qualified_name(&name).unwrap();
            prop_assert!(std::ptr::eq(by_path, by_name));
        }
    }
}
