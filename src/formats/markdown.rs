//! Markdown format implementation for ATX-style headings (# syntax).
//!
//! A line is a heading when it matches an optional ordinal marker (`5.`), one to six `#`
//! characters, whitespace, then the label. Everything else is body text of the innermost open
//! heading. Skipped levels are filled with untitled placeholder sections so that tree depth
//! always equals heading level.

use crate::formats::Format;
use crate::section::Section;
use regex::Regex;
use std::sync::LazyLock;

static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.\s*)?(#{1,6})\s+(.*?)\s*$").expect("heading pattern is valid")
});

/// Markdown documents whose structure comes from `#` headings.
pub struct MarkdownFormat;

impl Format for MarkdownFormat {
    fn parse(&self, title: &str, text: &str) -> Section {
        parse_markdown(title, text)
    }

    fn render(&self, section: &Section) -> String {
        to_markdown(section)
    }
}

/// A heading line split into its level and stored title.
struct Heading {
    level: usize,
    title: String,
}

fn parse_heading(line: &str) -> Option<Heading> {
    let captures = HEADING.captures(line)?;
    let level = captures.get(2)?.as_str().len();
    let label = captures.get(3).map_or("", |m| m.as_str());
    // Ordinal markers are kept verbatim plus one separating space.
    let title = match captures.get(1) {
        Some(marker) => format!("{} {label}", marker.as_str()),
        None => label.to_string(),
    };
    Some(Heading { level, title })
}

/// Open node during parsing, linked to its family by arena index.
struct Node {
    title: String,
    body_text: String,
    children_indices: Vec<usize>,
}

impl Node {
    fn new(title: String) -> Self {
        Self {
            title,
            body_text: String::new(),
            children_indices: Vec::new(),
        }
    }
}

/// Index arena of nodes plus the stack of headings currently in scope.
struct Builder {
    nodes: Vec<Node>,
    open: Vec<usize>,
}

impl Builder {
    fn new(title: &str) -> Self {
        Self {
            nodes: vec![Node::new(title.to_string())],
            open: vec![0],
        }
    }

    fn top(&self) -> usize {
        self.open.last().copied().unwrap_or(0)
    }

    fn push_child(&mut self, title: String) {
        let index = self.nodes.len();
        self.nodes.push(Node::new(title));
        let parent = self.top();
        self.nodes[parent].children_indices.push(index);
        self.open.push(index);
    }

    fn heading(&mut self, heading: Heading) {
        // The stack holds the root plus one entry per heading level in scope.
        self.open.truncate(heading.level);
        while self.open.len() < heading.level {
            self.push_child(String::new());
        }
        self.push_child(heading.title);
    }

    fn body_line(&mut self, line: &str) {
        let top = self.top();
        let body = &mut self.nodes[top].body_text;
        body.push_str(line);
        body.push('\n');
    }

    fn finish(mut self) -> Section {
        freeze(&mut self.nodes, 0)
    }
}

fn freeze(nodes: &mut [Node], index: usize) -> Section {
    let title = std::mem::take(&mut nodes[index].title);
    let body_text = std::mem::take(&mut nodes[index].body_text);
    let children_indices = std::mem::take(&mut nodes[index].children_indices);
    let children = children_indices
        .into_iter()
        .map(|child| freeze(nodes, child))
        .collect();
    Section::from_parts(title, body_text, children)
}

#[must_use]
/// Parse markdown into a section tree whose root is titled `title`.
///
/// Parsing never fails: text with no headings becomes the root's body text.
pub fn parse_markdown(title: &str, text: &str) -> Section {
    let mut builder = Builder::new(title);
    for line in text.lines() {
        match parse_heading(line) {
            Some(heading) => builder.heading(heading),
            None => builder.body_line(line),
        }
    }
    builder.finish()
}

#[must_use]
/// Render a section tree back to markdown.
///
/// The root and placeholder sections emit no heading line; their body text and children are
/// still written, with children one level deeper.
pub fn to_markdown(section: &Section) -> String {
    let mut out = String::new();
    write_section(section, 0, &mut out);
    out
}

fn write_section(section: &Section, depth: usize, out: &mut String) {
    if depth > 0 && !section.is_placeholder() {
        out.push_str(&"#".repeat(depth));
        out.push(' ');
        out.push_str(section.title());
        out.push('\n');
    }
    out.push_str(section.body_text());
    for child in section.children() {
        write_section(child, depth + 1, out);
    }
}

#[cfg(test)]
#[path = "../tests/markdown.rs"]
mod tests;
