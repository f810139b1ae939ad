//! snapdraft: inspect, render and fill section-structured markdown documents.
#![allow(clippy::multiple_crate_versions)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use snapdraft::formats::{self, Format};
use snapdraft::section::Section;
use snapdraft::{config, edit_plan};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "snapdraft")]
#[command(about = "Section trees for template-driven document drafting", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every section's path and qualified name
    Outline {
        /// Markdown file to inspect
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Parse a file and print it back
    Render {
        /// Markdown file to render
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Print the section tree as a JSON interchange record
    Export {
        /// Markdown file to export
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
    /// Fill template sections from an edit plan and print the result
    Fill {
        /// Template markdown file
        #[arg(value_name = "TEMPLATE")]
        template: PathBuf,

        /// JSON edit plan with section paths and body text
        #[arg(long)]
        plan: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = config::Config::load();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cfg.log_filter.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = formats::markdown::MarkdownFormat;

    match args.command {
        Command::Outline { path } => {
            let doc = read_document(&format, &path)?;
            for (section_path, name) in doc.outline() {
                println!("{section_path:?}\t{name}");
            }
        }
        Command::Render { path } => {
            let doc = read_document(&format, &path)?;
            print!("{}", format.render(&doc));
        }
        Command::Export { path } => {
            let doc = read_document(&format, &path)?;
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
        Command::Fill {
            template,
            plan: plan_path,
        } => {
            let mut doc = read_document(&format, &template)?;
            let file_content = fs::read_to_string(&plan_path)
                .with_context(|| format!("reading edit plan {}", plan_path.display()))?;
            let plan: edit_plan::EditPlan = serde_json::from_str(&file_content)
                .with_context(|| format!("parsing edit plan {}", plan_path.display()))?;
            plan.apply(&mut doc)?;
            tracing::info!(edits = plan.edits.len(), "applied edit plan");
            print!("{}", format.render(&doc));
        }
    }

    Ok(())
}

/// Parse a file into a section tree titled with its file stem.
fn read_document(format: &impl Format, path: &Path) -> anyhow::Result<Section> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(format.parse(&title, &text))
}
