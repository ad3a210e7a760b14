//! Command-line interface for the builder.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{require_input, BuildPaths, DEFAULT_SEARCH_LIMIT};
use crate::error::{BuilderError, Result};
use crate::pipeline::{build, build_excerpts, BuildReport};
use crate::search::SearchIndex;

/// RegDocs Builder - Anchor, link and index EU legal documents.
#[derive(Parser)]
#[command(name = "regdocs-builder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full build: rendered content, excerpts, sections and search index.
    Build {
        /// Data directory holding regulations-index.json and the inputs
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory (default: the data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract the anchor excerpt map only.
    Excerpts {
        /// Data directory holding regulations-index.json and the documents
        #[arg(short, long)]
        data: PathBuf,

        /// Output directory (default: the data directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Query a built search index.
    Search {
        /// Path to search-index.json
        #[arg(short, long)]
        index: PathBuf,

        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { data, output } => build_command(BuildPaths::new(data, output)),
        Commands::Excerpts { data, output } => excerpts_command(BuildPaths::new(data, output)),
        Commands::Search {
            index,
            query,
            limit,
        } => search_command(&index, &query, limit),
    }
}

/// Validate that the data directory exists before doing anything.
fn check_data_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(BuilderError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Data directory does not exist: {}", path.display()),
        )));
    }
    Ok(())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn print_report(report: &BuildReport, paths: &BuildPaths) {
    println!("  Documents: {}", report.documents);
    if report.skipped > 0 {
        println!("  Skipped: {}", style(report.skipped).yellow());
    }
    println!("  Anchors: {}", report.anchors);
    println!("  Excerpts: {}", report.excerpts);
    if report.links > 0 {
        println!("  External links: {}", report.links);
    }
    if report.term_links > 0 {
        println!("  Term links: {}", report.term_links);
    }
    if let Some(indexed) = report.index_documents {
        println!("  Sections: {}", report.sections);
        println!("  Indexed: {}", style(indexed).green());
    }
    println!();
    println!(
        "{} {}",
        style("Output:").green().bold(),
        paths.output_dir.display()
    );
}

/// Execute the build command.
fn build_command(paths: BuildPaths) -> Result<()> {
    check_data_dir(&paths.data_dir)?;

    println!(
        "{} {}",
        style("Building").bold(),
        style(paths.data_dir.display()).cyan()
    );
    println!();

    let pb = spinner();
    let report = match build(&paths, |msg| pb.set_message(msg.to_string())) {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    print_report(&report, &paths);
    Ok(())
}

/// Execute the excerpts command.
fn excerpts_command(paths: BuildPaths) -> Result<()> {
    check_data_dir(&paths.data_dir)?;

    println!(
        "{} {}",
        style("Extracting excerpts from").bold(),
        style(paths.data_dir.display()).cyan()
    );
    println!();

    let pb = spinner();
    let report = match build_excerpts(&paths, |msg| pb.set_message(msg.to_string())) {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };
    pb.finish_and_clear();

    print_report(&report, &paths);
    Ok(())
}

/// Execute the search command.
fn search_command(index_path: &Path, query: &str, limit: usize) -> Result<()> {
    require_input("search index", index_path)?;
    let index = SearchIndex::from_json(&fs::read_to_string(index_path)?)?;

    let hits = index.search(query, limit);
    if hits.is_empty() {
        println!("{} {}", style("No results for").yellow(), style(query).bold());
        return Ok(());
    }

    for (rank, hit) in hits.iter().enumerate() {
        let doc = hit.document;
        let label = if doc.term.is_empty() {
            format!("{} {}", doc.section, doc.section_title)
        } else {
            doc.term.clone()
        };
        println!(
            "{:>3}. {} {} {}",
            rank + 1,
            style(label).bold(),
            style(format!("[{}]", doc.doc_title)).dim(),
            style(format!("{:.2}", hit.score)).green()
        );
        println!("     {}", style(&doc.id).cyan());
    }

    Ok(())
}
