use std::{fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use dicom::core::Tag;
use dicom_categorize::{CategorizeOptions, Execution, VolumeCategorizer, parse_epsilon, parse_tag};
use tracing_subscriber::EnvFilter;

/// Group DICOM files into the volumes they belong to and print the result as
/// a JSON object of volume ID to file list.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Files to categorize, visited in the given order
    #[arg(required_unless_present = "directory", conflicts_with = "directory")]
    files: Vec<PathBuf>,

    /// Categorize every .dcm file of this directory instead
    #[arg(short, long)]
    directory: Option<PathBuf>,

    /// Tolerance of the orientation comparison
    #[arg(long, value_parser = parse_epsilon)]
    epsilon: Option<f64>,

    /// Cluster series groups in parallel
    #[arg(long)]
    parallel: bool,

    /// Extra tag refining the series identity, e.g. 0008,0021 (repeatable)
    #[arg(long = "restrict", value_parser = parse_tag)]
    restrictions: Vec<Tag>,

    /// Write the JSON to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut options = CategorizeOptions::from_env();
    if let Some(epsilon) = cli.epsilon {
        options.epsilon = epsilon;
    }
    if cli.parallel {
        options.execution = Execution::Parallel;
    }
    if !cli.restrictions.is_empty() {
        options.series_restrictions = cli.restrictions;
    }

    let categorizer = VolumeCategorizer::from_options(options);
    let volumes = match &cli.directory {
        Some(directory) => categorizer
            .categorize_directory(directory)
            .with_context(|| format!("failed to categorize {}", directory.display()))?,
        None => categorizer
            .categorize(&cli.files)
            .context("failed to categorize files")?,
    };

    let json = if cli.pretty {
        serde_json::to_string_pretty(&volumes)?
    } else {
        serde_json::to_string(&volumes)?
    };

    match &cli.output {
        Some(output) => fs::write(output, json)
            .with_context(|| format!("failed to write {}", output.display()))?,
        None => writeln!(std::io::stdout().lock(), "{json}")?,
    }

    Ok(())
}
