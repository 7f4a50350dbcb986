use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use blissdict::config::{MergeConfig, NormalizeConfig};
use blissdict::duplicates::find_duplicates;
use blissdict::gloss_table::read_gloss_table;
use blissdict::merge::merge_dictionary;
use blissdict::model::{read_dictionary, write_dictionary, write_json_atomic};
use blissdict::normalize::normalize_dictionary;

#[derive(Parser, Debug)]
#[command(name = "blissdict")]
#[command(about = "Prepares a multilingual Blissymbolics symbol dictionary")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Merge a base symbol collection with a tabular gloss source
    Merge {
        /// Base symbol entries JSON, keyed by id
        base: PathBuf,

        /// Tabular gloss source: TAB-separated, `id` + language columns
        table: PathBuf,

        /// Output path for the expanded collection
        output: PathBuf,

        /// Delimiter separating gloss candidates within a cell
        #[arg(long, default_value = ";")]
        delimiter: char,

        /// JSON file mapping entry id to corrected pos_colour, applied
        /// before merging
        #[arg(long)]
        corrections: Option<PathBuf>,

        /// Stats output file path
        #[arg(long)]
        stats_out: Option<PathBuf>,
    },

    /// Canonicalize every gloss in a merged collection
    Normalize {
        /// Expanded entries JSON
        input: PathBuf,

        /// Output path for the cleaned collection
        output: PathBuf,

        /// Stats output file path
        #[arg(long)]
        stats_out: Option<PathBuf>,
    },

    /// Report groups of entries sharing a canonical gloss
    ReportDuplicates {
        /// Cleaned entries JSON
        input: PathBuf,

        /// Output path for the duplicate-group report
        output: PathBuf,

        /// Stats output file path
        #[arg(long)]
        stats_out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    // Structured logs go to stderr; stage outputs and summaries own stdout.
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    match args.command {
        Command::Merge {
            base,
            table,
            output,
            delimiter,
            corrections,
            stats_out,
        } => run_merge(&base, &table, &output, delimiter, corrections.as_deref(), stats_out.as_deref()),
        Command::Normalize {
            input,
            output,
            stats_out,
        } => run_normalize(&input, &output, stats_out.as_deref()),
        Command::ReportDuplicates {
            input,
            output,
            stats_out,
        } => run_report_duplicates(&input, &output, stats_out.as_deref()),
    }
}

fn run_merge(
    base_path: &Path,
    table_path: &Path,
    output: &Path,
    delimiter: char,
    corrections: Option<&Path>,
    stats_out: Option<&Path>,
) -> Result<()> {
    require_file(base_path)?;
    require_file(table_path)?;

    let mut config = MergeConfig::default();
    config.cell_rules.delimiter = delimiter;
    if let Some(path) = corrections {
        config.colour_corrections = read_corrections(path)?;
    }

    let base = read_dictionary(base_path)?;
    info!(entries = base.len(), "Loaded base collection");

    let table = read_gloss_table(table_path, &config.cell_rules)?;
    info!(
        languages = table.languages.len(),
        rows = table.rows.len(),
        malformed = table.malformed_rows,
        "Loaded gloss table"
    );

    let (merged, stats) = merge_dictionary(base, &table, &config);
    write_dictionary(output, &merged)?;
    if let Some(path) = stats_out {
        write_json_atomic(path, &stats)?;
    }

    println!("blissdict v{} - merge complete", env!("CARGO_PKG_VERSION"));
    println!(
        "  Entries: {}, rows matched: {}/{}",
        stats.entries, stats.rows_matched, stats.rows_total
    );
    if stats.rows_unmatched > 0 || stats.rows_malformed > 0 {
        println!(
            "  Skipped rows: {} unmatched, {} malformed",
            stats.rows_unmatched, stats.rows_malformed
        );
    }
    println!("  Glosses added: {}", stats.glosses_added);
    Ok(())
}

fn run_normalize(input: &Path, output: &Path, stats_out: Option<&Path>) -> Result<()> {
    require_file(input)?;

    let dictionary = read_dictionary(input)?;
    info!(entries = dictionary.len(), "Loaded merged collection");

    let (normalized, stats) = normalize_dictionary(dictionary, &NormalizeConfig::default());
    write_dictionary(output, &normalized)?;
    if let Some(path) = stats_out {
        write_json_atomic(path, &stats)?;
    }

    println!("blissdict v{} - normalize complete", env!("CARGO_PKG_VERSION"));
    println!(
        "  Entries: {}, glosses: {} in, {} out",
        stats.entries, stats.glosses_in, stats.glosses_out
    );
    println!(
        "  Duplicates collapsed: {}, empties dropped: {}",
        stats.duplicates_removed, stats.empties_dropped
    );
    Ok(())
}

fn run_report_duplicates(input: &Path, output: &Path, stats_out: Option<&Path>) -> Result<()> {
    require_file(input)?;

    let dictionary = read_dictionary(input)?;
    info!(entries = dictionary.len(), "Loaded cleaned collection");

    let (groups, stats) = find_duplicates(&dictionary);
    write_json_atomic(output, &groups)?;
    if let Some(path) = stats_out {
        write_json_atomic(path, &stats)?;
    }

    println!(
        "blissdict v{} - duplicate report complete",
        env!("CARGO_PKG_VERSION")
    );
    println!("  Duplicate groups found: {}", stats.groups_total);
    for (language, count) in &stats.groups_by_language {
        println!("    {language:<8} {count}");
    }
    Ok(())
}

/// Validate an input path early so a missing file fails with a clear error
/// before anything is written.
fn require_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Input path is not a file: {}", path.display());
    }
    Ok(())
}

fn read_corrections(path: &Path) -> Result<BTreeMap<String, String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read corrections file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("malformed corrections JSON in {}", path.display()))
}
