use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{CommandFactory, Parser};
use cutsheet_tools::layout::CutsheetLayout;
use cutsheet_tools::model::ScanResult;
use cutsheet_tools::progress::{Paced, ProgressReporter};
use cutsheet_tools::scan::{ScanOptions, scan_directory};
use cutsheet_tools::{Result, ToolError};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn";
const BAR_WIDTH: usize = 40;

fn main() {
    let cli = Cli::parse();
    let Some(directory) = cli.scan_root() else {
        println!("{}", usage());
        std::process::exit(2);
    };

    if let Err(error) = run(&cli, &directory) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn usage() -> String {
    format!(
        "Missing path to cutsheet collection\n{}",
        Cli::command().render_usage()
    )
}

fn run(cli: &Cli, directory: &Path) -> Result<()> {
    init_tracing(cli.log_level.as_deref())?;

    let layout = match &cli.layout {
        Some(path) => CutsheetLayout::load(path)?,
        None => CutsheetLayout::default(),
    };
    let options = ScanOptions::from_layout(layout);

    println!("Scanning {}", directory.display());
    let mut progress = Paced::new(
        TerminalProgress::default(),
        Duration::from_millis(cli.pace_ms),
    );
    let result = scan_directory(directory, &options, &mut progress)?;

    println!(
        "Found {} cutsheet(s) in {:.2}s",
        result.count(),
        result.elapsed_seconds()
    );
    if cli.json {
        print_json(&result)?;
    } else {
        print_table(&result);
    }
    Ok(())
}

fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level),
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER)),
    }
    .map_err(|error| ToolError::Logging(error.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| ToolError::Logging(error.to_string()))
}

fn print_table(result: &ScanResult) {
    for report in &result.cutsheets {
        let summary = &report.summary;
        println!(
            "{}: {} lines | lumber {} pcs, {} in | ply {} pcs, {:.2} sq ft | foam {} | other {}",
            report.file.display(),
            summary.bom_lines,
            summary.lumber_count,
            summary.lumber_length,
            summary.ply_count,
            summary.ply_square_feet,
            summary.foam_count,
            summary.other_count
        );
    }
    for failure in &result.failures {
        println!("{}: skipped ({})", failure.file.display(), failure.reason);
    }
}

fn print_json(result: &ScanResult) -> Result<()> {
    let json = serde_json::json!({
        "count": result.count(),
        "elapsedSeconds": result.elapsed_seconds(),
        "cutsheets": result.cutsheets,
        "failures": result.failures,
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

/// Single-line progress bar on standard error, one per file.
#[derive(Default)]
struct TerminalProgress {
    file_name: String,
    percent: f64,
}

impl TerminalProgress {
    fn render(&self) {
        let percent = self.percent.clamp(0.0, 100.0);
        let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
        let mut stderr = std::io::stderr().lock();
        // Progress output is best effort.
        let _ = write!(
            stderr,
            "\r|{}{}| {:>3.0}% :: {}",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            percent,
            self.file_name
        );
        let _ = stderr.flush();
    }
}

impl ProgressReporter for TerminalProgress {
    fn begin(&mut self, file_name: &str) {
        self.file_name = file_name.to_string();
        self.percent = 0.0;
        self.render();
    }

    fn advance(&mut self, increment: f64) {
        self.percent += increment;
        self.render();
    }

    fn finish(&mut self) {
        self.percent = 100.0;
        self.render();
        eprintln!();
    }

    fn abandon(&mut self) {
        self.render();
        eprintln!(" (skipped)");
    }
}

#[derive(Parser)]
#[command(
    name = "cutsheet-scan",
    author,
    version,
    about = "Scan a directory of cutsheet workbooks and total their bills of materials."
)]
struct Cli {
    /// Directory containing the candidate .xlsx files.
    #[arg(value_name = "DIRECTORY")]
    directory: Option<String>,

    /// JSON file overriding the template layout and category prefixes.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Print the summaries as JSON instead of a table.
    #[arg(long)]
    json: bool,

    /// Delay in milliseconds after each row, for visual pacing only.
    #[arg(long, default_value_t = 0)]
    pace_ms: u64,

    /// Log filter directive; defaults to RUST_LOG or "warn".
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// The directory to scan, or `None` when it is missing or empty.
    fn scan_root(&self) -> Option<PathBuf> {
        self.directory
            .as_deref()
            .filter(|directory| !directory.is_empty())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_empty_directory_has_no_scan_root() {
        let missing = Cli::try_parse_from(["cutsheet-scan"]).expect("parsed");
        assert_eq!(missing.scan_root(), None);

        let empty = Cli::try_parse_from(["cutsheet-scan", ""]).expect("parsed");
        assert_eq!(empty.scan_root(), None);

        let given = Cli::try_parse_from(["cutsheet-scan", "--json", "sheets"]).expect("parsed");
        assert_eq!(given.scan_root(), Some(PathBuf::from("sheets")));
        assert!(given.json);
    }

    #[test]
    fn usage_names_the_binary() {
        let usage = usage();
        assert!(usage.starts_with("Missing path to cutsheet collection"));
        assert!(usage.contains("cutsheet-scan"), "{usage}");
        assert!(usage.contains("DIRECTORY"), "{usage}");
    }

    #[test]
    fn default_log_filter_is_valid() {
        assert_eq!(DEFAULT_LOG_FILTER, "warn");
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
