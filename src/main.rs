//! csvd CLI - check CSV cells against per-column rules

use clap::Parser;
use csvd::{DecodeSummary, DecoderBuilder, Quote, Rule};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Check CSV cells against per-column rules.
///
/// Columns are addressed by header name; names are matched ignoring case and
/// surrounding or repeated whitespace. Every failing cell of a row is
/// reported, not just the first.
#[derive(Parser, Debug)]
#[command(name = "csvd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input CSV file(s) to check
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Rule as KEY=KIND; KIND is nonempty, int, uint, float, bool or regex:<pattern>
    #[arg(short = 'r', long = "rule", value_name = "KEY=KIND")]
    rules: Vec<Rule>,

    /// Column that must be present in the header
    #[arg(long = "require", value_name = "KEY")]
    required: Vec<String>,

    /// Field delimiter (single character)
    #[arg(short = 'd', long, default_value = ",")]
    delimiter: char,

    /// Quote character (single ASCII character, or 'none')
    #[arg(short = 'q', long, value_parser = parse_quote)]
    quote: Option<Quote>,

    /// Allow records with a varying number of fields
    #[arg(long)]
    flexible: bool,

    /// Trim whitespace around values before checking them
    #[arg(long)]
    trim: bool,

    /// Do not transcode non-UTF-8 input
    #[arg(long)]
    no_transcode: bool,

    /// Only print the per-file summary
    #[arg(long)]
    quiet: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_filter = if args.verbose { "csvd=debug" } else { "warn" };
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let mut exit_code = ExitCode::SUCCESS;

    for file in &args.files {
        match check_file(file, &args) {
            Ok(true) => {}
            Ok(false) => exit_code = ExitCode::FAILURE,
            Err(e) => {
                eprintln!("Error processing {}: {}", file.display(), e);
                exit_code = ExitCode::FAILURE;
            }
        }
    }

    exit_code
}

fn builder(args: &Args) -> Result<DecoderBuilder, Box<dyn std::error::Error>> {
    let mut builder = DecoderBuilder::new();

    if !args.delimiter.is_ascii() {
        return Err(format!("delimiter must be ASCII, got {:?}", args.delimiter).into());
    }
    builder
        .delimiter(args.delimiter as u8)
        .flexible(args.flexible)
        .trim(args.trim)
        .transcode(!args.no_transcode);

    if let Some(quote) = args.quote {
        builder.quote(quote);
    }

    Ok(builder)
}

fn parse_quote(s: &str) -> Result<Quote, String> {
    if s.eq_ignore_ascii_case("none") {
        return Ok(Quote::None);
    }
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(Quote::Some(c as u8)),
        _ => Err(format!("quote must be a single ASCII character or 'none', got {s:?}")),
    }
}

/// Returns Ok(false) if the file decoded but did not pass its checks.
fn check_file(path: &Path, args: &Args) -> Result<bool, Box<dyn std::error::Error>> {
    let mut decoder = builder(args)?.from_path(path)?;
    let header = decoder.parse_header()?;
    debug!(file = %path.display(), columns = header.len(), "checking");

    let missing: Vec<&str> = args
        .required
        .iter()
        .map(String::as_str)
        .filter(|key| !header.has(key))
        .collect();
    for key in &missing {
        warn!(file = %path.display(), key, "required column missing");
    }

    let summary = decoder.for_each_row(|row| {
        for rule in &args.rules {
            rule.apply(row);
        }
    })?;

    print_report(path, &summary, &missing, args.quiet);

    Ok(missing.is_empty() && summary.is_clean())
}

fn print_report(path: &Path, summary: &DecodeSummary, missing: &[&str], quiet: bool) {
    println!("File: {}", path.display());
    for key in missing {
        println!("  Missing column: {key:?}");
    }
    if !quiet {
        for row_error in &summary.row_errors {
            print!("{row_error}");
        }
    }
    println!("  Rows: {}", summary.rows);
    println!("  Rows with errors: {}", summary.row_errors.len());
    println!("  Cell errors: {}", summary.cell_error_count());
    println!();
}
