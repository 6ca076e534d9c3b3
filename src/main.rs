//! Command-line front end for inspecting SCORM packages.
//!
//! # Usage
//!
//! Print a report:
//! ```sh
//! scorm-inspect course.zip
//! ```
//!
//! Write the full analysis and the content map next to each other:
//! ```sh
//! scorm-inspect course.zip --export-dir reports/
//! ```
//!
//! Fail a CI job when the package has broken links or missing files:
//! ```sh
//! scorm-inspect course.zip --strict --format json > analysis.json
//! ```

use clap::{ArgAction, Parser, ValueEnum};
use scorm_inspector::common::NOT_AVAILABLE;
use scorm_inspector::export::{self, ExportFormat};
use scorm_inspector::scorm::{
    AnalysisResult, Analyzer, AnalyzerOptions, DEFAULT_MAX_DEPTH, DEFAULT_MAX_ELEMENT_DEPTH,
    Severity,
};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Parse, validate and summarize a SCORM package
#[derive(Parser, Debug)]
#[command(
    name = "scorm-inspect",
    about = "Parse, validate and summarize a SCORM package",
    long_about = "Reads the imsmanifest.xml of a SCORM 1.2 or 2004 package (a .zip archive),\n\
                  checks item references and resource files, extracts course metadata and\n\
                  prints the course outline.",
    version
)]
struct Args {
    /// SCORM package (.zip)
    #[arg(value_name = "PACKAGE")]
    package: PathBuf,

    /// Report format written to stdout
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write the full analysis as JSON to FILE
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Write the full analysis as YAML to FILE
    #[arg(long, value_name = "FILE")]
    yaml: Option<PathBuf>,

    /// Write the content map as CSV to FILE
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Write `<title>_full_analysis.json` and `<title>_content_map.csv` into DIR
    #[arg(long, value_name = "DIR")]
    export_dir: Option<PathBuf>,

    /// Deepest item nesting accepted before the outline is abandoned
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Deepest XML element nesting accepted before the manifest is rejected
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_ELEMENT_DEPTH)]
    max_element_depth: usize,

    /// Use the first organization even when another is marked as default
    #[arg(long)]
    first_organization: bool,

    /// Exit with status 1 when the health check reports any error
    #[arg(long)]
    strict: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Report formats for stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Full analysis as JSON
    Json,
    /// Full analysis as YAML
    Yaml,
    /// Content map as CSV
    Csv,
}

impl OutputFormat {
    fn export_format(self) -> Option<ExportFormat> {
        match self {
            OutputFormat::Text => None,
            OutputFormat::Json => Some(ExportFormat::Json),
            OutputFormat::Yaml => Some(ExportFormat::Yaml),
            OutputFormat::Csv => Some(ExportFormat::Csv),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(result) => {
            if args.strict && result.validation.count(Severity::Error) > 0 {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        },
        Err(e) => {
            eprintln!("Error: {}: {}", args.package.display(), e);
            ExitCode::FAILURE
        },
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn run(args: &Args) -> Result<AnalysisResult, Box<dyn std::error::Error>> {
    let options = AnalyzerOptions::new()
        .with_max_depth(args.max_depth)
        .with_max_element_depth(args.max_element_depth)
        .with_prefer_default_organization(!args.first_organization);
    let result = Analyzer::with_options(options).analyze_path(&args.package)?;

    match args.format.export_format() {
        Some(format) => println!("{}", format.render(&result)?.trim_end()),
        None => print_report(&result),
    }

    if let Some(path) = &args.json {
        let mut writer = BufWriter::new(File::create(path)?);
        export::write_json(&result, &mut writer)?;
        writer.flush()?;
        log::info!("Wrote {}", path.display());
    }
    if let Some(path) = &args.yaml {
        write_file(path, &export::to_yaml(&result)?)?;
    }
    if let Some(path) = &args.csv {
        write_file(path, &export::to_csv(&result)?)?;
    }
    if let Some(dir) = &args.export_dir {
        fs::create_dir_all(dir)?;
        for format in [ExportFormat::Json, ExportFormat::Csv] {
            format.export_to_dir(&result, dir)?;
        }
    }

    Ok(result)
}

fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
    fs::write(path, contents)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

/// Print the human-readable report
fn print_report(result: &AnalysisResult) {
    let metadata = &result.metadata;

    println!("=== {} ===", result.course_title);
    println!("Source: {}", result.source);
    if let Some(error) = &result.structure_error {
        println!("Outline unavailable: {}", error);
    }

    println!("\n--- Course Profile ---");
    println!("SCOs:           {}", metadata.sco_count);
    println!("Assets:         {}", metadata.asset_count);
    println!("Passing Score:  {}", metadata.passing_score);
    println!("Launch File:    {}", metadata.launch_file);
    println!("Primary Type:   {}", metadata.primary_type);
    println!("Description:    {}", metadata.description);
    println!("Keywords:       {}", metadata.keywords);
    match metadata.sequencing_rules.as_option() {
        Some(rules) => println!(
            "Sequencing:     flow {}, forward only {}",
            rules.flow, rules.forward_only
        ),
        None => println!("Sequencing:     {}", NOT_AVAILABLE),
    }

    println!("\n--- Health Check ---");
    let errors: Vec<_> = result.validation.errors().collect();
    let warnings: Vec<_> = result.validation.warnings().collect();
    if errors.is_empty() && warnings.is_empty() {
        println!("No errors or warnings found.");
    }
    for (label, messages) in [("ERROR", &errors), ("WARNING", &warnings)] {
        for message in messages {
            println!("[{}] {}", label, message);
        }
    }
    for message in result.validation.infos() {
        println!("[INFO] {}", message);
    }

    println!("\n--- Content Map ---");
    let rows = result.content_map();
    if rows.is_empty() {
        println!("(no launchable items)");
    }
    for row in rows {
        println!("{}  [{}]  {}", row.path, row.identifier, row.file);
    }
}
