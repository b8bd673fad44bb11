//! Labelcensus: class statistics for object detection datasets.
//!
//! Labelcensus walks a dataset directory, reads every annotation file it
//! recognises (Pascal VOC XML, COCO and LabelMe JSON, YOLO TXT) and reports,
//! per class, how many annotations exist, how many files contain them and
//! which directories those files live in.
//!
//! # Modules
//!
//! - [`parse`]: Format detection and per-format annotation parsers
//! - [`class_names`]: Companion class-list lookup for YOLO labels
//! - [`walk`]: Error-tolerant dataset traversal
//! - [`analysis`]: Aggregation into an [`analysis::AnalysisReport`]
//! - [`export`]: CSV export of a report
//! - [`error`]: Error types for labelcensus operations

pub mod analysis;
pub mod class_names;
pub mod error;
pub mod export;
pub mod parse;
pub mod walk;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

pub use analysis::{analyze, AnalysisReport, AnalyzeOptions, ClassNameMode};
pub use error::CensusError;

use parse::json::detect_json_variant;
use parse::FormatTag;

/// The labelcensus CLI application.
#[derive(Parser)]
#[command(name = "labelcensus")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Count annotations per class across a dataset directory.
    Analyze(AnalyzeArgs),

    /// Show the class-list file that applies to a directory.
    Classes(ClassesArgs),

    /// Print the detected format of annotation files.
    Detect(DetectArgs),
}

/// Arguments for the analyze subcommand.
#[derive(clap::Args)]
struct AnalyzeArgs {
    /// Dataset root directory.
    path: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// Also write the per-class table to this CSV file.
    #[arg(long, value_name = "FILE")]
    export_csv: Option<PathBuf>,

    /// Parse files on all available cores.
    #[arg(long, env = "LABELCENSUS_PARALLEL")]
    parallel: bool,

    /// Name YOLO classes from this class-list file.
    #[arg(long, value_name = "FILE", conflicts_with = "resolve_class_names")]
    class_names: Option<PathBuf>,

    /// Name YOLO classes from the nearest classes.txt / obj.names / class.names / labels.txt.
    #[arg(long)]
    resolve_class_names: bool,

    /// Skip directories with this name (repeatable, or comma-separated in the env var).
    #[arg(
        long = "exclude",
        value_name = "NAME",
        env = "LABELCENSUS_EXCLUDE",
        value_delimiter = ','
    )]
    exclude: Vec<String>,
}

/// Arguments for the classes subcommand.
#[derive(clap::Args)]
struct ClassesArgs {
    /// Directory to start the search from.
    dir: PathBuf,
}

/// Arguments for the detect subcommand.
#[derive(clap::Args)]
struct DetectArgs {
    /// Annotation files to inspect.
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

/// Run the labelcensus CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), CensusError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Analyze(args)) => run_analyze(args),
        Some(Commands::Classes(args)) => run_classes(args),
        Some(Commands::Detect(args)) => run_detect(args),
        None => {
            println!("labelcensus {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Class statistics for object detection datasets.");
            println!();
            println!("Run 'labelcensus --help' for usage information.");
            Ok(())
        }
    }
}

/// `RUST_LOG` wins over the verbosity flags when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    // A logger may already be installed when embedded.
    let _ = builder.try_init();
}

/// Execute the analyze subcommand.
fn run_analyze(args: AnalyzeArgs) -> Result<(), CensusError> {
    if !matches!(args.output.as_str(), "text" | "json") {
        return Err(CensusError::UnsupportedOutput(format!(
            "'{}' (supported: text, json)",
            args.output
        )));
    }

    let class_names = match (&args.class_names, args.resolve_class_names) {
        (Some(path), _) => ClassNameMode::Fixed(class_names::load_class_names(path)?),
        (None, true) => ClassNameMode::NearestFile,
        (None, false) => ClassNameMode::Raw,
    };

    let opts = AnalyzeOptions {
        class_names,
        extra_excluded_dirs: args.exclude,
        parallel: args.parallel,
    };
    let report = analyze(&args.path, &opts)?;

    if let Some(csv_path) = &args.export_csv {
        export::write_csv(&report, csv_path)?;
        log::info!("Wrote CSV export to {}", csv_path.display());
    }

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report)
                .map_err(|source| CensusError::ReportJsonWrite { source })?;
            println!("{json}");
        }
        _ => print!("{report}"),
    }

    Ok(())
}

/// Execute the classes subcommand.
fn run_classes(args: ClassesArgs) -> Result<(), CensusError> {
    match class_names::resolve_class_names(&args.dir)? {
        Some(resolved) => {
            println!("{}", resolved.source.display());
            for (index, name) in resolved.names.iter().enumerate() {
                println!("  {index:>3}  {name}");
            }
        }
        None => println!(
            "No class list found in {} or its three parent directories",
            args.dir.display()
        ),
    }
    Ok(())
}

/// Execute the detect subcommand.
fn run_detect(args: DetectArgs) -> Result<(), CensusError> {
    for path in &args.files {
        match FormatTag::from_path(path) {
            Some(FormatTag::Json) => {
                let variant = detect_json_variant(path)?;
                println!("{}: {} ({})", path.display(), FormatTag::Json, variant);
            }
            Some(tag) => println!("{}: {}", path.display(), tag),
            None => println!("{}: unsupported", path.display()),
        }
    }
    Ok(())
}
