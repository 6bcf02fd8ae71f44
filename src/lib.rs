//! yolo-curate: curation tooling for YOLO-format detection datasets.
//!
//! The pipeline works on `images/` + `labels/` trees where each image is
//! paired with a `<stem>.txt` label holding one `class cx cy w h` row per
//! object. It normalizes label contents, repairs label naming, splits a
//! validation subset out of the training tree, and certifies golden sets.
//!
//! # Modules
//!
//! - [`label`]: single-line normalization (class remap + geometry clamp)
//! - [`fix`]: label file rewriting and statistics
//! - [`pairs`]: image to label resolution
//! - [`rename`]: renaming fallback-matched labels to image stems
//! - [`split`]: deterministic train/val splitting
//! - [`verify`]: golden-set verification
//! - [`error`]: Error types for yolo-curate operations

pub mod error;
pub mod fix;
pub mod fs_util;
pub mod label;
pub mod pairs;
pub mod rename;
pub mod split;
pub mod verify;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

pub use error::CurateError;

/// The yolo-curate CLI application.
#[derive(Parser)]
#[command(name = "yolo-curate")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Log per-file and per-pair details to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Remap every label to class 0 and clamp geometry into [0, 1].
    FixLabels(FixLabelsArgs),
    /// Rename `label_<id>.txt` files to match `image_<id>` stems.
    RenameLabels(RenameLabelsArgs),
    /// Move or copy a fraction of train pairs into val.
    Split(SplitArgs),
    /// Check that every golden-set image decodes and has a label.
    VerifyGolden(VerifyGoldenArgs),
}

/// Arguments for the fix-labels subcommand.
#[derive(clap::Args)]
struct FixLabelsArgs {
    /// Labels directory (searched recursively for .txt files).
    #[arg(long, env = "YOLO_CURATE_LABELS_DIR")]
    labels_dir: PathBuf,

    /// Count changes without writing.
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the rename-labels subcommand.
#[derive(clap::Args)]
struct RenameLabelsArgs {
    /// Images directory.
    #[arg(long, env = "YOLO_CURATE_IMAGES_DIR")]
    images_dir: PathBuf,

    /// Labels directory.
    #[arg(long, env = "YOLO_CURATE_LABELS_DIR")]
    labels_dir: PathBuf,

    /// Show planned renames without touching files.
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the split subcommand.
#[derive(clap::Args)]
struct SplitArgs {
    /// Root data dir containing the train and val trees.
    #[arg(long, env = "YOLO_CURATE_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Train tree under the data dir; pairs are taken from here.
    #[arg(long, default_value = "train")]
    train_subdir: String,

    /// Val tree under the data dir; selected pairs land here.
    #[arg(long, default_value = "val")]
    val_subdir: String,

    /// Images directory name inside each tree.
    #[arg(long, default_value = "images")]
    images_subdir: String,

    /// Labels directory name inside each tree.
    #[arg(long, default_value = "labels")]
    labels_subdir: String,

    /// Fraction of pairs to move/copy to val.
    #[arg(long, env = "YOLO_CURATE_VAL_RATIO", default_value_t = 0.1)]
    val_ratio: f64,

    /// Seed for the pair shuffle.
    #[arg(long, env = "YOLO_CURATE_SEED", default_value_t = 42)]
    seed: u64,

    /// Copy instead of move (default: move).
    #[arg(long)]
    copy: bool,

    /// Show planned operations without changing files.
    #[arg(long)]
    dry_run: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the verify-golden subcommand.
#[derive(clap::Args)]
struct VerifyGoldenArgs {
    /// Golden-set images directory.
    #[arg(
        long,
        env = "YOLO_CURATE_GOLDEN_IMAGES_DIR",
        default_value = verify::DEFAULT_GOLDEN_IMAGES_DIR
    )]
    images_dir: PathBuf,

    /// Golden-set labels directory.
    #[arg(
        long,
        env = "YOLO_CURATE_GOLDEN_LABELS_DIR",
        default_value = verify::DEFAULT_GOLDEN_LABELS_DIR
    )]
    labels_dir: PathBuf,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Report rendering selected by `--output`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(raw: &str) -> Result<Self, CurateError> {
        match raw {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(CurateError::UnsupportedOutput(format!(
                "'{}' (supported: text, json)",
                other
            ))),
        }
    }
}

/// Run the yolo-curate CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), CurateError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::FixLabels(args)) => run_fix_labels(args),
        Some(Commands::RenameLabels(args)) => run_rename_labels(args),
        Some(Commands::Split(args)) => run_split(args),
        Some(Commands::VerifyGolden(args)) => run_verify_golden(args),
        None => {
            println!("yolo-curate {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Curation tooling for YOLO-format bounding-box datasets.");
            println!();
            println!("Run 'yolo-curate --help' for usage information.");
            Ok(())
        }
    }
}

/// Send `tracing` output to stderr; `RUST_LOG` overrides `--verbose`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    // A subscriber may already be installed when run() is embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_fix_labels(args: FixLabelsArgs) -> Result<(), CurateError> {
    let output = OutputFormat::parse(&args.output)?;
    let opts = fix::FixOptions {
        dry_run: args.dry_run,
    };
    let report = fix::fix_labels_dir(&args.labels_dir, &opts)?;
    emit(&report, output)
}

fn run_rename_labels(args: RenameLabelsArgs) -> Result<(), CurateError> {
    let output = OutputFormat::parse(&args.output)?;
    let opts = rename::RenameOptions {
        dry_run: args.dry_run,
    };
    let report = rename::rename_labels(&args.images_dir, &args.labels_dir, &opts)?;
    emit(&report, output)
}

fn run_split(args: SplitArgs) -> Result<(), CurateError> {
    let output = OutputFormat::parse(&args.output)?;
    let layout = split::SplitLayout::from_root(
        &args.data_dir,
        &args.train_subdir,
        &args.val_subdir,
        &args.images_subdir,
        &args.labels_subdir,
    );
    let opts = split::SplitOptions {
        val_ratio: args.val_ratio,
        seed: args.seed,
        mode: if args.copy {
            split::SplitMode::Copy
        } else {
            split::SplitMode::Move
        },
        dry_run: args.dry_run,
    };
    let report = split::split_dataset(&layout, &opts)?;
    emit(&report, output)
}

fn run_verify_golden(args: VerifyGoldenArgs) -> Result<(), CurateError> {
    let output = OutputFormat::parse(&args.output)?;
    let report = verify::verify_golden_set(&args.images_dir, &args.labels_dir)?;
    emit(&report, output)?;

    match report.failure {
        None => Ok(()),
        Some(failure) => Err(CurateError::VerificationFailed {
            message: failure.to_string(),
        }),
    }
}

/// Print a report as text (its `Display` form) or pretty JSON.
fn emit<R>(report: &R, output: OutputFormat) -> Result<(), CurateError>
where
    R: Serialize + std::fmt::Display,
{
    match output {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
    }
    Ok(())
}
