//! Sketchlogic: hand-drawn logic circuits to netlists and Boolean algebra.
//!
//! Given a photo of a sketched circuit and the gate boxes an object detector
//! found in it, sketchlogic traces the wires between gates, works out which
//! terminal of each gate is the output, and recovers one Boolean expression
//! per external output.
//!
//! # Modules
//!
//! - [`ir`]: Data model (detections, gates, wires, the netlist) and its readers
//! - [`trace`]: Skeleton extraction, terminal discovery and wire tracing
//! - [`netlist`]: Role classification, netlist assembly, external markers
//! - [`boolean`]: Expression recovery from a finished netlist
//! - [`pipeline`]: The end-to-end parse and batch discovery
//! - [`validation`]: Detection checks before parsing
//! - [`export`]: Simulator JSON export
//! - [`config`]: Tunable thresholds
//! - [`error`]: Error types

pub mod boolean;
pub mod config;
pub mod error;
pub mod export;
pub mod ir;
pub mod netlist;
pub mod pipeline;
pub mod trace;
pub mod validation;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

pub use config::{ExternalMapping, ParseOptions};
pub use error::SketchError;
pub use pipeline::{parse_circuit, ParseOutcome};

/// The sketchlogic CLI application.
#[derive(Parser)]
#[command(name = "sketchlogic")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG
    /// takes precedence when set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Parse a sketch image into a netlist.
    Parse(ParseArgs),
    /// Print the Boolean expressions of a saved netlist.
    Boolean(BooleanArgs),
    /// Validate a detections file for errors and warnings.
    Validate(ValidateArgs),
    /// Convert a saved netlist to simulator JSON.
    Export(ExportArgs),
    /// Parse every image in a directory that has a detections file beside it.
    Batch(BatchArgs),
}

/// Options shared by `parse` and `batch`.
#[derive(clap::Args)]
struct TuningArgs {
    /// YAML file with parse options; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Marker mapping for dead ends ('observed' or 'conventional').
    #[arg(long)]
    mapping: Option<String>,

    /// Seed for wire ids, for reproducible output.
    #[arg(long)]
    seed: Option<u64>,
}

/// Arguments for the parse subcommand.
#[derive(clap::Args)]
struct ParseArgs {
    /// Sketch image (PNG, JPEG or BMP).
    image: PathBuf,

    /// Detections file from the gate detector.
    #[arg(short, long)]
    detections: PathBuf,

    /// Detections format ('auto', 'json' or 'csv').
    #[arg(long, default_value = "auto")]
    detections_format: String,

    /// Write the netlist here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Include the Boolean expressions in the output.
    #[arg(long)]
    boolean: bool,

    #[command(flatten)]
    tuning: TuningArgs,
}

/// Arguments for the boolean subcommand.
#[derive(clap::Args)]
struct BooleanArgs {
    /// Netlist JSON written by `parse`.
    netlist: PathBuf,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Detections file to validate.
    input: PathBuf,

    /// Input format ('auto', 'json' or 'csv').
    #[arg(long, default_value = "auto")]
    format: String,

    /// Image the detections belong to, for bounds checks.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the export subcommand.
#[derive(clap::Args)]
struct ExportArgs {
    /// Netlist JSON written by `parse`.
    netlist: PathBuf,

    /// Simulator JSON to write.
    #[arg(short, long)]
    output: PathBuf,

    /// Keep sketch coordinates instead of normalizing the layout.
    #[arg(long)]
    raw: bool,
}

/// Arguments for the batch subcommand.
#[derive(clap::Args)]
struct BatchArgs {
    /// Directory to scan for images.
    input: PathBuf,

    /// Directory for `<stem>.netlist.json` outputs.
    #[arg(short, long)]
    out_dir: PathBuf,

    /// Include the Boolean expressions in each output.
    #[arg(long)]
    boolean: bool,

    #[command(flatten)]
    tuning: TuningArgs,
}

/// Netlist document as written by `parse` and `batch`.
#[derive(Serialize)]
struct NetlistDocument<'a> {
    #[serde(flatten)]
    netlist: &'a ir::Netlist,

    #[serde(skip_serializing_if = "Option::is_none")]
    expressions: Option<BTreeMap<String, String>>,
}

/// Run the sketchlogic CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SketchError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Parse(args)) => run_parse(args),
        Some(Commands::Boolean(args)) => run_boolean(args),
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Export(args)) => run_export(args),
        Some(Commands::Batch(args)) => run_batch(args),
        None => {
            println!("sketchlogic {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Turns sketched logic circuits into netlists and Boolean expressions.");
            println!();
            println!("Run 'sketchlogic --help' for usage information.");
            Ok(())
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A subscriber may already be installed when run() is called twice in
    // one process.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse_options(tuning: &TuningArgs) -> Result<ParseOptions, SketchError> {
    let mut opts = match &tuning.config {
        Some(path) => ParseOptions::from_yaml_file(path)?,
        None => ParseOptions::default(),
    };
    if let Some(mapping) = &tuning.mapping {
        opts.external_mapping = match mapping.as_str() {
            "observed" => ExternalMapping::Observed,
            "conventional" => ExternalMapping::Conventional,
            other => {
                return Err(SketchError::UnsupportedFormat(format!(
                    "mapping '{}' (supported: observed, conventional)",
                    other
                )));
            }
        };
    }
    if let Some(seed) = tuning.seed {
        opts.wire_id_seed = Some(seed);
    }
    Ok(opts)
}

fn netlist_json(netlist: &ir::Netlist, with_boolean: bool) -> Result<String, serde_json::Error> {
    let expressions = with_boolean.then(|| boolean::synthesize(netlist).to_map());
    serde_json::to_string_pretty(&NetlistDocument {
        netlist,
        expressions,
    })
}

fn write_text(path: &Path, contents: &str) -> Result<(), SketchError> {
    fs::write(path, contents).map_err(SketchError::Io)
}

/// Execute the parse subcommand.
fn run_parse(args: ParseArgs) -> Result<(), SketchError> {
    let opts = parse_options(&args.tuning)?;
    let detections = pipeline::read_detections(&args.detections, &args.detections_format)?;
    let outcome = pipeline::parse_image_file(&args.image, &detections, &opts)?;

    let out_path = args.output.clone().unwrap_or_else(|| PathBuf::from("<stdout>"));
    let json = netlist_json(&outcome.netlist, args.boolean).map_err(|source| {
        SketchError::NetlistJsonWrite {
            path: out_path.clone(),
            source,
        }
    })?;

    eprint!("{}", outcome.report);
    match &args.output {
        Some(path) => {
            write_text(path, &json)?;
            tracing::info!(path = %path.display(), "netlist written");
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Execute the boolean subcommand.
fn run_boolean(args: BooleanArgs) -> Result<(), SketchError> {
    let netlist = ir::io_json::read_netlist_json(&args.netlist)?;
    let synthesis = boolean::synthesize(&netlist);
    for fallback in &synthesis.fallbacks {
        eprintln!(
            "warning: wire {} of gate {} matched no marker; assumed {}",
            fallback.wire, fallback.gate, fallback.label
        );
    }

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&synthesis.to_map()).map_err(|source| {
                SketchError::NetlistJsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        "text" => {
            for line in synthesis.lines() {
                println!("{}", line);
            }
        }
        other => {
            return Err(SketchError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }
    Ok(())
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), SketchError> {
    let detections = pipeline::read_detections(&args.input, &args.format)?;

    let mut opts = validation::ValidateOptions {
        strict: args.strict,
        image_size: None,
    };
    if let Some(image) = &args.image {
        opts = opts.with_image(image)?;
    }
    let report = validation::validate_detections(&detections, &opts);

    match args.output.as_str() {
        "json" => {
            let summary = serde_json::json!({
                "checked": report.checked,
                "error_count": report.error_count(),
                "warning_count": report.warning_count(),
                "issues": report.issues,
            });
            let json = serde_json::to_string_pretty(&summary).map_err(|source| {
                SketchError::NetlistJsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        _ => print!("{}", report),
    }

    if !report.passes(opts.strict) {
        Err(SketchError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the export subcommand.
fn run_export(args: ExportArgs) -> Result<(), SketchError> {
    let netlist = ir::io_json::read_netlist_json(&args.netlist)?;
    let opts = export::ExportOptions {
        normalize: !args.raw,
        ..Default::default()
    };
    let circuit = export::export_simulator(&netlist, &opts);
    export::write_simulator_json(&args.output, &circuit)?;
    println!(
        "Exported {} component(s) and {} wire(s) to {}",
        circuit.components.len(),
        circuit.wires.len(),
        args.output.display()
    );
    Ok(())
}

/// Execute the batch subcommand.
fn run_batch(args: BatchArgs) -> Result<(), SketchError> {
    let opts = parse_options(&args.tuning)?;
    let jobs = pipeline::find_batch_jobs(&args.input)?;
    fs::create_dir_all(&args.out_dir).map_err(SketchError::Io)?;

    let mut failed = 0usize;
    for job in &jobs {
        let out_path = args.out_dir.join(format!("{}.netlist.json", job.stem()));
        let result = pipeline::read_detections(&job.detections, "auto")
            .and_then(|dets| pipeline::parse_image_file(&job.image, &dets, &opts))
            .and_then(|outcome| {
                let json = netlist_json(&outcome.netlist, args.boolean).map_err(|source| {
                    SketchError::NetlistJsonWrite {
                        path: out_path.clone(),
                        source,
                    }
                })?;
                write_text(&out_path, &json)?;
                Ok(outcome.report)
            });
        match result {
            Ok(report) => println!(
                "{}: {} ({} warning(s))",
                job.image.display(),
                report.stats,
                report.warning_count()
            ),
            Err(err) => {
                failed += 1;
                tracing::warn!(image = %job.image.display(), error = %err, "parse failed");
                eprintln!("{}: {}", job.image.display(), err);
            }
        }
    }

    println!(
        "Parsed {} of {} image(s) into {}",
        jobs.len() - failed,
        jobs.len(),
        args.out_dir.display()
    );
    Ok(())
}
