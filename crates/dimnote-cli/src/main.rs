//! dimnote CLI — infer drawing semantics from raw OCR output.
//!
//! OCR runs out of process; this binary consumes its raw lines as JSON,
//! applies the confidence cut and the three classification passes, and
//! writes the annotated detection list.

use clap::{Args, Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

use dimnote_core::{annotate, ingest_line, ExtractConfig, OcrLine, PredicateConfig};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "dimnote")]
#[command(
    about = "Annotate OCR text boxes from engineering drawings (radius callouts, measurement labels, tolerance bounds)"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Annotate raw OCR lines with drawing semantics.
    Annotate(CliAnnotateArgs),

    /// Print the embedded default thresholds.
    Defaults,
}

#[derive(Debug, Clone, Args)]
struct CliAnnotateArgs {
    /// Path to raw OCR lines: a JSON array of {text, box, confidence, angle?}.
    #[arg(long)]
    input: PathBuf,

    /// Path to write annotated detections (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Confidence cut; lines at or below this value are dropped.
    #[arg(long, default_value = "0.85")]
    threshold: f32,

    /// Horizontal gap window as a fraction of the left box's width.
    #[arg(long, default_value = "1.0")]
    gap_width_factor: f64,

    /// Vertical alignment tolerance as a fraction of the reference box height.
    #[arg(long, default_value = "0.2")]
    alignment_tolerance: f64,

    /// Area ratio a tolerance pivot must exceed over each bound candidate.
    #[arg(long, default_value = "1.3")]
    area_margin: f64,

    /// Gate on the lower-half bound candidate's top edge (fraction of the pivot midline).
    #[arg(long, default_value = "0.9")]
    upper_tolerance: f64,

    /// Gate on the upper-half bound candidate's bottom edge (fraction of the pivot midline).
    #[arg(long, default_value = "1.1")]
    lower_tolerance: f64,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pretty: bool,

    /// Emit the detection list as a single JSON string value instead of a
    /// native array, for sinks expecting the legacy double-encoded format.
    #[arg(long)]
    string_encoded: bool,
}

impl CliAnnotateArgs {
    fn to_predicates(&self) -> PredicateConfig {
        PredicateConfig {
            gap_width_factor: self.gap_width_factor,
            alignment_tolerance: self.alignment_tolerance,
            area_margin: self.area_margin,
            upper_tolerance: self.upper_tolerance,
            lower_tolerance: self.lower_tolerance,
        }
    }
}

/// One input record: a raw OCR line plus the rotation-variant angle the
/// upstream preprocessing used (0 when variants were disabled).
#[derive(Debug, Clone, Deserialize)]
struct RawRecord {
    text: String,
    #[serde(rename = "box")]
    points: Vec<[f64; 2]>,
    confidence: f32,
    #[serde(default)]
    angle: i32,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Annotate(args) => run_annotate(&args),
        Commands::Defaults => run_defaults(),
    }
}

// ── annotate ───────────────────────────────────────────────────────────────

fn run_annotate(args: &CliAnnotateArgs) -> CliResult<()> {
    tracing::info!("Loading OCR lines: {}", args.input.display());
    let raw = std::fs::read_to_string(&args.input).map_err(|e| -> CliError {
        format!("Failed to read {}: {}", args.input.display(), e).into()
    })?;
    let records: Vec<RawRecord> = serde_json::from_str(&raw)?;

    let mut detections = Vec::new();
    for (index, record) in records.iter().enumerate() {
        let line = OcrLine {
            text: record.text.clone(),
            points: record.points.clone(),
            confidence: record.confidence,
        };
        match ingest_line(&line, record.angle, args.threshold) {
            Ok(Some(detection)) => detections.push(detection),
            Ok(None) => {}
            Err(e) => return Err(format!("record {}: {}", index, e).into()),
        }
    }
    tracing::info!(
        "{} of {} lines passed the confidence cut",
        detections.len(),
        records.len()
    );

    annotate(&mut detections, &args.to_predicates());

    let n_radius = detections.iter().filter(|d| d.attributes.is_radius).count();
    let n_labeled = detections
        .iter()
        .filter(|d| d.attributes.required_measurement.as_label().is_some())
        .count();
    let n_bounded = detections
        .iter()
        .filter(|d| d.attributes.lower_bound.is_some())
        .count();
    tracing::info!(
        "Annotated: {} radius, {} labeled, {} with bounds",
        n_radius,
        n_labeled,
        n_bounded,
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&detections)?
    } else {
        serde_json::to_string(&detections)?
    };
    let payload = if args.string_encoded {
        serde_json::to_string(&json)?
    } else {
        json
    };
    std::fs::write(&args.out, &payload)?;
    tracing::info!("Results written to {}", args.out.display());

    Ok(())
}

// ── defaults ───────────────────────────────────────────────────────────────

fn run_defaults() -> CliResult<()> {
    let extract = ExtractConfig::default();
    let predicates = PredicateConfig::default();

    println!("dimnote default configuration");
    println!("  confidence threshold:  {}", extract.threshold);
    println!(
        "  rotation variants:     {}",
        if extract.rotation_required {
            "8 x 45 deg"
        } else {
            "disabled"
        }
    );
    println!("  gap width factor:      {}", predicates.gap_width_factor);
    println!("  alignment tolerance:   {}", predicates.alignment_tolerance);
    println!("  area margin:           {}", predicates.area_margin);
    println!("  upper-bound tolerance: {}", predicates.upper_tolerance);
    println!("  lower-bound tolerance: {}", predicates.lower_tolerance);

    Ok(())
}
