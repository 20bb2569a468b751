//! colony CLI: count, auto-tune and sweep on petri-dish photographs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use colony::{
    AnnotationStyle, ColorImage, PipelineConfig, SearchSpace, SweepEvaluator, annotate,
    process_image, tune,
};

#[derive(Parser)]
#[command(name = "colony")]
#[command(about = "Count colonies on petri-dish photographs")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Directory for rolling log files.
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Count colonies in one image.
    Count(CountArgs),

    /// Grid-search binarization settings and write the tuned config.
    Tune(TuneArgs),

    /// Rank distance-transform watershed settings against the baseline.
    Sweep(SweepArgs),
}

#[derive(Debug, Clone, Args)]
struct ConfigArgs {
    /// Pipeline config file (YAML or JSON).
    #[arg(long, conflicts_with = "sensitivity")]
    config: Option<PathBuf>,

    /// Derive blur, morphology and minimum area from one 0-10 knob.
    #[arg(long)]
    sensitivity: Option<f32>,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<PipelineConfig> {
        match (&self.config, self.sensitivity) {
            (Some(path), _) => PipelineConfig::from_file(path)
                .with_context(|| format!("Failed to load config '{}'", path.display())),
            (None, Some(sensitivity)) => {
                PipelineConfig::from_sensitivity(sensitivity).context("Invalid sensitivity")
            }
            (None, None) => Ok(PipelineConfig::default()),
        }
    }
}

#[derive(Debug, Clone, Args)]
struct CountArgs {
    image: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,

    /// Write an annotated copy of the image.
    #[arg(long)]
    annotate: Option<PathBuf>,

    /// Print the full result as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Args)]
struct TuneArgs {
    image: PathBuf,

    // min area, radius and color settings of the starting config are kept
    #[command(flatten)]
    config: ConfigArgs,

    /// Where to write the tuned config (YAML or JSON).
    #[arg(long, default_value = "tuned.yaml")]
    out: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct SweepArgs {
    image: PathBuf,

    /// Where to write the ranked results.
    #[arg(long, default_value = "results.json")]
    out: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    common::log_setup::setup_logging(&cli.log_level, &cli.log_dir);

    match cli.command {
        Commands::Count(args) => run_count(&args),
        Commands::Tune(args) => run_tune(&args),
        Commands::Sweep(args) => run_sweep(&args),
    }
}

fn load_image(path: &Path) -> Result<ColorImage> {
    ColorImage::from_file(path).context("Failed to load input image")
}

fn run_count(args: &CountArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let image = load_image(&args.image)?;
    let result = process_image(&config, &image).context("Counting failed")?;

    if let Some(path) = &args.annotate {
        let annotated = annotate(&image, &result, &AnnotationStyle::for_config(&config));
        annotated
            .save(path)
            .with_context(|| format!("Failed to write annotated image '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote annotated image");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match (result.count_a(), result.count_b()) {
            (Some(a), Some(b)) => println!("{} colonies (A: {a}, B: {b})", result.count),
            _ => println!("{} colonies", result.count),
        }
    }
    Ok(())
}

fn run_tune(args: &TuneArgs) -> Result<()> {
    let base = args.config.resolve()?;
    let image = load_image(&args.image)?;
    let outcome = tune(&base, &image, &SearchSpace::default()).context("Auto-tune failed")?;

    common::write_file(&outcome.config, &args.out)
        .with_context(|| format!("Failed to write tuned config '{}'", args.out.display()))?;
    println!(
        "best count {} (blur {}, {}, invert {}, morph {}) -> {}",
        outcome.count,
        outcome.best.blur_size,
        outcome.best.mode,
        outcome.best.invert,
        outcome.best.morph_size,
        args.out.display()
    );
    Ok(())
}

fn run_sweep(args: &SweepArgs) -> Result<()> {
    let image = load_image(&args.image)?;
    let report = SweepEvaluator::default()
        .run(&image)
        .context("Sweep failed")?;

    common::write_file(&report, &args.out)
        .with_context(|| format!("Failed to write sweep results '{}'", args.out.display()))?;

    println!("baseline {}", report.baseline);
    for result in report.improving().take(8) {
        println!("{:>4}  {}", result.count, result.id);
    }
    Ok(())
}
