use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::io::{self, BufReader};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rep_tracker::config::Config;
use rep_tracker::pipeline;
use rep_tracker::provider::{JsonLinesProvider, PoseProvider};
use rep_tracker::render::{ConsoleRenderer, JsonRenderer, Renderer};
use rep_tracker::tracker::{Exercise, RepCounter};

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Count reps and grade form from a JSON-lines pose stream
#[derive(Debug, Parser)]
#[command(name = "rep-tracker", version, long_version = env!("GIT_VERSION"))]
struct Cli {
    /// Pose records, one JSON object per line ("-" for stdin)
    #[arg(required_unless_present = "print_config")]
    input: Option<PathBuf>,

    /// pushup, squat or situp (overrides [session].exercise)
    #[arg(short, long)]
    exercise: Option<String>,

    /// TOML config; config.toml in the working directory is used if present
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print the default configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    if cli.print_config {
        print!("{}", Config::default_toml()?);
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(CONFIG_PATH),
    };

    let exercise: Exercise = match &cli.exercise {
        Some(name) => name.parse()?,
        None => config.exercise()?,
    };
    let exercise_config = config
        .exercise_config(exercise)
        .with_context(|| format!("invalid [{}] configuration", exercise.key()))?;
    let mut counter = RepCounter::new(exercise, exercise_config)?;

    let mut provider: Box<dyn PoseProvider> = match cli.input.as_deref() {
        Some(path) if path.as_os_str() != "-" => Box::new(JsonLinesProvider::open(path)?),
        _ => Box::new(JsonLinesProvider::new(BufReader::new(io::stdin()))),
    };
    let mut renderer: Box<dyn Renderer> = match cli.format {
        Format::Text => Box::new(ConsoleRenderer::stdout()),
        Format::Json => Box::new(JsonRenderer::stdout()),
    };

    pipeline::run(provider.as_mut(), renderer.as_mut(), &mut counter)?;
    Ok(())
}
