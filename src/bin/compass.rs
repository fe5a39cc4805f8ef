#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use compass_harness::config::{self, AssessmentConfig};
use compass_harness::generator::{generate_scenarios, GeneratedScenario};
use compass_harness::hooks::{ScoringObserver, TracingObserver};
use compass_harness::preference::RawResponse;
use compass_harness::scoring::{aggregate, Coordinates};
use compass_harness::session::AssessmentOutcome;
use compass_harness::style::interpret;
use compass_harness::{render_context_section, AssessmentContext, JsonlTraceSink};

#[derive(Parser)]
#[command(name = "compass", version, about = "Scenario assessment CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where to load the assessment definition from.
#[derive(Args)]
struct ConfigSource {
    /// Assessment JSON file
    #[arg(long, conflicts_with = "registry")]
    config: Option<PathBuf>,
    /// Registry index.json
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Assessment id within the registry (default: the registry's default)
    #[arg(long, requires = "registry")]
    assessment: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate an assessment definition
    Validate {
        #[command(flatten)]
        source: ConfigSource,
    },
    /// List the active assessments in a registry
    Registry {
        #[arg(long)]
        index: PathBuf,
    },
    /// Generate a scenario sequence for one run
    Generate {
        #[command(flatten)]
        source: ConfigSource,
        /// RNG seed; omit for a fresh random sequence
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Score responses against a generated scenario sequence
    Score {
        #[command(flatten)]
        source: ConfigSource,
        /// JSON array written by `generate`
        #[arg(long)]
        scenarios: PathBuf,
        /// JSON array of {scenarioId|questionId, value}
        #[arg(long)]
        responses: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Write scoring events as JSONL
        #[arg(long)]
        trace: Option<PathBuf>,
        /// Write the conversation context section as markdown
        #[arg(long)]
        context_out: Option<PathBuf>,
    },
    /// Interpret a coordinate pair
    Interpret {
        #[command(flatten)]
        source: ConfigSource,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },
}

fn load_config(source: &ConfigSource) -> Result<AssessmentConfig, Box<dyn std::error::Error>> {
    if let Some(path) = &source.config {
        return Ok(config::load_config_from_path(path)?);
    }
    let Some(registry_path) = &source.registry else {
        return Err("one of --config or --registry is required".into());
    };
    let id = match &source.assessment {
        Some(id) => id.clone(),
        None => config::load_registry_from_path(registry_path)?.default_assessment,
    };
    Ok(config::load_config_by_id(registry_path, &id)?)
}

fn read_json<T: serde::de::DeserializeOwned>(
    path: &Path,
) -> Result<T, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let value = serde_json::from_str(&raw)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    Ok(value)
}

fn write_json<T: serde::Serialize>(
    value: &T,
    out: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let body = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            let mut file = File::create(path)?;
            writeln!(file, "{body}")?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{body}")?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { source } => {
            let config = load_config(&source)?;
            println!(
                "ok: {} ({} dimensions, {} questions per run)",
                config.id,
                config.dimensions.len(),
                config.total_questions()
            );
        }
        Commands::Registry { index } => {
            let registry = config::load_registry_from_path(&index)?;
            for entry in registry.active() {
                let marker = if entry.id == registry.default_assessment {
                    "*"
                } else {
                    " "
                };
                println!("{marker} {}\t{}\t{}", entry.id, entry.version, entry.name);
            }
        }
        Commands::Generate { source, seed, out } => {
            let config = load_config(&source)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let scenarios = generate_scenarios(&config, &mut rng)?;
            info!(
                assessment = %config.id,
                count = scenarios.len(),
                "Generated scenarios"
            );
            write_json(&scenarios, out.as_deref())?;
        }
        Commands::Score {
            source,
            scenarios,
            responses,
            out,
            trace,
            context_out,
        } => {
            let config = load_config(&source)?;
            let scenarios: Vec<GeneratedScenario> = read_json(&scenarios)?;
            let responses: Vec<RawResponse> = read_json(&responses)?;

            let score = match trace {
                Some(path) => {
                    let (sink, worker) = JsonlTraceSink::new(path)?;
                    let score = aggregate(&config, &scenarios, &responses, &sink);
                    drop(sink);
                    worker.join()?;
                    score?
                }
                None => {
                    let observer: &dyn ScoringObserver = &TracingObserver;
                    aggregate(&config, &scenarios, &responses, observer)?
                }
            };

            let outcome = AssessmentOutcome::from_score(score, &config);
            info!(
                assessment = %config.id,
                position = %outcome.interpretation.position,
                x = outcome.score.coordinates.x,
                y = outcome.score.coordinates.y,
                "Scored responses"
            );
            if let Some(path) = context_out {
                let ctx = AssessmentContext::from_outcome(&outcome, &config);
                std::fs::write(path, render_context_section(&ctx))?;
            }
            write_json(&outcome, out.as_deref())?;
        }
        Commands::Interpret { source, x, y } => {
            let config = load_config(&source)?;
            let interpretation = interpret(Coordinates::new(x, y), &config);
            write_json(&interpretation, None)?;
        }
    }

    Ok(())
}
