//! waypoint CLI: inspect and maintain a pipeline manifest.

mod config;
mod telemetry;

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use waypoint_core::config::ManifestConfig;
use waypoint_core::deps::{self, DEPENDENCIES};
use waypoint_core::id::StepId;
use waypoint_core::model::Metadata;
use waypoint_core::period::PeriodLabel;
use waypoint_store::{DependencyReport, ManifestStore};

use crate::config::{apply_config_file, read_config_file};

#[derive(Parser)]
#[command(name = "waypoint", version = waypoint_core::VERSION)]
#[command(about = "Pipeline manifest: where every step's output landed", long_about = None)]
struct Cli {
    /// Manifest JSON file (overrides env and config file)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show steps, output counts and latest creation times
    Summary {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List output keys registered by a step
    List {
        #[arg(short, long)]
        step: String,
    },

    /// Resolve a declared input of a step to its file path
    Resolve {
        #[arg(short, long)]
        step: String,

        #[arg(short, long)]
        input: String,
    },

    /// Find the newest output of a step by key prefix and/or period label
    Latest {
        #[arg(short, long)]
        step: String,

        #[arg(long)]
        prefix: Option<String>,

        #[arg(long)]
        period: Option<String>,
    },

    /// Register an output file for a step
    Register {
        #[arg(short, long)]
        step: String,

        #[arg(short, long)]
        key: String,

        #[arg(short, long)]
        file: String,

        /// Also register under `<key>_<period>` and stamp metadata.period_label
        #[arg(long)]
        period: Option<String>,

        /// Metadata entries as key=value (value parsed as JSON when possible)
        #[arg(long = "meta", value_name = "KEY=VALUE")]
        meta: Vec<String>,
    },

    /// Clear the manifest before a fresh run
    Reset {
        /// Keep the file on disk and just reload it
        #[arg(long)]
        keep_file: bool,
    },

    /// Resolve every declared dependency and report failures
    Check {
        #[arg(short, long)]
        step: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Print the static dependency table
    Deps {
        #[arg(short, long)]
        step: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match resolve_config(cli.manifest.clone(), cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    telemetry::init(&config);
    debug!(manifest = %config.manifest_path.display(), "using manifest");

    match run(cli.command, &config) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Defaults < environment < config file < `--manifest`.
fn resolve_config(
    manifest: Option<PathBuf>,
    config_file: Option<&std::path::Path>,
) -> Result<ManifestConfig, Box<dyn std::error::Error>> {
    let mut config = ManifestConfig::from_env();
    if let Some(path) = config_file {
        let doc = read_config_file(path)?;
        apply_config_file(&mut config, &doc);
    }
    if let Some(path) = manifest {
        config.manifest_path = path;
    }
    Ok(config)
}

/// Returns `Ok(false)` when the command ran but found nothing / found problems.
fn run(command: Commands, config: &ManifestConfig) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Commands::Deps { step } => {
            print_deps(step.as_deref())?;
            Ok(true)
        }
        command => {
            let mut store = ManifestStore::open(config);
            run_with_store(command, &mut store)
        }
    }
}

fn run_with_store(
    command: Commands,
    store: &mut ManifestStore,
) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Commands::Summary { json } => {
            let summary = store.get_manifest_summary();
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(true);
            }
            println!("Manifest: {}", summary.manifest_path);
            println!("  Session:       {}", summary.current_session);
            println!("  Created:       {}", summary.created);
            println!("  Last updated:  {}", summary.last_updated);
            println!("  Steps:         {}", summary.steps_completed);
            println!("  Outputs:       {}", summary.total_outputs);
            for (name, step) in &summary.steps {
                println!();
                println!(
                    "{} ({} outputs, latest {})",
                    name,
                    step.output_count,
                    step.latest_output.as_deref().unwrap_or("-")
                );
                for key in &step.outputs {
                    println!("  - {}", key);
                }
            }
            Ok(true)
        }
        Commands::List { step } => {
            let keys = store.list_available_outputs(&step);
            for key in &keys {
                println!("{}", key);
            }
            Ok(!keys.is_empty())
        }
        Commands::Resolve { step, input } => {
            let path = store.get_input(&step, &input)?;
            println!("{}", path);
            Ok(true)
        }
        Commands::Latest {
            step,
            prefix,
            period,
        } => match store.get_latest_output(&step, prefix.as_deref(), period.as_deref()) {
            Some(path) => {
                println!("{}", path);
                Ok(true)
            }
            None => {
                eprintln!("no matching output for {}", step);
                Ok(false)
            }
        },
        Commands::Register {
            step,
            key,
            file,
            period,
            meta,
        } => {
            let metadata = parse_metadata(&meta)?;
            match period {
                Some(p) => {
                    let period: PeriodLabel = p.parse()?;
                    store.register_period_output(&step, &key, &period, &file, Some(metadata))?;
                }
                None => store.register_output(&step, &key, &file, Some(metadata))?,
            }
            println!("✓ Registered {}:{} -> {}", step, key, file);
            Ok(true)
        }
        Commands::Reset { keep_file } => {
            store.reset(!keep_file, None);
            println!("✓ Manifest reset ({})", store.path());
            Ok(true)
        }
        Commands::Check { step, json } => {
            let step = step.map(|s| s.parse::<StepId>()).transpose()?;
            let checks = store.check_dependencies(step);
            let failures = checks.iter().filter(|c| !c.is_ok()).count();
            if json {
                let reports: Vec<DependencyReport> = checks.iter().map(Into::into).collect();
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for check in &checks {
                    match &check.outcome {
                        Ok(path) => println!("✓ {}  [{}]", check.dependency, path),
                        Err(e) => println!("✗ {}  ({})", check.dependency, e),
                    }
                }
                println!();
                println!("{} of {} dependencies resolved", checks.len() - failures, checks.len());
            }
            Ok(failures == 0)
        }
        Commands::Deps { step } => {
            print_deps(step.as_deref())?;
            Ok(true)
        }
    }
}

fn print_deps(step: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    match step {
        Some(s) => {
            let id: StepId = s.parse()?;
            println!("Inputs of {}:", id);
            for d in deps::inputs_of(id) {
                println!("  {}", d);
            }
            println!("Consumers of {}:", id);
            for d in deps::consumers_of(id) {
                println!("  {}", d);
            }
        }
        None => {
            for d in DEPENDENCIES {
                println!("{}", d);
            }
        }
    }
    Ok(())
}

/// `key=value` pairs; values that parse as JSON keep their type.
fn parse_metadata(pairs: &[String]) -> Result<Metadata, String> {
    let mut metadata = Metadata::new();
    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .ok_or_else(|| format!("metadata entry '{}' is not KEY=VALUE", pair))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("metadata entry '{}' has an empty key", pair));
        }
        let value = serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        metadata.insert(key.to_string(), value);
    }
    Ok(metadata)
}
