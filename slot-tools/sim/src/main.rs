//! Slot Dispatch Simulator
//!
//! Run with: `slot-sim [OPTIONS] <COMMAND>`

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use slot_sim::{render_default_config, render_json, render_text, render_vtable, scenario_class, summary, vtable_rows};
use slotc::{OverrideLookup, ResolverConfig, Scenario};

#[derive(Parser)]
#[command(name = "slot-sim")]
#[command(about = "Resolve method calls against a class hierarchy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every call in a scenario file
    Run {
        /// Scenario file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Configuration file path (replaces the scenario's [config] table)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Override lookup rule
        #[arg(long, value_enum)]
        override_lookup: Option<LookupArg>,
    },
    /// Print the slot table of a class
    Vtable {
        /// Scenario file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Class name
        #[arg(value_name = "CLASS")]
        class: String,
    },
    /// Print the default configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum LookupArg {
    AtOverride,
    AtIntroduction,
}

impl From<LookupArg> for OverrideLookup {
    fn from(arg: LookupArg) -> Self {
        match arg {
            LookupArg::AtOverride => OverrideLookup::AtOverride,
            LookupArg::AtIntroduction => OverrideLookup::AtIntroduction,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            file,
            json,
            config,
            override_lookup,
        } => {
            let all_met = run(&file, json, config.as_deref(), override_lookup)?;
            if !all_met {
                std::process::exit(1);
            }
        }
        Commands::Vtable { file, class } => {
            let scenario = load_scenario(&file)?;
            let (graph, id) = scenario_class(&scenario, &class)
                .with_context(|| format!("Failed to build hierarchy from {}", file.display()))?;
            print!("{}", render_vtable(&vtable_rows(&graph, id)));
        }
        Commands::Config => {
            print!("{}", render_default_config()?);
        }
    }

    Ok(())
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    Scenario::load(path).with_context(|| format!("Failed to load scenario: {}", path.display()))
}

fn build_config(scenario: &Scenario, config_path: Option<&Path>, lookup: Option<LookupArg>) -> Result<ResolverConfig> {
    let mut config = match config_path {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?,
        None => scenario.config.clone(),
    };

    if let Some(lookup) = lookup {
        config.override_lookup = lookup.into();
    }

    debug!(?config, "resolver configuration");
    Ok(config)
}

/// Returns whether every expectation in the scenario was met.
fn run(path: &Path, json: bool, config_path: Option<&Path>, lookup: Option<LookupArg>) -> Result<bool> {
    let scenario = load_scenario(path)?;
    let config = build_config(&scenario, config_path, lookup)?;
    let result = scenario
        .run(&config)
        .with_context(|| format!("Failed to run scenario: {}", path.display()))?;

    if json {
        println!("{}", render_json(&result)?);
    } else {
        print!("{}", render_text(&result));
    }

    let all_met = result.all_expectations_met();
    if all_met {
        info!("{}", summary(&result));
    } else {
        error!("{}", summary(&result));
    }
    Ok(all_met)
}
