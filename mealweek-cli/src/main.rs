use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod render;

use commands::{ConfigCommand, PlanCommand, RecipeCommand};
use config::Config;
use mealweek_core::{FileStore, PlanStore, SystemClock};

#[derive(Parser)]
#[command(name = "mealweek")]
#[command(version)]
#[command(about = "Plan a week of meals from your recipe collection", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage recipes
    Recipe(RecipeCommand),

    /// View and edit weekly meal plans
    Plan(PlanCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

fn main() {
    init_tracing();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mealweek=warn,mealweek_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Save config path for config commands
    let cli_config_path = cli.config.clone();

    let config = Config::load(cli.config)?;
    tracing::debug!(
        "Using data directory {} ({})",
        config.data_dir.value.display(),
        config.data_dir.source
    );

    match &cli.command {
        Some(Commands::Recipe(cmd)) => {
            let mut store = open_store(&config);
            cmd.run(&mut store)?;
        }
        Some(Commands::Plan(cmd)) => {
            let mut store = open_store(&config);
            cmd.run(&mut store)?;
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config, cli_config_path)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> PlanStore<FileStore> {
    PlanStore::open(FileStore::new(config.data_dir.value.clone()), SystemClock)
}
