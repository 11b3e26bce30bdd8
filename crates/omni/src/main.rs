//! Omni CLI - image descriptions and answers from classifier labels.
//!
//! Feed Omni the ranked labels an image classifier produced and it returns a
//! one-sentence description, or an answer to a question about the image.
//!
//! # Usage
//!
//! ```bash
//! # Describe an image from its labels
//! omni describe --label laptop=0.9 --label desk=0.3
//!
//! # Ask a question
//! omni ask --label cat=0.95 --label furniture=0.3 --question "What animal is in the image?"
//!
//! # Run many requests from a JSONL file
//! omni batch requests.jsonl --output answers.jsonl
//!
//! # Engine status and configuration
//! omni health
//! omni config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Omni - image descriptions and answers from classifier labels.
#[derive(Parser, Debug)]
#[command(name = "omni")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Describe an image from its classifier labels
    Describe(cli::describe::DescribeArgs),

    /// Answer a question about an image from its classifier labels
    Ask(cli::ask::AskArgs),

    /// Process a JSONL file of describe/ask requests
    Batch(cli::batch::BatchArgs),

    /// Report engine status
    Health(cli::health::HealthArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Some(warning) = dotenv_warning(dotenvy::dotenv()) {
        eprintln!("{warning}");
    }

    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match omni_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `omni config path`."
            );
            let mut config = omni_core::Config::default();
            config.apply_env_overrides();
            config
        }
    };
    logging::init(logging::LogSettings::resolve(
        &config.logging,
        cli.verbose,
        cli.json_logs,
    ));

    tracing::debug!("Omni v{}", omni_core::VERSION);

    match cli.command {
        Commands::Describe(args) => cli::describe::execute(args, config).await,
        Commands::Ask(args) => cli::ask::execute(args, config).await,
        Commands::Batch(args) => cli::batch::execute(args, config).await,
        Commands::Health(args) => cli::health::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

/// A missing `.env` is normal; anything else is worth a warning.
fn dotenv_warning<T>(result: dotenvy::Result<T>) -> Option<String> {
    match result {
        Err(e) if !e.not_found() => Some(format!(
            "Warning: Failed to load .env: {e}\n  Environment variables from it are ignored."
        )),
        _ => None,
    }
}
