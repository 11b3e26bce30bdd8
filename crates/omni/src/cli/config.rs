//! The `omni config` command.

use clap::{Args, Subcommand};
use omni_core::config::EnvOverride;
use omni_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration; environment overrides are marked
    Show,

    /// Print the config file path
    Path,

    /// Write a config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    let path = Config::default_path();
    match args.command {
        ConfigCommand::Show => {
            let mut config = Config::load_file()?;
            let overrides = config.apply_env_overrides();
            print!("{}", annotate_overrides(&config.to_toml()?, &overrides));
        }
        ConfigCommand::Path => {
            let state = if path.exists() { "" } else { " (not created)" };
            println!("{}{state}", path.display());
        }
        ConfigCommand::Init { force } => init(&path, force)?,
    }
    Ok(())
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\n\n  Hint: Use --force to overwrite.",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;

    tracing::info!("Wrote default config to {}", path.display());
    println!("Configuration initialized at: {}", path.display());
    Ok(())
}

/// Append a `# from VAR=value` comment to each TOML key an override replaced.
fn annotate_overrides(toml: &str, overrides: &[EnvOverride]) -> String {
    let mut section = "";
    let mut out = String::with_capacity(toml.len());

    for line in toml.lines() {
        let trimmed = line.trim();
        if let Some(name) = trimmed.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            section = name;
        }
        out.push_str(line);

        let key = trimmed.split('=').next().unwrap_or_default().trim();
        if let Some(o) = overrides
            .iter()
            .find(|o| o.section == section && o.key == key)
        {
            out.push_str(&format!("  # from {}={}", o.var, o.value));
        }
        out.push('\n');
    }
    out
}
