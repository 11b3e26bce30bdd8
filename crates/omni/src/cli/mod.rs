//! Command implementations and the helpers they share.

pub mod ask;
pub mod batch;
pub mod config;
pub mod describe;
pub mod health;

use clap::Args;
use omni_core::config::TemplateSelection;
use omni_core::{Config, Engine, EngineError, Label, OutputFormat, OutputWriter, Service};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

/// Engine selection flags shared by every command that builds an engine.
#[derive(Args, Debug, Default, Clone)]
pub struct EngineArgs {
    /// Force rule-based mock responses
    #[arg(long, conflicts_with = "model")]
    pub mock: bool,

    /// Force the model-backed engine
    #[arg(long)]
    pub model: bool,

    /// Pick description templates deterministically from the input
    #[arg(long)]
    pub seeded: bool,
}

impl EngineArgs {
    /// Apply the flags on top of file and environment configuration.
    pub fn apply(&self, config: &mut Config) {
        if self.mock {
            config.engine.use_mock = true;
        } else if self.model {
            config.engine.use_mock = false;
        }
        if self.seeded {
            config.engine.template_selection = TemplateSelection::Seeded;
        }
    }
}

/// Build a service around a freshly constructed engine.
pub fn build_service(args: &EngineArgs, mut config: Config) -> Service {
    args.apply(&mut config);
    let engine = Arc::new(Engine::new(&config));
    Service::new(engine, config.limits)
}

/// Parse a `NAME=PROBABILITY` label argument.
pub fn parse_label(s: &str) -> Result<Label, String> {
    let (name, probability) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=PROBABILITY, got '{s}'"))?;
    let probability: f32 = probability
        .trim()
        .parse()
        .map_err(|e| format!("invalid probability in '{s}': {e}"))?;
    Ok(Label::new(name.trim(), probability))
}

/// Read and deserialize a JSON request file.
pub fn read_request<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        anyhow::anyhow!("Failed to read request file {}: {e}", path.display())
    })?;
    serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid request in {}: {e}", path.display()))
}

/// Turn an engine failure into a user-facing error.
pub fn engine_failure(error: EngineError) -> anyhow::Error {
    if error.is_unavailable() {
        anyhow::anyhow!(
            "Service unavailable: {error}\n\n  \
             Hint: run with --mock or set USE_MOCK_RESPONSES=true."
        )
    } else {
        anyhow::anyhow!("Bad request: {error}")
    }
}

/// Print one response as JSON on stdout.
pub fn print_response<T: Serialize>(response: &T, pretty: bool) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut writer = OutputWriter::new(stdout.lock(), OutputFormat::Json, pretty);
    writer.write(response)?;
    writer.flush()?;
    Ok(())
}
