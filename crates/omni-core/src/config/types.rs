//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a description sentence is picked from a matching template row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateSelection {
    /// Uniformly random on every call (text is not reproducible)
    #[default]
    Random,
    /// Derived from a hash of the top class name (same input, same sentence)
    Seeded,
}

/// Engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Serve rule-based mock responses instead of a learned model
    pub use_mock: bool,

    /// Directory where a trained model would be stored
    pub model_dir: PathBuf,

    /// Template selection policy for descriptions
    pub template_selection: TemplateSelection,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_mock: true,
            model_dir: PathBuf::from("~/.omni/models"),
            template_selection: TemplateSelection::Random,
        }
    }
}

/// Request limits enforced at the boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum labels accepted per request
    pub max_labels: usize,

    /// Minimum question length after trimming (characters)
    pub min_question_len: usize,

    /// Maximum question length after trimming (characters)
    pub max_question_len: usize,

    /// Per-call inference timeout in milliseconds
    pub inference_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_labels: 10,
            min_question_len: 3,
            max_question_len: 500,
            inference_timeout_ms: 30_000,
        }
    }
}

/// Batch processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum requests in flight at once
    pub parallel: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { parallel: 4 }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("json" or "jsonl")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
