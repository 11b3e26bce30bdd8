//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;
use tracing::level_filters::LevelFilter;

use super::Config;

/// Hard ceiling on labels per request, matching the upstream classifier's top-k.
const LABEL_CAP: usize = 10;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_labels == 0 || self.limits.max_labels > LABEL_CAP {
            return Err(ConfigError::ValidationError(format!(
                "limits.max_labels must be between 1 and {LABEL_CAP}"
            )));
        }
        if self.limits.min_question_len == 0 {
            return Err(ConfigError::ValidationError(
                "limits.min_question_len must be > 0".into(),
            ));
        }
        if self.limits.min_question_len > self.limits.max_question_len {
            return Err(ConfigError::ValidationError(
                "limits.min_question_len must be <= limits.max_question_len".into(),
            ));
        }
        if self.limits.inference_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.inference_timeout_ms must be > 0".into(),
            ));
        }
        if self.batch.parallel == 0 {
            return Err(ConfigError::ValidationError(
                "batch.parallel must be > 0".into(),
            ));
        }
        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"json\" or \"jsonl\", got \"{}\"",
                self.output.format
            )));
        }
        if self.logging.level.parse::<LevelFilter>().is_err() {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of error, warn, info, debug, trace; got \"{}\"",
                self.logging.level
            )));
        }
        if !matches!(self.logging.format.to_lowercase().as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}
