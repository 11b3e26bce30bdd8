//! Model-backed inference backend.
//!
//! No inference runtime is wired in yet, so both operations fail with
//! [`EngineError::NotImplemented`]. Callers see "feature not available"
//! rather than a bad-request error.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::backend::{EngineMode, InferenceBackend};
use crate::error::{EngineError, EngineResult};
use crate::types::{Answer, Description, Label};

/// Backend for a trained vision-language model.
#[derive(Debug, Clone)]
pub struct ModelBackend {
    model_dir: PathBuf,
}

impl ModelBackend {
    /// Prepare the backend for the model stored in `model_dir`.
    ///
    /// Never fails: a missing model surfaces per request as `NotImplemented`.
    pub fn load(model_dir: &Path) -> Self {
        tracing::warn!(
            "Model-backed mode selected but inference is not available yet (model dir: {})",
            model_dir.display()
        );
        Self {
            model_dir: model_dir.to_path_buf(),
        }
    }

    fn unavailable(&self, operation: &str) -> EngineError {
        EngineError::NotImplemented(format!(
            "model {operation} is not available (no model loaded from {}); set engine.use_mock = true",
            self.model_dir.display()
        ))
    }
}

#[async_trait]
impl InferenceBackend for ModelBackend {
    fn name(&self) -> &str {
        "model"
    }

    fn mode(&self) -> EngineMode {
        EngineMode::Model
    }

    fn model_loaded(&self) -> bool {
        false
    }

    async fn describe(&self, _labels: &[Label]) -> EngineResult<Description> {
        Err(self.unavailable("description"))
    }

    async fn answer(&self, _labels: &[Label], _question: &str) -> EngineResult<Answer> {
        Err(self.unavailable("question answering"))
    }
}
