//! Inference backend trait.
//!
//! The engine talks to exactly one backend, chosen at construction. The
//! rule-based mock and a future learned model implement the same trait with
//! the same output shapes; a model may calibrate its confidence.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::types::{Answer, Description, Label};

/// Which kind of backend an engine was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// Rule-based templates and keyword matching
    Mock,
    /// Learned vision-language model
    Model,
}

impl std::fmt::Display for EngineMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineMode::Mock => write!(f, "mock"),
            EngineMode::Model => write!(f, "model"),
        }
    }
}

/// Trait that all inference backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the engine holds a `Box<dyn InferenceBackend>`).
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Mock or model-backed.
    fn mode(&self) -> EngineMode;

    /// Whether a model is loaded. Always false for the mock.
    fn model_loaded(&self) -> bool;

    /// Describe an image from probability-sorted labels.
    async fn describe(&self, labels: &[Label]) -> EngineResult<Description>;

    /// Answer a question about an image from probability-sorted labels.
    async fn answer(&self, labels: &[Label], question: &str) -> EngineResult<Answer>;
}
