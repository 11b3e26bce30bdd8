//! Request/response schema and handlers in front of the engine.
//!
//! Requests are validated here before the engine sees them: class names are
//! trimmed, probabilities clamped, labels sorted by probability, and the
//! label count and question length bounded by [`LimitsConfig`]. The
//! [`Service`] then runs the engine and wraps results with processing time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::config::LimitsConfig;
use crate::engine::Engine;
use crate::error::{EngineError, EngineResult};
use crate::types::Label;
use crate::VERSION;

/// Request to describe an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeRequest {
    pub predictions: Vec<Label>,
}

/// Request to answer a question about an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub predictions: Vec<Label>,
    pub question: String,
}

impl DescribeRequest {
    /// Normalize and bounds-check the request in place.
    pub fn validate(&mut self, limits: &LimitsConfig) -> EngineResult<()> {
        normalize_predictions(&mut self.predictions, limits)
    }
}

impl AskRequest {
    /// Normalize and bounds-check the request in place.
    pub fn validate(&mut self, limits: &LimitsConfig) -> EngineResult<()> {
        normalize_predictions(&mut self.predictions, limits)?;

        self.question = self.question.trim().to_string();
        let len = self.question.chars().count();
        if len < limits.min_question_len {
            return Err(EngineError::InvalidInput(format!(
                "question must be at least {} characters",
                limits.min_question_len
            )));
        }
        if len > limits.max_question_len {
            return Err(EngineError::InvalidInput(format!(
                "question must be at most {} characters",
                limits.max_question_len
            )));
        }
        Ok(())
    }
}

fn normalize_predictions(predictions: &mut [Label], limits: &LimitsConfig) -> EngineResult<()> {
    if predictions.is_empty() {
        return Err(EngineError::InvalidInput(
            "at least one prediction is required".to_string(),
        ));
    }
    if predictions.len() > limits.max_labels {
        return Err(EngineError::InvalidInput(format!(
            "at most {} predictions are allowed, got {}",
            limits.max_labels,
            predictions.len()
        )));
    }

    for label in predictions.iter_mut() {
        label.class_name = label.class_name.trim().to_string();
        if label.class_name.is_empty() {
            return Err(EngineError::InvalidInput(
                "className cannot be empty".to_string(),
            ));
        }
        if label.probability.is_nan() {
            return Err(EngineError::InvalidInput(format!(
                "probability for '{}' is not a number",
                label.class_name
            )));
        }
        label.probability = label.probability.clamp(0.0, 1.0);
    }

    // Stable: equal probabilities keep their input order.
    predictions.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    Ok(())
}

/// Response for an image description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeResponse {
    pub text: String,
    pub confidence: f32,
    /// Seconds spent in the engine
    pub processing_time: f64,
    pub used_predictions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Response for a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub text: String,
    pub confidence: f32,
    /// Seconds spent in the engine
    pub processing_time: f64,
    pub question: String,
    pub timestamp: DateTime<Utc>,
}

/// Health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub version: String,
    /// Seconds since the service started
    pub uptime: f64,
}

impl HealthResponse {
    /// Build a health report; `engine` is `None` before construction.
    pub fn new(engine: Option<&Engine>, uptime: f64) -> Self {
        Self {
            status: "healthy".to_string(),
            model_loaded: engine.is_some_and(|e| e.status().is_ready()),
            version: VERSION.to_string(),
            uptime,
        }
    }
}

/// One line of a batch file, tagged by operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BatchRequest {
    Describe(DescribeRequest),
    Ask(AskRequest),
}

/// One line of batch output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BatchResponse {
    Describe(DescribeResponse),
    Ask(AskResponse),
    Error {
        /// Zero-based line index in the input
        line: usize,
        message: String,
    },
}

/// Request handlers bound to a shared engine.
#[derive(Clone)]
pub struct Service {
    engine: Arc<Engine>,
    limits: LimitsConfig,
    started: Instant,
}

impl Service {
    pub fn new(engine: Arc<Engine>, limits: LimitsConfig) -> Self {
        Self {
            engine,
            limits,
            started: Instant::now(),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub async fn describe(&self, mut request: DescribeRequest) -> EngineResult<DescribeResponse> {
        request.validate(&self.limits)?;
        let start = Instant::now();
        let description = self.engine.describe(&request.predictions).await?;
        Ok(DescribeResponse {
            text: description.text,
            confidence: description.confidence,
            processing_time: start.elapsed().as_secs_f64(),
            used_predictions: description.used_labels,
            timestamp: Utc::now(),
        })
    }

    pub async fn ask(&self, mut request: AskRequest) -> EngineResult<AskResponse> {
        request.validate(&self.limits)?;
        let start = Instant::now();
        let answer = self
            .engine
            .answer(&request.predictions, &request.question)
            .await?;
        Ok(AskResponse {
            text: answer.text,
            confidence: answer.confidence,
            processing_time: start.elapsed().as_secs_f64(),
            question: request.question,
            timestamp: Utc::now(),
        })
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse::new(Some(self.engine.as_ref()), self.started.elapsed().as_secs_f64())
    }

    /// Run one batch line; failures become [`BatchResponse::Error`].
    pub async fn handle(&self, line: usize, request: BatchRequest) -> BatchResponse {
        let result = match request {
            BatchRequest::Describe(r) => self.describe(r).await.map(BatchResponse::Describe),
            BatchRequest::Ask(r) => self.ask(r).await.map(BatchResponse::Ask),
        };
        result.unwrap_or_else(|e| {
            tracing::warn!("Batch line {line} failed: {e}");
            BatchResponse::Error {
                line,
                message: e.to_string(),
            }
        })
    }
}
