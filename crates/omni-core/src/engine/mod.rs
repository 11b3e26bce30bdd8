//! The label-to-text engine.
//!
//! An [`Engine`] owns one inference backend (mock or model, fixed at
//! construction) and the answer cache shared by every request. It is built
//! explicitly and passed around behind an `Arc`; there is no global instance.

pub mod answer;
pub mod backend;
pub mod cache;
pub mod describe;
pub mod mock;
pub mod model;

pub use answer::QuestionAnswerer;
pub use backend::{EngineMode, InferenceBackend};
pub use cache::{cache_key, AnswerCache};
pub use describe::DescriptionGenerator;
pub use mock::MockBackend;
pub use model::ModelBackend;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::config::Config;
use crate::error::{EngineError, EngineResult};
use crate::types::{Answer, Description, Label};

/// Snapshot of the engine's mode for health reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub mode: EngineMode,
    pub model_loaded: bool,
}

impl EngineStatus {
    /// Ready to serve: mock mode, or a model is loaded.
    pub fn is_ready(&self) -> bool {
        self.mode == EngineMode::Mock || self.model_loaded
    }
}

/// Description generator and question answerer behind one backend.
pub struct Engine {
    backend: Box<dyn InferenceBackend>,
    cache: AnswerCache,
    inference_timeout: Duration,
}

impl Engine {
    /// Build an engine from configuration. `engine.use_mock` picks the backend.
    pub fn new(config: &Config) -> Self {
        let backend: Box<dyn InferenceBackend> = if config.engine.use_mock {
            Box::new(MockBackend::new(config.engine.template_selection))
        } else {
            Box::new(ModelBackend::load(&config.model_dir()))
        };
        Self::with_backend(
            backend,
            Duration::from_millis(config.limits.inference_timeout_ms),
        )
    }

    /// Build an engine around an explicit backend.
    pub fn with_backend(backend: Box<dyn InferenceBackend>, inference_timeout: Duration) -> Self {
        tracing::info!(
            "Engine ready: backend={}, mode={}",
            backend.name(),
            backend.mode()
        );
        Self {
            backend,
            cache: AnswerCache::new(),
            inference_timeout,
        }
    }

    pub fn mode(&self) -> EngineMode {
        self.backend.mode()
    }

    pub fn status(&self) -> EngineStatus {
        EngineStatus {
            mode: self.backend.mode(),
            model_loaded: self.backend.model_loaded(),
        }
    }

    /// Number of memoized answers.
    pub fn cached_answers(&self) -> usize {
        self.cache.len()
    }

    /// Describe an image from its probability-sorted labels.
    ///
    /// Descriptions are never cached.
    pub async fn describe(&self, labels: &[Label]) -> EngineResult<Description> {
        ensure_labels(labels)?;
        self.with_timeout("describe", self.backend.describe(labels))
            .await
    }

    /// Answer a question, consulting the cache first.
    ///
    /// A hit returns the stored answer unchanged, even if the labels carry
    /// different probabilities than when it was computed. Errors are not
    /// cached.
    pub async fn answer(&self, labels: &[Label], question: &str) -> EngineResult<Answer> {
        ensure_labels(labels)?;
        if question.trim().is_empty() {
            return Err(EngineError::InvalidInput(
                "question must not be empty".to_string(),
            ));
        }

        let key = cache_key(question, labels);
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!("Answer cache hit: {key}");
            return Ok(hit);
        }

        tracing::debug!("Answer cache miss: {key}");
        let answer = self
            .with_timeout("answer", self.backend.answer(labels, question))
            .await?;
        self.cache.insert(key, answer.clone());
        Ok(answer)
    }

    async fn with_timeout<T, F>(&self, stage: &str, call: F) -> EngineResult<T>
    where
        F: Future<Output = EngineResult<T>>,
    {
        match tokio::time::timeout(self.inference_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout {
                stage: stage.to_string(),
                timeout_ms: self.inference_timeout.as_millis() as u64,
            }),
        }
    }
}

fn ensure_labels(labels: &[Label]) -> EngineResult<()> {
    if labels.is_empty() {
        return Err(EngineError::InvalidInput(
            "at least one label is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TemplateSelection;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn mock_engine() -> Engine {
        Engine::new(&Config::default())
    }

    /// Backend that counts calls and optionally stalls.
    struct CountingBackend {
        calls: Arc<AtomicU32>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl InferenceBackend for CountingBackend {
        fn name(&self) -> &str {
            "counting"
        }

        fn mode(&self) -> EngineMode {
            EngineMode::Model
        }

        fn model_loaded(&self) -> bool {
            true
        }

        async fn describe(&self, labels: &[Label]) -> EngineResult<Description> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(Description {
                text: "calibrated".to_string(),
                confidence: 0.99,
                used_labels: vec![labels[0].class_name.clone()],
            })
        }

        async fn answer(&self, _labels: &[Label], _question: &str) -> EngineResult<Answer> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(Answer::new(format!("answer #{n}"), 0.99))
        }
    }

    #[tokio::test]
    async fn test_answer_is_idempotent_under_cache() {
        let engine = mock_engine();
        let question = "What is the main subject?";

        let first = engine
            .answer(&[Label::new("cat", 0.9), Label::new("sofa", 0.2)], question)
            .await
            .unwrap();
        // Same top class names, different probabilities: stale hit.
        let second = engine
            .answer(&[Label::new("cat", 0.1), Label::new("sofa", 0.05)], question)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert!((second.confidence - 0.72).abs() < 1e-6);
        assert_eq!(engine.cached_answers(), 1);
    }

    #[tokio::test]
    async fn test_every_answer_branch_is_cached() {
        let engine = mock_engine();
        let labels = vec![Label::new("cat", 0.9)];
        let questions = [
            "Where is it located?",
            "Why is it here?",
            "Describe the colors please",
        ];

        for (i, question) in questions.iter().enumerate() {
            let fresh = engine.answer(&labels, question).await.unwrap();
            assert_eq!(engine.cached_answers(), i + 1);

            let again = engine.answer(&labels, question).await.unwrap();
            assert_eq!(again, fresh);
            assert_eq!(engine.cached_answers(), i + 1);
        }

        let fallback = engine
            .answer(&labels, "Describe the colors please")
            .await
            .unwrap();
        assert!((fallback.confidence - 0.63).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_cache_hit_skips_backend() {
        let calls = Arc::new(AtomicU32::new(0));
        let engine = Engine::with_backend(
            Box::new(CountingBackend {
                calls: calls.clone(),
                delay: None,
            }),
            Duration::from_secs(1),
        );
        let labels = vec![Label::new("cat", 0.9)];

        let first = engine.answer(&labels, "Is there a cat?").await.unwrap();
        let second = engine.answer(&labels, "Is there a cat?").await.unwrap();

        assert_eq!(first.text, "answer #0");
        assert_eq!(second, first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_different_fourth_label_shares_cache_entry() {
        let engine = mock_engine();
        let base = vec![
            Label::new("cat", 0.9),
            Label::new("sofa", 0.5),
            Label::new("rug", 0.2),
        ];
        let mut extended = base.clone();
        extended.push(Label::new("dog", 0.1));

        engine.answer(&base, "Is there a dog?").await.unwrap();
        let answer = engine.answer(&extended, "Is there a dog?").await.unwrap();

        // Computed from `base`, which has no dog.
        assert_eq!(answer.confidence, 0.5);
        assert_eq!(engine.cached_answers(), 1);
    }

    #[tokio::test]
    async fn test_describe_is_not_cached() {
        let calls = Arc::new(AtomicU32::new(0));
        let engine = Engine::with_backend(
            Box::new(CountingBackend {
                calls: calls.clone(),
                delay: None,
            }),
            Duration::from_secs(1),
        );
        let labels = vec![Label::new("cat", 0.9)];

        engine.describe(&labels).await.unwrap();
        engine.describe(&labels).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(engine.cached_answers(), 0);
    }

    #[tokio::test]
    async fn test_invalid_input() {
        let engine = mock_engine();
        let err = engine.describe(&[]).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        let err = engine.answer(&[], "What is this?").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));

        let err = engine
            .answer(&[Label::new("cat", 0.9)], "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert_eq!(engine.cached_answers(), 0);
    }

    #[tokio::test]
    async fn test_model_mode_is_not_implemented_and_not_cached() {
        let mut config = Config::default();
        config.engine.use_mock = false;
        let engine = Engine::new(&config);

        assert_eq!(engine.mode(), EngineMode::Model);
        assert!(!engine.status().is_ready());

        let labels = vec![Label::new("cat", 0.9)];
        let err = engine.answer(&labels, "What is this?").await.unwrap_err();
        assert!(matches!(err, EngineError::NotImplemented(_)));
        let err = engine.describe(&labels).await.unwrap_err();
        assert!(matches!(err, EngineError::NotImplemented(_)));
        assert_eq!(engine.cached_answers(), 0);
    }

    #[tokio::test]
    async fn test_mock_status_is_ready() {
        let engine = mock_engine();
        let status = engine.status();
        assert_eq!(status.mode, EngineMode::Mock);
        assert!(!status.model_loaded);
        assert!(status.is_ready());
    }

    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let engine = Engine::with_backend(
            Box::new(CountingBackend {
                calls: Arc::new(AtomicU32::new(0)),
                delay: Some(Duration::from_secs(5)),
            }),
            Duration::from_millis(50),
        );
        let labels = vec![Label::new("cat", 0.9)];

        let err = engine.answer(&labels, "What is this?").await.unwrap_err();
        assert_eq!(
            err,
            EngineError::Timeout {
                stage: "answer".to_string(),
                timeout_ms: 50,
            }
        );
        assert_eq!(engine.cached_answers(), 0);
    }

    #[tokio::test]
    async fn test_seeded_engine_describes_reproducibly() {
        let mut config = Config::default();
        config.engine.template_selection = TemplateSelection::Seeded;
        let engine = Engine::new(&config);
        let labels = vec![Label::new("person", 0.8)];

        let first = engine.describe(&labels).await.unwrap();
        let second = engine.describe(&labels).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_answers_share_cache() {
        let engine = Arc::new(mock_engine());
        let mut handles = Vec::new();

        for i in 0..32 {
            let engine = engine.clone();
            handles.push(tokio::spawn(async move {
                let labels = vec![Label::new("cat", 0.9), Label::new("sofa", 0.3)];
                let question = if i % 2 == 0 {
                    "How many cats?"
                } else {
                    "What animal is in the image?"
                };
                engine.answer(&labels, question).await
            }));
        }

        for handle in handles {
            let answer = handle.await.unwrap().unwrap();
            assert!(answer.confidence > 0.0);
        }
        assert_eq!(engine.cached_answers(), 2);
    }
}
