//! Rule-based backend built from the template table and intent rules.

use async_trait::async_trait;

use super::answer::QuestionAnswerer;
use super::backend::{EngineMode, InferenceBackend};
use super::describe::DescriptionGenerator;
use crate::config::TemplateSelection;
use crate::error::EngineResult;
use crate::types::{Answer, Description, Label};

/// Mock backend: deterministic answers, templated descriptions.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    generator: DescriptionGenerator,
    answerer: QuestionAnswerer,
}

impl MockBackend {
    pub fn new(selection: TemplateSelection) -> Self {
        Self {
            generator: DescriptionGenerator::new(selection),
            answerer: QuestionAnswerer::new(),
        }
    }
}

#[async_trait]
impl InferenceBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn mode(&self) -> EngineMode {
        EngineMode::Mock
    }

    fn model_loaded(&self) -> bool {
        false
    }

    async fn describe(&self, labels: &[Label]) -> EngineResult<Description> {
        self.generator.describe(labels)
    }

    async fn answer(&self, labels: &[Label], question: &str) -> EngineResult<Answer> {
        self.answerer.answer(labels, question)
    }
}
