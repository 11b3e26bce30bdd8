//! Rule-based question answering over classifier labels.
//!
//! The question is classified with [`intent::classify`] and each intent has
//! one handler. Every handler terminates in a concrete answer; only empty
//! labels are an error.

use crate::error::{EngineError, EngineResult};
use crate::intent::{self, Intent, ANIMALS};
use crate::types::{Answer, Label};

const NO_ANIMAL: &str = "I cannot identify a specific animal in this image.";
const COUNT_ANSWER: &str = "Based on the predictions, there appears to be one main subject.";
const NOT_PRESENT: &str =
    "No, I cannot identify that in the image based on the available information.";
const LOCATION_ANSWER: &str =
    "I can identify the object but cannot determine its exact position without spatial information.";
const CAUSAL_ANSWER: &str = "I can describe what's visible but cannot infer intent or reasoning.";

/// Answers free-text questions from probability-sorted labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionAnswerer;

impl QuestionAnswerer {
    pub fn new() -> Self {
        Self
    }

    /// Answer `question` using `labels`.
    pub fn answer(&self, labels: &[Label], question: &str) -> EngineResult<Answer> {
        let top = labels.first().ok_or_else(|| {
            EngineError::InvalidInput("at least one label is required".to_string())
        })?;
        let q = question.to_lowercase();
        let intent = intent::classify(&q);
        tracing::debug!("Question classified as {:?}", intent);

        let answer = match intent {
            Some(Intent::Identify) => identify(labels, top, &q),
            Some(Intent::Count) => Answer::new(COUNT_ANSWER, 0.6),
            Some(Intent::Existence) => existence(labels, &q),
            Some(Intent::Location) => Answer::new(LOCATION_ANSWER, 0.4),
            Some(Intent::Causal) => Answer::new(CAUSAL_ANSWER, 0.3),
            None => Answer::new(
                format!(
                    "Based on the image, the main subject appears to be {}.",
                    top.display_name()
                ),
                top.probability * 0.7,
            ),
        };
        Ok(answer)
    }
}

fn identify(labels: &[Label], top: &Label, q: &str) -> Answer {
    if q.contains("animal") {
        return labels
            .iter()
            .find(|label| intent::contains_any(&label.match_key(), ANIMALS))
            .map(|label| {
                Answer::new(
                    format!("The animal appears to be a {}.", label.display_name()),
                    label.probability * 0.9,
                )
            })
            .unwrap_or_else(|| Answer::new(NO_ANIMAL, 0.3));
    }

    if q.contains("object") || q.contains("see") {
        Answer::new(
            format!("I can see {} in the image.", top.display_name()),
            top.probability * 0.85,
        )
    } else {
        Answer::new(
            format!("The main subject appears to be {}.", top.display_name()),
            top.probability * 0.8,
        )
    }
}

/// A label is present if the question names it whole or by any `_` token.
///
/// A trailing or doubled underscore yields an empty token, which every
/// question contains, so such a label always counts as mentioned.
fn existence(labels: &[Label], q: &str) -> Answer {
    let mentioned = labels.iter().find(|label| {
        let key = label.match_key();
        q.contains(&key) || key.split('_').any(|token| q.contains(token))
    });

    match mentioned {
        Some(label) => Answer::new(
            format!("Yes, I can see {} in the image.", label.display_name()),
            label.probability * 0.9,
        ),
        None => Answer::new(NOT_PRESENT, 0.5),
    }
}
