//! Rule-based description generation from classifier labels.
//!
//! The top label's lowercased class name is matched against the template
//! table; on a hit one of the row's sentences is used, otherwise a generic
//! sentence names the top one or two subjects.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TemplateSelection;
use crate::error::{EngineError, EngineResult};
use crate::templates;
use crate::types::{Description, Label, TOP_LABELS};

/// Scale applied to the top probability to get a heuristic confidence.
const CONFIDENCE_SCALE: f32 = 0.9;

/// Mock confidence never reaches "certain".
const CONFIDENCE_CAP: f32 = 0.95;

/// Produces one sentence describing the most prominent subject(s).
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptionGenerator {
    selection: TemplateSelection,
}

impl DescriptionGenerator {
    pub fn new(selection: TemplateSelection) -> Self {
        Self { selection }
    }

    /// Describe an image from its probability-sorted labels.
    ///
    /// Only the first [`TOP_LABELS`] labels are used; their class names are
    /// returned in input order as `used_labels`.
    pub fn describe(&self, labels: &[Label]) -> EngineResult<Description> {
        let top = labels.first().ok_or_else(|| {
            EngineError::InvalidInput("at least one label is required".to_string())
        })?;
        let used = &labels[..labels.len().min(TOP_LABELS)];
        let top_key = top.match_key();

        let text = match templates::lookup(&top_key) {
            Some((key, candidates)) => {
                tracing::debug!("Template '{key}' matched class '{}'", top.class_name);
                self.pick(&top_key, candidates).to_string()
            }
            None => generic_sentence(used),
        };

        Ok(Description {
            text,
            confidence: (top.probability * CONFIDENCE_SCALE).min(CONFIDENCE_CAP),
            used_labels: used.iter().map(|l| l.class_name.clone()).collect(),
        })
    }

    fn pick(&self, seed_text: &str, candidates: &'static [&'static str]) -> &'static str {
        let index = match self.selection {
            TemplateSelection::Random => rand::thread_rng().gen_range(0..candidates.len()),
            TemplateSelection::Seeded => {
                let hash = blake3::hash(seed_text.as_bytes());
                let seed = u64::from_le_bytes(hash.as_bytes()[..8].try_into().unwrap_or([0u8; 8]));
                StdRng::seed_from_u64(seed).gen_range(0..candidates.len())
            }
        };
        candidates[index]
    }
}

/// "The image appears to show X[, with Y also present]."
fn generic_sentence(used: &[Label]) -> String {
    let mut text = format!("The image appears to show {}", used[0].display_name());
    if let Some(second) = used.get(1) {
        text.push_str(&format!(", with {} also present", second.display_name()));
    }
    text.push('.');
    text
}
