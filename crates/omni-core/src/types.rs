//! Core data types shared by the description generator and question answerer.

use serde::{Deserialize, Serialize};

/// Number of leading labels the engine consults for text and cache keys.
pub const TOP_LABELS: usize = 3;

/// A single classifier prediction: class name plus probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    /// Class name as reported by the classifier (e.g., "tabby_cat")
    #[serde(rename = "className")]
    pub class_name: String,

    /// Probability from 0.0 to 1.0
    pub probability: f32,
}

impl Label {
    /// Create a new label with the given class name and probability.
    pub fn new(class_name: impl Into<String>, probability: f32) -> Self {
        Self {
            class_name: class_name.into(),
            probability,
        }
    }

    /// Class name with underscores replaced by spaces, for use in output text.
    pub fn display_name(&self) -> String {
        self.class_name.replace('_', " ")
    }

    /// Lowercased class name, used for keyword and template matching.
    pub fn match_key(&self) -> String {
        self.class_name.to_lowercase()
    }
}

/// A generated image description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    /// One natural-language sentence
    pub text: String,

    /// Heuristic or calibrated confidence from 0.0 to 1.0
    pub confidence: f32,

    /// Class names of the labels that informed the description, in input order
    pub used_labels: Vec<String>,
}

/// An answer to a free-text question about an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Answer text
    pub text: String,

    /// Heuristic or calibrated confidence from 0.0 to 1.0
    pub confidence: f32,
}

impl Answer {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}
