//! Keyword-driven question intent classification.
//!
//! Intents are an ordered rule list: each rule names an intent and the
//! substrings that trigger it. Rules are evaluated top to bottom against the
//! lowercased question and the first hit wins, so the order of [`INTENT_RULES`]
//! is the priority order.

use serde::{Deserialize, Serialize};

/// Coarse category of a question about an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// "what is this", "which animal", "identify the object"
    Identify,
    /// "how many", "count"
    Count,
    /// "is there a dog", "can you see a car"
    Existence,
    /// "where is", "position of"
    Location,
    /// "why", "reason"
    Causal,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Identify => "identify",
            Self::Count => "count",
            Self::Existence => "existence",
            Self::Location => "location",
            Self::Causal => "causal",
        };
        write!(f, "{s}")
    }
}

/// A single classification rule: intent plus its trigger substrings.
#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub triggers: &'static [&'static str],
}

impl IntentRule {
    /// Whether any trigger occurs in the (already lowercased) question.
    pub fn matches(&self, question: &str) -> bool {
        contains_any(question, self.triggers)
    }
}

/// Rules in priority order.
pub static INTENT_RULES: &[IntentRule] = &[
    IntentRule {
        intent: Intent::Identify,
        triggers: &["what", "which", "identify"],
    },
    IntentRule {
        intent: Intent::Count,
        triggers: &["how many", "count"],
    },
    IntentRule {
        intent: Intent::Existence,
        triggers: &["is there", "are there", "can you see"],
    },
    IntentRule {
        intent: Intent::Location,
        triggers: &["where", "location", "position"],
    },
    IntentRule {
        intent: Intent::Causal,
        triggers: &["why", "reason"],
    },
];

/// Vocabulary scanned for "what animal" questions.
pub static ANIMALS: &[&str] = &["cat", "dog", "bird", "horse", "elephant", "tiger", "lion"];

/// Classify a question. Returns `None` when no rule fires.
pub fn classify(question: &str) -> Option<Intent> {
    let q = question.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|rule| rule.matches(&q))
        .map(|rule| rule.intent)
}

pub(crate) fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_each_intent() {
        assert_eq!(classify("What is this?"), Some(Intent::Identify));
        assert_eq!(classify("How many cats are there?"), Some(Intent::Count));
        assert_eq!(classify("Is there a dog?"), Some(Intent::Existence));
        assert_eq!(classify("Where is the laptop?"), Some(Intent::Location));
        assert_eq!(classify("Why is it here?"), Some(Intent::Causal));
    }

    #[test]
    fn test_classify_none() {
        assert_eq!(classify("Describe the scene"), None);
    }

    #[test]
    fn test_identify_outranks_count() {
        // Contains both "what" and "count"
        assert_eq!(classify("What count is shown?"), Some(Intent::Identify));
    }

    #[test]
    fn test_count_outranks_existence() {
        // "how many ... are there" hits count first
        assert_eq!(classify("How many dogs are there"), Some(Intent::Count));
    }

    #[test]
    fn test_classify_is_case_insensitive_substring() {
        assert_eq!(classify("CAN YOU SEE a cat"), Some(Intent::Existence));
        // "somewhere" contains "where"
        assert_eq!(classify("Is it somewhere?"), Some(Intent::Location));
    }

    #[test]
    fn test_rule_order_is_stable() {
        let order: Vec<Intent> = INTENT_RULES.iter().map(|r| r.intent).collect();
        assert_eq!(
            order,
            vec![
                Intent::Identify,
                Intent::Count,
                Intent::Existence,
                Intent::Location,
                Intent::Causal,
            ]
        );
    }

    #[test]
    fn test_intent_display() {
        assert_eq!(Intent::Existence.to_string(), "existence");
    }
}
