//! Answer memoization keyed by question and top class names.
//!
//! The cache grows for the lifetime of the engine and is never evicted. Two
//! concurrent misses on the same key both compute and both insert; the last
//! write wins. Hits return the stored answer even when the new request carries
//! different probabilities under the same key.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::types::{Answer, Label, TOP_LABELS};

/// Build the cache key: `"{question}::{name1},{name2},{name3}"`.
pub fn cache_key(question: &str, labels: &[Label]) -> String {
    let names: Vec<&str> = labels
        .iter()
        .take(TOP_LABELS)
        .map(|l| l.class_name.as_str())
        .collect();
    format!("{question}::{}", names.join(","))
}

/// Thread-safe answer cache.
#[derive(Debug, Default)]
pub struct AnswerCache {
    entries: Mutex<HashMap<String, Answer>>,
}

impl AnswerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Answer> {
        self.lock().get(key).cloned()
    }

    pub fn insert(&self, key: String, answer: Answer) {
        self.lock().insert(key, answer);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave the map half-written,
    // so a poisoned lock is still safe to use.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Answer>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}
