//! Predicate-based entry filtering.
//!
//! [`get_filtered`] applies three independent stages in a fixed order:
//! source equality, level membership, then text search. The cheap checks run
//! first; the recursive search over serialized trees runs last on what is
//! left. Absent or empty predicate fields never reject anything.

pub mod debounce;

pub use debounce::Debouncer;

use crate::model::{number_to_text, LogEntry, LogLevel, SerializedValue};
use std::collections::BTreeSet;
use std::rc::Rc;

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;

/// Which entries to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPredicate {
    /// Case-insensitive substring to look for in the arguments.
    pub search_text: Option<String>,
    /// Exact producer id.
    pub source_id: Option<String>,
    /// Allowed levels; empty means all.
    pub levels: BTreeSet<LogLevel>,
}

impl FilterPredicate {
    /// Predicate that admits every entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `text` somewhere in the arguments.
    pub fn with_search_text(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Require an exact source id.
    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Admit only the given levels.
    pub fn with_levels(mut self, levels: impl IntoIterator<Item = LogLevel>) -> Self {
        self.levels = levels.into_iter().collect();
        self
    }

    /// Active search text, if any (empty text counts as none).
    pub fn search(&self) -> Option<&str> {
        self.search_text.as_deref().filter(|text| !text.is_empty())
    }

    /// Active source constraint, if any (empty id counts as none).
    pub fn source(&self) -> Option<&str> {
        self.source_id.as_deref().filter(|id| !id.is_empty())
    }

    /// True when no dimension constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        self.search().is_none() && self.source().is_none() && self.levels.is_empty()
    }
}

/// Entries matching `predicate`, in their original relative order.
pub fn get_filtered(entries: &[Rc<LogEntry>], predicate: &FilterPredicate) -> Vec<Rc<LogEntry>> {
    let mut filtered = entries.to_vec();

    if let Some(source) = predicate.source() {
        filtered.retain(|entry| entry.source_id() == source);
    }

    if !predicate.levels.is_empty() {
        filtered.retain(|entry| predicate.levels.contains(&entry.level()));
    }

    if let Some(text) = predicate.search() {
        let needle = text.to_lowercase();
        filtered.retain(|entry| entry_matches_text(entry, &needle));
    }

    filtered
}

/// Whether any argument of `entry` contains `needle` (already lowercased).
pub fn entry_matches_text(entry: &LogEntry, needle: &str) -> bool {
    entry.args().iter().any(|arg| value_matches_text(arg, needle))
}

/// Depth-first search of a serialized tree for `needle` (already lowercased).
pub fn value_matches_text(value: &SerializedValue, needle: &str) -> bool {
    match value {
        SerializedValue::String { value } | SerializedValue::Function { value } => {
            contains_lowercase(value, needle)
        }
        SerializedValue::Number { value } => contains_lowercase(&number_to_text(*value), needle),
        SerializedValue::Boolean { value } => {
            if *value {
                "true".contains(needle)
            } else {
                "false".contains(needle)
            }
        }
        SerializedValue::Null => "null".contains(needle),
        SerializedValue::Undefined => "undefined".contains(needle),
        SerializedValue::Error { message, stack } => {
            contains_lowercase(message, needle)
                || stack
                    .as_deref()
                    .is_some_and(|stack| contains_lowercase(stack, needle))
        }
        SerializedValue::Object { value, preview } => {
            contains_lowercase(preview, needle)
                || value.values().any(|child| value_matches_text(child, needle))
        }
        SerializedValue::Array { value, preview } => {
            contains_lowercase(preview, needle)
                || value.iter().any(|child| value_matches_text(child, needle))
        }
    }
}

fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
