//! Log entry types.
//!
//! A LogEntry is one mirrored console call: level, time, origin and the
//! serialized arguments. Entries are built once by the producer side (or
//! validated by the parser on the viewer side) and never mutated afterwards.

use crate::model::SerializedValue;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strings longer than this (in chars) make an entry expandable.
pub const EXPANDABLE_STRING_LENGTH: usize = 200;

// ===== LogLevel =====

/// Severity of a mirrored call - exactly one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Plain `log` call.
    Log,
    /// `warn` call.
    Warn,
    /// `error` call.
    Error,
}

impl LogLevel {
    /// All levels in ascending severity.
    pub const ALL: [LogLevel; 3] = [LogLevel::Log, LogLevel::Warn, LogLevel::Error];

    /// Wire name: `log`, `warn` or `error`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Log => "log",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parse the wire name. Anything outside the three levels is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "log" => Some(LogLevel::Log),
            "warn" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ===== LogEntry =====

/// A single mirrored log event.
/// Invariant: `args` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    id: String,
    level: LogLevel,
    /// Milliseconds since the Unix epoch, producer clock.
    timestamp: i64,
    source_id: String,
    source_location: String,
    args: Vec<SerializedValue>,
}

impl LogEntry {
    /// Create a new entry.
    ///
    /// An empty argument list is normalized to a single empty-string arg.
    pub fn new(
        id: impl Into<String>,
        level: LogLevel,
        timestamp: i64,
        source_id: impl Into<String>,
        source_location: impl Into<String>,
        mut args: Vec<SerializedValue>,
    ) -> Self {
        if args.is_empty() {
            args.push(SerializedValue::string(""));
        }
        Self {
            id: id.into(),
            level,
            timestamp,
            source_id: source_id.into(),
            source_location: source_location.into(),
            args,
        }
    }

    // ===== Accessors (read-only) =====

    /// Session-unique id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Severity.
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Producer clock, milliseconds since the epoch.
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp
    }

    /// Timestamp as a UTC datetime, if it is within chrono's range.
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Id of the producing context.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Producer URL at emission time.
    pub fn source_location(&self) -> &str {
        &self.source_location
    }

    /// Serialized arguments; never empty.
    pub fn args(&self) -> &[SerializedValue] {
        &self.args
    }

    /// Whether the content is likely to outgrow a fixed-height slot: any
    /// object or array argument, a string over
    /// [`EXPANDABLE_STRING_LENGTH`] chars, or an error carrying a stack.
    pub fn is_expandable(&self) -> bool {
        self.args.iter().any(|arg| match arg {
            SerializedValue::Object { .. } | SerializedValue::Array { .. } => true,
            SerializedValue::String { value } => {
                value.chars().count() > EXPANDABLE_STRING_LENGTH
            }
            SerializedValue::Error { stack, .. } => stack.is_some(),
            _ => false,
        })
    }
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(args: Vec<SerializedValue>) -> LogEntry {
        LogEntry::new("id-1", LogLevel::Warn, 1_700_000_000_123, "page-a", "http://a/", args)
    }

    #[test]
    fn containers_long_strings_and_stacks_are_expandable() {
        assert!(!entry(vec![SerializedValue::string("short"), SerializedValue::Null]).is_expandable());
        assert!(!entry(vec![SerializedValue::string("x".repeat(200))]).is_expandable());
        assert!(entry(vec![SerializedValue::string("x".repeat(201))]).is_expandable());

        let array = SerializedValue::Array {
            value: vec![],
            preview: "Array(0)".to_string(),
        };
        assert!(entry(vec![SerializedValue::string("a"), array]).is_expandable());

        let bare = SerializedValue::Error {
            message: "boom".to_string(),
            stack: None,
        };
        assert!(!entry(vec![bare]).is_expandable());
        let traced = SerializedValue::Error {
            message: "boom".to_string(),
            stack: Some("Error: boom\n    at f".to_string()),
        };
        assert!(entry(vec![traced]).is_expandable());
    }

    #[test]
    fn empty_args_are_normalized_to_empty_string() {
        let e = entry(vec![]);
        assert_eq!(e.args(), &[SerializedValue::string("")]);
    }

    #[test]
    fn non_empty_args_are_kept() {
        let e = entry(vec![SerializedValue::number(1.0), SerializedValue::Null]);
        assert_eq!(e.args().len(), 2);
    }

    #[test]
    fn accessors_return_constructor_values() {
        let e = entry(vec![SerializedValue::string("x")]);
        assert_eq!(e.id(), "id-1");
        assert_eq!(e.level(), LogLevel::Warn);
        assert_eq!(e.timestamp_ms(), 1_700_000_000_123);
        assert_eq!(e.source_id(), "page-a");
        assert_eq!(e.source_location(), "http://a/");
    }

    #[test]
    fn timestamp_converts_to_datetime() {
        let e = entry(vec![]);
        let dt = e.timestamp().expect("in range");
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_123);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(entry(vec![])).unwrap();
        assert_eq!(json["sourceId"], "page-a");
        assert_eq!(json["sourceLocation"], "http://a/");
        assert_eq!(json["level"], "warn");
        assert_eq!(json["timestamp"], 1_700_000_000_123i64);
    }

    #[test]
    fn level_parse_accepts_only_known_names() {
        assert_eq!(LogLevel::parse("log"), Some(LogLevel::Log));
        assert_eq!(LogLevel::parse("warn"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("error"), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("info"), None);
        assert_eq!(LogLevel::parse("WARN"), None);
    }
}
