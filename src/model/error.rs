//! Error types for satcon.
//!
//! This module defines a hierarchical error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`InputError`] - Transport input failures (file not found, no input, IO)
//! - [`ParseError`] - Rejected inbound messages (malformed JSON, wrong type, bad fields)
//!
//! Terminal failures surface as `crate::view::TuiError`, configuration and
//! logging setup failures as `crate::config::ConfigError` and
//! `crate::logging::LoggingError`.
//!
//! # Error Recovery Strategy
//!
//! Rejected messages are **non-fatal**: the offending line is logged as a warning and
//! skipped, and processing continues with the next message. The core (serializer, store,
//! filter, scroller) never produces errors at all; its worst case is a degraded display
//! (truncated values, sentinel leaves, placeholder rows). Failing to open the input and
//! terminal errors are fatal and propagate to the top-level error handler; a read failure
//! on a live stream ends the stream and keeps what already arrived.

use std::path::PathBuf;
use thiserror::Error;

/// Errors encountered when reading transport input from files or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified message file does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use satcon::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The filesystem path that was not found.
        path: PathBuf,
    },

    /// No input source was provided - user must supply a file path or pipe stdin.
    ///
    /// Occurs when invoked without a file argument while stdin is an interactive
    /// terminal. Recovery is to print usage showing both invocation modes:
    /// - `satcon messages.jsonl` (file mode)
    /// - `producer | satcon` (stdin mode)
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Generic I/O error reading from the input source.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons an inbound transport message is rejected.
///
/// Every variant carries the 1-based line number of the message in the input stream.
/// Rejection is silent as far as the core is concerned: the caller logs the error and
/// moves on, so one bad producer cannot stall the viewer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    /// The line is not syntactically valid JSON.
    ///
    /// ```
    /// use satcon::model::error::ParseError;
    ///
    /// let err = ParseError::InvalidJson {
    ///     line: 42,
    ///     message: "EOF while parsing".to_string()
    /// };
    /// assert!(err.to_string().contains("line 42"));
    /// ```
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based line number.
        line: usize,
        /// Parser error text from `serde_json`.
        message: String,
    },

    /// The line is valid JSON but not an object.
    #[error("Message at line {line} is not a JSON object")]
    NotAnObject {
        /// 1-based line number.
        line: usize,
    },

    /// The `type` discriminator is not the recognised log type.
    #[error("Unrecognised message type '{kind}' at line {line}")]
    UnknownType {
        /// 1-based line number.
        line: usize,
        /// The discriminator that was found.
        kind: String,
    },

    /// A required field is absent.
    ///
    /// ```
    /// use satcon::model::error::ParseError;
    ///
    /// let err = ParseError::MissingField { line: 15, field: "timestamp" };
    /// assert!(err.to_string().contains("'timestamp'"));
    /// ```
    #[error("Missing required field '{field}' at line {line}")]
    MissingField {
        /// 1-based line number.
        line: usize,
        /// Wire name of the missing field.
        field: &'static str,
    },

    /// A field is present but has the wrong JSON type.
    #[error("Field '{field}' at line {line} must be {expected}")]
    InvalidField {
        /// 1-based line number.
        line: usize,
        /// Wire name of the field.
        field: &'static str,
        /// Human-readable expected shape.
        expected: &'static str,
    },

    /// `level` is a string outside {log, warn, error}.
    #[error("Invalid level '{raw}' at line {line}")]
    InvalidLevel {
        /// 1-based line number.
        line: usize,
        /// The rejected level text.
        raw: String,
    },

    /// `timestamp` is not numeric.
    #[error("Invalid timestamp '{raw}' at line {line}")]
    InvalidTimestamp {
        /// 1-based line number.
        line: usize,
        /// The rejected value, JSON-encoded.
        raw: String,
    },

    /// One element of `args` is not a well-formed serialized value.
    #[error("Invalid argument {index} at line {line}: {message}")]
    InvalidArg {
        /// 1-based line number.
        line: usize,
        /// Position of the argument.
        index: usize,
        /// Decoder error text.
        message: String,
    },
}

impl ParseError {
    /// Line number the rejected message came from.
    pub fn line(&self) -> usize {
        match self {
            ParseError::InvalidJson { line, .. }
            | ParseError::NotAnObject { line }
            | ParseError::UnknownType { line, .. }
            | ParseError::MissingField { line, .. }
            | ParseError::InvalidField { line, .. }
            | ParseError::InvalidLevel { line, .. }
            | ParseError::InvalidTimestamp { line, .. }
            | ParseError::InvalidArg { line, .. } => *line,
        }
    }
}
