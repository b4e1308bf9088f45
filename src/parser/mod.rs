//! Inbound transport message parser.
//!
//! Converts one NDJSON line into a validated [`LogEntry`]. Validation walks the
//! generic JSON tree rather than deriving `Deserialize` on the envelope so each
//! violation maps to its own [`ParseError`] variant with the field name.

use crate::model::{LogEntry, LogLevel, ParseError, SerializedValue, LOG_MESSAGE_TYPE};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Parse a single NDJSON line into a LogEntry.
///
/// # Errors
///
/// Returns `ParseError` if:
/// - the line is not JSON or not an object
/// - `type` is not the log message type
/// - the payload misses a field or a field has the wrong shape
pub fn parse_message(raw: &str, line_number: usize) -> Result<LogEntry, ParseError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| ParseError::InvalidJson {
        line: line_number,
        message: e.to_string(),
    })?;
    validate_message(&value, line_number)
}

/// Validate an already decoded message envelope.
pub fn validate_message(value: &Value, line_number: usize) -> Result<LogEntry, ParseError> {
    let envelope = value.as_object().ok_or(ParseError::NotAnObject { line: line_number })?;

    let kind = required(envelope, "type", &[], line_number)?;
    let kind = kind.as_str().ok_or(ParseError::InvalidField {
        line: line_number,
        field: "type",
        expected: "a string",
    })?;
    if kind != LOG_MESSAGE_TYPE {
        return Err(ParseError::UnknownType {
            line: line_number,
            kind: kind.to_string(),
        });
    }

    let payload = required(envelope, "payload", &[], line_number)?
        .as_object()
        .ok_or(ParseError::InvalidField {
            line: line_number,
            field: "payload",
            expected: "an object",
        })?;

    let id = required_str(payload, "id", &[], line_number)?;

    let level_raw = required_str(payload, "level", &[], line_number)?;
    let level = LogLevel::parse(level_raw).ok_or_else(|| ParseError::InvalidLevel {
        line: line_number,
        raw: level_raw.to_string(),
    })?;

    let timestamp = parse_timestamp(required(payload, "timestamp", &[], line_number)?, line_number)?;
    let source_id = required_str(payload, "sourceId", &["pageId"], line_number)?;
    let source_location = required_str(payload, "sourceLocation", &["pageUrl"], line_number)?;

    let raw_args = required(payload, "args", &[], line_number)?
        .as_array()
        .ok_or(ParseError::InvalidField {
            line: line_number,
            field: "args",
            expected: "an array",
        })?;
    let args = raw_args
        .iter()
        .enumerate()
        .map(|(index, arg)| {
            SerializedValue::deserialize(arg).map_err(|e| ParseError::InvalidArg {
                line: line_number,
                index,
                message: e.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(LogEntry::new(
        id,
        level,
        timestamp,
        source_id,
        source_location,
        args,
    ))
}

/// Parse a batch of lines, collecting entries and rejections separately.
///
/// Blank lines are skipped silently; they are record separators, not messages.
pub fn process_lines(
    lines: Vec<String>,
    starting_line_number: usize,
) -> (Vec<LogEntry>, Vec<ParseError>) {
    let mut entries = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in lines.into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_message(&line, starting_line_number + index) {
            Ok(entry) => entries.push(entry),
            Err(err) => errors.push(err),
        }
    }

    (entries, errors)
}

fn required<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
    aliases: &[&str],
    line: usize,
) -> Result<&'a Value, ParseError> {
    std::iter::once(field)
        .chain(aliases.iter().copied())
        .find_map(|name| object.get(name))
        .ok_or(ParseError::MissingField { line, field })
}

fn required_str<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
    aliases: &[&str],
    line: usize,
) -> Result<&'a str, ParseError> {
    required(object, field, aliases, line)?
        .as_str()
        .ok_or(ParseError::InvalidField {
            line,
            field,
            expected: "a string",
        })
}

// Fractional milliseconds are truncated toward zero.
fn parse_timestamp(value: &Value, line: usize) -> Result<i64, ParseError> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|ms| ms.trunc() as i64))
        .ok_or_else(|| ParseError::InvalidTimestamp {
            line,
            raw: value.to_string(),
        })
}
