//! Transport message envelope.
//!
//! Producers and the viewer exchange newline-delimited JSON envelopes:
//!
//! ```json
//! {"type":"log","payload":{...LogEntry...},"sender":"<sourceId>"}
//! ```
//!
//! Only the `log` type is recognised. Inbound envelopes are validated by
//! [`crate::parser`]; this module only covers the outbound shape.

use crate::model::LogEntry;
use serde::Serialize;

/// Discriminator value of log messages.
pub const LOG_MESSAGE_TYPE: &str = "log";

/// Envelope kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// A log entry payload.
    Log,
}

/// One message on the transport.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportMessage {
    /// Serialized as `type`.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// The entry carried by this message.
    pub payload: LogEntry,
    /// Source id of the sending context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
}

impl TransportMessage {
    /// Wrap an entry in a log envelope, sent on behalf of its source.
    pub fn log(entry: LogEntry) -> Self {
        let sender = Some(entry.source_id().to_string());
        Self {
            kind: MessageKind::Log,
            payload: entry,
            sender,
        }
    }

    /// Encode as a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
