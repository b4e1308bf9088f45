//! Producer-side adapter.
//!
//! A [`Producer`] stands for one source context. It turns a console-style call
//! (level plus runtime values) into a transport message: the arguments are
//! serialized with the producer's limits, the entry is stamped with the
//! producer clock, and a per-producer id is assigned.

use crate::model::{LogEntry, LogLevel, TransportMessage, Value};
use crate::serializer::{serialize_args, SerializeConfig};
use chrono::Utc;

/// Entry ids wrap their counter at this value.
pub const COUNTER_MODULUS: u64 = 1_000_000;

/// Build a source id for a context at `location`: `{location}_{timestampMs}`.
pub fn generate_source_id(location: &str) -> String {
    format!("{location}_{}", Utc::now().timestamp_millis())
}

/// One log-producing context.
#[derive(Debug, Clone)]
pub struct Producer {
    source_id: String,
    source_location: String,
    counter: u64,
    config: SerializeConfig,
}

impl Producer {
    /// Producer with an explicit source id.
    pub fn new(
        source_id: impl Into<String>,
        source_location: impl Into<String>,
        config: SerializeConfig,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            source_location: source_location.into(),
            counter: 0,
            config,
        }
    }

    /// Producer with a generated source id for `location`.
    pub fn for_location(location: impl Into<String>, config: SerializeConfig) -> Self {
        let location = location.into();
        Self::new(generate_source_id(&location), location, config)
    }

    /// Id stamped on every entry.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Location stamped on the next entry.
    pub fn source_location(&self) -> &str {
        &self.source_location
    }

    /// Update the location recorded on subsequent entries.
    pub fn set_location(&mut self, location: impl Into<String>) {
        self.source_location = location.into();
    }

    /// Serialize one call stamped with the current time.
    pub fn record(&mut self, level: LogLevel, args: &[Value]) -> TransportMessage {
        self.record_at(level, args, Utc::now().timestamp_millis())
    }

    /// Serialize one call stamped with `timestamp_ms`.
    pub fn record_at(&mut self, level: LogLevel, args: &[Value], timestamp_ms: i64) -> TransportMessage {
        let id = format!("{}_{}_{}", self.source_id, timestamp_ms, self.counter);
        self.counter = (self.counter + 1) % COUNTER_MODULUS;

        let entry = LogEntry::new(
            id,
            level,
            timestamp_ms,
            self.source_id.clone(),
            self.source_location.clone(),
            serialize_args(args, &self.config),
        );
        TransportMessage::log(entry)
    }
}
