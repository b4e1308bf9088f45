//! Mirroring `tracing` layer.
//!
//! [`MirrorLayer`] is the producer-side interception point for Rust programs:
//! every event that reaches it is turned into a log call on a [`Producer`] and
//! the resulting [`TransportMessage`] is pushed into a channel. Other layers
//! of the subscriber still see the event unchanged. Delivery is best-effort;
//! a closed channel is ignored.

use crate::model::{LogLevel, Object, TransportMessage, Value};
use crate::producer::Producer;
use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Map a tracing level onto the three mirrored levels.
pub fn mirror_level(level: &Level) -> LogLevel {
    match *level {
        Level::ERROR => LogLevel::Error,
        Level::WARN => LogLevel::Warn,
        _ => LogLevel::Log,
    }
}

/// Layer forwarding events as transport messages.
pub struct MirrorLayer {
    producer: Mutex<Producer>,
    sender: Sender<TransportMessage>,
}

impl MirrorLayer {
    /// Mirror events through `producer` into `sender`.
    pub fn new(producer: Producer, sender: Sender<TransportMessage>) -> Self {
        Self {
            producer: Mutex::new(producer),
            sender,
        }
    }
}

impl<S: Subscriber> Layer<S> for MirrorLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = ArgsVisitor::default();
        event.record(&mut visitor);
        let args = visitor.into_args();

        let level = mirror_level(event.metadata().level());
        let message = {
            let mut producer = self
                .producer
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            producer.record(level, &args)
        };

        // Receiver gone: mirroring stops, the program keeps running
        let _ = self.sender.send(message);
    }
}

/// Collects the event message and its structured fields.
#[derive(Default)]
struct ArgsVisitor {
    message: Option<String>,
    fields: Object,
}

impl ArgsVisitor {
    /// Message first, then the remaining fields as one object argument.
    fn into_args(self) -> Vec<Value> {
        let mut args = Vec::with_capacity(2);
        if let Some(message) = self.message {
            args.push(Value::from(message));
        }
        if !self.fields.is_empty() {
            args.push(Value::object(self.fields));
        }
        args
    }
}

impl Visit for ArgsVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let text = format!("{value:?}");
        if field.name() == "message" {
            self.message = Some(text);
        } else {
            self.fields.insert(field.name(), text);
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.insert(field.name(), value);
        }
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.fields.insert(field.name(), value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name(), value);
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name(), value as f64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name(), value);
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.fields
            .insert(field.name(), Value::error(value.to_string(), None));
    }
}

#[cfg(test)]
#[path = "mirror_tests.rs"]
mod tests;
