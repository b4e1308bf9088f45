//! Demo message stream for `satcon --demo`.
//!
//! Two simulated pages log a mix of values through [`Producer`], and a few
//! `tracing` events are mirrored through [`MirrorLayer`]. The output is
//! newline-delimited transport messages, ready to pipe into the viewer:
//!
//! ```text
//! satcon --demo | satcon
//! ```

use crate::logging::MirrorLayer;
use crate::model::{LogLevel, Object, TransportMessage, Value};
use crate::producer::Producer;
use crate::serializer::SerializeConfig;
use std::io::{self, Write};
use std::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;

const DASHBOARD_URL: &str = "http://localhost:3000/dashboard";
const SETTINGS_URL: &str = "http://localhost:3000/settings?tab=<profile>";

/// Build the demo messages in emission order.
pub fn demo_messages(config: &SerializeConfig) -> Vec<TransportMessage> {
    let mut dashboard = Producer::for_location(DASHBOARD_URL, *config);
    let mut settings = Producer::for_location(SETTINGS_URL, *config);

    let mut messages = vec![
        dashboard.record(
            LogLevel::Log,
            &[
                Value::from("Dashboard mounted"),
                Value::object_from([("widgets", Value::from(4)), ("theme", Value::from("dark"))]),
            ],
        ),
        dashboard.record(
            LogLevel::Warn,
            &[Value::from("Slow response:"), Value::from(1234.5), Value::from("ms")],
        ),
        settings.record(LogLevel::Log, &[Value::from("Settings opened"), Value::Bool(true)]),
        dashboard.record(LogLevel::Log, &[Value::from("Tree with a cycle"), cyclic_node()]),
        settings.record(
            LogLevel::Error,
            &[Value::error(
                "Cannot read properties of undefined (reading 'email')",
                Some(
                    "TypeError: Cannot read properties of undefined (reading 'email')\n    at renderProfile (settings.js:42:17)\n    at mount (settings.js:12:3)"
                        .to_string(),
                ),
            )],
        ),
        dashboard.record(
            LogLevel::Log,
            &[
                Value::from("Handler registered"),
                Value::function("function onClick(event) { return event.target.id; }"),
            ],
        ),
        settings.record(LogLevel::Warn, &[guarded_object()]),
        dashboard.record(
            LogLevel::Log,
            &[
                Value::from("Samples"),
                Value::array((0..150).map(Value::from).collect()),
            ],
        ),
        settings.record(
            LogLevel::Log,
            &[Value::Null, Value::Undefined, Value::Number(f64::NAN), Value::from(-0.0)],
        ),
    ];

    messages.extend(mirrored_events(config));
    messages
}

/// Write the demo stream as JSON lines.
pub fn write_demo(out: &mut impl Write, config: &SerializeConfig) -> io::Result<()> {
    for message in demo_messages(config) {
        let line = message.to_json_line().map_err(io::Error::other)?;
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// `{ name: "root", child: { parent: <root> }, self: <root> }`
fn cyclic_node() -> Value {
    let root = Value::object_from([("name", Value::from("root"))]);
    let child = Value::object(Object::new());
    if let (Value::Object(root_ref), Value::Object(child_ref)) = (&root, &child) {
        child_ref.borrow_mut().insert("parent", root.clone());
        let mut root_obj = root_ref.borrow_mut();
        root_obj.insert("child", child.clone());
        root_obj.insert("self", root.clone());
    }
    root
}

/// An object whose accessor throws.
fn guarded_object() -> Value {
    let mut object = Object::new();
    object.insert("user", "ada");
    object.define_getter("token", || Err("access denied".to_string()));
    Value::object(object)
}

/// Events emitted through `tracing` and captured by the mirror layer.
fn mirrored_events(config: &SerializeConfig) -> Vec<TransportMessage> {
    let (tx, rx) = mpsc::channel();
    let producer = Producer::for_location("satcon-demo://tracing", *config);
    let subscriber = tracing_subscriber::registry().with(MirrorLayer::new(producer, tx));

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!(user = "ada", "user signed in");
        tracing::warn!(retries = 3, "retrying request");
        tracing::error!(code = 503, "upstream unavailable");
    });

    rx.try_iter().collect()
}
