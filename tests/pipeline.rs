//! Integration tests: producer → wire → parser → store → filter.

use satcon::filter::{get_filtered, FilterPredicate};
use satcon::model::{LogLevel, SerializedValue, Value};
use satcon::parser::{parse_message, process_lines};
use satcon::producer::Producer;
use satcon::serializer::SerializeConfig;
use satcon::store::EntryStore;
use std::process::Command;

fn producer(location: &str) -> Producer {
    Producer::for_location(location, SerializeConfig::default())
}

fn wire(producer: &mut Producer, level: LogLevel, args: &[Value], ts: i64) -> String {
    producer
        .record_at(level, args, ts)
        .to_json_line()
        .expect("message encodes")
}

#[test]
fn producer_output_is_accepted_by_the_parser() {
    let mut page = producer("http://localhost/app");
    let cyclic = Value::object_from([("name", Value::from("loop"))]);
    if let Value::Object(rc) = &cyclic {
        rc.borrow_mut().insert("me", cyclic.clone());
    }

    let line = wire(&mut page, LogLevel::Warn, &[Value::from("state"), cyclic], 1_700_000_000_000);
    let entry = parse_message(&line, 1).expect("valid line");

    assert_eq!(entry.level(), LogLevel::Warn);
    assert_eq!(entry.source_id(), page.source_id());
    assert_eq!(entry.args()[0], SerializedValue::string("state"));
    assert_eq!(
        entry.args()[1].at_path("me"),
        Some(&SerializedValue::string("[Circular]"))
    );
}

#[test]
fn mixed_stream_keeps_valid_entries_and_reports_bad_lines() {
    let mut page = producer("http://localhost/");
    let lines = vec![
        wire(&mut page, LogLevel::Log, &[Value::from("one")], 1),
        "not json".to_string(),
        String::new(),
        r#"{"type":"ping","payload":{}}"#.to_string(),
        wire(&mut page, LogLevel::Error, &[Value::from("two")], 2),
    ];

    let (entries, errors) = process_lines(lines, 1);
    assert_eq!(entries.len(), 2);
    let bad_lines: Vec<usize> = errors.iter().map(|e| e.line()).collect();
    assert_eq!(bad_lines, vec![2, 4]);
}

#[test]
fn store_then_filter_matches_search_scenario() {
    let mut first = producer("http://localhost/a");
    let mut second = producer("http://localhost/b");
    let lines = vec![
        wire(&mut first, LogLevel::Log, &[Value::from("Apple")], 1),
        wire(&mut second, LogLevel::Warn, &[Value::from("Dog")], 2),
        wire(&mut first, LogLevel::Error, &[Value::object_from([("pet", "dog house")])], 3),
    ];
    let (entries, errors) = process_lines(lines, 1);
    assert!(errors.is_empty());

    let mut store = EntryStore::new(2);
    for entry in entries {
        store.add_entry(entry);
    }
    assert_eq!(store.count(), 2, "oldest entry evicted");

    let snapshot = store.all_entries();
    let dogs = get_filtered(&snapshot, &FilterPredicate::new().with_search_text("DOG"));
    assert_eq!(dogs.len(), 2);

    let from_first = get_filtered(
        &snapshot,
        &FilterPredicate::new()
            .with_search_text("dog")
            .with_source(first.source_id()),
    );
    assert_eq!(from_first.len(), 1);
    assert_eq!(from_first[0].level(), LogLevel::Error);
}

#[test]
fn demo_binary_output_is_a_valid_stream() {
    let output = Command::new(env!("CARGO_BIN_EXE_satcon"))
        .arg("--demo")
        .output()
        .expect("Failed to execute binary");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<String> = stdout.lines().map(str::to_string).collect();
    let (entries, errors) = process_lines(lines, 1);

    assert!(errors.is_empty(), "rejected demo lines: {errors:?}");
    assert!(entries.len() >= 10);
}
