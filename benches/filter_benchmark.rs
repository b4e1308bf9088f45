//! Filter and serializer throughput at store capacity.
//!
//! The viewer recomputes the filtered view on every ingest and every
//! debounced keystroke, so a full pass over a full store must stay cheap.
//!
//! Run with: cargo bench --bench filter_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use satcon::filter::{get_filtered, FilterPredicate};
use satcon::model::{LogEntry, LogLevel, Value};
use satcon::serializer::{serialize, serialize_args, SerializeConfig};
use satcon::store::{EntryStore, DEFAULT_CAPACITY};
use std::rc::Rc;

/// Full store with a mix of levels, sources and nested arguments.
fn full_store() -> Vec<Rc<LogEntry>> {
    let config = SerializeConfig::default();
    let mut store = EntryStore::new(DEFAULT_CAPACITY);

    for i in 0..DEFAULT_CAPACITY {
        let level = LogLevel::ALL[i % 3];
        let payload = Value::object_from([
            ("request", Value::from(format!("/api/items/{i}"))),
            ("status", Value::from(if i % 7 == 0 { 500 } else { 200 })),
            (
                "tags",
                Value::array(vec![Value::from("alpha"), Value::from("beta")]),
            ),
        ]);
        let args = serialize_args(
            &[Value::from(format!("event number {i}")), payload],
            &config,
        );
        store.add_entry(LogEntry::new(
            format!("e{i}"),
            level,
            i as i64,
            format!("tab-{}", i % 4),
            "http://localhost/",
            args,
        ));
    }

    store.all_entries()
}

/// Object tree `depth` levels deep and `width` keys wide, with a back edge.
fn wide_tree(depth: usize, width: usize) -> Value {
    let root = Value::object_from([("root", Value::Bool(true))]);
    let mut frontier = vec![root.clone()];
    for _ in 0..depth {
        let mut next = Vec::new();
        for parent in &frontier {
            if let Value::Object(rc) = parent {
                for k in 0..width {
                    let child = Value::object_from([("k", Value::from(k as i64))]);
                    rc.borrow_mut().insert(format!("child{k}"), child.clone());
                    next.push(child);
                }
                rc.borrow_mut().insert("back", root.clone());
            }
        }
        frontier = next;
    }
    root
}

fn bench_filter(c: &mut Criterion) {
    let entries = full_store();
    let mut group = c.benchmark_group("get_filtered");

    let cases = [
        ("unconstrained", FilterPredicate::new()),
        ("level", FilterPredicate::new().with_levels([LogLevel::Error])),
        ("source", FilterPredicate::new().with_source("tab-2")),
        ("text_hit", FilterPredicate::new().with_search_text("NUMBER 99")),
        ("text_nested", FilterPredicate::new().with_search_text("beta")),
        ("text_miss", FilterPredicate::new().with_search_text("zzz")),
        (
            "combined",
            FilterPredicate::new()
                .with_source("tab-1")
                .with_levels([LogLevel::Warn, LogLevel::Error])
                .with_search_text("items/1"),
        ),
    ];

    for (name, predicate) in &cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), predicate, |b, p| {
            b.iter(|| get_filtered(black_box(&entries), black_box(p)))
        });
    }
    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");
    for depth in [2usize, 3, 4] {
        let tree = wide_tree(depth, 6);
        let config = SerializeConfig {
            max_depth: depth + 1,
            ..SerializeConfig::default()
        };
        group.bench_with_input(BenchmarkId::new("tree_depth", depth), &tree, |b, tree| {
            b.iter(|| serialize(black_box(tree), &config))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_filter, bench_serialize);
criterion_main!(benches);
