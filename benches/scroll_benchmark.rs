//! Windowed rendering cost while scrolling a full list.
//!
//! Run with: cargo bench --bench scroll_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use satcon::model::{LogEntry, LogLevel, SerializedValue};
use satcon::view::{ColorConfig, EntryRenderer, LevelStyles};
use satcon::view_state::{ScrollerConfig, VirtualScroller};
use std::rc::Rc;

const ENTRIES: usize = 10_000;

fn items() -> Vec<Rc<LogEntry>> {
    (0..ENTRIES)
        .map(|i| {
            Rc::new(LogEntry::new(
                format!("e{i}"),
                LogLevel::ALL[i % 3],
                1_700_000_000_000 + i as i64,
                "tab",
                "http://localhost/",
                vec![SerializedValue::string(format!("line {i}\nsecond row"))],
            ))
        })
        .collect()
}

fn scroller() -> VirtualScroller<Rc<LogEntry>, EntryRenderer> {
    let config = ScrollerConfig::default();
    let renderer = EntryRenderer::new(
        LevelStyles::with_color_config(ColorConfig::disabled()),
        config.item_height,
    );
    let mut scroller = VirtualScroller::new(config, renderer);
    scroller.set_viewport_extent(60);
    scroller.set_items(items());
    scroller
}

fn bench_scroll(c: &mut Criterion) {
    c.bench_function("scroll_one_row_per_frame", |b| {
        let mut scroller = scroller();
        b.iter(|| {
            scroller.scroll_by(1);
            black_box(scroller.on_frame());
            if scroller.scroll_offset() == scroller.max_scroll_offset() {
                scroller.scroll_to_top();
            }
        })
    });

    c.bench_function("jump_top_bottom", |b| {
        let mut scroller = scroller();
        b.iter(|| {
            scroller.scroll_to_bottom();
            scroller.scroll_to_top();
        })
    });

    c.bench_function("set_items_full_list", |b| {
        let mut scroller = scroller();
        let snapshot = items();
        b.iter(|| scroller.set_items(black_box(snapshot.clone())))
    });
}

criterion_group!(benches, bench_scroll);
criterion_main!(benches);
