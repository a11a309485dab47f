// Performance benchmarks for tooolbar
//
// Run with: cargo bench
// View results in: target/criterion/report/index.html

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};
use std::sync::Arc;

use tooolbar::{Bar, BarOptions, Limiter, ScrollDirection, Theme, ThemeConfig, ToolRegistry};

fn bar_items(copies: usize) -> Vec<Value> {
    (0..copies)
        .flat_map(|i| {
            vec![
                json!({ "type": "ib", "id": format!("save-{}", i), "icon": "disk", "label": "Save" }),
                json!("|"),
                json!({
                    "type": "ic", "id": format!("brush-{}", i), "icon": "brush",
                    "min": 1, "max": 10, "value": 4
                }),
                json!({
                    "type": "iw", "id": format!("side-{}", i), "current": "left",
                    "icons": [
                        { "key": "left", "icon": "align-left", "label": "Left" },
                        { "key": "right", "icon": "align-right", "label": "Right" }
                    ]
                }),
            ]
        })
        .collect()
}

fn new_bar() -> Bar {
    Bar::with_registry(
        BarOptions::new("/icons"),
        Arc::new(ToolRegistry::with_builtins()),
    )
}

/// Benchmark limiter stepping, clamped and circular
fn bench_limiter(c: &mut Criterion) {
    let mut group = c.benchmark_group("limiter_inc");

    let mut clamped = Limiter::new(0, 1000, 0, false).unwrap();
    group.bench_function("clamped", |b| {
        b.iter(|| black_box(clamped.inc()))
    });

    let mut circular = Limiter::new(0, 9, 0, true).unwrap();
    group.bench_function("circular", |b| {
        b.iter(|| black_box(circular.inc()))
    });

    group.finish();

    let mut limiter = Limiter::new(-5, 5, 0, true).unwrap();
    c.bench_function("limiter_wrap_far", |b| {
        b.iter(|| black_box(limiter.set_value(black_box(1_000_003))))
    });
}

/// Benchmark loading and dumping bars of different sizes
fn bench_bar_load_dump(c: &mut Criterion) {
    let mut group = c.benchmark_group("bar_load");
    for copies in [1, 10, 50] {
        let items = bar_items(copies);
        group.bench_with_input(BenchmarkId::from_parameter(copies), &items, |b, items| {
            let mut bar = new_bar();
            b.iter(|| {
                bar.load(items.clone()).unwrap();
                black_box(bar.len())
            })
        });
    }
    group.finish();

    let mut bar = new_bar();
    bar.load(bar_items(10)).unwrap();
    c.bench_function("bar_dump", |b| b.iter(|| black_box(bar.dump())));
}

/// Benchmark rendering the element tree to markup
fn bench_render(c: &mut Criterion) {
    let mut bar = new_bar();
    bar.load(bar_items(10)).unwrap();

    c.bench_function("bar_render_markup", |b| {
        b.iter(|| black_box(bar.render().to_markup()))
    });
}

/// Benchmark event routing through the bar
fn bench_interaction(c: &mut Criterion) {
    let mut bar = new_bar();
    bar.load(bar_items(1)).unwrap();
    bar.add_event_listener(tooolbar::EventKind::Input, |event| {
        black_box(event);
    });

    c.bench_function("bar_scroll_route", |b| {
        b.iter(|| {
            bar.scroll("brush-0", ScrollDirection::Up).unwrap();
            bar.scroll("brush-0", ScrollDirection::Down).unwrap();
        })
    });
}

/// Benchmark theme construction and stylesheet generation
fn bench_theme(c: &mut Criterion) {
    c.bench_function("theme_css", |b| {
        b.iter(|| {
            let theme = Theme::new("bench", ThemeConfig::new()).unwrap();
            black_box(theme.css())
        })
    });
}

criterion_group!(
    benches,
    bench_limiter,
    bench_bar_load_dump,
    bench_render,
    bench_interaction,
    bench_theme,
);

criterion_main!(benches);
