//! Layout benchmarks.
//!
//! Run with: cargo bench -p tatami-widgets

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tatami_core::geometry::Constraint;
use tatami_widgets::{Widget, border, column, fill_height, fill_width, fixed_width, row, text};

fn wide_row(flexible: usize) -> Widget {
    let mut children = vec![text("label")];
    children.extend((0..flexible).map(|_| fill_width(None)));
    children.push(text("status"));
    row(children)
}

fn dashboard() -> Widget {
    row(vec![
        fill_width(Some(fill_height(Some(border(None))))),
        fixed_width(
            24,
            Some(column(vec![
                row(vec![text("cpu"), fill_width(None), text("12%")]),
                row(vec![text("mem"), fill_width(None), text("48%")]),
                row(vec![text("net"), fill_width(None), text("3kb")]),
                fill_height(None),
                border(Some(text("status: ok"))),
            ])),
        ),
    ])
}

fn bench_flexible_distribution(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/row_flexible");
    for flexible in [1usize, 8, 64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(flexible),
            &flexible,
            |b, &flexible| {
                let mut tree = wide_row(flexible);
                let constraint = Constraint::loose(223, 5);
                b.iter(|| {
                    let g = tree.layout(black_box(constraint));
                    black_box(g);
                });
            },
        );
    }
    group.finish();
}

fn bench_nested_tree(c: &mut Criterion) {
    c.bench_function("layout/dashboard", |b| {
        let mut tree = dashboard();
        let constraint = Constraint::loose(120, 40);
        b.iter(|| {
            let g = tree.layout(black_box(constraint));
            black_box(g);
        });
    });
}

criterion_group!(benches, bench_flexible_distribution, bench_nested_tree);
criterion_main!(benches);
