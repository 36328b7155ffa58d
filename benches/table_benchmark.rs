// Table benchmarks
// Author: Gabriel Demetrios Lafis

use std::io::Cursor;

use comma::{Table, TableSource};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn source_text(rows: usize) -> String {
    let mut text = String::from("id,age,city\n");
    for i in 0..rows {
        text.push_str(&format!("{},{},city{}\n", i, 20 + i % 50, i % 7));
    }
    text
}

fn prepared(text: &str) -> Table {
    let mut table = Table::builder(TableSource::reader(Cursor::new(text.to_string())))
        .config("success_messages", serde_json::json!(false))
        .build()
        .unwrap();
    table.prepare().unwrap();
    table
}

fn bench_prepare(c: &mut Criterion) {
    let text = source_text(10_000);
    c.bench_function("prepare 10k rows", |b| b.iter(|| prepared(black_box(&text))));
}

fn bench_statistics(c: &mut Criterion) {
    let table = prepared(&source_text(10_000));
    c.bench_function("column_stats 10k rows", |b| {
        b.iter(|| table.column_stats(black_box("age"), false).unwrap())
    });
    c.bench_function("value_counts 10k rows", |b| {
        b.iter(|| table.value_counts(black_box("city")).unwrap())
    });
}

fn bench_lookup(c: &mut Criterion) {
    let mut table = prepared(&source_text(10_000));
    table.assign_primary("id", false).unwrap();
    c.bench_function("find_row 10k rows", |b| {
        b.iter(|| table.find_row(black_box("9999")).unwrap())
    });
}

criterion_group!(benches, bench_prepare, bench_statistics, bench_lookup);
criterion_main!(benches);
