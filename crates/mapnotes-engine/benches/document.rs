use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use mapnotes_engine::editing::{Cmd, Document};
mod common;

fn bench_document_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_creation");
    group.sample_size(20);

    let content = common::generate_trip_notes(100);
    group.bench_function("from_bytes", |b| {
        let bytes = content.as_bytes();
        b.iter(|| {
            let doc = Document::from_bytes(black_box(bytes)).unwrap();
            black_box(doc);
        });
    });

    group.finish();
}

fn bench_document_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_edits");
    group.sample_size(20);

    let content = common::generate_trip_notes(100);

    group.bench_function("insert_and_delete", |b| {
        let mut doc = Document::from_bytes(content.as_bytes()).unwrap();
        b.iter(|| {
            doc.apply(Cmd::InsertText {
                at: 10,
                text: "x".to_string(),
            });
            black_box(doc.apply(Cmd::DeleteRange { range: 10..11 }));
        });
    });

    group.bench_function("snapshot", |b| {
        let doc = Document::from_bytes(content.as_bytes()).unwrap();
        b.iter(|| black_box(doc.snapshot()));
    });

    group.finish();
}

criterion_group!(benches, bench_document_creation, bench_document_edits);
criterion_main!(benches);
