//! Benchmarks for commit, undo/redo and garbage collection.
//!
//! Run with: cargo bench -p undograph --bench history_bench
//!
//! The document is a `Vec<u64>` of a few thousand elements so snapshot
//! cloning dominates, as it would for a real model.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use undograph::{HistoryConfig, VersionedDocument};

const DOC_LEN: usize = 4096;

fn filled(config: HistoryConfig, commits: usize) -> VersionedDocument<Vec<u64>> {
    let mut doc = VersionedDocument::with_config(vec![0; DOC_LEN], config);
    for i in 0..commits {
        doc.document_mut()[i % DOC_LEN] = i as u64;
        doc.commit("edit");
    }
    doc
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("history/commit");

    for max_undo in [8usize, 32, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(max_undo),
            &max_undo,
            |b, &max_undo| {
                let mut doc = filled(HistoryConfig::new(max_undo, max_undo), max_undo);
                let mut i = 0u64;
                b.iter(|| {
                    doc.document_mut()[0] = i;
                    i += 1;
                    black_box(doc.commit("edit"))
                });
            },
        );
    }

    group.finish();
}

fn bench_commit_after_undo(c: &mut Criterion) {
    c.bench_function("history/commit_discarding_redo", |b| {
        b.iter_batched(
            || {
                let mut doc = filled(HistoryConfig::default(), 32);
                for _ in 0..16 {
                    doc.undo();
                }
                doc
            },
            |mut doc| black_box(doc.commit("fork")),
            criterion::BatchSize::SmallInput,
        );
    });
}

fn bench_undo_redo(c: &mut Criterion) {
    let mut doc = filled(HistoryConfig::default(), 32);
    c.bench_function("history/undo_redo", |b| {
        b.iter(|| {
            doc.undo();
            doc.redo();
            black_box(doc.current_head())
        });
    });
}

criterion_group!(
    benches,
    bench_commit,
    bench_commit_after_undo,
    bench_undo_redo
);
criterion_main!(benches);
