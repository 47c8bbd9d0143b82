//! # Stage Performance Benchmark
//!
//! Frame budget targets on the reference handheld:
//! - Full pool (32 actors) updated and drawn well under 1ms
//! - Load/unload churn with zero allocations
//!
//! Run with: `cargo bench --package starbase_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use starbase_core::{ActorId, ActorResult, Stage, ORDER_SPRITE};

type BenchStage = Stage<[u32; 4], u64>;

fn paint(stage: &mut BenchStage, sum: &mut u64, id: ActorId) -> ActorResult<()> {
    *sum += u64::from(stage.payload(id)?[0]);
    Ok(())
}

fn step(stage: &mut BenchStage, _: &mut u64, id: ActorId) -> ActorResult<()> {
    let payload = stage.payload_mut(id)?;
    payload[0] = payload[0].wrapping_add(payload[1]);
    stage.set_draw(id, paint, ORDER_SPRITE + (id.index() as i32 % 8))
}

fn filled(capacity: usize) -> BenchStage {
    let mut stage = Stage::with_capacity(capacity);
    for i in 0..capacity {
        let i = i as u32;
        let _ = stage.load(Some(step), (i % 8) as i32, [i, 1, 0, 0]);
    }
    stage
}

/// Benchmark: One update + draw frame over a full pool.
fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for capacity in [32, 256, 4096] {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            &capacity,
            |b, &capacity| {
                let mut stage = filled(capacity);
                let mut sum = 0u64;
                b.iter(|| {
                    let _ = stage.update(&mut sum);
                    let _ = stage.draw(&mut sum);
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark: Load and unload through the free list.
fn bench_churn(c: &mut Criterion) {
    let mut stage: BenchStage = Stage::with_capacity(32);
    let mut host = 0u64;

    c.bench_function("load_unload_32", |b| {
        b.iter(|| {
            for i in 0..32 {
                let _ = stage.load(None, i % 8, [0; 4]);
            }
            black_box(stage.unload_all(&mut host))
        });
    });
}

/// Benchmark: Tag lookup over a populated group.
fn bench_tag_walk(c: &mut Criterion) {
    let mut stage = filled(32);
    let ids: Vec<ActorId> = stage.actors().collect();
    for (n, id) in ids.iter().enumerate() {
        let _ = stage.set_tag(*id, (n % 4) as i32);
    }

    c.bench_function("tag_walk_32", |b| {
        b.iter(|| black_box(stage.with_tag(2).count()));
    });
}

criterion_group!(benches, bench_frame, bench_churn, bench_tag_walk);
criterion_main!(benches);
