// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::rc::Rc;

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use ringmul_engine::engine::Engine;
use ringmul_models::baseline::run_synchronous;
use ringmul_models::matrix::Matrix;
use ringmul_models::partition::Dims;
use ringmul_models::pipeline::{Pipeline, PipelineConfig, build_pipeline};
use ringmul_models::source::MatrixSource;
use ringmul_models::test_helpers::{in_memory_source, sequential_matrix};
use ringmul_track::tracker::dev_null_tracker;

const DIMS: Dims = Dims {
    n1: 128,
    n2: 96,
    n3: 64,
};

fn create_source() -> Rc<dyn MatrixSource<i32>> {
    in_memory_source(
        sequential_matrix(DIMS.n1, DIMS.n2, 17),
        sequential_matrix(DIMS.n2, DIMS.n3, 13),
    )
}

fn setup_ring(source: &Rc<dyn MatrixSource<i32>>, ring_size: usize) -> (Engine, Pipeline<i32>) {
    // Create an engine without the tracker system opening files for logging
    let tracker = dev_null_tracker();
    let engine = Engine::new(&tracker);
    let pipeline = build_pipeline(
        &engine,
        &PipelineConfig::new(DIMS, ring_size),
        source.clone(),
    )
    .unwrap();
    (engine, pipeline)
}

fn run_ring(args: (Engine, Pipeline<i32>)) -> Matrix<i32> {
    let (mut engine, pipeline) = args;
    pipeline.run(&mut engine).unwrap().product
}

fn bench_multiply(c: &mut Criterion) {
    let source = create_source();
    let mut group = c.benchmark_group("multiply");

    group.bench_function("baseline", |b| {
        b.iter(|| run_synchronous(source.as_ref(), DIMS).unwrap().product);
    });

    for ring_size in [1, 4, 8] {
        group.bench_function(format!("ring_of_{ring_size}"), |b| {
            b.iter_batched(
                || setup_ring(&source, ring_size),
                run_ring,
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = bench_multiply
}
criterion_main!(benches);
