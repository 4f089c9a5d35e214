// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;

use approx::assert_relative_eq;
use ringmul_engine::engine::Engine;
use ringmul_engine::test_helpers::start_test;
use ringmul_engine::types::RingResult;
use ringmul_models::baseline::run_synchronous;
use ringmul_models::generator::{random_integers, random_reals, seeded_rng};
use ringmul_models::matrix::Matrix;
use ringmul_models::participant::Phase;
use ringmul_models::partition::Dims;
use ringmul_models::pipeline::{PipelineConfig, build_pipeline, run_pipelined};
use ringmul_models::source::{FileSource, InMemorySource, MatrixSource};
use ringmul_models::store::save;
use ringmul_models::test_helpers::{in_memory_source, sequential_matrix, to_reals};
use ringmul_track::log::Level;
use ringmul_track::test_helpers::create_in_memory_tracker;

#[test]
fn constant_inputs() {
    let mut engine = start_test(file!());
    let source = in_memory_source(Matrix::filled(8, 4, 1), Matrix::filled(4, 8, 1));
    let config = PipelineConfig::new(Dims::new(8, 4, 8), 2);

    let outcome = run_pipelined(&mut engine, &config, source).unwrap();
    assert_eq!(outcome.product, Matrix::filled(8, 8, 4));

    assert_eq!(outcome.reports.len(), 2);
    assert_eq!(outcome.reports[0].panel_order, vec![0, 1]);
    assert_eq!(outcome.reports[1].panel_order, vec![1, 0]);
}

#[test]
fn integer_overflow_aborts_the_ring() {
    let mut engine = start_test(file!());
    let source = in_memory_source(Matrix::filled(2, 768, 9999), Matrix::filled(768, 2, 9999));
    let config = PipelineConfig::new(Dims::new(2, 768, 2), 2);

    let err = run_pipelined(&mut engine, &config, source).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Overflow error: integer overflow computing element (0, 0)"
    );
}

#[test]
fn offsets_with_distinct_values() {
    let mut engine = start_test(file!());
    let a = Matrix::from_rows(&[vec![1, 2], vec![3, 4], vec![5, 6], vec![7, 8]]).unwrap();
    let b = Matrix::from_rows(&[vec![1, 0, 0, 1], vec![0, 1, 1, 0]]).unwrap();
    let config = PipelineConfig::new(Dims::new(4, 2, 4), 2);

    let outcome = run_pipelined(&mut engine, &config, in_memory_source(a, b)).unwrap();
    let expected = Matrix::from_rows(&[
        vec![1, 2, 2, 1],
        vec![3, 4, 4, 3],
        vec![5, 6, 6, 5],
        vec![7, 8, 8, 7],
    ])
    .unwrap();
    assert_eq!(outcome.product, expected);
}

#[test]
fn integer_matches_baseline() {
    let dims = Dims::new(16, 5, 24);
    let mut rng = seeded_rng(Some(7));
    let a = random_integers(&mut rng, dims.n1, dims.n2, -9, 9).unwrap();
    let b = random_integers(&mut rng, dims.n2, dims.n3, -9, 9).unwrap();
    let source = in_memory_source(a, b);
    let baseline = run_synchronous(source.as_ref(), dims).unwrap();

    for (ring_size, root) in [(1, 0), (2, 1), (4, 0), (4, 3), (8, 5)] {
        let mut engine = start_test(file!());
        let config = PipelineConfig::new(dims, ring_size).with_root(root);
        let outcome = run_pipelined(&mut engine, &config, source.clone()).unwrap();
        assert_eq!(outcome.product, baseline.product, "P={ring_size} root={root}");
    }
}

#[test]
fn real_matches_baseline() {
    let dims = Dims::new(12, 9, 6);
    let mut rng = seeded_rng(Some(11));
    let a = random_reals(&mut rng, dims.n1, dims.n2, -5, 5).unwrap();
    let b = random_reals(&mut rng, dims.n2, dims.n3, -5, 5).unwrap();
    let source = in_memory_source(a, b);
    let baseline = run_synchronous(source.as_ref(), dims).unwrap();

    let mut engine = start_test(file!());
    let config = PipelineConfig::new(dims, 3);
    let outcome = run_pipelined(&mut engine, &config, source).unwrap();

    for (got, expected) in outcome
        .product
        .as_slice()
        .iter()
        .zip(baseline.product.as_slice())
    {
        assert_relative_eq!(*got, *expected, max_relative = 1e-12);
    }
}

#[test]
fn every_panel_exactly_once() {
    const RING_SIZE: usize = 8;

    let mut engine = start_test(file!());
    let dims = Dims::new(16, 3, 16);
    let source = in_memory_source(sequential_matrix(16, 3, 7), sequential_matrix(3, 16, 5));
    let pipeline = build_pipeline(&engine, &PipelineConfig::new(dims, RING_SIZE), source).unwrap();
    let outcome = pipeline.run(&mut engine).unwrap();

    for (rank, report) in outcome.reports.iter().enumerate() {
        assert_eq!(report.rank, rank);
        let expected: Vec<usize> = (0..RING_SIZE)
            .map(|hops| (rank + RING_SIZE - hops) % RING_SIZE)
            .collect();
        assert_eq!(report.panel_order, expected);

        let mut sorted = report.panel_order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..RING_SIZE).collect::<Vec<_>>());
    }

    for participant in pipeline.participants() {
        assert_eq!(participant.phase(), Phase::Done);
    }

    let channel = pipeline.channel();
    for rank in 0..RING_SIZE {
        let next = (rank + 1) % RING_SIZE;
        let stats = channel.link_stats(rank, next).unwrap();
        let bands_to_root = usize::from(next == 0);
        assert_eq!(stats.messages, RING_SIZE - 1 + bands_to_root);
    }
    for rank in 1..RING_SIZE - 1 {
        let stats = channel.link_stats(rank, 0).unwrap();
        assert_eq!(stats.messages, 1);
        assert_eq!(stats.elements, 2 * 16);
    }
}

#[test]
fn indivisible_dimensions_rejected_before_communication() {
    let mut engine = start_test(file!());
    let source = in_memory_source(Matrix::<i32>::zeros(10, 4), Matrix::zeros(4, 8));
    let config = PipelineConfig::new(Dims::new(10, 4, 8), 4);

    let err = build_pipeline(&engine, &config, source).err().unwrap();
    assert_eq!(
        err.to_string(),
        "Config error: N1 = 10 is not divisible by the ring size 4"
    );

    // No participant was registered
    engine.run().unwrap();
    assert_eq!(engine.executor.num_unfinished(), 0);
}

#[test]
fn invalid_root_rejected() {
    let engine = start_test(file!());
    let source = in_memory_source(Matrix::<i32>::zeros(4, 2), Matrix::zeros(2, 4));
    let config = PipelineConfig::new(Dims::new(4, 2, 4), 2).with_root(2);
    assert!(build_pipeline(&engine, &config, source).is_err());
}

/// Records the order in which row-bands are loaded.
struct RecordingSource {
    inner: InMemorySource<i32>,
    band_starts: RefCell<Vec<usize>>,
}

impl MatrixSource<i32> for RecordingSource {
    fn load_band(&self, rows: Range<usize>) -> RingResult<Matrix<i32>> {
        self.band_starts.borrow_mut().push(rows.start);
        self.inner.load_band(rows)
    }

    fn load_panel(&self, cols: Range<usize>) -> RingResult<Matrix<i32>> {
        self.inner.load_panel(cols)
    }
}

#[test]
fn loads_in_rank_order() {
    let mut engine = start_test(file!());
    let source = Rc::new(RecordingSource {
        inner: InMemorySource::new(Matrix::filled(8, 2, 1), Matrix::filled(2, 4, 1)).unwrap(),
        band_starts: RefCell::new(Vec::new()),
    });
    let shared: Rc<dyn MatrixSource<i32>> = source.clone();
    let config = PipelineConfig::new(Dims::new(8, 2, 4), 4).with_root(2);
    run_pipelined(&mut engine, &config, shared).unwrap();
    assert_eq!(*source.band_starts.borrow(), vec![0, 2, 4, 6]);
}

#[test]
fn missing_input_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let dims = Dims::new(4, 2, 4);
    let source: Rc<dyn MatrixSource<i32>> = Rc::new(FileSource::new(
        dir.path().join("a.txt"),
        dir.path().join("b.txt"),
        dims,
    ));
    let mut engine = start_test(file!());
    let err = run_pipelined(&mut engine, &PipelineConfig::new(dims, 2), source)
        .err()
        .unwrap();
    assert!(err.to_string().starts_with("Config error: unable to read"));
}

#[test]
fn file_backed_ring() {
    let dir = tempfile::tempdir().unwrap();
    let dims = Dims::new(8, 6, 4);
    let a = to_reals(&sequential_matrix(8, 6, 9), 0.5);
    let b = to_reals(&sequential_matrix(6, 4, 4), 0.25);
    let path_a = dir.path().join("a.txt");
    let path_b = dir.path().join("b.txt");
    save(&path_a, &a).unwrap();
    save(&path_b, &b).unwrap();

    let source: Rc<dyn MatrixSource<f64>> = Rc::new(FileSource::new(path_a, path_b, dims));
    let baseline = run_synchronous(source.as_ref(), dims).unwrap();

    let mut engine = start_test(file!());
    let outcome = run_pipelined(&mut engine, &PipelineConfig::new(dims, 4), source).unwrap();
    assert_eq!(outcome.product, baseline.product);
}

#[test]
fn phases_are_logged() {
    let (in_memory, tracker) = create_in_memory_tracker(Level::Debug);
    let mut engine = Engine::new(&tracker);
    let source = in_memory_source(Matrix::filled(6, 2, 2), Matrix::filled(2, 6, 3));
    run_pipelined(&mut engine, &PipelineConfig::new(Dims::new(6, 2, 6), 3), source).unwrap();

    let messages = in_memory.messages_from("top::ring::participant1");
    assert_eq!(
        messages[..4],
        ["loading", "round 0", "round 1", "draining"][..]
    );
    assert!(messages[4].starts_with("compute and communication took"));
    assert_eq!(messages.last().map(String::as_str), Some("done"));
    assert!(
        in_memory
            .messages_from("top::ring::assembler")
            .contains(&"assembled 6x6 product".to_string())
    );
}
