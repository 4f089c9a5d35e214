// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Helpers shared by tests and benchmarks.

use std::rc::Rc;

use crate::element::Element;
use crate::matrix::Matrix;
use crate::source::{InMemorySource, MatrixSource};

/// A matrix whose element `(i, j)` is `(i * cols + j) % modulus`.
#[must_use]
pub fn sequential_matrix(rows: usize, cols: usize, modulus: i32) -> Matrix<i32> {
    let data = (0..rows * cols).map(|n| (n as i32) % modulus).collect();
    Matrix::from_vec(rows, cols, data).unwrap()
}

/// Convert an integer matrix to reals, scaling each element.
#[must_use]
pub fn to_reals(matrix: &Matrix<i32>, scale: f64) -> Matrix<f64> {
    let data = matrix.as_slice().iter().map(|v| f64::from(*v) * scale).collect();
    Matrix::from_vec(matrix.rows(), matrix.cols(), data).unwrap()
}

/// An in-memory source over `a` and `b`, ready to hand to a pipeline.
#[must_use]
pub fn in_memory_source<E>(a: Matrix<E>, b: Matrix<E>) -> Rc<dyn MatrixSource<E>>
where
    E: Element,
{
    Rc::new(InMemorySource::new(a, b).unwrap())
}
