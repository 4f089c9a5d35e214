// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Where participants load their blocks of `A` and `B` from.

use std::ops::Range;
use std::path::PathBuf;

use ringmul_engine::config_error;
use ringmul_engine::types::RingResult;

use crate::element::Element;
use crate::matrix::Matrix;
use crate::partition::Dims;
use crate::store;

/// A provider of the two input matrices.
pub trait MatrixSource<E>
where
    E: Element,
{
    /// Load rows `rows` of `A`, all columns.
    fn load_band(&self, rows: Range<usize>) -> RingResult<Matrix<E>>;

    /// Load columns `cols` of `B`, all rows.
    fn load_panel(&self, cols: Range<usize>) -> RingResult<Matrix<E>>;
}

/// Reads blocks from matrix files through the [`store`].
pub struct FileSource {
    path_a: PathBuf,
    path_b: PathBuf,
    dims: Dims,
}

impl FileSource {
    #[must_use]
    pub fn new(path_a: PathBuf, path_b: PathBuf, dims: Dims) -> Self {
        Self {
            path_a,
            path_b,
            dims,
        }
    }
}

impl<E> MatrixSource<E> for FileSource
where
    E: Element,
{
    fn load_band(&self, rows: Range<usize>) -> RingResult<Matrix<E>> {
        let Dims { n1, n2, .. } = self.dims;
        store::load_block(&self.path_a, n1, n2, rows, 0..n2)
    }

    fn load_panel(&self, cols: Range<usize>) -> RingResult<Matrix<E>> {
        let Dims { n2, n3, .. } = self.dims;
        store::load_block(&self.path_b, n2, n3, 0..n2, cols)
    }
}

/// Serves blocks from matrices already held in memory.
pub struct InMemorySource<E>
where
    E: Element,
{
    a: Matrix<E>,
    b: Matrix<E>,
}

impl<E> InMemorySource<E>
where
    E: Element,
{
    pub fn new(a: Matrix<E>, b: Matrix<E>) -> RingResult<Self> {
        if a.cols() != b.rows() {
            return config_error!(
                "A is {}x{} but B is {}x{}",
                a.rows(),
                a.cols(),
                b.rows(),
                b.cols()
            );
        }
        Ok(Self { a, b })
    }

    #[must_use]
    pub fn dims(&self) -> Dims {
        Dims::new(self.a.rows(), self.a.cols(), self.b.cols())
    }
}

impl<E> MatrixSource<E> for InMemorySource<E>
where
    E: Element,
{
    fn load_band(&self, rows: Range<usize>) -> RingResult<Matrix<E>> {
        if rows.end > self.a.rows() {
            return config_error!("rows {rows:?} are outside A with {} rows", self.a.rows());
        }
        self.a.block(rows, 0..self.a.cols())
    }

    fn load_panel(&self, cols: Range<usize>) -> RingResult<Matrix<E>> {
        if cols.end > self.b.cols() {
            return config_error!("columns {cols:?} are outside B with {} columns", self.b.cols());
        }
        self.b.block(0..self.b.rows(), cols)
    }
}
