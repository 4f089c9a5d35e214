// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! A dense matrix stored as one contiguous row-major buffer.
//!
//! Keeping the elements in a single flat `Vec` is what allows a whole block
//! to be handed to the ring channel as one payload, and what allows the
//! receiver to rebuild it under any shape with the same element count.

use std::fmt;
use std::ops::{Index, IndexMut, Range};

use ringmul_engine::reshape_error;
use ringmul_engine::types::RingResult;

use crate::element::Element;

#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<E>
where
    E: Element,
{
    rows: usize,
    cols: usize,
    data: Vec<E>,
}

impl<E> Matrix<E>
where
    E: Element,
{
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::filled(rows, cols, E::zero())
    }

    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: E) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Take ownership of a flat row-major buffer of `rows × cols` elements.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<E>) -> RingResult<Self> {
        if data.len() != rows * cols {
            return reshape_error!(
                "{} elements cannot form a {rows}x{cols} matrix",
                data.len()
            );
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from a list of equal-length rows.
    pub fn from_rows(rows: &[Vec<E>]) -> RingResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return reshape_error!("row {i} has {} elements, expected {cols}", row.len());
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<E> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: E) -> RingResult {
        if row >= self.rows || col >= self.cols {
            return reshape_error!(
                "({row}, {col}) is outside a {}x{} matrix",
                self.rows,
                self.cols
            );
        }
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &[E] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    #[must_use]
    pub fn row_mut(&mut self, row: usize) -> &mut [E] {
        &mut self.data[row * self.cols..(row + 1) * self.cols]
    }

    #[must_use]
    pub fn as_slice(&self) -> &[E] {
        &self.data
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<E> {
        self.data
    }

    /// Reinterpret the flat buffer under a different shape.
    ///
    /// Only the element count has to match; the row-major order of the
    /// buffer is unchanged.
    pub fn reshape(self, rows: usize, cols: usize) -> RingResult<Self> {
        if rows * cols != self.data.len() {
            return reshape_error!(
                "cannot reshape a {}x{} matrix into {rows}x{cols}",
                self.rows,
                self.cols
            );
        }
        Ok(Self {
            rows,
            cols,
            data: self.data,
        })
    }

    /// Copy out the sub-rectangle covering `rows` and `cols`.
    pub fn block(&self, rows: Range<usize>, cols: Range<usize>) -> RingResult<Self> {
        if rows.start > rows.end
            || cols.start > cols.end
            || rows.end > self.rows
            || cols.end > self.cols
        {
            return reshape_error!(
                "block rows {rows:?} cols {cols:?} is outside a {}x{} matrix",
                self.rows,
                self.cols
            );
        }
        let mut data = Vec::with_capacity(rows.len() * cols.len());
        for row in rows.clone() {
            data.extend_from_slice(&self.row(row)[cols.clone()]);
        }
        Ok(Self {
            rows: rows.len(),
            cols: cols.len(),
            data,
        })
    }

    /// Overwrite the sub-rectangle whose top-left corner is
    /// `(row_offset, col_offset)` with the contents of `src`.
    pub fn copy_block_from(
        &mut self,
        row_offset: usize,
        col_offset: usize,
        src: &Matrix<E>,
    ) -> RingResult {
        if row_offset + src.rows > self.rows || col_offset + src.cols > self.cols {
            return reshape_error!(
                "a {}x{} block at ({row_offset}, {col_offset}) does not fit a {}x{} matrix",
                src.rows,
                src.cols,
                self.rows,
                self.cols
            );
        }
        for row in 0..src.rows {
            let cols = self.cols;
            let start = (row_offset + row) * cols + col_offset;
            self.data[start..start + src.cols].copy_from_slice(src.row(row));
        }
        Ok(())
    }
}

impl<E> Index<(usize, usize)> for Matrix<E>
where
    E: Element,
{
    type Output = E;

    fn index(&self, (row, col): (usize, usize)) -> &E {
        assert!(col < self.cols, "column {col} out of range");
        &self.data[row * self.cols + col]
    }
}

impl<E> IndexMut<(usize, usize)> for Matrix<E>
where
    E: Element,
{
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut E {
        assert!(col < self.cols, "column {col} out of range");
        &mut self.data[row * self.cols + col]
    }
}

/// Rows are separated by newlines and values by single spaces, with no
/// newline after the final row.
impl<E> fmt::Display for Matrix<E>
where
    E: Element,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }
            for (col, value) in self.row(row).iter().enumerate() {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{value}")?;
            }
        }
        Ok(())
    }
}
