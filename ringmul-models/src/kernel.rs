// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Multiplication kernels.

use ringmul_engine::types::RingResult;
use ringmul_engine::{config_error, overflow_error};

use crate::element::Element;
use crate::matrix::Matrix;

/// `Σ_k row[k]·column(k)` with every step checked for overflow.
fn dot<E>(row: &[E], column: impl Fn(usize) -> E, i: usize, j: usize) -> RingResult<E>
where
    E: Element,
{
    let mut sum = E::zero();
    for (k, value) in row.iter().enumerate() {
        sum = match sum.mul_add_checked(*value, column(k)) {
            Some(sum) => sum,
            None => return overflow_error!("{} overflow computing element ({i}, {j})", E::TYPE),
        };
    }
    Ok(sum)
}

/// The textbook product `C[i][j] = Σ_k A[i][k]·B[k][j]`.
pub fn multiply<E>(a: &Matrix<E>, b: &Matrix<E>) -> RingResult<Matrix<E>>
where
    E: Element,
{
    if a.cols() != b.rows() {
        return config_error!(
            "cannot multiply a {}x{} matrix by a {}x{} matrix",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        );
    }

    let mut c = Matrix::zeros(a.rows(), b.cols());
    for i in 0..a.rows() {
        let a_row = a.row(i);
        for j in 0..b.cols() {
            c[(i, j)] = dot(a_row, |k| b[(k, j)], i, j)?;
        }
    }
    Ok(c)
}

/// Accumulate `band × panel` into the columns of `acc` starting at
/// `col_offset`.
///
/// Each element is summed over `k` in the same order as [`multiply`], so a
/// ring that meets every panel once produces exactly the baseline result.
pub fn multiply_accumulate<E>(
    band: &Matrix<E>,
    panel: &Matrix<E>,
    acc: &mut Matrix<E>,
    col_offset: usize,
) -> RingResult
where
    E: Element,
{
    if band.cols() != panel.rows() {
        return config_error!(
            "cannot multiply a {}x{} band by a {}x{} panel",
            band.rows(),
            band.cols(),
            panel.rows(),
            panel.cols()
        );
    }
    if acc.rows() != band.rows() || col_offset + panel.cols() > acc.cols() {
        return config_error!(
            "a {}x{} product at column {col_offset} does not fit a {}x{} accumulator",
            band.rows(),
            panel.cols(),
            acc.rows(),
            acc.cols()
        );
    }

    for i in 0..band.rows() {
        let band_row = band.row(i);
        for j in 0..panel.cols() {
            let col = col_offset + j;
            let sum = dot(band_row, |k| panel[(k, j)], i, col)?;
            acc[(i, col)] = match acc[(i, col)].add_checked(sum) {
                Some(total) => total,
                None => return overflow_error!("{} overflow computing element ({i}, {col})", E::TYPE),
            };
        }
    }
    Ok(())
}
