// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Create input matrices.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ringmul_engine::config_error;
use ringmul_engine::types::RingResult;

use crate::matrix::Matrix;

/// Reals are generated in steps of 1/1000.
const REAL_STEPS: i64 = 1000;

/// A reproducible generator when a `seed` is given, otherwise one seeded
/// from the operating system.
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Integers drawn uniformly from `[min, max]`.
pub fn random_integers<R>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    min: i32,
    max: i32,
) -> RingResult<Matrix<i32>>
where
    R: Rng,
{
    if min > max {
        return config_error!("empty integer range [{min}, {max}]");
    }
    let data = (0..rows * cols).map(|_| rng.gen_range(min..=max)).collect();
    Matrix::from_vec(rows, cols, data)
}

/// Reals with three decimal places drawn uniformly from `[min, max)`.
pub fn random_reals<R>(
    rng: &mut R,
    rows: usize,
    cols: usize,
    min: i32,
    max: i32,
) -> RingResult<Matrix<f64>>
where
    R: Rng,
{
    if min >= max {
        return config_error!("empty real range [{min}, {max})");
    }
    let low = i64::from(min) * REAL_STEPS;
    let high = i64::from(max) * REAL_STEPS;
    let data = (0..rows * cols)
        .map(|_| rng.gen_range(low..high) as f64 / REAL_STEPS as f64)
        .collect();
    Matrix::from_vec(rows, cols, data)
}
