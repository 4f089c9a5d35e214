// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The synchronous baseline: one participant, no ring.
//!
//! Used as the reference result and timing for the pipelined ring.

use std::time::{Duration, Instant};

use ringmul_engine::types::RingResult;

use crate::element::Element;
use crate::kernel::multiply;
use crate::matrix::Matrix;
use crate::partition::Dims;
use crate::source::MatrixSource;

#[derive(Clone, Debug, PartialEq)]
pub struct BaselineOutcome<E>
where
    E: Element,
{
    pub product: Matrix<E>,

    /// Duration of the multiply, excluding the load.
    pub elapsed: Duration,
}

/// Load all of `A` and `B` from `source` and multiply them.
pub fn run_synchronous<E>(
    source: &dyn MatrixSource<E>,
    dims: Dims,
) -> RingResult<BaselineOutcome<E>>
where
    E: Element,
{
    let a = source.load_band(0..dims.n1)?;
    let b = source.load_panel(0..dims.n3)?;

    let start = Instant::now();
    let product = multiply(&a, &b)?;
    Ok(BaselineOutcome {
        product,
        elapsed: start.elapsed(),
    })
}
