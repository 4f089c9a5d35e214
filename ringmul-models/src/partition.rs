// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Assignment of row-bands of `A` and column-panels of `B` to ranks.
//!
//! Rank `r` of a ring of size `P` owns rows `[r·N1/P, (r+1)·N1/P)` of `A`
//! and starts with columns `[r·N3/P, (r+1)·N3/P)` of `B`. The ranges of the
//! last rank run to the end of the matrix so that together they cover every
//! row and column with no gap or overlap.

use std::fmt;
use std::ops::Range;

use ringmul_engine::config_error;
use ringmul_engine::types::RingResult;
use serde::{Deserialize, Serialize};

/// The dimensions of `A (n1 × n2)` and `B (n2 × n3)`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Dims {
    pub n1: usize,
    pub n2: usize,
    pub n3: usize,
}

impl Dims {
    #[must_use]
    pub fn new(n1: usize, n2: usize, n3: usize) -> Self {
        Self { n1, n2, n3 }
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}x{}", self.n1, self.n2, self.n3)
    }
}

/// The range of `index` when `total` items are split into `parts`.
///
/// The last part absorbs any remainder.
#[must_use]
pub fn split(total: usize, parts: usize, index: usize) -> Range<usize> {
    let start = index * total / parts;
    let end = if index + 1 == parts {
        total
    } else {
        (index + 1) * total / parts
    };
    start..end
}

/// A validated partition of a multiplication over a ring.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Partition {
    dims: Dims,
    ring_size: usize,
}

impl Partition {
    /// Validate `dims` against `ring_size`.
    ///
    /// The ring size must divide both `n1` and `n3`.
    pub fn new(dims: Dims, ring_size: usize) -> RingResult<Self> {
        if ring_size == 0 {
            return config_error!("the ring must have at least one participant");
        }
        if dims.n1 == 0 || dims.n2 == 0 || dims.n3 == 0 {
            return config_error!("matrix dimensions {dims} must all be non-zero");
        }
        if dims.n1 % ring_size != 0 {
            return config_error!(
                "N1 = {} is not divisible by the ring size {ring_size}",
                dims.n1
            );
        }
        if dims.n3 % ring_size != 0 {
            return config_error!(
                "N3 = {} is not divisible by the ring size {ring_size}",
                dims.n3
            );
        }
        Ok(Self { dims, ring_size })
    }

    #[must_use]
    pub fn dims(&self) -> Dims {
        self.dims
    }

    #[must_use]
    pub fn ring_size(&self) -> usize {
        self.ring_size
    }

    /// Rows of `A` owned by `rank`.
    #[must_use]
    pub fn row_band(&self, rank: usize) -> Range<usize> {
        split(self.dims.n1, self.ring_size, rank)
    }

    /// Columns of `B` in column-panel `index`.
    #[must_use]
    pub fn col_panel(&self, index: usize) -> Range<usize> {
        split(self.dims.n3, self.ring_size, index)
    }

    /// Number of elements in the completed row-band accumulator of `rank`.
    #[must_use]
    pub fn band_elements(&self, rank: usize) -> usize {
        self.row_band(rank).len() * self.dims.n3
    }

    /// Number of elements in column-panel `index`.
    #[must_use]
    pub fn panel_elements(&self, index: usize) -> usize {
        self.dims.n2 * self.col_panel(index).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_with_remainder() {
        assert_eq!(split(10, 3, 0), 0..3);
        assert_eq!(split(10, 3, 1), 3..6);
        assert_eq!(split(10, 3, 2), 6..10);
    }

    #[test]
    fn reject_indivisible() {
        let err = Partition::new(Dims::new(960, 768, 159), 8).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Config error: N3 = 159 is not divisible by the ring size 8"
        );
        assert!(Partition::new(Dims::new(9, 4, 8), 2).is_err());
        assert!(Partition::new(Dims::new(8, 4, 8), 0).is_err());
        assert!(Partition::new(Dims::new(8, 0, 8), 2).is_err());
    }
}
