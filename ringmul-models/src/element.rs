// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The numeric types a matrix can hold.

use std::fmt::{self, Debug, Display};
use std::ops::{Add, AddAssign, Mul};
use std::str::FromStr;

use clap::ValueEnum;
use num_traits::Zero;
use ringmul_engine::config_error;
use ringmul_engine::types::{RingError, RingResult};
use serde::{Deserialize, Serialize};

/// Selects the element type of a run.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// 32-bit signed integers; results compare exactly.
    #[default]
    Integer,

    /// Double-precision floating point.
    Real,
}

impl Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ElementType::Integer => write!(f, "integer"),
            ElementType::Real => write!(f, "real"),
        }
    }
}

impl FromStr for ElementType {
    type Err = RingError;

    fn from_str(s: &str) -> RingResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "integer" => Ok(ElementType::Integer),
            "real" => Ok(ElementType::Real),
            _ => config_error!("unknown element type '{s}' (expected integer or real)"),
        }
    }
}

/// A value that can be stored in a [`Matrix`](crate::matrix::Matrix).
pub trait Element:
    Copy
    + Debug
    + Display
    + Default
    + PartialEq
    + FromStr
    + Zero
    + Add<Output = Self>
    + Mul<Output = Self>
    + AddAssign
    + 'static
{
    const TYPE: ElementType;

    /// `self + a * b`, or `None` when the result is not representable.
    fn mul_add_checked(self, a: Self, b: Self) -> Option<Self>;

    /// `self + other`, or `None` when the result is not representable.
    fn add_checked(self, other: Self) -> Option<Self>;
}

impl Element for i32 {
    const TYPE: ElementType = ElementType::Integer;

    fn mul_add_checked(self, a: Self, b: Self) -> Option<Self> {
        a.checked_mul(b).and_then(|product| self.checked_add(product))
    }

    fn add_checked(self, other: Self) -> Option<Self> {
        self.checked_add(other)
    }
}

impl Element for f64 {
    const TYPE: ElementType = ElementType::Real;

    fn mul_add_checked(self, a: Self, b: Self) -> Option<Self> {
        Some(self + a * b)
    }

    fn add_checked(self, other: Self) -> Option<Self> {
        Some(self + other)
    }
}
