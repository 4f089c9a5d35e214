// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Front-ends for the pipelined ring matrix multiplication.
//!
//! Two binaries are provided:
//!  - `ringmul`: multiplies two matrix files, either with the pipelined ring
//!    or with the synchronous baseline, and writes the product.
//!  - `ringmul-generate`: writes a matrix file of constant or random values.
//!
//! For example:
//!
//! ```text
//! ringmul-generate --rows 960 --cols 768 --seed 1 MatrixA.txt
//! ringmul-generate --rows 768 --cols 160 --seed 2 MatrixB.txt
//! ringmul --verify --stdout --stdout-level info
//! ```

pub mod cli;
pub mod generate;
pub mod run;
pub mod settings;
