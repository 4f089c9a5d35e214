// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Models for the pipelined ring matrix multiplication.
//!
//! The product `C = A × B` is computed by a ring of `P` participants. Each
//! participant permanently owns one row-band of `A` while the column-panels
//! of `B` rotate around the ring, so that every row-band meets every
//! column-panel exactly once. The completed row-bands are gathered at the
//! root participant, which assembles `C`.
//!
//! The building blocks, leaves first:
//!  - [`matrix`]: a dense row-major matrix over an owned flat buffer.
//!  - [`kernel`]: the multiply and multiply-accumulate kernels.
//!  - [`store`]: the text file format for matrices.
//!  - [`source`]: where participants load their blocks from.
//!  - [`partition`]: which rows and columns each rank owns.
//!  - [`fence`]: serialises the initial loads rank by rank.
//!  - [`participant`]: one member of the ring.
//!  - [`assembler`]: gathers the row-bands at the root.
//!  - [`pipeline`]: builds and runs a complete ring.
//!  - [`baseline`]: the single-participant reference multiply.
//!  - [`generator`]: creates input matrices.

pub mod assembler;
pub mod baseline;
pub mod element;
pub mod fence;
pub mod generator;
pub mod kernel;
pub mod matrix;
pub mod participant;
pub mod partition;
pub mod pipeline;
pub mod source;
pub mod store;
pub mod test_helpers;
