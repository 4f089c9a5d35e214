// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Write a matrix file for use as an input to `ringmul`.
//!
//! For example, run using:
//!   cargo run --bin ringmul-generate -- --rows 960 --cols 768 --seed 1
//! MatrixA.txt

use anyhow::Result;
use clap::Parser;
use ringmul::generate::{GenerateArgs, generate};

fn main() -> Result<()> {
    let args = GenerateArgs::parse();
    generate(&args)?;
    Ok(())
}
