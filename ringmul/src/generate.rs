// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Arguments and driver of the `ringmul-generate` binary.

use std::path::PathBuf;

use clap::Parser;
use ringmul_engine::config_error;
use ringmul_engine::types::RingResult;
use ringmul_models::element::{Element, ElementType};
use ringmul_models::generator::{random_integers, random_reals, seeded_rng};
use ringmul_models::matrix::Matrix;
use ringmul_models::store::save;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(about = "Write a matrix file of constant or random values")]
pub struct GenerateArgs {
    /// Number of rows.
    #[arg(long)]
    pub rows: usize,

    /// Number of columns.
    #[arg(long)]
    pub cols: usize,

    /// Element type of the values written.
    #[arg(long, value_enum, default_value = "integer")]
    pub element_type: ElementType,

    /// Fill every element with this value instead of random values.
    #[arg(long)]
    pub constant: Option<String>,

    /// Smallest random value.
    #[arg(long, default_value = "0", allow_negative_numbers = true)]
    pub min: i32,

    /// Largest random value (inclusive for integers, exclusive for reals).
    #[arg(long, default_value = "10", allow_negative_numbers = true)]
    pub max: i32,

    /// Seed for reproducible random values.
    #[arg(long)]
    pub seed: Option<u64>,

    /// The file to write.
    pub output: PathBuf,
}

fn constant_matrix<E>(rows: usize, cols: usize, value: &str) -> RingResult<Matrix<E>>
where
    E: Element,
{
    match value.parse::<E>() {
        Ok(value) => Ok(Matrix::filled(rows, cols, value)),
        Err(_) => config_error!("'{value}' is not a valid {} value", E::TYPE),
    }
}

/// Generate the matrix described by `args` and write it.
pub fn generate(args: &GenerateArgs) -> RingResult {
    let mut rng = seeded_rng(args.seed);
    match (args.element_type, &args.constant) {
        (ElementType::Integer, Some(value)) => {
            save(&args.output, &constant_matrix::<i32>(args.rows, args.cols, value)?)
        }
        (ElementType::Real, Some(value)) => {
            save(&args.output, &constant_matrix::<f64>(args.rows, args.cols, value)?)
        }
        (ElementType::Integer, None) => save(
            &args.output,
            &random_integers(&mut rng, args.rows, args.cols, args.min, args.max)?,
        ),
        (ElementType::Real, None) => save(
            &args.output,
            &random_reals(&mut rng, args.rows, args.cols, args.min, args.max)?,
        ),
    }
}
