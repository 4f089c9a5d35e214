// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! The matrix text format.
//!
//! A matrix file holds `height × width` values in row-major order separated
//! by whitespace. Files written by [`save`] put one row per line with single
//! spaces between values and no newline after the final row.

use std::fs;
use std::io::Write;
use std::ops::Range;
use std::path::Path;

use ringmul_engine::config_error;
use ringmul_engine::types::{RingError, RingResult};
use tempfile::NamedTempFile;

use crate::element::Element;
use crate::matrix::Matrix;

/// Load a complete `height × width` matrix.
pub fn load_full<E>(path: &Path, height: usize, width: usize) -> RingResult<Matrix<E>>
where
    E: Element,
{
    load_block(path, height, width, 0..height, 0..width)
}

/// Load the sub-block covering `rows` and `cols` of a `height × width`
/// matrix.
///
/// Values outside the block are skipped by position without being parsed.
/// Reading stops after the last selected row.
pub fn load_block<E>(
    path: &Path,
    height: usize,
    width: usize,
    rows: Range<usize>,
    cols: Range<usize>,
) -> RingResult<Matrix<E>>
where
    E: Element,
{
    if rows.start > rows.end || cols.start > cols.end || rows.end > height || cols.end > width {
        return config_error!(
            "{}: block rows {rows:?} cols {cols:?} is outside a {height}x{width} matrix",
            path.display()
        );
    }

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => return config_error!("unable to read {}: {e}", path.display()),
    };

    let mut data = Vec::with_capacity(rows.len() * cols.len());
    let mut tokens = text.split_whitespace();
    for position in 0..rows.end * width {
        let Some(token) = tokens.next() else {
            return config_error!(
                "{}: expected {} values but found only {position}",
                path.display(),
                height * width
            );
        };
        let (row, col) = (position / width, position % width);
        if rows.contains(&row) && cols.contains(&col) {
            match token.parse::<E>() {
                Ok(value) => data.push(value),
                Err(_) => {
                    return config_error!(
                        "{}: '{token}' at row {row} column {col} is not a valid {} value",
                        path.display(),
                        E::TYPE
                    );
                }
            }
        }
    }

    Matrix::from_vec(rows.len(), cols.len(), data)
}

/// Write a matrix to `path`.
///
/// The matrix is written to a temporary file in the same directory which is
/// then renamed over `path`, so a failure never leaves a partial file.
pub fn save<E>(path: &Path, matrix: &Matrix<E>) -> RingResult
where
    E: Element,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_error = |e: std::io::Error| RingError::Io(format!("{}: {e}", path.display()));

    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    write!(file, "{matrix}").map_err(io_error)?;
    file.flush().map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    Ok(())
}
