// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use std::fs;

use approx::assert_relative_eq;
use ringmul_models::matrix::Matrix;
use ringmul_models::store::{load_block, load_full, save};
use ringmul_models::test_helpers::sequential_matrix;
use tempfile::tempdir;

#[test]
fn save_format() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("c.txt");
    let m = Matrix::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    save(&path, &m).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "1 2 3\n4 5 6");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    let m = sequential_matrix(5, 7, 13);
    save(&path, &m).unwrap();
    assert_eq!(load_full::<i32>(&path, 5, 7).unwrap(), m);
}

#[test]
fn block_skips_positionally() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.txt");
    // Line breaks need not match rows
    fs::write(&path, "0 1 2 3\n4 5\n6 7 8 9 10 11").unwrap();

    let block = load_block::<i32>(&path, 3, 4, 1..3, 1..3).unwrap();
    assert_eq!(block, Matrix::from_rows(&[vec![5, 6], vec![9, 10]]).unwrap());
}

#[test]
fn reals() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("r.txt");
    fs::write(&path, "0.5 1.25\n-3.125 4").unwrap();
    let m = load_full::<f64>(&path, 2, 2).unwrap();
    assert_relative_eq!(m[(1, 0)], -3.125);
    assert_relative_eq!(m[(1, 1)], 4.0);
}

#[test]
fn too_few_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("short.txt");
    fs::write(&path, "1 2 3").unwrap();
    let err = load_full::<i32>(&path, 2, 2).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "Config error: {}: expected 4 values but found only 3",
            path.display()
        )
    );
}

#[test]
fn unparsable_value() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.txt");
    fs::write(&path, "1 2\n3 x").unwrap();
    let err = load_full::<i32>(&path, 2, 2).unwrap_err();
    assert_eq!(
        err.to_string(),
        format!(
            "Config error: {}: 'x' at row 1 column 1 is not a valid integer value",
            path.display()
        )
    );

    // A value outside the requested block is never parsed
    assert!(load_block::<i32>(&path, 2, 2, 0..1, 0..2).is_ok());
}

#[test]
fn missing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    assert!(load_full::<i32>(&path, 1, 1).is_err());
}

#[test]
fn save_into_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no_such_dir").join("c.txt");
    let err = save(&path, &Matrix::<i32>::zeros(1, 1)).unwrap_err();
    assert!(err.to_string().starts_with("Io error: "));
    assert!(!path.exists());
}
