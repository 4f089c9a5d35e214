// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

use ringmul_models::matrix::Matrix;
use ringmul_models::test_helpers::sequential_matrix;

#[test]
fn from_vec_checks_count() {
    assert!(Matrix::from_vec(2, 3, vec![0; 6]).is_ok());
    assert_eq!(
        Matrix::from_vec(2, 3, vec![0; 5]).unwrap_err().to_string(),
        "Reshape error: 5 elements cannot form a 2x3 matrix"
    );
}

#[test]
fn ragged_rows() {
    assert!(Matrix::from_rows(&[vec![1, 2], vec![3]]).is_err());
}

#[test]
fn indexing_is_row_major() {
    let mut m = sequential_matrix(3, 4, 100);
    assert_eq!(m[(1, 2)], 6);
    assert_eq!(m.get(2, 3), Some(11));
    assert_eq!(m.get(3, 0), None);
    assert_eq!(m.row(2), &[8, 9, 10, 11]);

    m.set(0, 1, 42).unwrap();
    assert_eq!(m.as_slice()[1], 42);
    assert!(m.set(0, 4, 1).is_err());

    m.row_mut(1).fill(0);
    assert_eq!(m.row(1), &[0, 0, 0, 0]);
}

#[test]
fn reshape_identity_round_trip() {
    let original = sequential_matrix(4, 6, 1000);
    let flat = original.clone().into_vec();
    let rebuilt = Matrix::from_vec(4, 6, flat).unwrap();
    let mut target = Matrix::zeros(4, 6);
    target.copy_block_from(0, 0, &rebuilt).unwrap();
    assert_eq!(target, original);
}

#[test]
fn reshape_keeps_element_order() {
    let m = sequential_matrix(2, 6, 1000);
    let reshaped = m.reshape(4, 3).unwrap();
    assert_eq!(reshaped.row(1), &[3, 4, 5]);
    assert_eq!(reshaped.row(3), &[9, 10, 11]);
    assert_eq!(
        reshaped.reshape(5, 2).unwrap_err().to_string(),
        "Reshape error: cannot reshape a 4x3 matrix into 5x2"
    );
}

#[test]
fn block_and_copy_back() {
    let m = sequential_matrix(4, 4, 1000);
    let block = m.block(1..3, 2..4).unwrap();
    assert_eq!(block, Matrix::from_rows(&[vec![6, 7], vec![10, 11]]).unwrap());

    let mut target = Matrix::zeros(4, 4);
    target.copy_block_from(1, 2, &block).unwrap();
    assert_eq!(target[(2, 3)], 11);
    assert_eq!(target[(0, 0)], 0);

    assert!(m.block(0..5, 0..1).is_err());
    assert!(target.copy_block_from(3, 3, &block).is_err());
}

#[test]
fn display_has_no_trailing_newline() {
    let m = Matrix::from_rows(&[vec![1, 2], vec![3, 4]]).unwrap();
    assert_eq!(format!("{m}"), "1 2\n3 4");

    let r = Matrix::from_rows(&[vec![0.5, -1.25]]).unwrap();
    assert_eq!(format!("{r}"), "0.5 -1.25");
}
