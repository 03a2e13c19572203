//! Tests for the row-sparse matrix as a standalone type: accumulation, scaling,
//! elementwise ops, clone paths, products and equality.

use colsparse::matrix::{DenseMatrix, SparseRowMatrix};
use colsparse::ops::{op, Linear, Square};
use colsparse::{MatShape, SparseError, SparseOptions, Vector};
use faer::Mat;

/// 3x4 matrix with row 1 absent and row 2 held as an immutable shared vector.
fn mixed() -> SparseRowMatrix {
    SparseRowMatrix::wrap(
        vec![
            Some(Vector::Dense(vec![1.0, 0.0, 0.0, 2.0])),
            None,
            Some(Vector::shared(&[0.0, 3.0, 0.0, 0.0])),
        ],
        3,
        4,
    )
    .unwrap()
}

#[test]
fn add_preserves_absent_rows() {
    let mut r = mixed();
    let mut other = Mat::<f64>::zeros(3, 4);
    other[(0, 3)] = -2.0;
    other[(2, 0)] = 1.0;
    r.add(&other).unwrap();
    assert!(r.row(1).unwrap().is_absent());
    assert_eq!(r.get(0, 3).unwrap(), 0.0);
    assert_eq!(r.get(2, 0).unwrap(), 1.0);
    assert_eq!(r.get(2, 1).unwrap(), 3.0);

    other[(1, 2)] = 5.0;
    r.add(&other).unwrap();
    assert!(!r.row(1).unwrap().is_absent());
    assert_eq!(r.get(1, 2).unwrap(), 5.0);

    assert_eq!(
        r.add(&Mat::<f64>::zeros(2, 4)),
        Err(SparseError::ShapeMismatch { expected: 3, found: 2 })
    );
}

#[test]
fn add_at_promotes_and_skips_zero() {
    let payload = Vector::shared(&[1.0, 1.0]);
    let mut r = SparseRowMatrix::zeros(2, 2);
    r.add_at(1, 0, 0.0).unwrap();
    assert!(r.row(1).unwrap().is_absent());
    r.replace_row(0, payload.clone()).unwrap();
    r.add_at(0, 1, 2.5).unwrap();
    assert_eq!(r.get(0, 1).unwrap(), 3.5);
    assert_eq!(payload.to_vec(), vec![1.0, 1.0]);
    assert!(r.add_at(2, 0, 1.0).is_err());
}

#[test]
fn multiply_copy_keeps_pattern() {
    let r = mixed();
    let s = r.multiply_copy(-1.0);
    assert!(s.row(1).unwrap().is_absent());
    assert_eq!(s.get(0, 3).unwrap(), -2.0);
    assert_eq!(s.get(2, 1).unwrap(), -3.0);
    assert_eq!(r.get(0, 3).unwrap(), 2.0);
}

#[test]
fn apply_op_rowwise() {
    let mut r = mixed();
    r.apply_op(&Square).unwrap();
    assert!(r.row(1).unwrap().is_absent());
    assert_eq!(r.get(2, 1).unwrap(), 9.0);

    let shift = op(Linear::new(1.0, 1.0));
    r.apply_op(shift.as_ref()).unwrap();
    assert_eq!(r.row(1).unwrap().to_vec(), vec![1.0; 4]);
    assert_eq!(r.get(0, 3).unwrap(), 5.0);
}

#[test]
fn set_matrix_drops_zero_rows() {
    let mut r = mixed();
    let d = Mat::<f64>::from_row_major(3, 4, &[0.0, 0.0, 0.0, 0.0, 0.0, 7.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    r.set_matrix(&d).unwrap();
    assert!(r.row(0).unwrap().is_absent());
    assert_eq!(r.get(1, 1).unwrap(), 7.0);
    assert_eq!(r.to_dense(), d);
    assert!(r.set_matrix(&Mat::<f64>::zeros(4, 3)).is_err());
}

#[test]
fn clone_paths_agree() {
    let r = mixed();
    let mut shallow = r.clone_with(&SparseOptions::new(u64::MAX));
    let mut exact = r.exact_clone();
    assert_eq!(shallow, r);
    assert_eq!(exact, r);
    assert_eq!(r.clone_with(&SparseOptions::new(0)), r);
    assert!(exact.row(1).unwrap().is_absent());

    shallow.set(2, 1, -1.0).unwrap();
    exact.set(0, 0, 100.0).unwrap();
    assert_eq!(r.get(2, 1).unwrap(), 3.0);
    assert_eq!(r.get(0, 0).unwrap(), 1.0);
}

#[test]
fn inner_product_matrix_keeps_absent_rows() {
    let r = mixed();
    let b = Mat::<f64>::from_row_major(4, 2, &[1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 2.0]);
    let p = r.inner_product_matrix(&b).unwrap();
    assert_eq!((p.nrows(), p.ncols()), (3, 2));
    assert!(p.row(1).unwrap().is_absent());
    assert_eq!(p.to_double_array(), vec![3.0, 4.0, 0.0, 0.0, 3.0, 3.0]);
    assert!(r.inner_product_matrix(&Mat::<f64>::zeros(3, 2)).is_err());
}

#[test]
fn equality_ignores_absent_versus_zero() {
    let explicit = SparseRowMatrix::wrap(
        vec![Some(Vector::Dense(vec![1.0, 2.0])), Some(Vector::Dense(vec![0.0, 0.0]))],
        2,
        2,
    )
    .unwrap();
    let absent = SparseRowMatrix::wrap(vec![Some(Vector::Dense(vec![1.0, 2.0])), None], 2, 2).unwrap();
    assert_eq!(explicit, absent);
    assert_eq!(absent, explicit);
    assert!(absent.equals(&Mat::<f64>::from_row_major(2, 2, &[1.0, 2.0, 0.0, 0.0])));
    assert!(!absent.equals(&Mat::<f64>::zeros(3, 2)));
}
