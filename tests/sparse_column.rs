//! Tests for the column-sparse matrix: sparsity preservation, mutability promotion,
//! swaps, accumulation, clone paths and equality.
//!
//! Dense reference matrices are built with `faer`; floating-point comparisons use `approx`.

use approx::assert_abs_diff_eq;
use colsparse::matrix::{DenseMatrix, SparseColumnMatrix};
use colsparse::ops::{op, Linear, Square};
use colsparse::{MatShape, MatrixAccess, SparseError, SparseOptions, Vector};
use faer::Mat;
use rand::Rng;

/// 4x3 matrix with column 1 absent and column 2 held as an immutable shared vector.
fn mixed() -> SparseColumnMatrix {
    SparseColumnMatrix::wrap(
        vec![
            Some(Vector::Dense(vec![1.0, 0.0, 0.0, 2.0])),
            None,
            Some(Vector::shared(&[0.0, 3.0, 0.0, 0.0])),
        ],
        4,
        3,
    )
    .unwrap()
}

/// Every element of an absent column reads as zero, and writing zero keeps it absent.
#[test]
fn absent_column_stays_sparse() {
    let mut m = mixed();
    for r in 0..4 {
        assert_eq!(m.get(r, 1).unwrap(), 0.0);
    }
    m.set(2, 1, 0.0).unwrap();
    m.add_at(3, 1, 0.0).unwrap();
    assert!(m.column(1).unwrap().is_absent());
    m.set(2, 1, 1.5).unwrap();
    assert!(!m.column(1).unwrap().is_absent());
    assert!(matches!(*m.column(1).unwrap(), Vector::Sparse(_)));
}

/// The absent-column handle is a zero vector of the right length.
#[test]
fn zero_column_has_row_length() {
    let m = SparseColumnMatrix::zeros(5, 2);
    let c = m.column(0).unwrap();
    assert_eq!(c.len(), 5);
    assert!(c.is_zero());
    assert!(!c.is_fully_mutable());
}

/// Writing into an immutable shared column clones it first; the caller's payload is untouched.
#[test]
fn promotion_leaves_shared_payload_untouched() {
    let payload = Vector::shared(&[1.0, 2.0, 3.0]);
    let mut m = SparseColumnMatrix::zeros(3, 2);
    m.replace_column(0, payload.clone()).unwrap();
    m.set(1, 0, 10.0).unwrap();
    assert_eq!(m.get(1, 0).unwrap(), 10.0);
    assert_eq!(m.get(2, 0).unwrap(), 3.0);
    assert_eq!(payload.to_vec(), vec![1.0, 2.0, 3.0]);

    m.replace_column(1, payload.clone()).unwrap();
    m.add_at(0, 1, 0.5).unwrap();
    assert_eq!(m.get(0, 1).unwrap(), 1.5);
    assert_eq!(payload.unchecked_get(0), 1.0);
}

/// `column_view_mut` materializes an absent column and installs it.
#[test]
fn column_view_materializes() {
    let mut m = SparseColumnMatrix::zeros(3, 3);
    {
        let mut v = m.column_view_mut(2).unwrap();
        v.set(1, 4.0).unwrap();
    }
    assert_eq!(m.get(1, 2).unwrap(), 4.0);
    assert!(!m.column(2).unwrap().is_absent());
}

/// Swapping is a pure permutation of the column slots.
#[test]
fn swap_is_permutation() {
    let mut m = mixed();
    let before: Vec<Vector> = (0..3).map(|j| m.column_vector(j)).collect();
    m.swap_columns(0, 2).unwrap();
    assert_eq!(m.column_vector(0), before[2]);
    assert_eq!(m.column_vector(2), before[0]);
    assert_eq!(m.column_vector(1), before[1]);
    assert_eq!((m.nrows(), m.ncols()), (4, 3));
    m.swap_columns(1, 1).unwrap();
    assert!(m.column(1).unwrap().is_absent());
}

/// Adding a matrix keeps absent columns absent where the operand column is zero.
#[test]
fn add_preserves_sparsity() {
    let mut m = mixed();
    let mut other = Mat::<f64>::zeros(4, 3);
    other[(0, 2)] = 1.0;
    other[(3, 0)] = -2.0;
    m.add(&other).unwrap();
    assert!(m.column(1).unwrap().is_absent());
    assert_eq!(m.get(3, 0).unwrap(), 0.0);
    assert_eq!(m.get(0, 2).unwrap(), 1.0);
    assert_eq!(m.get(1, 2).unwrap(), 3.0);

    other[(2, 1)] = 7.0;
    m.add(&other).unwrap();
    assert_eq!(m.get(2, 1).unwrap(), 7.0);

    let wrong = Mat::<f64>::zeros(3, 3);
    assert_eq!(m.add(&wrong), Err(SparseError::ShapeMismatch { expected: 4, found: 3 }));
}

/// Transform agrees with the dense product for random data.
#[test]
fn transform_matches_dense() {
    let (rows, cols) = (6, 5);
    let mut rng = rand::thread_rng();
    let mut m = SparseColumnMatrix::zeros(rows, cols);
    for _ in 0..10 {
        let (i, j) = (rng.gen_range(0..rows), rng.gen_range(0..cols));
        m.set(i, j, rng.r#gen()).unwrap();
    }
    let dense = m.to_dense();
    let x: Vec<f64> = (0..cols).map(|_| rng.r#gen()).collect();
    let y = m.transform(&x).unwrap();
    for i in 0..rows {
        let expected: f64 = (0..cols).map(|j| dense[(i, j)] * x[j]).sum();
        assert_abs_diff_eq!(y[i], expected, epsilon = 1e-12);
    }
    assert!(m.transform(&[1.0]).is_err());
    assert_eq!(m.inner_product(&Vector::Dense(x.clone())).unwrap().to_vec(), y);
}

/// Scaling keeps the sparsity pattern.
#[test]
fn multiply_copy_keeps_pattern() {
    let m = mixed();
    let s = m.multiply_copy(2.0);
    assert!(s.column(1).unwrap().is_absent());
    assert_eq!(s.get(3, 0).unwrap(), 4.0);
    assert_eq!(s.get(1, 2).unwrap(), 6.0);
    assert_eq!(m.get(3, 0).unwrap(), 2.0);
}

/// Ops that fix zero leave absent columns absent; others materialize them.
#[test]
fn apply_op_columnwise() {
    let mut m = mixed();
    m.apply_op(&Square).unwrap();
    assert!(m.column(1).unwrap().is_absent());
    assert_eq!(m.get(3, 0).unwrap(), 4.0);
    assert_eq!(m.get(1, 2).unwrap(), 9.0);

    let shift = op(Linear::new(1.0, 1.0));
    m.apply_op(shift.as_ref()).unwrap();
    assert_eq!(m.get(0, 1).unwrap(), 1.0);
    assert_eq!(m.get(1, 2).unwrap(), 10.0);
}

/// Both clone paths give equal matrices with independent storage.
#[test]
fn clone_paths_agree() {
    let m = mixed();
    let shallow = m.clone_with(&SparseOptions::new(u64::MAX));
    let exact = m.clone_with(&SparseOptions::new(0));
    assert_eq!(shallow, m);
    assert_eq!(exact, m);
    assert_eq!(m.clone(), exact);
    assert!(shallow.column(1).unwrap().is_absent());
    assert!(exact.column(1).unwrap().is_absent());

    let mut shallow = shallow;
    shallow.set(1, 2, -1.0).unwrap();
    assert_eq!(m.get(1, 2).unwrap(), 3.0);
    let mut exact = exact;
    exact.set(0, 0, 100.0).unwrap();
    assert_eq!(m.get(0, 0).unwrap(), 1.0);
}

/// An explicit zero column equals an absent slot, in both directions.
#[test]
fn equality_ignores_absent_versus_zero() {
    let explicit = SparseColumnMatrix::wrap(
        vec![Some(Vector::Dense(vec![1.0, 2.0])), Some(Vector::Dense(vec![0.0, 0.0]))],
        2,
        2,
    )
    .unwrap();
    let absent = SparseColumnMatrix::wrap(vec![Some(Vector::Dense(vec![1.0, 2.0])), None], 2, 2).unwrap();
    assert_eq!(explicit, absent);
    assert_eq!(absent, explicit);
    assert!(absent.equals(&Mat::<f64>::from_row_major(2, 2, &[1.0, 0.0, 2.0, 0.0])));
    assert!(!absent.equals(&Mat::<f64>::zeros(2, 3)));
}

/// `wrap` defers length checks to `validate`; the checked constructors reject eagerly.
#[test]
fn validate_reports_corrupt_columns() {
    let m = SparseColumnMatrix::wrap(vec![None, Some(Vector::Dense(vec![1.0]))], 3, 2).unwrap();
    assert!(matches!(m.validate(), Err(SparseError::Validation(_))));
    assert!(mixed().validate().is_ok());

    assert_eq!(
        SparseColumnMatrix::wrap(vec![None], 3, 2).unwrap_err(),
        SparseError::ShapeMismatch { expected: 2, found: 1 }
    );
    assert!(SparseColumnMatrix::from_columns(vec![Vector::Zero(2), Vector::Zero(3)]).is_err());
    assert!(SparseColumnMatrix::create(&[Vector::Zero(2)], 3, 1).is_err());
    let ok = SparseColumnMatrix::create(&[Vector::Zero(3)], 3, 1).unwrap();
    assert!(ok.column(0).unwrap().is_zero());
}

/// `set_matrix` copies a dense matrix and drops zero columns.
#[test]
fn set_matrix_from_dense() {
    let mut m = SparseColumnMatrix::zeros(2, 2);
    let d = Mat::<f64>::from_row_major(2, 2, &[0.0, 5.0, 0.0, 6.0]);
    m.set_matrix(&d).unwrap();
    assert!(m.column(0).unwrap().is_absent());
    assert_eq!(m.get(1, 1).unwrap(), 6.0);
    assert_eq!(m.to_dense(), d);
}

/// The dense transpose export lays each column out as a row.
#[test]
fn to_matrix_transpose_and_array() {
    let m = mixed();
    let t = m.to_matrix_transpose();
    assert_eq!((t.nrows(), t.ncols()), (3, 4));
    assert_eq!(t[(2, 1)], 3.0);
    let mut buf = vec![1.0; 12];
    m.add_to_array(&mut buf, 0);
    assert_eq!(buf[3 * 3], 3.0);
    let (row, col) = (1, 2);
    assert_eq!(buf[row * 3 + col], 4.0);
}
