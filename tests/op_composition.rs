//! Tests for op composition: associativity, flattening, chain rule, inverse composition,
//! symbolic derivatives and elementwise application over matrices.
//!
//! Sample points are drawn with `rand`; comparisons use `approx`.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use colsparse::ops::{compose, op, Exp, GaussianNoise, Identity, Linear, Log, Logistic, Op, OpExt, OpRef, Sqrt, Square, Tanh};
use colsparse::{SparseColumnMatrix, Vector};
use rand::Rng;

fn samples(n: usize, lo: f64, hi: f64) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(lo..hi)).collect()
}

fn add_one() -> OpRef {
    op(Linear::new(1.0, 1.0))
}

/// compose(a, compose(b, c)) and compose(compose(a, b), c) agree pointwise.
#[test]
fn composition_is_associative() {
    let triples: Vec<(OpRef, OpRef, OpRef)> = vec![
        (op(Exp), op(Square), add_one()),
        (op(Logistic), op(Tanh), op(Linear::new(2.0, -0.5))),
        (op(Sqrt), op(Exp), op(Square)),
    ];
    for (a, b, c) in triples {
        let right = compose(&a, &compose(&b, &c));
        let left = compose(&compose(&a, &b), &c);
        for x in samples(20, -1.5, 1.5) {
            assert_relative_eq!(right.apply(x), left.apply(x), epsilon = 1e-12, max_relative = 1e-12);
        }
    }
}

/// Repeated composition never nests on the inner side.
#[test]
fn chains_stay_flat() {
    let mut chain: OpRef = op(Square);
    for k in 0..12 {
        let stage: OpRef = if k % 2 == 0 { op(Tanh) } else { op(Exp) };
        chain = stage.compose(&chain);
        let c = chain.as_composed().expect("composed");
        assert!(c.inner.as_composed().is_none());
    }
    let mut chain2: OpRef = op(Square);
    for _ in 0..12 {
        chain2 = chain2.compose(&op(Tanh));
        let c = chain2.as_composed().expect("composed");
        assert!(c.inner.as_composed().is_none());
    }
    // value is unaffected by the normalization
    let x: f64 = 0.3;
    let mut expected = x * x;
    for k in 0..12 {
        expected = if k % 2 == 0 { expected.tanh() } else { expected.exp() };
    }
    assert_relative_eq!(chain.apply(x), expected, epsilon = 1e-12);
}

/// Affine chains collapse to a single linear op.
#[test]
fn affine_chain_folds() {
    let mut f: OpRef = op(Identity);
    for _ in 0..5 {
        f = op(Linear::new(2.0, 1.0)).compose(&f);
    }
    assert!(f.as_composed().is_none());
    assert_eq!(f.linear_coefficients(), Some((32.0, 31.0)));
    assert_eq!(f.apply(1.0), 63.0);
}

/// The chain rule gives exact derivatives for closed forms.
#[test]
fn chain_rule_is_exact() {
    let outer = op(Square);
    let inner = add_one();
    let c = compose(&outer, &inner);
    assert!(c.has_derivative());
    for x in samples(25, -5.0, 5.0) {
        let expected = outer.derivative(inner.apply(x)) * inner.derivative(x);
        assert_eq!(c.derivative(x), expected);
        assert_eq!(c.derivative(x), 2.0 * (x + 1.0));
    }
}

/// The inverse of a composition undoes it.
#[test]
fn inverse_composition_round_trips() {
    let cases: Vec<OpRef> = vec![
        compose(&op(Exp), &op(Linear::new(2.0, 1.0))),
        compose(&op(Logistic), &op(Linear::new(-0.5, 0.2))),
        compose(&op(Linear::new(3.0, 0.0)), &compose(&op(Log), &op(Exp))),
        compose(&op(Tanh), &op(Linear::new(2.0, 0.0))),
    ];
    for c in cases.iter().take(3) {
        assert!(c.has_inverse());
        let inv = c.inverse().expect("invertible");
        for x in samples(20, -2.0, 2.0) {
            assert_relative_eq!(inv.apply(c.apply(x)), x, epsilon = 1e-9, max_relative = 1e-9);
        }
    }
    assert!(!cases[3].has_inverse());
}

/// Symbolic derivatives agree with the numeric derivative, and can be taken twice.
#[test]
fn derivative_op_matches_derivative() {
    let c = compose(&op(Logistic), &compose(&op(Square), &add_one()));
    let d = c.derivative_op().expect("differentiable");
    for x in samples(20, -2.0, 2.0) {
        assert_relative_eq!(d.apply(x), c.derivative(x), epsilon = 1e-12, max_relative = 1e-10);
    }

    // f(x) = exp(x²): f'' = (2 + 4x²) exp(x²)
    let f = compose(&op(Exp), &op(Square));
    let f2 = f.derivative_op().unwrap().derivative_op().unwrap();
    for x in samples(10, -1.0, 1.0) {
        let expected = (2.0 + 4.0 * x * x) * (x * x).exp();
        assert_relative_eq!(f2.apply(x), expected, epsilon = 1e-12, max_relative = 1e-10);
    }
}

/// `derivative_for_output` recovers the intermediate value through the outer inverse.
#[test]
fn derivative_for_output_uses_outer_inverse() {
    let c = compose(&op(Logistic), &op(Linear::new(3.0, 0.0)));
    for x in samples(10, -1.0, 1.0) {
        let y = c.apply(x);
        assert_relative_eq!(c.derivative_for_output(y), c.derivative(x), epsilon = 1e-12, max_relative = 1e-9);
    }
}

/// Elementwise application over a sparse matrix matches scalar application.
#[test]
fn composed_op_applied_to_matrix() {
    let f = compose(&op(Tanh), &op(Linear::new(2.0, 0.0)));
    let mut m = SparseColumnMatrix::zeros(3, 2);
    m.set(0, 0, 0.5).unwrap();
    m.set(2, 1, -1.0).unwrap();
    m.replace_column(1, Vector::shared(&[0.0, 0.0, -1.0])).unwrap();
    m.apply_op(f.as_ref()).unwrap();
    assert_abs_diff_eq!(m.get(0, 0).unwrap(), 1.0f64.tanh(), epsilon = 1e-15);
    assert_abs_diff_eq!(m.get(2, 1).unwrap(), (-2.0f64).tanh(), epsilon = 1e-15);
    assert_eq!(m.get(1, 1).unwrap(), 0.0);
}

/// A stochastic stage anywhere makes the whole chain stochastic.
#[test]
fn stochastic_stage_propagates() {
    let noise = op(GaussianNoise::new(0.1));
    let clean = compose(&op(Exp), &op(Square));
    assert!(!clean.is_stochastic());
    assert!(compose(&clean, &noise).is_stochastic());
    assert!(compose(&noise, &clean).is_stochastic());
    assert!(compose(&op(Logistic), &compose(&noise, &op(Tanh))).is_stochastic());
}

/// A stochastic op draws a fresh value for every element, absent lines included.
#[test]
fn stochastic_op_samples_each_element() {
    let mut m = SparseColumnMatrix::zeros(4, 3);
    m.apply_op(&GaussianNoise::new(1.0)).unwrap();
    let values = m.to_double_array();
    assert!(values.iter().all(|x| x.is_finite()));
    assert!(values.iter().any(|&x| x != values[0]));
    for j in 0..3 {
        assert!(!m.column(j).unwrap().is_absent());
    }

    // a zero-preserving chain with a noisy stage still materializes
    let noisy_square = compose(&op(Square), &op(GaussianNoise::new(0.5)));
    let mut r = colsparse::SparseRowMatrix::zeros(2, 5);
    r.apply_op(noisy_square.as_ref()).unwrap();
    assert!(!r.row(1).unwrap().is_absent());
    assert!(r.to_double_array().iter().any(|&x| x != 0.0));
}
