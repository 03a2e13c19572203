//! Scalar functions f: ℝ → ℝ with symbolic metadata.
//!
//! An [`Op`] carries enough algebra (derivative, inverse, range, stochasticity) to be
//! composed and differentiated without finite differencing. Ops are shared as
//! [`OpRef`] (`Arc<dyn Op>`) so composed graphs can reuse stages.
//!
//! Composition is normalizing: [`compose`] never produces a [`ComposedOp`] whose
//! `inner` is itself composed, folds affine stages into a single [`Linear`], and drops
//! identities. A long chain built by repeated `compose` calls therefore stays shallow
//! on its inner side.

use std::fmt;
use std::sync::Arc;

pub mod basic;
pub mod combine;
pub mod composed;

pub use basic::{Constant, Exp, GaussianNoise, Identity, Linear, Log, Logistic, Logit, Reciprocal, Sqrt, Square, Tanh};
pub use combine::{ProductOp, SumOp};
pub use composed::ComposedOp;

/// Shared handle to an op.
pub type OpRef = Arc<dyn Op>;

/// A scalar function with optional derivative and inverse.
///
/// Numeric queries an op cannot answer return `NaN` and symbolic ones return `None`;
/// callers check `has_derivative` / `has_inverse` first.
pub trait Op: fmt::Debug + Send + Sync {
    fn apply(&self, x: f64) -> f64;

    fn apply_inverse(&self, y: f64) -> f64 {
        self.inverse().map_or(f64::NAN, |inv| inv.apply(y))
    }

    /// Apply in place over a buffer.
    fn apply_to(&self, data: &mut [f64]) {
        for x in data.iter_mut() {
            *x = self.apply(*x);
        }
    }

    fn is_bounded(&self) -> bool {
        false
    }

    fn min_value(&self) -> f64 {
        f64::NEG_INFINITY
    }

    fn max_value(&self) -> f64 {
        f64::INFINITY
    }

    fn average_value(&self) -> f64 {
        if self.is_bounded() {
            0.5 * (self.min_value() + self.max_value())
        } else {
            0.0
        }
    }

    fn has_derivative(&self) -> bool {
        false
    }

    fn derivative(&self, _x: f64) -> f64 {
        f64::NAN
    }

    fn has_derivative_for_output(&self) -> bool {
        self.has_derivative() && self.has_inverse()
    }

    /// Derivative expressed as a function of the output `y = apply(x)`.
    fn derivative_for_output(&self, y: f64) -> f64 {
        self.derivative(self.apply_inverse(y))
    }

    /// The derivative as an op of its own.
    fn derivative_op(&self) -> Option<OpRef> {
        None
    }

    fn has_inverse(&self) -> bool {
        false
    }

    fn inverse(&self) -> Option<OpRef> {
        None
    }

    /// Output is not a pure function of the input.
    fn is_stochastic(&self) -> bool {
        false
    }

    /// `Some((a, b))` when the op is exactly `a * x + b`.
    fn linear_coefficients(&self) -> Option<(f64, f64)> {
        None
    }

    fn as_composed(&self) -> Option<&ComposedOp> {
        None
    }
}

/// Wrap a concrete op into a shared handle.
pub fn op<O: Op + 'static>(o: O) -> OpRef {
    Arc::new(o)
}

/// `outer ∘ inner`, normalized.
pub fn compose(outer: &OpRef, inner: &OpRef) -> OpRef {
    if let Some(c) = inner.as_composed() {
        let head = compose(outer, &c.outer);
        return compose(&head, &c.inner);
    }
    let identity = Some((1.0, 0.0));
    let (lo, li) = (outer.linear_coefficients(), inner.linear_coefficients());
    if lo == identity {
        return inner.clone();
    }
    if li == identity {
        return outer.clone();
    }
    if let (Some((a1, b1)), Some((a2, b2))) = (lo, li) {
        return op(Linear::new(a1 * a2, a1 * b2 + b1));
    }
    Arc::new(ComposedOp::new(outer.clone(), inner.clone()))
}

/// Pointwise `a(x) * b(x)`.
pub fn product(a: &OpRef, b: &OpRef) -> OpRef {
    Arc::new(ProductOp::new(a.clone(), b.clone()))
}

/// Pointwise `a(x) + b(x)`.
pub fn sum(a: &OpRef, b: &OpRef) -> OpRef {
    Arc::new(SumOp::new(a.clone(), b.clone()))
}

/// Method syntax for building op graphs from shared handles.
pub trait OpExt {
    /// `self ∘ inner`
    fn compose(&self, inner: &OpRef) -> OpRef;
    fn product(&self, other: &OpRef) -> OpRef;
    fn sum(&self, other: &OpRef) -> OpRef;
}

impl OpExt for OpRef {
    fn compose(&self, inner: &OpRef) -> OpRef {
        compose(self, inner)
    }
    fn product(&self, other: &OpRef) -> OpRef {
        product(self, other)
    }
    fn sum(&self, other: &OpRef) -> OpRef {
        sum(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_neutral() {
        let sq = op(Square);
        let id = op(Identity);
        assert!(Arc::ptr_eq(&compose(&id, &sq), &sq));
        assert!(Arc::ptr_eq(&compose(&sq, &id), &sq));
    }

    #[test]
    fn affine_stages_fold() {
        let f = compose(&op(Linear::new(2.0, 1.0)), &op(Linear::new(3.0, -1.0)));
        assert_eq!(f.linear_coefficients(), Some((6.0, -1.0)));
        assert!(f.as_composed().is_none());
        assert_eq!(f.apply(2.0), 11.0);
    }

    #[test]
    fn default_inverse_is_nan() {
        assert!(Square.apply_inverse(4.0).is_nan());
        let noise = GaussianNoise::new(1.0);
        assert!(!noise.has_derivative_for_output());
        assert!(noise.derivative(0.0).is_nan());
        assert!(noise.derivative_op().is_none());
    }
}
