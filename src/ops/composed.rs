//! `outer ∘ inner` with chain-rule derivatives and reversed inverses.

use crate::ops::{compose, product, Op, OpRef};

/// Composition of two ops. Build it through [`compose`](crate::ops::compose), which
/// keeps `inner` free of nested compositions.
#[derive(Debug, Clone)]
pub struct ComposedOp {
    pub outer: OpRef,
    pub inner: OpRef,
}

impl ComposedOp {
    pub(crate) fn new(outer: OpRef, inner: OpRef) -> Self {
        Self { outer, inner }
    }
}

impl Op for ComposedOp {
    fn apply(&self, x: f64) -> f64 {
        self.outer.apply(self.inner.apply(x))
    }

    /// Two full passes: `inner` over the whole buffer, then `outer`.
    fn apply_to(&self, data: &mut [f64]) {
        self.inner.apply_to(data);
        self.outer.apply_to(data);
    }

    // the outermost stage determines the output range
    fn is_bounded(&self) -> bool {
        self.outer.is_bounded()
    }

    fn min_value(&self) -> f64 {
        self.outer.min_value()
    }

    fn max_value(&self) -> f64 {
        self.outer.max_value()
    }

    fn average_value(&self) -> f64 {
        self.outer.average_value()
    }

    fn has_derivative(&self) -> bool {
        self.outer.has_derivative() && self.inner.has_derivative()
    }

    /// Chain rule on the input: `outer'(inner(x)) * inner'(x)`. The inner factor is taken
    /// at `x` rather than recovered from the output, so a non-invertible inner stage
    /// such as [`Square`](crate::ops::Square) still differentiates correctly for negative `x`.
    fn derivative(&self, x: f64) -> f64 {
        let y = self.inner.apply(x);
        self.outer.derivative(y) * self.inner.derivative(x)
    }

    fn has_derivative_for_output(&self) -> bool {
        self.outer.has_inverse() && self.outer.has_derivative_for_output() && self.inner.has_derivative_for_output()
    }

    /// Requires `outer` to be invertible to recover the intermediate value.
    fn derivative_for_output(&self, y: f64) -> f64 {
        self.outer.derivative_for_output(y) * self.inner.derivative_for_output(self.outer.apply_inverse(y))
    }

    /// `(outer' ∘ inner) · inner'`
    fn derivative_op(&self) -> Option<OpRef> {
        let outer_d = self.outer.derivative_op()?;
        let inner_d = self.inner.derivative_op()?;
        Some(product(&compose(&outer_d, &self.inner), &inner_d))
    }

    fn has_inverse(&self) -> bool {
        self.outer.has_inverse() && self.inner.has_inverse()
    }

    /// `inner⁻¹ ∘ outer⁻¹`
    fn inverse(&self) -> Option<OpRef> {
        let inner_inv = self.inner.inverse()?;
        let outer_inv = self.outer.inverse()?;
        Some(compose(&inner_inv, &outer_inv))
    }

    fn is_stochastic(&self) -> bool {
        self.outer.is_stochastic() || self.inner.is_stochastic()
    }

    fn as_composed(&self) -> Option<&ComposedOp> {
        Some(self)
    }
}
