//! Pointwise product and sum of two ops.

use crate::ops::{product, sum, Op, OpRef};

/// `a(x) * b(x)`
#[derive(Debug, Clone)]
pub struct ProductOp {
    pub a: OpRef,
    pub b: OpRef,
}

impl ProductOp {
    pub fn new(a: OpRef, b: OpRef) -> Self {
        Self { a, b }
    }
}

impl Op for ProductOp {
    fn apply(&self, x: f64) -> f64 {
        self.a.apply(x) * self.b.apply(x)
    }

    fn has_derivative(&self) -> bool {
        self.a.has_derivative() && self.b.has_derivative()
    }

    fn derivative(&self, x: f64) -> f64 {
        self.a.derivative(x) * self.b.apply(x) + self.a.apply(x) * self.b.derivative(x)
    }

    /// `a' · b + a · b'`
    fn derivative_op(&self) -> Option<OpRef> {
        let da = self.a.derivative_op()?;
        let db = self.b.derivative_op()?;
        Some(sum(&product(&da, &self.b), &product(&self.a, &db)))
    }

    fn is_stochastic(&self) -> bool {
        self.a.is_stochastic() || self.b.is_stochastic()
    }
}

/// `a(x) + b(x)`
#[derive(Debug, Clone)]
pub struct SumOp {
    pub a: OpRef,
    pub b: OpRef,
}

impl SumOp {
    pub fn new(a: OpRef, b: OpRef) -> Self {
        Self { a, b }
    }
}

impl Op for SumOp {
    fn apply(&self, x: f64) -> f64 {
        self.a.apply(x) + self.b.apply(x)
    }

    fn is_bounded(&self) -> bool {
        self.a.is_bounded() && self.b.is_bounded()
    }

    fn min_value(&self) -> f64 {
        self.a.min_value() + self.b.min_value()
    }

    fn max_value(&self) -> f64 {
        self.a.max_value() + self.b.max_value()
    }

    fn has_derivative(&self) -> bool {
        self.a.has_derivative() && self.b.has_derivative()
    }

    fn derivative(&self, x: f64) -> f64 {
        self.a.derivative(x) + self.b.derivative(x)
    }

    fn derivative_op(&self) -> Option<OpRef> {
        let da = self.a.derivative_op()?;
        let db = self.b.derivative_op()?;
        Some(sum(&da, &db))
    }

    fn is_stochastic(&self) -> bool {
        self.a.is_stochastic() || self.b.is_stochastic()
    }
}
