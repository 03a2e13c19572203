//! Elementary ops used to build transforms.

use rand::Rng;
use rand_distr::StandardNormal;

use crate::ops::{compose, op, product, Op, OpRef};

/// f(x) = x
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Op for Identity {
    fn apply(&self, x: f64) -> f64 {
        x
    }
    fn apply_to(&self, _data: &mut [f64]) {}
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, _x: f64) -> f64 {
        1.0
    }
    fn derivative_op(&self) -> Option<OpRef> {
        Some(op(Constant::new(1.0)))
    }
    fn has_inverse(&self) -> bool {
        true
    }
    fn inverse(&self) -> Option<OpRef> {
        Some(op(Identity))
    }
    fn linear_coefficients(&self) -> Option<(f64, f64)> {
        Some((1.0, 0.0))
    }
}

/// f(x) = c
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    pub value: f64,
}

impl Constant {
    pub fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Op for Constant {
    fn apply(&self, _x: f64) -> f64 {
        self.value
    }
    fn apply_to(&self, data: &mut [f64]) {
        data.fill(self.value);
    }
    fn is_bounded(&self) -> bool {
        true
    }
    fn min_value(&self) -> f64 {
        self.value
    }
    fn max_value(&self) -> f64 {
        self.value
    }
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, _x: f64) -> f64 {
        0.0
    }
    fn derivative_op(&self) -> Option<OpRef> {
        Some(op(Constant::new(0.0)))
    }
    fn linear_coefficients(&self) -> Option<(f64, f64)> {
        Some((0.0, self.value))
    }
}

/// f(x) = factor * x + constant. Negation is `Linear::new(-1.0, 0.0)`.
#[derive(Debug, Clone, Copy)]
pub struct Linear {
    pub factor: f64,
    pub constant: f64,
}

impl Linear {
    pub fn new(factor: f64, constant: f64) -> Self {
        Self { factor, constant }
    }

    pub fn negate() -> Self {
        Self::new(-1.0, 0.0)
    }
}

impl Op for Linear {
    fn apply(&self, x: f64) -> f64 {
        self.factor * x + self.constant
    }
    fn apply_inverse(&self, y: f64) -> f64 {
        (y - self.constant) / self.factor
    }
    fn is_bounded(&self) -> bool {
        self.factor == 0.0
    }
    fn min_value(&self) -> f64 {
        if self.factor == 0.0 { self.constant } else { f64::NEG_INFINITY }
    }
    fn max_value(&self) -> f64 {
        if self.factor == 0.0 { self.constant } else { f64::INFINITY }
    }
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, _x: f64) -> f64 {
        self.factor
    }
    fn derivative_for_output(&self, _y: f64) -> f64 {
        self.factor
    }
    fn derivative_op(&self) -> Option<OpRef> {
        Some(op(Constant::new(self.factor)))
    }
    fn has_inverse(&self) -> bool {
        self.factor != 0.0
    }
    fn inverse(&self) -> Option<OpRef> {
        if self.factor == 0.0 {
            return None;
        }
        Some(op(Linear::new(1.0 / self.factor, -self.constant / self.factor)))
    }
    fn linear_coefficients(&self) -> Option<(f64, f64)> {
        Some((self.factor, self.constant))
    }
}

/// f(x) = x²
#[derive(Debug, Clone, Copy, Default)]
pub struct Square;

impl Op for Square {
    fn apply(&self, x: f64) -> f64 {
        x * x
    }
    fn min_value(&self) -> f64 {
        0.0
    }
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, x: f64) -> f64 {
        2.0 * x
    }
    // non-negative branch
    fn has_derivative_for_output(&self) -> bool {
        true
    }
    fn derivative_for_output(&self, y: f64) -> f64 {
        2.0 * y.sqrt()
    }
    fn derivative_op(&self) -> Option<OpRef> {
        Some(op(Linear::new(2.0, 0.0)))
    }
}

/// f(x) = √x
#[derive(Debug, Clone, Copy, Default)]
pub struct Sqrt;

impl Op for Sqrt {
    fn apply(&self, x: f64) -> f64 {
        x.sqrt()
    }
    fn min_value(&self) -> f64 {
        0.0
    }
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, x: f64) -> f64 {
        0.5 / x.sqrt()
    }
    fn derivative_for_output(&self, y: f64) -> f64 {
        0.5 / y
    }
    /// ½ · 1/√x
    fn derivative_op(&self) -> Option<OpRef> {
        let recip_sqrt = compose(&op(Reciprocal), &op(Sqrt));
        Some(compose(&op(Linear::new(0.5, 0.0)), &recip_sqrt))
    }
    fn has_inverse(&self) -> bool {
        true
    }
    fn inverse(&self) -> Option<OpRef> {
        Some(op(Square))
    }
}

/// f(x) = 1 / x
#[derive(Debug, Clone, Copy, Default)]
pub struct Reciprocal;

impl Op for Reciprocal {
    fn apply(&self, x: f64) -> f64 {
        1.0 / x
    }
    fn apply_inverse(&self, y: f64) -> f64 {
        1.0 / y
    }
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, x: f64) -> f64 {
        -1.0 / (x * x)
    }
    fn derivative_for_output(&self, y: f64) -> f64 {
        -y * y
    }
    /// -1/x²
    fn derivative_op(&self) -> Option<OpRef> {
        let recip_square = compose(&op(Reciprocal), &op(Square));
        Some(compose(&op(Linear::negate()), &recip_square))
    }
    fn has_inverse(&self) -> bool {
        true
    }
    fn inverse(&self) -> Option<OpRef> {
        Some(op(Reciprocal))
    }
}

/// f(x) = eˣ
#[derive(Debug, Clone, Copy, Default)]
pub struct Exp;

impl Op for Exp {
    fn apply(&self, x: f64) -> f64 {
        x.exp()
    }
    fn apply_inverse(&self, y: f64) -> f64 {
        y.ln()
    }
    fn min_value(&self) -> f64 {
        0.0
    }
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, x: f64) -> f64 {
        x.exp()
    }
    fn derivative_for_output(&self, y: f64) -> f64 {
        y
    }
    fn derivative_op(&self) -> Option<OpRef> {
        Some(op(Exp))
    }
    fn has_inverse(&self) -> bool {
        true
    }
    fn inverse(&self) -> Option<OpRef> {
        Some(op(Log))
    }
}

/// f(x) = ln x
#[derive(Debug, Clone, Copy, Default)]
pub struct Log;

impl Op for Log {
    fn apply(&self, x: f64) -> f64 {
        x.ln()
    }
    fn apply_inverse(&self, y: f64) -> f64 {
        y.exp()
    }
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, x: f64) -> f64 {
        1.0 / x
    }
    fn derivative_for_output(&self, y: f64) -> f64 {
        (-y).exp()
    }
    fn derivative_op(&self) -> Option<OpRef> {
        Some(op(Reciprocal))
    }
    fn has_inverse(&self) -> bool {
        true
    }
    fn inverse(&self) -> Option<OpRef> {
        Some(op(Exp))
    }
}

/// f(x) = 1 / (1 + e⁻ˣ)
#[derive(Debug, Clone, Copy, Default)]
pub struct Logistic;

impl Op for Logistic {
    fn apply(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
    fn apply_inverse(&self, y: f64) -> f64 {
        Logit.apply(y)
    }
    fn is_bounded(&self) -> bool {
        true
    }
    fn min_value(&self) -> f64 {
        0.0
    }
    fn max_value(&self) -> f64 {
        1.0
    }
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, x: f64) -> f64 {
        self.derivative_for_output(self.apply(x))
    }
    fn derivative_for_output(&self, y: f64) -> f64 {
        y * (1.0 - y)
    }
    /// σ · (1 - σ)
    fn derivative_op(&self) -> Option<OpRef> {
        let sigma = op(Logistic);
        let one_minus = compose(&op(Linear::new(-1.0, 1.0)), &sigma);
        Some(product(&sigma, &one_minus))
    }
    fn has_inverse(&self) -> bool {
        true
    }
    fn inverse(&self) -> Option<OpRef> {
        Some(op(Logit))
    }
}

/// f(x) = ln(x / (1 - x)), the inverse of [`Logistic`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Logit;

impl Op for Logit {
    fn apply(&self, x: f64) -> f64 {
        (x / (1.0 - x)).ln()
    }
    fn apply_inverse(&self, y: f64) -> f64 {
        Logistic.apply(y)
    }
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, x: f64) -> f64 {
        1.0 / (x * (1.0 - x))
    }
    /// 1 / (x (1 - x))
    fn derivative_op(&self) -> Option<OpRef> {
        let spread = product(&op(Identity), &op(Linear::new(-1.0, 1.0)));
        Some(compose(&op(Reciprocal), &spread))
    }
    fn has_inverse(&self) -> bool {
        true
    }
    fn inverse(&self) -> Option<OpRef> {
        Some(op(Logistic))
    }
}

/// f(x) = tanh x
#[derive(Debug, Clone, Copy, Default)]
pub struct Tanh;

impl Op for Tanh {
    fn apply(&self, x: f64) -> f64 {
        x.tanh()
    }
    fn is_bounded(&self) -> bool {
        true
    }
    fn min_value(&self) -> f64 {
        -1.0
    }
    fn max_value(&self) -> f64 {
        1.0
    }
    fn has_derivative(&self) -> bool {
        true
    }
    fn derivative(&self, x: f64) -> f64 {
        self.derivative_for_output(x.tanh())
    }
    fn has_derivative_for_output(&self) -> bool {
        true
    }
    fn derivative_for_output(&self, y: f64) -> f64 {
        1.0 - y * y
    }
    /// 1 - tanh²
    fn derivative_op(&self) -> Option<OpRef> {
        let tanh_sq = compose(&op(Square), &op(Tanh));
        Some(compose(&op(Linear::new(-1.0, 1.0)), &tanh_sq))
    }
}

/// f(x) = x + N(0, σ²). Stochastic; draws from the thread-local generator.
#[derive(Debug, Clone, Copy)]
pub struct GaussianNoise {
    pub std_dev: f64,
}

impl GaussianNoise {
    pub fn new(std_dev: f64) -> Self {
        Self { std_dev }
    }
}

impl Op for GaussianNoise {
    fn apply(&self, x: f64) -> f64 {
        x + rand::thread_rng().sample::<f64, _>(StandardNormal) * self.std_dev
    }
    fn average_value(&self) -> f64 {
        0.0
    }
    fn is_stochastic(&self) -> bool {
        true
    }
}
