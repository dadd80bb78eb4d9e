//! Exact values paired with their floating-point approximation.

use std::fmt;

use num_traits::Signed;

use crate::error::Result;
use crate::eval::evaluate;
use crate::expr::{Expr, mul, sub};
use crate::simplify::simplify_fully;

/// A variable-free value: the simplified exact expression and its `f64` approximation.
///
/// The approximation is always finite; [`Scalar::from_expr`] refuses anything else.
#[derive(Clone, Debug, PartialEq)]
pub struct Scalar {
    pub exact: Expr,
    pub approx: f64,
}

impl Scalar {
    pub fn from_expr(expr: Expr) -> Result<Self> {
        let exact = simplify_fully(expr);
        let approx = evaluate(&exact)?;
        Ok(Scalar { exact, approx })
    }

    pub fn value(&self) -> f64 {
        self.approx
    }

    pub fn sub(&self, rhs: &Scalar) -> Result<Scalar> {
        Scalar::from_expr(sub(self.exact.clone(), rhs.exact.clone()))
    }

    pub fn mul(&self, rhs: &Scalar) -> Result<Scalar> {
        Scalar::from_expr(mul(self.exact.clone(), rhs.exact.clone()))
    }

    /// Sign test on the exact value when it is rational. Other values go by the
    /// approximation, with `-0.0` counted as negative.
    pub fn is_negative(&self) -> bool {
        match self.exact.as_constant() {
            Some(c) => c.is_negative(),
            None => self.approx.is_sign_negative(),
        }
    }

    /// True when the exact form is a rational constant.
    pub fn is_rational(&self) -> bool {
        self.exact.as_constant().is_some()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_rational() {
            write!(f, "{}", self.exact)
        } else {
            write!(f, "{} ≈ {}", self.exact, self.approx)
        }
    }
}
