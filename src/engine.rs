//! The symbolic capabilities the market layer is allowed to use.

use crate::calculus::{definite_integral, differentiate};
use crate::error::Result;
use crate::expr::Expr;
use crate::parser::parse_in;
use crate::scalar::Scalar;
use crate::simplify::{simplify_fully, substitute};
use crate::solver::solve_univariate;

/// The five operations an equilibrium computation needs from a computer algebra system.
///
/// Implementations must be deterministic: equal inputs give equal outputs, and `solve`
/// returns its roots in a stable order.
pub trait SymbolicEngine {
    /// Parse `input`, accepting `var` as the only symbol.
    fn parse(&self, input: &str, var: &str) -> Result<Expr>;

    fn differentiate(&self, expr: &Expr, var: &str) -> Result<Expr>;

    /// Real roots of `lhs = rhs` in `var`.
    fn solve(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Expr>>;

    /// Evaluate `expr` with `var` replaced by `value`.
    fn substitute(&self, expr: &Expr, var: &str, value: &Expr) -> Result<Scalar>;

    /// The definite integral of `expr` in `var` over `[lower, upper]`.
    fn integrate(&self, expr: &Expr, var: &str, lower: &Expr, upper: &Expr) -> Result<Scalar>;
}

/// The built-in engine: exact rational arithmetic with a numeric quadrature fallback.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactEngine;

impl SymbolicEngine for ExactEngine {
    fn parse(&self, input: &str, var: &str) -> Result<Expr> {
        parse_in(input, var)
    }

    fn differentiate(&self, expr: &Expr, var: &str) -> Result<Expr> {
        Ok(simplify_fully(differentiate(var, expr)))
    }

    fn solve(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Expr>> {
        solve_univariate(lhs, rhs, var)
    }

    fn substitute(&self, expr: &Expr, var: &str, value: &Expr) -> Result<Scalar> {
        Scalar::from_expr(substitute(expr, var, value))
    }

    fn integrate(&self, expr: &Expr, var: &str, lower: &Expr, upper: &Expr) -> Result<Scalar> {
        Scalar::from_expr(definite_integral(var, expr, lower, upper)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CasError;

    #[test]
    fn substitute_produces_a_value() {
        let engine = ExactEngine;
        let expr = engine.parse("100 - Q", "Q").unwrap();
        let value = engine.substitute(&expr, "Q", &Expr::integer(49)).unwrap();
        assert_eq!(value.exact, Expr::integer(51));
    }

    #[test]
    fn substitute_reports_undefined_points() {
        let engine = ExactEngine;
        let expr = engine.parse("1/Q", "Q").unwrap();
        assert!(matches!(
            engine.substitute(&expr, "Q", &Expr::integer(0)),
            Err(CasError::Undefined(_))
        ));
    }
}
