//! Real root finding for single-variable equations.

pub mod rational;
mod roots;

use crate::error::{CasError, Result};
use crate::eval::evaluate;
use crate::expr::{Expr, sub};
use crate::polynomial::{MAX_EXPANDED_DEGREE, exceeds_expansion_limit};
use crate::simplify::simplify_fully;
use rational::RationalFunction;
use num_traits::Zero;
use tracing::debug;

pub use roots::real_roots;

/// Solve `lhs = rhs` for `var` over the reals.
///
/// Both sides must combine into a rational function of `var`. Roots come back in ascending
/// order, each listed once. Removable singularities are cancelled first, so only roots of
/// the reduced numerator are reported. An empty list means there is no real solution,
/// including when the equation is an identity.
pub fn solve_univariate(lhs: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Expr>> {
    let difference = simplify_fully(sub(lhs.clone(), rhs.clone()));
    let Some(function) = RationalFunction::from_expr(&difference, var) else {
        if exceeds_expansion_limit(&difference) {
            return Err(CasError::Unsupported(format!(
                "cannot solve {difference} = 0 for {var}: powers above {MAX_EXPANDED_DEGREE} are not expanded"
            )));
        }
        return Err(CasError::Unsupported(format!(
            "cannot solve {difference} = 0 for {var}: not a rational function of {var}"
        )));
    };

    if function.numer.is_zero() {
        debug!(equation = %difference, "equation holds identically, no isolated roots");
        return Ok(Vec::new());
    }

    let mut solutions: Vec<(Expr, f64)> = Vec::new();
    for root in real_roots(&function.numer) {
        if let Expr::Constant(c) = &root {
            if function.denom.evaluate(c).is_zero() {
                continue;
            }
        }
        let value = evaluate(&root)?;
        solutions.push((root, value));
    }
    solutions.sort_by(|(_, a), (_, b)| a.total_cmp(b));
    solutions.dedup_by(|(a, _), (b, _)| a == b);

    debug!(
        equation = %difference,
        roots = solutions.len(),
        "solved univariate equation"
    );
    Ok(solutions.into_iter().map(|(root, _)| root).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn solve(lhs: &str, rhs: &str) -> Result<Vec<Expr>> {
        solve_univariate(&parse_expr(lhs).unwrap(), &parse_expr(rhs).unwrap(), "Q")
    }

    #[test]
    fn linear_equation() {
        assert_eq!(solve("100 - 2*Q", "2").unwrap(), vec![Expr::integer(49)]);
    }

    #[test]
    fn rational_functions_vanish_at_numerator_roots() {
        assert_eq!(solve("Q/(Q - 2)", "0").unwrap(), vec![Expr::integer(0)]);
        assert!(solve("1/(Q - 1)", "0").unwrap().is_empty());
    }

    #[test]
    fn identity_has_no_isolated_roots() {
        assert!(solve("2*Q", "Q + Q").unwrap().is_empty());
        assert!(solve("10", "2").unwrap().is_empty());
    }

    #[test]
    fn transcendental_equation_is_unsupported() {
        assert!(matches!(
            solve("exp(Q)", "2"),
            Err(CasError::Unsupported(_))
        ));
    }
}
