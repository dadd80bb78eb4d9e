use crate::error::{CasError, Result};
use crate::eval::{evaluate, evaluate_at};
use crate::expr::{Expr, Rational, add, div, mul, neg, sub};
use crate::polynomial::Poly;
use crate::simplify::{simplify_fully, simplify_pow, substitute};
use crate::solver::rational::RationalFunction;
use crate::solver::real_roots;
use num_traits::{One, Zero};
use tracing::debug;

use super::quadrature::adaptive_simpson;

const QUADRATURE_TOLERANCE: f64 = 1e-10;
const QUADRATURE_MAX_DEPTH: u32 = 40;

/// An antiderivative of `expr` in `var`, or `None` when no rule applies.
///
/// Polynomials are integrated exactly term by term. Otherwise linearity is applied and the
/// remaining factors are matched against the power, exponential, logarithmic and trigonometric
/// rules for affine arguments `k*var + c`.
pub fn antiderivative(var: &str, expr: &Expr) -> Option<Expr> {
    if let Some(poly) = Poly::from_expr(expr, var) {
        return Some(poly.integral().to_expr(var));
    }
    // quotients that cancel down to a polynomial
    if let Some(function) = RationalFunction::from_expr(expr, var) {
        if function.denom.is_one() {
            return Some(function.numer.integral().to_expr(var));
        }
    }
    integrate_linear_ops(expr, var)
}

fn integrate_linear_ops(expr: &Expr, var: &str) -> Option<Expr> {
    if !expr.contains_var(var) {
        return Some(mul(expr.clone(), Expr::var(var)));
    }

    match expr {
        Expr::Add(a, b) => Some(add(antiderivative(var, a)?, antiderivative(var, b)?)),
        Expr::Sub(a, b) => Some(sub(antiderivative(var, a)?, antiderivative(var, b)?)),
        Expr::Neg(inner) => antiderivative(var, inner).map(neg),
        Expr::Mul(a, b) if !a.contains_var(var) => {
            antiderivative(var, b).map(|r| mul((**a).clone(), r))
        }
        Expr::Mul(a, b) if !b.contains_var(var) => {
            antiderivative(var, a).map(|r| mul((**b).clone(), r))
        }
        Expr::Div(a, b) if !b.contains_var(var) => {
            antiderivative(var, a).map(|r| div(r, (**b).clone()))
        }
        Expr::Div(a, b) if !a.contains_var(var) => {
            let reciprocal = simplify_pow((**b).clone(), Expr::integer(-1));
            integrate_known(&reciprocal, var).map(|r| mul((**a).clone(), r))
        }
        _ => integrate_known(expr, var),
    }
}

fn integrate_known(expr: &Expr, var: &str) -> Option<Expr> {
    match expr {
        Expr::Pow(base, exp) if !exp.contains_var(var) => {
            let slope = affine_slope(base, var)?;
            let n = exp_as_rational(exp)?;
            if n == -Rational::one() {
                return Some(div(Expr::Log(base.clone()), Expr::Constant(slope)));
            }
            let next = n + Rational::one();
            Some(div(
                Expr::Pow(base.clone(), Expr::Constant(next.clone()).boxed()),
                Expr::Constant(slope * next),
            ))
        }
        Expr::Exp(arg) => {
            let slope = affine_slope(arg, var)?;
            Some(div(expr.clone(), Expr::Constant(slope)))
        }
        Expr::Sin(arg) => {
            let slope = affine_slope(arg, var)?;
            Some(neg(div(Expr::Cos(arg.clone()), Expr::Constant(slope))))
        }
        Expr::Cos(arg) => {
            let slope = affine_slope(arg, var)?;
            Some(div(Expr::Sin(arg.clone()), Expr::Constant(slope)))
        }
        // ∫ log(u) = (u*log(u) - u)/k
        Expr::Log(arg) => {
            let slope = affine_slope(arg, var)?;
            let u = (**arg).clone();
            Some(div(
                sub(mul(u.clone(), expr.clone()), u),
                Expr::Constant(slope),
            ))
        }
        _ => None,
    }
}

/// `k` when `expr` is `k*var + c` with `k != 0`.
fn affine_slope(expr: &Expr, var: &str) -> Option<Rational> {
    let poly = Poly::from_expr(expr, var)?;
    if poly.degree() != Some(1) {
        return None;
    }
    Some(poly.coeff(1))
}

fn exp_as_rational(expr: &Expr) -> Option<Rational> {
    match simplify_fully(expr.clone()) {
        Expr::Constant(c) => Some(c),
        _ => None,
    }
}

/// The definite integral of `expr` over `[lower, upper]`.
///
/// Uses the antiderivative when one is known (exact result), otherwise adaptive Simpson
/// quadrature on the numeric bounds. Divergent or undefined integrals, including those with a
/// pole inside the interval, fail with [`CasError::Undefined`].
pub fn definite_integral(var: &str, expr: &Expr, lower: &Expr, upper: &Expr) -> Result<Expr> {
    let diverges = |err: CasError| {
        CasError::Undefined(format!(
            "integral of {expr} over [{lower}, {upper}] does not converge: {err}"
        ))
    };

    let a = evaluate(lower)?;
    let b = evaluate(upper)?;
    if a == b {
        return Ok(Expr::Constant(Rational::zero()));
    }
    if let Some(pole) = find_pole(expr, var, a, b) {
        return Err(diverges(CasError::Undefined(format!("pole at {var} = {pole}"))));
    }

    if let Some(anti) = antiderivative(var, expr) {
        debug!(integrand = %expr, antiderivative = %anti, "integrating symbolically");
        let at = |bound: &Expr| simplify_fully(substitute(&anti, var, bound));
        let value = simplify_fully(sub(at(upper), at(lower)));
        evaluate(&value).map_err(diverges)?;
        return Ok(value);
    }

    debug!(integrand = %expr, "no antiderivative rule applies, using quadrature");
    let f = |x: f64| evaluate_at(expr, var, x).ok();
    let value = adaptive_simpson(&f, a, b, QUADRATURE_TOLERANCE, QUADRATURE_MAX_DEPTH)
        .ok_or_else(|| diverges(CasError::Undefined("integrand is not finite on the interval".into())))?;
    Rational::from_float(value)
        .map(Expr::Constant)
        .ok_or_else(|| CasError::Undefined(format!("quadrature produced {value}")))
}

/// A point of `[a, b]` where `expr` has a pole of order one or more.
///
/// Rational integrands are checked through their reduced denominator, so removable
/// singularities pass. Otherwise every denominator, and every base raised to a power of -1 or
/// below, is checked when it is rational in `var`.
fn find_pole(expr: &Expr, var: &str, a: f64, b: f64) -> Option<f64> {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let zero_inside = |base: &Expr| {
        let function = RationalFunction::from_expr(base, var)?;
        real_roots(&function.numer)
            .iter()
            .filter_map(|root| evaluate(root).ok())
            .find(|x| (lo..=hi).contains(x))
    };

    if let Some(function) = RationalFunction::from_expr(expr, var) {
        return real_roots(&function.denom)
            .iter()
            .filter_map(|root| evaluate(root).ok())
            .find(|x| (lo..=hi).contains(x));
    }

    let mut bases = Vec::new();
    singular_bases(expr, var, &mut bases);
    bases.into_iter().find_map(zero_inside)
}

fn singular_bases<'a>(expr: &'a Expr, var: &str, out: &mut Vec<&'a Expr>) {
    match expr {
        Expr::Variable(_) | Expr::Constant(_) => {}
        Expr::Add(x, y) | Expr::Sub(x, y) | Expr::Mul(x, y) => {
            singular_bases(x, var, out);
            singular_bases(y, var, out);
        }
        Expr::Div(n, d) => {
            singular_bases(n, var, out);
            singular_bases(d, var, out);
            if d.contains_var(var) {
                out.push(d);
            }
        }
        Expr::Pow(base, exp) => {
            singular_bases(base, var, out);
            singular_bases(exp, var, out);
            let strong = exp_as_rational(exp).is_some_and(|n| n <= -Rational::one());
            if strong && base.contains_var(var) {
                out.push(base);
            }
        }
        Expr::Neg(x) | Expr::Sin(x) | Expr::Cos(x) | Expr::Tan(x) | Expr::Exp(x) | Expr::Log(x) => {
            singular_bases(x, var, out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluate;
    use crate::parser::parse_expr;

    fn integral(input: &str, lower: i64, upper: i64) -> f64 {
        let expr = parse_expr(input).unwrap();
        let value =
            definite_integral("Q", &expr, &Expr::integer(lower), &Expr::integer(upper)).unwrap();
        evaluate(&value).unwrap()
    }

    #[test]
    fn affine_rules_match_closed_forms() {
        assert!((integral("exp(2*Q)", 0, 1) - ((2f64).exp() - 1.0) / 2.0).abs() < 1e-12);
        assert!((integral("1/(Q + 1)", 0, 3) - (4f64).ln()).abs() < 1e-12);
        assert!((integral("(2*Q + 1)^(1/2)", 0, 4) - (27.0 - 1.0) / 3.0).abs() < 1e-12);
    }

    #[test]
    fn quadrature_covers_products() {
        // ∫ Q*exp(-Q) over [0, 1] = 1 - 2/e
        let expected = 1.0 - 2.0 / std::f64::consts::E;
        assert!((integral("Q*exp(-Q)", 0, 1) - expected).abs() < 1e-8);
    }

    #[test]
    fn divergent_integral_is_undefined() {
        let expr = parse_expr("1/Q").unwrap();
        let err = definite_integral("Q", &expr, &Expr::integer(0), &Expr::integer(1));
        assert!(matches!(err, Err(CasError::Undefined(_))));
    }

    #[test]
    fn interior_pole_is_detected() {
        let expr = parse_expr("1/(Q - 1)^2").unwrap();
        let err = definite_integral("Q", &expr, &Expr::integer(0), &Expr::integer(2));
        assert!(matches!(err, Err(CasError::Undefined(_))));

        let removable = parse_expr("(Q^2 - 1)/(Q - 1)").unwrap();
        let value =
            definite_integral("Q", &removable, &Expr::integer(0), &Expr::integer(2)).unwrap();
        assert_eq!(evaluate(&value).unwrap(), 4.0);
    }

    #[test]
    fn constant_integrand() {
        assert_eq!(integral("2", 0, 49), 98.0);
    }
}
