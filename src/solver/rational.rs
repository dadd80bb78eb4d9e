use crate::expr::{Expr, Rational};
use crate::polynomial::{MAX_EXPANDED_DEGREE, Poly, integer_exponent};
use num_traits::One;

/// A quotient of two polynomials in one variable, reduced to lowest terms.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RationalFunction {
    pub numer: Poly,
    pub denom: Poly,
}

impl RationalFunction {
    fn new(numer: Poly, denom: Poly) -> Self {
        RationalFunction { numer, denom }
    }

    fn poly(p: Poly) -> Self {
        RationalFunction::new(p, Poly::one())
    }

    /// Convert `expr` into `N/D`, or `None` when it is not a rational function of `var`
    /// (or divides by an identically zero polynomial).
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        Some(build(expr, var)?.reduced())
    }

    fn reduced(self) -> Self {
        if self.numer.is_zero() {
            return RationalFunction::poly(Poly::zero());
        }
        let g = Poly::gcd(&self.numer, &self.denom);
        let numer = self.numer.div_exact(&g).unwrap_or(self.numer);
        let denom = self.denom.div_exact(&g).unwrap_or(self.denom);
        // keep the denominator monic so equal functions compare equal
        let lc = denom.leading_coeff();
        let inv = Rational::one() / lc;
        RationalFunction::new(numer.scale(&inv), denom.scale(&inv))
    }
}

fn build(expr: &Expr, var: &str) -> Option<RationalFunction> {
    let rf = match expr {
        Expr::Variable(v) if v == var => RationalFunction::poly(Poly::x()),
        Expr::Constant(c) => RationalFunction::poly(Poly::from_constant(c.clone())),
        Expr::Add(a, b) => {
            let (a, b) = (build(a, var)?, build(b, var)?);
            RationalFunction::new(
                a.numer * &b.denom + b.numer * &a.denom,
                a.denom * &b.denom,
            )
        }
        Expr::Sub(a, b) => {
            let (a, b) = (build(a, var)?, build(b, var)?);
            RationalFunction::new(
                a.numer * &b.denom - b.numer * &a.denom,
                a.denom * &b.denom,
            )
        }
        Expr::Mul(a, b) => {
            let (a, b) = (build(a, var)?, build(b, var)?);
            RationalFunction::new(a.numer * &b.numer, a.denom * &b.denom)
        }
        Expr::Div(a, b) => {
            let (a, b) = (build(a, var)?, build(b, var)?);
            if b.numer.is_zero() {
                return None;
            }
            RationalFunction::new(a.numer * &b.denom, a.denom * &b.numer)
        }
        Expr::Neg(inner) => {
            let inner = build(inner, var)?;
            RationalFunction::new(-inner.numer, inner.denom)
        }
        Expr::Pow(base, exp) => {
            let k = integer_exponent(exp)?;
            if k.unsigned_abs() > MAX_EXPANDED_DEGREE as u64 {
                return None;
            }
            let base = build(base, var)?;
            let power = k.unsigned_abs() as usize;
            if k >= 0 {
                RationalFunction::new(base.numer.pow(power), base.denom.pow(power))
            } else {
                if base.numer.is_zero() {
                    return None;
                }
                RationalFunction::new(base.denom.pow(power), base.numer.pow(power))
            }
        }
        _ => return None,
    };
    // keep intermediate sizes down
    Some(rf.reduced())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;

    fn rf(input: &str) -> RationalFunction {
        RationalFunction::from_expr(&parse_expr(input).unwrap(), "Q").unwrap()
    }

    #[test]
    fn cancels_common_factors() {
        let reduced = rf("(Q^2 - 1)/(Q - 1)");
        assert_eq!(reduced.numer, Poly::from_expr(&parse_expr("Q + 1").unwrap(), "Q").unwrap());
        assert!(reduced.denom.is_one());
    }

    #[test]
    fn combines_sums_over_a_common_denominator() {
        let combined = rf("1/Q + 1/(Q + 1)");
        assert_eq!(combined.numer.degree(), Some(1));
        assert_eq!(combined.denom.degree(), Some(2));
    }

    #[test]
    fn rejects_transcendental_terms() {
        assert!(RationalFunction::from_expr(&parse_expr("exp(Q) - 1").unwrap(), "Q").is_none());
        assert!(RationalFunction::from_expr(&parse_expr("Q/0").unwrap(), "Q").is_none());
    }
}
