use crate::expr::Expr;
use num_rational::BigRational;
use num_traits::{One, Signed};

/// Render `expr` as infix text with minimal parentheses. The output parses back to an
/// equal value.
pub fn pretty(expr: &Expr) -> String {
    fn pp(ctx: u8, expr: &Expr) -> String {
        match expr {
            Expr::Variable(v) => v.clone(),
            Expr::Constant(r) if r.is_integer() && !r.is_negative() => show_rational(r),
            Expr::Constant(r) if r.is_integer() => bracket(ctx, 3, show_rational(r)),
            Expr::Constant(r) => bracket(ctx, 2, show_rational(r)),

            Expr::Add(a, b) => {
                let s_a = pp(1, a);
                let (neg_b, b_inner) = split_neg(b);
                let s_b = pp(2, &b_inner);
                let body = format!("{s_a}{}{}", if neg_b { "-" } else { "+" }, s_b);
                bracket(ctx, 1, body)
            }

            Expr::Sub(a, b) => {
                let s_a = pp(1, a);
                let (neg_b, b_inner) = split_neg(b);
                let s_b = pp(2, &b_inner);
                let body = format!("{s_a}{}{}", if neg_b { "+" } else { "-" }, s_b);
                bracket(ctx, 1, body)
            }

            Expr::Mul(a, b) => {
                let (na, a_inner) = split_neg(a);
                let (nb, b_inner) = split_neg(b);
                let body = match &b_inner {
                    // c*(1/d) reads as c / d
                    Expr::Div(n, d) if n.is_one() => {
                        format!("{} / {}", pp(2, &a_inner), pp(3, d))
                    }
                    _ => format!("{}*{}", pp(2, &a_inner), pp(2, &b_inner)),
                };
                if na ^ nb {
                    bracket(ctx, 2, format!("-({body})"))
                } else {
                    bracket(ctx, 2, body)
                }
            }

            Expr::Div(a, b) => {
                let (na, a_inner) = split_neg(a);
                let (nb, b_inner) = split_neg(b);
                let body = format!("{} / {}", pp(2, &a_inner), pp(3, &b_inner));
                if na ^ nb {
                    bracket(ctx, 2, format!("-({body})"))
                } else {
                    bracket(ctx, 2, body)
                }
            }

            Expr::Pow(a, b) if is_half(b) => format!("sqrt({})", pp(0, a)),
            Expr::Pow(a, b) => bracket(ctx, 3, format!("{}^{}", pp(4, a), pp(4, b))),

            Expr::Neg(a) => {
                let (is_neg, inner) = split_neg(a);
                if is_neg {
                    pp(4, &inner)
                } else {
                    format!("-{}", pp(4, &inner))
                }
            }

            Expr::Sin(a) => format!("sin({})", pp(0, a)),
            Expr::Cos(a) => format!("cos({})", pp(0, a)),
            Expr::Tan(a) => format!("tan({})", pp(0, a)),
            Expr::Exp(a) => format!("exp({})", pp(0, a)),
            Expr::Log(a) => format!("log({})", pp(0, a)),
        }
    }

    pp(0, expr)
}

fn is_half(expr: &Expr) -> bool {
    matches!(expr, Expr::Constant(r) if r.numer().is_one() && *r.denom() == 2.into())
}

fn split_neg(expr: &Expr) -> (bool, Expr) {
    match expr {
        Expr::Neg(inner) => (true, *inner.clone()),
        Expr::Constant(r) if r.is_negative() => (true, Expr::Constant(-r)),
        other => (false, other.clone()),
    }
}

fn bracket(ctx: u8, prec: u8, body: String) -> String {
    if prec < ctx {
        format!("({body})")
    } else {
        body
    }
}

fn show_rational(r: &BigRational) -> String {
    let n = r.numer().clone();
    let d = r.denom().clone();
    if d == 1.into() {
        format!("{n}")
    } else if n < 0.into() {
        format!("-{}/{}", -n, d)
    } else {
        format!("{}/{}", n, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expr;
    use crate::simplify::simplify_fully;

    fn show(input: &str) -> String {
        pretty(&parse_expr(input).unwrap())
    }

    #[test]
    fn subtraction_of_negatives() {
        assert_eq!(show("100 - Q"), "100-Q");
        assert_eq!(show("Q + -3"), "Q-3");
    }

    #[test]
    fn fractional_exponents_are_bracketed() {
        let cube_root = Expr::Pow(Expr::var("Q").boxed(), Expr::constant(1, 3).boxed());
        assert_eq!(pretty(&cube_root), "Q^(1/3)");
        assert_eq!(show("sqrt(2*Q + 1)"), "sqrt(2*Q+1)");
    }

    #[test]
    fn unit_numerators_are_folded_into_the_product() {
        assert_eq!(pretty(&simplify_fully(parse_expr("100/Q").unwrap())), "100 / Q");
        assert_eq!(pretty(&simplify_fully(parse_expr("-3/Q^2").unwrap())), "-(3 / Q^2)");
    }

    #[test]
    fn negative_base_keeps_its_sign() {
        let square = Expr::Pow(Expr::integer(-2).boxed(), Expr::integer(2).boxed());
        assert_eq!(pretty(&square), "(-2)^2");
    }
}
