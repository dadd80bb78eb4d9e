use crate::expr::{Expr, Rational, add, mul, sqrt};
use crate::polynomial::Poly;
use crate::simplify::simplify_fully;
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Integer coefficients beyond this skip the rational-root search.
const RATIONAL_ROOT_SEARCH_LIMIT: u64 = 1_000_000;
/// Square factors are pulled out of surds only up to this trial divisor.
const SURD_TRIAL_LIMIT: u64 = 10_000;
const BISECTION_BITS: u32 = 56;
const MAX_BISECTION_STEPS: usize = 512;

/// Distinct real roots of `poly`, ascending.
///
/// Rational roots are exact constants and irrational roots of quadratic factors are exact
/// surds. Roots of higher-degree irreducible factors are isolated with a Sturm sequence and
/// refined by bisection to a rational within 2^-56 relative width.
pub fn real_roots(poly: &Poly) -> Vec<Expr> {
    let mut remaining = poly.square_free_part();
    if remaining.degree().unwrap_or(0) == 0 {
        return Vec::new();
    }

    let mut roots: Vec<(Expr, f64)> = Vec::new();
    for root in rational_roots(&remaining) {
        let factor = Poly::x() - Poly::from_constant(root.clone());
        remaining = remaining.div_exact(&factor).unwrap_or(remaining);
        let approx = root.to_f64().unwrap_or(f64::NAN);
        roots.push((Expr::Constant(root), approx));
    }

    let found: Vec<(Expr, f64)> = match remaining.degree().unwrap_or(0) {
        0 => Vec::new(),
        1 => vec![linear_root(&remaining)],
        2 => quadratic_roots(&remaining),
        _ => sturm_roots(&remaining)
            .into_iter()
            .map(|r| {
                let approx = r.to_f64().unwrap_or(f64::NAN);
                (Expr::Constant(r), approx)
            })
            .collect(),
    };
    roots.extend(found);

    roots.sort_by(|(_, a), (_, b)| a.total_cmp(b));
    roots.dedup_by(|(a, _), (b, _)| a == b);
    roots.into_iter().map(|(root, _)| root).collect()
}

fn linear_root(poly: &Poly) -> (Expr, f64) {
    let root = -poly.coeff(0) / poly.coeff(1);
    let approx = root.to_f64().unwrap_or(f64::NAN);
    (Expr::Constant(root), approx)
}

/// Candidates `±p/q` with `p | a0` and `q | an` (rational root theorem).
fn rational_roots(poly: &Poly) -> Vec<Rational> {
    let (_, mut coeffs) = poly.content_and_primitive_part();
    let mut roots = Vec::new();

    if coeffs.first().is_some_and(|c| c.is_zero()) {
        roots.push(Rational::zero());
        while coeffs.first().is_some_and(|c| c.is_zero()) {
            coeffs.remove(0);
        }
    }

    let (Some(constant), Some(leading)) = (coeffs.first(), coeffs.last()) else {
        return roots;
    };
    let (Some(constant), Some(leading)) = (small_magnitude(constant), small_magnitude(leading))
    else {
        return roots;
    };

    let numerators = divisors(constant);
    let denominators = divisors(leading);
    for p in &numerators {
        for q in &denominators {
            for sign in [-1i64, 1] {
                let candidate = Rational::new(BigInt::from(*p) * sign, BigInt::from(*q));
                if !roots.contains(&candidate) && poly.evaluate(&candidate).is_zero() {
                    roots.push(candidate);
                }
            }
        }
    }
    roots
}

fn small_magnitude(n: &BigInt) -> Option<u64> {
    n.abs()
        .to_u64()
        .filter(|m| *m > 0 && *m <= RATIONAL_ROOT_SEARCH_LIMIT)
}

fn divisors(n: u64) -> Vec<u64> {
    let mut small = Vec::new();
    let mut large = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            small.push(d);
            if d * d != n {
                large.push(n / d);
            }
        }
        d += 1;
    }
    small.extend(large.into_iter().rev());
    small
}

/// Roots of `a*x^2 + b*x + c` as `-b/2a ± sqrt(Δ)/2a`; empty when `Δ < 0`.
fn quadratic_roots(poly: &Poly) -> Vec<(Expr, f64)> {
    let (a, b, c) = (poly.coeff(2), poly.coeff(1), poly.coeff(0));
    let two_a = &a * Rational::from_integer(2.into());
    let disc = &b * &b - Rational::from_integer(4.into()) * &a * &c;
    let center = -&b / &two_a;

    if disc.is_negative() {
        return Vec::new();
    }
    if disc.is_zero() {
        let approx = center.to_f64().unwrap_or(f64::NAN);
        return vec![(Expr::Constant(center), approx)];
    }

    let (outside, inside) = split_surd(&disc);
    let half_width = outside / two_a.abs();
    if inside.is_one() {
        return [&center - &half_width, &center + &half_width]
            .into_iter()
            .map(|r| {
                let approx = r.to_f64().unwrap_or(f64::NAN);
                (Expr::Constant(r), approx)
            })
            .collect();
    }

    let radical = inside.to_f64().unwrap_or(f64::NAN).sqrt();
    [-half_width.clone(), half_width]
        .into_iter()
        .map(|offset| {
            let approx = center.to_f64().unwrap_or(f64::NAN)
                + offset.to_f64().unwrap_or(f64::NAN) * radical;
            let expr = simplify_fully(add(
                Expr::Constant(center.clone()),
                mul(Expr::Constant(offset), sqrt(Expr::Constant(inside.clone()))),
            ));
            (expr, approx)
        })
        .collect()
}

/// Write `sqrt(r)` as `outside * sqrt(inside)` with `inside` a positive integer whose small
/// square factors have been pulled out.
fn split_surd(r: &Rational) -> (Rational, Rational) {
    // sqrt(n/d) = sqrt(n*d)/d
    let radicand: BigInt = r.numer() * r.denom();
    let mut outside = BigInt::one();
    let mut inside = radicand;

    let root = inside.sqrt();
    if &root * &root == inside {
        return (
            Rational::new(root, r.denom().clone()),
            Rational::one(),
        );
    }

    let mut k: u64 = 2;
    while k <= SURD_TRIAL_LIMIT {
        let square = BigInt::from(k * k);
        if square > inside {
            break;
        }
        while (&inside % &square).is_zero() {
            inside /= &square;
            outside *= k;
        }
        k += 1;
    }

    (
        Rational::new(outside, r.denom().clone()),
        Rational::from_integer(inside),
    )
}

fn sturm_sequence(poly: &Poly) -> Vec<Poly> {
    let mut seq = vec![poly.clone(), poly.derivative()];
    loop {
        let n = seq.len();
        let (_, r) = seq[n - 2].div_rem(&seq[n - 1]);
        if r.is_zero() {
            break;
        }
        seq.push(-r);
    }
    seq
}

fn sign_changes(seq: &[Poly], x: &Rational) -> usize {
    let signs: Vec<bool> = seq
        .iter()
        .map(|p| p.evaluate(x))
        .filter(|v| !v.is_zero())
        .map(|v| v.is_positive())
        .collect();
    signs.windows(2).filter(|w| w[0] != w[1]).count()
}

/// Number of distinct roots in `(a, b]`.
fn roots_between(seq: &[Poly], a: &Rational, b: &Rational) -> usize {
    sign_changes(seq, a).saturating_sub(sign_changes(seq, b))
}

fn sturm_roots(poly: &Poly) -> Vec<Rational> {
    let seq = sturm_sequence(poly);
    let lead = poly.leading_coeff().abs();
    let bound = poly
        .coeffs
        .values()
        .map(|c| c.abs() / &lead)
        .fold(Rational::zero(), |acc, v| if v > acc { v } else { acc })
        + Rational::one();

    let mut roots = Vec::new();
    let mut pending = vec![(-bound.clone(), bound)];
    while let Some((a, b)) = pending.pop() {
        match roots_between(&seq, &a, &b) {
            0 => {}
            1 => roots.push(refine(poly, &seq, a, b)),
            _ => {
                let mid = midpoint(&a, &b);
                pending.push((mid.clone(), b));
                pending.push((a, mid));
            }
        }
    }
    roots.sort();
    roots
}

/// Shrink `(a, b]`, which holds exactly one root, until it is narrow enough.
fn refine(poly: &Poly, seq: &[Poly], mut a: Rational, mut b: Rational) -> Rational {
    if poly.evaluate(&b).is_zero() {
        return b;
    }
    let scale = Rational::new(BigInt::one(), BigInt::one() << BISECTION_BITS);
    for _ in 0..MAX_BISECTION_STEPS {
        let mid = midpoint(&a, &b);
        if poly.evaluate(&mid).is_zero() {
            return mid;
        }
        let width = &b - &a;
        if width <= &scale * (Rational::one() + mid.abs()) {
            return mid;
        }
        if roots_between(seq, &a, &mid) == 1 {
            b = mid;
        } else {
            a = mid;
        }
    }
    midpoint(&a, &b)
}

fn midpoint(a: &Rational, b: &Rational) -> Rational {
    (a + b) / Rational::from_integer(2.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::evaluate;
    use crate::parser::parse_expr;

    fn poly(input: &str) -> Poly {
        Poly::from_expr(&parse_expr(input).unwrap(), "Q").unwrap()
    }

    fn approx_roots(input: &str) -> Vec<f64> {
        real_roots(&poly(input))
            .iter()
            .map(|r| evaluate(r).unwrap())
            .collect()
    }

    #[test]
    fn divisors_are_sorted() {
        assert_eq!(divisors(12), vec![1, 2, 3, 4, 6, 12]);
        assert_eq!(divisors(1), vec![1]);
    }

    #[test]
    fn rational_roots_are_exact() {
        let roots = real_roots(&poly("2*Q^3 - 3*Q^2 - 3*Q + 2"));
        assert_eq!(
            roots,
            vec![Expr::integer(-1), Expr::constant(1, 2), Expr::integer(2)]
        );
    }

    #[test]
    fn repeated_roots_appear_once() {
        assert_eq!(real_roots(&poly("(Q - 3)^2")), vec![Expr::integer(3)]);
    }

    #[test]
    fn quadratic_surds_are_simplified() {
        let (outside, inside) = split_surd(&Rational::from_integer(524.into()));
        assert_eq!(outside, Rational::from_integer(2.into()));
        assert_eq!(inside, Rational::from_integer(131.into()));

        let roots = approx_roots("Q^2 - 18*Q - 50");
        let s = 131f64.sqrt();
        assert_eq!(roots.len(), 2);
        assert!((roots[0] - (9.0 - s)).abs() < 1e-12);
        assert!((roots[1] - (9.0 + s)).abs() < 1e-12);
    }

    #[test]
    fn complex_roots_are_dropped() {
        assert!(real_roots(&poly("Q^2 + 1")).is_empty());
    }

    #[test]
    fn sturm_isolates_irrational_cubic_roots() {
        // no rational roots, three real ones
        let roots = approx_roots("Q^3 - 3*Q + 1");
        assert_eq!(roots.len(), 3);
        for r in roots {
            assert!((r * r * r - 3.0 * r + 1.0).abs() < 1e-9);
        }
    }
}
