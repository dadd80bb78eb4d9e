use std::collections::HashMap;

use crate::expr::{Expr, Rational, one, zero};
use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

const DISTRIBUTE_TERM_LIMIT: usize = 64;
const SIMPLIFY_ITERATION_LIMIT: usize = 64;

/// Sorted non-constant factors of a term; like terms share a key.
#[derive(Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
struct CanonKey(Vec<Expr>);

pub fn simplify(expr: Expr) -> Expr {
    let mut cache = HashMap::new();
    simplify_cached(expr, &mut cache)
}

fn simplify_cached(expr: Expr, cache: &mut HashMap<Expr, Expr>) -> Expr {
    if let Some(hit) = cache.get(&expr) {
        return hit.clone();
    }

    let key = expr.clone();
    let result = match expr {
        Expr::Add(a, b) => simplify_add(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Sub(a, b) => simplify_sub(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Mul(a, b) => simplify_mul(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Div(a, b) => simplify_div(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Pow(a, b) => simplify_pow(simplify_cached(*a, cache), simplify_cached(*b, cache)),
        Expr::Neg(a) => simplify_neg(simplify_cached(*a, cache)),

        Expr::Sin(a) => match simplify_cached(*a, cache) {
            x if is_zero(&x) => zero(),
            Expr::Neg(inner) => simplify_neg(Expr::Sin(inner)),
            x => Expr::Sin(x.boxed()),
        },

        Expr::Cos(a) => match simplify_cached(*a, cache) {
            x if is_zero(&x) => one(),
            Expr::Neg(inner) => Expr::Cos(inner),
            x => Expr::Cos(x.boxed()),
        },

        Expr::Tan(a) => match simplify_cached(*a, cache) {
            x if is_zero(&x) => zero(),
            Expr::Neg(inner) => simplify_neg(Expr::Tan(inner)),
            x => Expr::Tan(x.boxed()),
        },

        Expr::Exp(a) => match simplify_cached(*a, cache) {
            x if is_zero(&x) => one(),
            Expr::Log(inner) => *inner,
            x => Expr::Exp(x.boxed()),
        },

        Expr::Log(a) => match simplify_cached(*a, cache) {
            x if is_one(&x) => zero(),
            Expr::Exp(inner) => *inner,
            x => Expr::Log(x.boxed()),
        },

        e => e,
    };

    cache.insert(key, result.clone());
    result
}

/// Apply simplification passes until the expression stops changing or we hit the iteration cap.
pub fn simplify_fully(expr: Expr) -> Expr {
    simplify_with_limit(expr, SIMPLIFY_ITERATION_LIMIT)
}

/// Apply simplification passes up to `max_iters`, returning the last value if convergence is not reached.
pub fn simplify_with_limit(expr: Expr, max_iters: usize) -> Expr {
    let mut cache = HashMap::new();
    let mut current = expr;
    for _ in 0..max_iters {
        let next = simplify_cached(current.clone(), &mut cache);
        if next == current {
            return current;
        }
        current = next;
    }
    current
}

pub fn simplify_add(x: Expr, y: Expr) -> Expr {
    rebuild_sum(collect_sum(flatten_sum(&x).into_iter().chain(flatten_sum(&y))))
}

pub fn simplify_sub(x: Expr, y: Expr) -> Expr {
    simplify_add(x, simplify_neg(y))
}

fn flatten_sum(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Add(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b));
            out
        }
        Expr::Sub(a, b) => {
            let mut out = flatten_sum(a);
            out.extend(flatten_sum(b).into_iter().map(simplify_neg));
            out
        }
        Expr::Neg(a) => flatten_sum(a).into_iter().map(simplify_neg).collect(),
        other => vec![other.clone()],
    }
}

fn count_sum_terms(expr: &Expr) -> usize {
    match expr {
        Expr::Add(a, b) | Expr::Sub(a, b) => count_sum_terms(a) + count_sum_terms(b),
        Expr::Neg(inner) => count_sum_terms(inner),
        _ => 1,
    }
}

fn split_coeff(expr: &Expr) -> (Rational, Expr) {
    match expr {
        Expr::Constant(c) => (c.clone(), one()),
        Expr::Neg(e) => {
            let (c, b) = split_coeff(e);
            (-c, b)
        }
        Expr::Mul(a, b) => {
            let (ca, ba) = split_coeff(a);
            let (cb, bb) = split_coeff(b);
            (ca * cb, mul_norm(ba, bb))
        }
        other => (Rational::one(), other.clone()),
    }
}

fn mul_norm(a: Expr, b: Expr) -> Expr {
    let mut items = flatten_mul(&a);
    items.extend(flatten_mul(&b));
    mul_from_factors(items)
}

fn flatten_mul(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::Mul(a, b) => {
            let mut out = flatten_mul(a);
            out.extend(flatten_mul(b));
            out
        }
        t if is_one(t) => vec![],
        t => vec![t.clone()],
    }
}

fn collect_sum<I>(terms: I) -> HashMap<CanonKey, Rational>
where
    I: IntoIterator<Item = Expr>,
{
    let mut map = HashMap::new();
    for term in terms {
        let (c, b) = split_coeff(&term);
        if c.is_zero() {
            continue;
        }
        let mut factors = flatten_mul(&merge_powers(b));
        factors.sort();
        map.entry(CanonKey(factors))
            .and_modify(|acc| *acc += &c)
            .or_insert(c);
    }
    map
}

fn rebuild_sum(mut map: HashMap<CanonKey, Rational>) -> Expr {
    let const_term = map
        .remove(&CanonKey(Vec::new()))
        .unwrap_or_else(Rational::zero);
    let mut items: Vec<(CanonKey, Rational)> = map.into_iter().collect();
    items.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut terms: Vec<Expr> = items
        .into_iter()
        .filter(|(_, coef)| !coef.is_zero())
        .map(|(CanonKey(factors), coef)| term_from(&coef, mul_from_factors(factors)))
        .collect();

    if !const_term.is_zero() {
        terms.push(Expr::Constant(const_term));
    }

    add_from_terms(terms)
}

fn term_from(coef: &Rational, base: Expr) -> Expr {
    if coef.is_zero() {
        return zero();
    }
    if is_one(&base) {
        return Expr::Constant(coef.clone());
    }
    if coef.is_one() {
        return base;
    }
    if coef == &-Rational::one() {
        return simplify_neg(base);
    }
    Expr::Mul(Expr::Constant(coef.clone()).boxed(), base.boxed())
}

pub fn simplify_mul(x: Expr, y: Expr) -> Expr {
    match (x, y) {
        (Expr::Add(a, b), t) => distribute(Expr::Add(a, b), t, false),
        (Expr::Sub(a, b), t) => distribute(Expr::Sub(a, b), t, false),
        (t, Expr::Add(a, b)) => distribute(Expr::Add(a, b), t, true),
        (t, Expr::Sub(a, b)) => distribute(Expr::Sub(a, b), t, true),
        (Expr::Constant(xc), Expr::Constant(yc)) => Expr::Constant(xc * yc),
        (x, y) if is_zero(&x) || is_zero(&y) => zero(),
        (x, y) if is_one(&x) => y,
        (x, y) if is_one(&y) => x,
        (x, y) => {
            let (c, b) = split_coeff(&Expr::Mul(x.boxed(), y.boxed()));
            let b = merge_powers(b);
            match b {
                _ if c.is_zero() => zero(),
                t if is_one(&t) => Expr::Constant(c),
                _ if c.is_one() => b,
                _ if c == -Rational::one() => simplify_neg(b),
                _ => Expr::Mul(Expr::Constant(c).boxed(), b.boxed()),
            }
        }
    }
}

/// Multiply each term of `sum` by `factor`, unless that would blow up the term count.
fn distribute(sum: Expr, factor: Expr, factor_first: bool) -> Expr {
    let term_count = count_sum_terms(&sum) * count_sum_terms(&factor);
    if term_count > DISTRIBUTE_TERM_LIMIT {
        return if factor_first {
            Expr::Mul(factor.boxed(), sum.boxed())
        } else {
            Expr::Mul(sum.boxed(), factor.boxed())
        };
    }
    let product = |term: Expr| {
        if factor_first {
            simplify_mul(factor.clone(), term)
        } else {
            simplify_mul(term, factor.clone())
        }
    };
    match sum {
        Expr::Add(a, b) => simplify_add(product(*a), product(*b)),
        Expr::Sub(a, b) => simplify_sub(product(*a), product(*b)),
        other => product(other),
    }
}

/// Collapse repeated factors of a product into integer powers: `Q*Q*Q^2` becomes `Q^4`.
///
/// Quotients and negative powers share the same exponent table, so `Q * (1/Q^2)` becomes
/// `1/Q`. Factors left with a negative exponent end up in a single denominator.
fn merge_powers(product: Expr) -> Expr {
    let mut exponents: Vec<(Expr, Rational)> = Vec::new();
    tally_factors(&product, &Rational::one(), &mut exponents);

    let mut numer = Vec::new();
    let mut denom = Vec::new();
    for (base, e) in exponents {
        if e.is_zero() {
            continue;
        }
        let (side, e) = if e.is_negative() {
            (&mut denom, -e)
        } else {
            (&mut numer, e)
        };
        side.push(if e.is_one() {
            base
        } else {
            Expr::Pow(base.boxed(), Expr::Constant(e).boxed())
        });
    }

    let numer = mul_from_factors(numer);
    if denom.is_empty() {
        numer
    } else {
        Expr::Div(numer.boxed(), mul_from_factors(denom).boxed())
    }
}

fn tally_factors(expr: &Expr, sign: &Rational, exponents: &mut Vec<(Expr, Rational)>) {
    let (base, exp) = match expr {
        Expr::Mul(a, b) => {
            tally_factors(a, sign, exponents);
            tally_factors(b, sign, exponents);
            return;
        }
        Expr::Div(a, b) => {
            tally_factors(a, sign, exponents);
            tally_factors(b, &-sign, exponents);
            return;
        }
        t if is_one(t) => return,
        Expr::Pow(base, exp) => match &**exp {
            Expr::Constant(e) if e.is_integer() => ((**base).clone(), e * sign),
            _ => (expr.clone(), sign.clone()),
        },
        other => (other.clone(), sign.clone()),
    };
    match exponents.iter_mut().find(|(b, _)| *b == base) {
        Some((_, total)) => *total += exp,
        None => exponents.push((base, exp)),
    }
}

pub fn simplify_div(x: Expr, y: Expr) -> Expr {
    match (x, y) {
        (Expr::Constant(n), Expr::Constant(d)) => {
            if d.is_zero() {
                Expr::Div(Expr::Constant(n).boxed(), Expr::Constant(d).boxed())
            } else {
                Expr::Constant(n / d)
            }
        }
        (x, _) if is_zero(&x) => zero(),
        (x, y) if is_one(&y) => x,
        (x, y) => {
            let (cx, bx) = split_coeff(&x);
            let (cy, by) = split_coeff(&y);
            if cy.is_zero() {
                return Expr::Div(x.boxed(), y.boxed());
            }
            let c = cx / cy;
            if bx == by {
                return Expr::Constant(c);
            }
            let core = if is_one(&by) {
                bx
            } else {
                merge_powers(Expr::Div(bx.boxed(), by.boxed()))
            };
            if c.is_one() {
                core
            } else {
                simplify_mul(Expr::Constant(c), core)
            }
        }
    }
}

pub fn simplify_pow(x: Expr, y: Expr) -> Expr {
    match (x, y) {
        (_, Expr::Constant(e)) if e.is_zero() => one(),
        (base, Expr::Constant(e)) if e.is_one() => base,
        (Expr::Constant(b), Expr::Constant(e)) => {
            if e.is_integer() {
                let k: BigInt = e.to_integer();
                if let Some(power) = k.abs().to_u32() {
                    if k >= BigInt::zero() {
                        let num = b.numer().pow(power);
                        let den = b.denom().pow(power);
                        return Expr::Constant(Rational::new(num, den));
                    } else if !b.is_zero() {
                        let num = b.denom().pow(power);
                        let den = b.numer().pow(power);
                        return Expr::Constant(Rational::new(num, den));
                    }
                }
            }
            Expr::Pow(Expr::Constant(b).boxed(), Expr::Constant(e).boxed())
        }
        // (b^m)^n = b^(m*n) only for integer n, which never changes the branch.
        (Expr::Pow(base, inner), Expr::Constant(e)) if e.is_integer() => match *inner {
            Expr::Constant(m) => simplify_pow(*base, Expr::Constant(m * e)),
            other => Expr::Pow(Expr::Pow(base, other.boxed()).boxed(), Expr::Constant(e).boxed()),
        },
        (x, y) => Expr::Pow(x.boxed(), y.boxed()),
    }
}

pub fn simplify_neg(expr: Expr) -> Expr {
    match expr {
        Expr::Constant(x) => Expr::Constant(-x),
        Expr::Neg(x) => *x,
        other => Expr::Neg(other.boxed()),
    }
}

fn is_zero(expr: &Expr) -> bool {
    expr.is_zero()
}

fn is_one(expr: &Expr) -> bool {
    expr.is_one()
}

fn add_from_terms(items: Vec<Expr>) -> Expr {
    let mut iter = items.into_iter();
    match iter.next() {
        None => zero(),
        Some(first) => iter.fold(first, |acc, item| Expr::Add(acc.boxed(), item.boxed())),
    }
}

fn mul_from_factors(mut items: Vec<Expr>) -> Expr {
    items.retain(|e| !is_one(e));
    items.sort();
    let mut iter = items.into_iter();
    match iter.next() {
        None => one(),
        Some(first) => iter.fold(first, |acc, item| Expr::Mul(acc.boxed(), item.boxed())),
    }
}
