//! Dense univariate polynomials with exact rational coefficients.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::expr::{Expr, Rational};
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, ToPrimitive, Zero};

/// Exponents above this are not expanded when converting from an expression.
pub(crate) const MAX_EXPANDED_DEGREE: usize = 512;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly {
    pub(crate) coeffs: BTreeMap<usize, Rational>,
}

impl Poly {
    pub fn zero() -> Self {
        Poly {
            coeffs: BTreeMap::new(),
        }
    }

    pub fn one() -> Self {
        Poly::from_constant(Rational::one())
    }

    pub fn from_constant(c: Rational) -> Self {
        let mut coeffs = BTreeMap::new();
        if !c.is_zero() {
            coeffs.insert(0, c);
        }
        Poly { coeffs }
    }

    /// The monomial `x`.
    pub fn x() -> Self {
        let mut coeffs = BTreeMap::new();
        coeffs.insert(1, Rational::one());
        Poly { coeffs }
    }

    pub fn degree(&self) -> Option<usize> {
        self.coeffs.keys().next_back().copied()
    }

    pub fn leading_coeff(&self) -> Rational {
        self.coeffs
            .values()
            .next_back()
            .cloned()
            .unwrap_or_else(Rational::zero)
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn is_one(&self) -> bool {
        self.coeffs.len() == 1 && self.coeffs.get(&0).is_some_and(|c| c.is_one())
    }

    pub fn coeff(&self, power: usize) -> Rational {
        self.coeffs.get(&power).cloned().unwrap_or_else(Rational::zero)
    }

    pub fn pow(&self, exp: usize) -> Self {
        let mut result = Poly::one();
        let mut base = self.clone();
        let mut n = exp;
        while n > 0 {
            if n % 2 == 1 {
                result = result * &base;
            }
            base = base.clone() * &base;
            n /= 2;
        }
        result
    }

    pub fn scale(&self, k: &Rational) -> Self {
        if k.is_zero() {
            return Poly::zero();
        }
        let coeffs = self
            .coeffs
            .iter()
            .map(|(exp, coeff)| (*exp, coeff * k))
            .collect();
        Poly { coeffs }
    }

    /// Build a polynomial in `var` from `expr`, or `None` when `expr` is not polynomial in `var`.
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        match expr {
            Expr::Variable(v) if v == var => Some(Poly::x()),
            Expr::Constant(c) => Some(Poly::from_constant(c.clone())),
            Expr::Add(a, b) => Some(Self::from_expr(a, var)? + Self::from_expr(b, var)?),
            Expr::Sub(a, b) => Some(Self::from_expr(a, var)? - Self::from_expr(b, var)?),
            Expr::Mul(a, b) => Some(Self::from_expr(a, var)? * Self::from_expr(b, var)?),
            Expr::Div(a, b) => {
                let denom = Self::from_expr(b, var)?;
                if denom.degree() != Some(0) {
                    return None;
                }
                let inv = Rational::one() / denom.coeff(0);
                Some(Self::from_expr(a, var)?.scale(&inv))
            }
            Expr::Neg(inner) => Some(-Self::from_expr(inner, var)?),
            Expr::Pow(base, exp) => {
                let power = non_negative_exponent(exp)?;
                Some(Self::from_expr(base, var)?.pow(power))
            }
            _ => None,
        }
    }

    pub fn derivative(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .filter(|(exp, _)| **exp > 0)
            .map(|(exp, coeff)| (exp - 1, coeff * Rational::from_integer(BigInt::from(*exp))))
            .collect();
        Poly { coeffs }
    }

    /// Antiderivative with zero constant term.
    pub fn integral(&self) -> Self {
        let coeffs = self
            .coeffs
            .iter()
            .map(|(exp, coeff)| {
                let next = exp + 1;
                (next, coeff / Rational::from_integer(BigInt::from(next)))
            })
            .collect();
        Poly { coeffs }
    }

    pub fn monic(&self) -> Self {
        let lc = self.leading_coeff();
        if lc.is_zero() {
            return self.clone();
        }
        self.scale(&(Rational::one() / lc))
    }

    /// Horner evaluation at an exact point.
    pub fn evaluate(&self, x: &Rational) -> Rational {
        let Some(degree) = self.degree() else {
            return Rational::zero();
        };
        let mut acc = Rational::zero();
        for exp in (0..=degree).rev() {
            acc = acc * x + self.coeff(exp);
        }
        acc
    }

    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        let Some(divisor_degree) = divisor.degree() else {
            return (Poly::zero(), self.clone());
        };
        let divisor_lc = divisor.leading_coeff();
        let mut remainder = self.clone();
        let mut quotient = Poly::zero();

        while let Some(r_deg) = remainder.degree() {
            if r_deg < divisor_degree {
                break;
            }
            let mut term = BTreeMap::new();
            term.insert(r_deg - divisor_degree, remainder.leading_coeff() / &divisor_lc);
            let term_poly = Poly { coeffs: term };
            remainder = remainder - &(term_poly.clone() * divisor);
            quotient = quotient + term_poly;
        }

        (quotient, remainder)
    }

    pub fn div_exact(&self, divisor: &Self) -> Option<Self> {
        let (q, r) = self.div_rem(divisor);
        if r.is_zero() { Some(q) } else { None }
    }

    pub fn gcd(a: &Poly, b: &Poly) -> Poly {
        let mut r0 = a.clone();
        let mut r1 = b.clone();
        while !r1.is_zero() {
            let (_, r) = r0.div_rem(&r1);
            r0 = r1;
            r1 = r;
        }
        r0.monic()
    }

    /// The product of the distinct irreducible factors: same roots, each simple.
    pub fn square_free_part(&self) -> Poly {
        if self.degree().unwrap_or(0) == 0 {
            return self.clone();
        }
        let g = Poly::gcd(self, &self.derivative());
        self.div_exact(&g).unwrap_or_else(|| self.clone()).monic()
    }

    /// Split into a rational content and a primitive integer polynomial with positive leading coefficient.
    pub fn content_and_primitive_part(&self) -> (Rational, Vec<BigInt>) {
        let Some(degree) = self.degree() else {
            return (Rational::zero(), Vec::new());
        };
        let mut lcm = BigInt::one();
        for coeff in self.coeffs.values() {
            lcm = lcm.lcm(coeff.denom());
        }

        let scaled: Vec<BigInt> = (0..=degree)
            .map(|exp| (self.coeff(exp) * Rational::from_integer(lcm.clone())).to_integer())
            .collect();
        let mut gcd = scaled
            .iter()
            .fold(BigInt::zero(), |acc, n| acc.gcd(n));
        if scaled.last().is_some_and(|lead| lead.is_negative()) {
            gcd = -gcd;
        }

        let primitive = scaled.into_iter().map(|n| n / &gcd).collect();
        (Rational::new(gcd, lcm), primitive)
    }

    pub fn to_expr(&self, var: &str) -> Expr {
        let terms: Vec<Expr> = self
            .coeffs
            .iter()
            .rev()
            .map(|(exp, coeff)| {
                let power = match exp {
                    0 => return Expr::Constant(coeff.clone()),
                    1 => Expr::Variable(var.to_string()),
                    _ => Expr::Pow(
                        Expr::Variable(var.to_string()).boxed(),
                        Expr::integer(*exp as u64).boxed(),
                    ),
                };
                if coeff.is_one() {
                    power
                } else {
                    Expr::Mul(Expr::Constant(coeff.clone()).boxed(), power.boxed())
                }
            })
            .collect();
        terms
            .into_iter()
            .reduce(|a, b| Expr::Add(a.boxed(), b.boxed()))
            .unwrap_or_else(crate::expr::zero)
    }
}

impl std::ops::Add for Poly {
    type Output = Poly;
    fn add(self, rhs: Poly) -> Poly {
        let mut coeffs = self.coeffs;
        for (exp, coeff) in rhs.coeffs {
            accumulate(&mut coeffs, exp, coeff);
        }
        Poly { coeffs }
    }
}

impl std::ops::Add<&Poly> for Poly {
    type Output = Poly;
    fn add(self, rhs: &Poly) -> Poly {
        self + rhs.clone()
    }
}

impl std::ops::Sub for Poly {
    type Output = Poly;
    fn sub(self, rhs: Poly) -> Poly {
        self + (-rhs)
    }
}

impl std::ops::Sub<&Poly> for Poly {
    type Output = Poly;
    fn sub(self, rhs: &Poly) -> Poly {
        self - rhs.clone()
    }
}

impl std::ops::Mul<&Poly> for Poly {
    type Output = Poly;
    fn mul(self, rhs: &Poly) -> Poly {
        let mut coeffs = BTreeMap::new();
        for (exp_a, coeff_a) in &self.coeffs {
            for (exp_b, coeff_b) in &rhs.coeffs {
                accumulate(&mut coeffs, exp_a + exp_b, coeff_a * coeff_b);
            }
        }
        Poly { coeffs }
    }
}

impl std::ops::Mul for Poly {
    type Output = Poly;
    fn mul(self, rhs: Poly) -> Poly {
        self * &rhs
    }
}

impl std::ops::Neg for Poly {
    type Output = Poly;
    fn neg(self) -> Poly {
        let coeffs = self.coeffs.into_iter().map(|(exp, c)| (exp, -c)).collect();
        Poly { coeffs }
    }
}

fn accumulate(coeffs: &mut BTreeMap<usize, Rational>, exp: usize, coeff: Rational) {
    if coeff.is_zero() {
        return;
    }
    match coeffs.entry(exp) {
        Entry::Vacant(entry) => {
            entry.insert(coeff);
        }
        Entry::Occupied(mut entry) => {
            let updated = entry.get() + coeff;
            if updated.is_zero() {
                entry.remove();
            } else {
                *entry.get_mut() = updated;
            }
        }
    }
}

pub(crate) fn non_negative_exponent(exp: &Expr) -> Option<usize> {
    let power = integer_exponent(exp)?;
    let power = power.to_usize()?;
    (power <= MAX_EXPANDED_DEGREE).then_some(power)
}

/// True when some integer power in `expr` is too large to expand.
pub(crate) fn exceeds_expansion_limit(expr: &Expr) -> bool {
    match expr {
        Expr::Pow(base, exp) => {
            integer_exponent(exp).is_some_and(|k| k.unsigned_abs() > MAX_EXPANDED_DEGREE as u64)
                || exceeds_expansion_limit(base)
                || exceeds_expansion_limit(exp)
        }
        Expr::Add(a, b) | Expr::Sub(a, b) | Expr::Mul(a, b) | Expr::Div(a, b) => {
            exceeds_expansion_limit(a) || exceeds_expansion_limit(b)
        }
        Expr::Neg(inner)
        | Expr::Sin(inner)
        | Expr::Cos(inner)
        | Expr::Tan(inner)
        | Expr::Exp(inner)
        | Expr::Log(inner) => exceeds_expansion_limit(inner),
        Expr::Variable(_) | Expr::Constant(_) => false,
    }
}

pub(crate) fn integer_exponent(exp: &Expr) -> Option<i64> {
    match exp {
        Expr::Constant(c) if c.is_integer() => c.to_integer().to_i64(),
        Expr::Neg(inner) => integer_exponent(inner).map(|k| -k),
        _ => None,
    }
}
