//! Numeric evaluation of expression trees.

use crate::error::{CasError, Result};
use crate::expr::Expr;
use num_traits::ToPrimitive;

/// Evaluate a variable-free expression to a finite `f64`.
pub fn evaluate(expr: &Expr) -> Result<f64> {
    Evaluator { binding: None }.eval(expr)
}

/// Evaluate `expr` with `var` bound to `x`.
pub fn evaluate_at(expr: &Expr, var: &str, x: f64) -> Result<f64> {
    Evaluator {
        binding: Some((var, x)),
    }
    .eval(expr)
}

struct Evaluator<'a> {
    binding: Option<(&'a str, f64)>,
}

impl Evaluator<'_> {
    fn eval(&self, expr: &Expr) -> Result<f64> {
        let value = match expr {
            Expr::Variable(name) => match self.binding {
                Some((var, x)) if var == name => x,
                _ => {
                    return Err(CasError::Undefined(format!(
                        "free symbol `{name}` has no numeric value"
                    )));
                }
            },
            Expr::Constant(c) => c.to_f64().unwrap_or(f64::NAN),
            Expr::Add(a, b) => self.eval(a)? + self.eval(b)?,
            Expr::Sub(a, b) => self.eval(a)? - self.eval(b)?,
            Expr::Mul(a, b) => self.eval(a)? * self.eval(b)?,
            Expr::Div(a, b) => {
                let den = self.eval(b)?;
                if den == 0.0 {
                    return Err(CasError::Undefined(format!("division by zero in {expr}")));
                }
                self.eval(a)? / den
            }
            Expr::Pow(a, b) => self.eval(a)?.powf(self.eval(b)?),
            Expr::Neg(a) => -self.eval(a)?,
            Expr::Sin(a) => self.eval(a)?.sin(),
            Expr::Cos(a) => self.eval(a)?.cos(),
            Expr::Tan(a) => self.eval(a)?.tan(),
            Expr::Exp(a) => self.eval(a)?.exp(),
            Expr::Log(a) => {
                let arg = self.eval(a)?;
                if arg <= 0.0 {
                    return Err(CasError::Undefined(format!(
                        "logarithm of non-positive value {arg} in {expr}"
                    )));
                }
                arg.ln()
            }
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(CasError::Undefined(format!("{expr} is not a finite real number")))
        }
    }
}
