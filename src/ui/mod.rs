//! String-based helpers for quick usage and rendering.

use crate::calculus::{definite_integral, differentiate as differentiate_expr};
use crate::error::{CasError, MarketError, Result};
use crate::expr::Expr;
use crate::format::{equilibrium_summary, pretty};
use crate::market::{self, EquilibriumRecord};
use crate::parser::parse_expr;
use crate::simplify::simplify_fully;
use crate::solver::solve_univariate;

pub fn parse(input: &str) -> Result<Expr> {
    parse_expr(input)
}

pub fn differentiate(input: &str, var: &str) -> Result<Expr> {
    let expr = parse_expr(input)?;
    Ok(simplify_fully(differentiate_expr(var, &expr)))
}

pub fn diff(input: &str, var: &str) -> Result<String> {
    Ok(pretty(&differentiate(input, var)?))
}

pub fn simplify(input: &str) -> Result<Expr> {
    let expr = parse_expr(input)?;
    Ok(simplify_fully(expr))
}

pub fn simp(input: &str) -> Result<String> {
    Ok(pretty(&simplify(input)?))
}

/// Definite integral of `input` over `[lower, upper]`, pretty-printed.
pub fn inte(input: &str, var: &str, lower: &str, upper: &str) -> Result<String> {
    let value = definite_integral(
        var,
        &parse_expr(input)?,
        &parse_expr(lower)?,
        &parse_expr(upper)?,
    )?;
    Ok(pretty(&simplify_fully(value)))
}

/// Real solutions of the equation `"lhs = rhs"`, pretty-printed.
pub fn solve(equation: &str, var: &str) -> Result<Vec<String>> {
    let (lhs, rhs) = parse_equation(equation)?;
    Ok(solve_univariate(&lhs, &rhs, var)?
        .iter()
        .map(pretty)
        .collect())
}

pub fn normalize(input: &str) -> String {
    market::normalize(input)
}

pub fn validate(input: &str, allow_constant: bool) -> bool {
    market::validate(input, allow_constant)
}

pub fn solve_equilibrium(
    demand: &str,
    cost: &str,
) -> std::result::Result<EquilibriumRecord, MarketError> {
    market::solve_equilibrium(demand, cost)
}

pub fn compute(
    demand: &str,
    cost: &str,
) -> std::result::Result<EquilibriumRecord, MarketError> {
    market::compute(demand, cost)
}

/// Run the whole pipeline on raw input and render the labelled result lines.
pub fn summary(demand: &str, cost: &str) -> std::result::Result<Vec<String>, MarketError> {
    Ok(equilibrium_summary(&compute(demand, cost)?))
}

fn parse_equation(input: &str) -> Result<(Expr, Expr)> {
    let (lhs, rhs) = input
        .split_once('=')
        .ok_or_else(|| CasError::Parse("equation must contain '='".to_string()))?;
    Ok((parse_expr(lhs.trim())?, parse_expr(rhs.trim())?))
}
