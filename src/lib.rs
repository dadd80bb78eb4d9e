//! Profit-maximizing equilibrium and welfare measures for a monopolist, computed from
//! free-text inverse demand and cost functions on top of a small exact computer algebra
//! system.

pub mod calculus;
pub mod engine;
pub mod error;
pub mod eval;
pub mod expr;
pub mod format;
pub mod market;
pub mod parser;
pub mod polynomial;
pub mod prelude;
pub mod scalar;
pub mod simplify;
pub mod solver;
mod ui;

pub use calculus::{antiderivative, definite_integral, differentiate};
pub use engine::{ExactEngine, SymbolicEngine};
pub use error::{CasError, MarketError, Result};
pub use expr::{Expr, Rational, add, div, mul, neg, one, pow, rational, sqrt, sub, zero};
pub use format::{equilibrium_summary, model_summary, pretty};
pub use market::{
    CurveSamples, EquilibriumRecord, EquilibriumSolver, MarketConfig, MarketModel, RootPolicy,
    ValidatedExpr, compute, normalize, solve_equilibrium, validate, validate_expression,
};
pub use parser::{parse_expr, parse_in};
pub use polynomial::Poly;
pub use scalar::Scalar;
pub use simplify::{simplify, simplify_fully, simplify_with_limit, substitute};
pub use solver::solve_univariate;
