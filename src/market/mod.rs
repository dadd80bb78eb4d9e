//! Profit-maximizing equilibrium for a single-product firm facing a demand curve.
//!
//! Raw text goes through [`normalize`], then [`validate_expression`], and the validated pair
//! is handed to an [`EquilibriumSolver`], which builds a [`MarketModel`], solves MR = MC
//! and evaluates prices, profit and surpluses at the chosen root.

mod config;
mod curves;
mod equilibrium;
mod model;
mod normalize;
mod validate;

pub use config::{MarketConfig, RootPolicy};
pub use curves::CurveSamples;
pub use equilibrium::{EquilibriumRecord, EquilibriumSolver, compute, solve_equilibrium};
pub use model::MarketModel;
pub use normalize::normalize;
pub use validate::{Rejection, ValidatedExpr, validate, validate_expression};
