//! Formatting helpers for rendering expressions and equilibrium results.

pub mod expr;
pub mod summary;

pub use expr::pretty;
pub use summary::{equilibrium_summary, model_summary};
