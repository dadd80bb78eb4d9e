use thiserror::Error;

pub type Result<T> = std::result::Result<T, CasError>;

/// Failures raised by the symbolic engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CasError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("unsupported operation: {0}")]
    Unsupported(String),
    #[error("undefined value: {0}")]
    Undefined(String),
}

/// The three failure kinds surfaced to callers of the market pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketError {
    /// Demand or cost text failed validation; the pipeline does not say which.
    #[error("invalid expression: {0}")]
    InvalidExpression(String),
    /// The first-order condition MR = MC has no root the root policy accepts.
    #[error("no equilibrium: {0}")]
    NoEquilibrium(String),
    #[error("symbolic computation failed: {0}")]
    SymbolicComputation(#[from] CasError),
}
