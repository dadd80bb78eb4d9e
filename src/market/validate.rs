use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::{ExactEngine, SymbolicEngine};
use crate::error::CasError;
use crate::expr::Expr;

/// Why a piece of formula text was turned away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("expression does not mention `{0}`")]
    MissingVariable(String),
    #[error(transparent)]
    Unparsable(#[from] CasError),
}

/// Formula text that passed validation, together with its parsed tree.
///
/// Only [`validate_expression`] builds these, so anything the solver receives has been
/// checked.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedExpr {
    text: String,
    expr: Expr,
}

impl ValidatedExpr {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }
}

/// True when `text` mentions `Q` (unless `allow_constant`) and parses with `Q` as its only
/// symbol.
pub fn validate(text: &str, allow_constant: bool) -> bool {
    validate_expression(&ExactEngine, text, "Q", allow_constant).is_ok()
}

/// Check normalized `text` and parse it with `engine`.
///
/// The cheap token scan for `var` runs first so that text without the variable never reaches
/// the parser.
pub fn validate_expression<E: SymbolicEngine + ?Sized>(
    engine: &E,
    text: &str,
    var: &str,
    allow_constant: bool,
) -> Result<ValidatedExpr, Rejection> {
    if !allow_constant && !mentions(text, var) {
        warn!(text, var, "expression does not mention the quantity variable");
        return Err(Rejection::MissingVariable(var.to_string()));
    }

    match engine.parse(text, var) {
        Ok(expr) => {
            debug!(text, parsed = %expr, "expression validated");
            Ok(ValidatedExpr {
                text: text.to_string(),
                expr,
            })
        }
        Err(err) => {
            warn!(text, error = %err, "expression failed to parse");
            Err(err.into())
        }
    }
}

fn mentions(text: &str, var: &str) -> bool {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .any(|token| token == var)
}
