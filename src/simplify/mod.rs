//! Algebraic simplification and substitution.

mod rules;
mod substitute;

pub use rules::{
    simplify, simplify_add, simplify_div, simplify_fully, simplify_mul, simplify_neg, simplify_pow,
    simplify_sub, simplify_with_limit,
};
pub use substitute::substitute;
