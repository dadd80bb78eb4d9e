//! String-based convenience API for quick experimentation.

pub use crate::ui::{
    compute, diff, differentiate, inte, normalize, parse, simp, simplify, solve,
    solve_equilibrium, summary, validate,
};
