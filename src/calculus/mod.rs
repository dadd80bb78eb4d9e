//! Calculus routines (differentiation and integration).

pub mod antiderivative;
pub mod differentiate;
pub mod quadrature;

pub use antiderivative::{antiderivative, definite_integral};
pub use differentiate::differentiate;
