//! Knobs for the equilibrium computation.

/// Which root of MR = MC becomes the equilibrium quantity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RootPolicy {
    /// The smallest real root that is not negative.
    #[default]
    SmallestNonNegative,
    /// The first root in ascending order, negative quantities included.
    First,
    /// Among non-negative roots, the one with the highest profit. Ties go to the smaller root.
    MaxProfit,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MarketConfig {
    /// Name of the quantity symbol.
    pub variable: String,
    pub root_policy: RootPolicy,
    /// Number of samples in [`CurveSamples`](super::CurveSamples).
    pub curve_points: usize,
    /// Curves are sampled over `[0, curve_span * Q*]`.
    pub curve_span: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        MarketConfig {
            variable: "Q".to_string(),
            root_policy: RootPolicy::default(),
            curve_points: 500,
            curve_span: 1.5,
        }
    }
}

impl MarketConfig {
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    pub fn with_root_policy(mut self, policy: RootPolicy) -> Self {
        self.root_policy = policy;
        self
    }

    pub fn with_curve_points(mut self, points: usize) -> Self {
        self.curve_points = points;
        self
    }

    pub fn with_curve_span(mut self, span: f64) -> Self {
        self.curve_span = span;
        self
    }
}
