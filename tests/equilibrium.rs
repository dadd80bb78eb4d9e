use std::cell::RefCell;

use monopolist::{
    CasError, EquilibriumRecord, EquilibriumSolver, ExactEngine, Expr, MarketConfig, MarketError,
    Rational, RootPolicy, Scalar, SymbolicEngine, compute, equilibrium_summary, model_summary, normalize,
    solve_equilibrium,
};
use proptest::prelude::*;

fn linear_market() -> EquilibriumRecord {
    compute("100 - Q", "10 + 2Q").expect("linear market has an equilibrium")
}

fn solver_with(policy: RootPolicy) -> EquilibriumSolver {
    EquilibriumSolver::new(
        ExactEngine,
        MarketConfig::default().with_root_policy(policy),
    )
}

#[test]
fn linear_demand_and_cost() {
    let record = linear_market();
    assert_eq!(record.quantity.exact, Expr::integer(49));
    assert_eq!(record.price.exact, Expr::integer(51));
    assert_eq!(record.revenue.exact, Expr::integer(2499));
    assert_eq!(record.cost.exact, Expr::integer(108));
    assert_eq!(record.profit.exact, Expr::integer(2391));
    assert_eq!(record.marginal_revenue.exact, Expr::integer(2));
    assert_eq!(record.marginal_cost.exact, Expr::integer(2));
    assert_eq!(record.consumer_surplus.exact, Expr::constant(2401, 2));
    assert_eq!(record.producer_surplus.exact, Expr::integer(2401));
    assert_eq!(record.consumer_surplus.approx, 1200.5);
    assert_eq!(record.total_surplus(), 3601.5);
}

#[test]
fn pre_normalized_text_solves_directly() {
    let record = solve_equilibrium("100 - Q", "10 + 2*Q").unwrap();
    assert_eq!(record, linear_market());
}

#[test]
fn summary_lines_use_two_decimals() {
    assert_eq!(
        equilibrium_summary(&linear_market()),
        vec![
            "Profit Maximizing Price: 51.00",
            "Profit Maximizing Quantity: 49.00",
            "Marginal Cost: 2.00",
            "Marginal Revenue: 2.00",
            "Total Cost: 108.00",
            "Total Revenue: 2499.00",
            "Total Profit: 2391.00",
            "Total Surplus: 3601.50",
            "Consumer Surplus: 1200.50",
            "Producer Surplus: 2401.00",
        ]
    );
}

#[test]
fn constant_demand_is_invalid() {
    assert!(matches!(
        compute("50", "10 + 2Q"),
        Err(MarketError::InvalidExpression(_))
    ));
}

#[test]
fn constant_cost_is_allowed() {
    // MR = 100 - 2Q = 0
    let record = compute("100 - Q", "500").unwrap();
    assert_eq!(record.quantity.exact, Expr::integer(50));
    assert_eq!(record.profit.exact, Expr::integer(2000));
}

#[test]
fn either_field_failing_gives_one_error() {
    let demand_bad = compute("100 - Q +", "2Q").unwrap_err();
    let cost_bad = compute("100 - Q", "2Q +").unwrap_err();
    assert!(matches!(demand_bad, MarketError::InvalidExpression(_)));
    assert_eq!(demand_bad, cost_bad);
}

#[test]
fn parallel_marginals_have_no_equilibrium() {
    // MR = 10, MC = 2
    assert!(matches!(
        compute("10 + 0Q", "2Q"),
        Err(MarketError::NoEquilibrium(_))
    ));
}

#[test]
fn negative_quantity_depends_on_policy() {
    // MR = 10 - 2Q, MC = 20  →  Q = -5
    assert!(matches!(
        compute("10 - Q", "20Q"),
        Err(MarketError::NoEquilibrium(_))
    ));

    let record = solver_with(RootPolicy::First)
        .compute("10 - Q", "20Q")
        .unwrap();
    assert_eq!(record.quantity.exact, Expr::integer(-5));
    assert_eq!(record.price.exact, Expr::integer(15));
    assert_eq!(record.profit.exact, Expr::integer(25));
}

#[test]
fn tiny_negative_quantity_is_still_negative() {
    // Q* = -10^(-400)/2, which rounds to zero as an f64
    let cost = "Q + 10^(-400)*Q";
    assert!(matches!(
        compute("1 - Q", cost),
        Err(MarketError::NoEquilibrium(_))
    ));
    assert!(matches!(
        solver_with(RootPolicy::MaxProfit).compute("1 - Q", cost),
        Err(MarketError::NoEquilibrium(_))
    ));

    let record = solver_with(RootPolicy::First).compute("1 - Q", cost).unwrap();
    assert_eq!(record.quantity.approx, 0.0);
    assert!(record.quantity.is_negative());
}

#[test]
fn cubic_cost_skips_the_negative_root() {
    // Q^2 - 18Q - 50 = 0  →  Q = 9 ± sqrt(131)
    let record = compute("100 - Q", "Q^3/3 - 10Q^2 + 50Q").unwrap();
    let expected = 9.0 + 131f64.sqrt();
    assert!((record.quantity.approx - expected).abs() < 1e-9);
    assert!((record.price.approx - (100.0 - expected)).abs() < 1e-9);
    assert!(!record.quantity.is_rational());
    let gap = record.marginal_revenue.approx - record.marginal_cost.approx;
    assert!(gap.abs() < 1e-6);
}

#[test]
fn max_profit_skips_the_profit_minimum() {
    // MR = 100 - 2Q, MC = Q^2 - 20Q + 136  →  Q = 9 ± 3*sqrt(5); the smaller root minimizes profit
    let demand = "100 - Q";
    let cost = "Q^3/3 - 10Q^2 + 136Q";
    let low = 9.0 - 3.0 * 5f64.sqrt();
    let high = 9.0 + 3.0 * 5f64.sqrt();

    let smallest = compute(demand, cost).unwrap();
    assert!((smallest.quantity.approx - low).abs() < 1e-9);

    let best = solver_with(RootPolicy::MaxProfit)
        .compute(demand, cost)
        .unwrap();
    assert!((best.quantity.approx - high).abs() < 1e-9);
    assert!(best.profit.approx > smallest.profit.approx);
}

#[test]
fn high_degree_demand_is_solved() {
    // MR = 100 - 71Q^70, MC = 2
    let record = compute("100 - Q^70", "2Q").unwrap();
    let expected = (98.0f64 / 71.0).powf(1.0 / 70.0);
    assert!((record.quantity.approx - expected).abs() < 1e-12);
    assert!((record.price.approx - (100.0 - 98.0 / 71.0)).abs() < 1e-9);
    let gap = record.marginal_revenue.approx - record.marginal_cost.approx;
    assert!(gap.abs() < 1e-9);
}

#[test]
fn transcendental_first_order_condition_is_a_computation_error() {
    assert!(matches!(
        compute("50exp(-Q/10)", "2Q"),
        Err(MarketError::SymbolicComputation(CasError::Unsupported(_)))
    ));
}

#[test]
fn divergent_surplus_is_a_computation_error() {
    // Q* = 10*sqrt(2), but ∫ P over [0, Q*] has a pole at 0
    assert!(matches!(
        compute("100/Q^2 + 1", "Q/2"),
        Err(MarketError::SymbolicComputation(CasError::Undefined(_)))
    ));
}

#[test]
fn custom_quantity_symbol() {
    let solver = EquilibriumSolver::new(ExactEngine, MarketConfig::default().with_variable("x"));
    let record = solver.compute("100 - x", "10 + 2x").unwrap();
    assert_eq!(record.quantity.exact, Expr::integer(49));
    assert!(matches!(
        solver.compute("100 - Q", "10 + 2Q"),
        Err(MarketError::InvalidExpression(_))
    ));
}

#[test]
fn curve_samples_cover_one_and_a_half_times_the_quantity() {
    let solver: EquilibriumSolver = EquilibriumSolver::default();
    let (demand, cost) = solver
        .validate_pair(&normalize("100 - Q"), &normalize("10 + 2Q"))
        .unwrap();
    let model = solver.model(&demand, &cost).unwrap();
    let record = solver.solve_model(&model).unwrap();
    let curves = solver.curves(&model, &record);

    assert_eq!(curves.len(), 500);
    assert_eq!(curves.quantities[0], 0.0);
    assert!((curves.quantities[499] - 73.5).abs() < 1e-9);
    assert_eq!(curves.prices[0], 100.0);
    assert!((curves.prices[499] - 26.5).abs() < 1e-9);
    assert_eq!(curves.profits[0], -10.0);
    assert_eq!(curves.in_surplus.iter().filter(|inside| **inside).count(), 333);
    assert!(curves.in_surplus[0]);
    assert!(!curves.in_surplus[499]);
}

#[test]
fn unit_elastic_demand_has_zero_marginal_revenue() {
    let solver: EquilibriumSolver = EquilibriumSolver::default();
    let (demand, cost) = solver.validate_pair("100/Q", "2*Q").unwrap();
    let model = solver.model(&demand, &cost).unwrap();
    assert_eq!(model.marginal_revenue, Expr::integer(0));
    assert_eq!(model_summary(&model)[4], "MR(Q) = 0");
    assert_eq!(model_summary(&model)[0], "P(Q) = 100 / Q");
}

#[test]
fn undefined_curve_points_are_nan() {
    let solver = EquilibriumSolver::new(ExactEngine, MarketConfig::default().with_curve_points(5));
    let (demand, cost) = solver.validate_pair("100/(Q + 1)", "Q").unwrap();
    let model = solver.model(&demand, &cost).unwrap();
    let record = solver.solve_model(&model).unwrap();
    let curves = solver.curves(&model, &record);
    assert_eq!(curves.len(), 5);
    assert_eq!(curves.prices[0], 100.0);
    assert!(curves.prices.iter().all(|p| p.is_finite()));

    let (demand, cost) = solver.validate_pair("100 - log(Q)", "Q").unwrap();
    let model = solver.model(&demand, &cost).unwrap();
    let samples = monopolist::CurveSamples::sample(&model, 10.0, 3, 1.0);
    assert!(samples.prices[0].is_nan());
    assert!(samples.prices[1].is_finite());
}

/// Delegates to `ExactEngine` and records which capabilities were used.
#[derive(Default)]
struct RecordingEngine {
    calls: RefCell<Vec<&'static str>>,
}

impl SymbolicEngine for RecordingEngine {
    fn parse(&self, input: &str, var: &str) -> monopolist::Result<Expr> {
        self.calls.borrow_mut().push("parse");
        ExactEngine.parse(input, var)
    }

    fn differentiate(&self, expr: &Expr, var: &str) -> monopolist::Result<Expr> {
        self.calls.borrow_mut().push("differentiate");
        ExactEngine.differentiate(expr, var)
    }

    fn solve(&self, lhs: &Expr, rhs: &Expr, var: &str) -> monopolist::Result<Vec<Expr>> {
        self.calls.borrow_mut().push("solve");
        ExactEngine.solve(lhs, rhs, var)
    }

    fn substitute(&self, expr: &Expr, var: &str, value: &Expr) -> monopolist::Result<Scalar> {
        self.calls.borrow_mut().push("substitute");
        ExactEngine.substitute(expr, var, value)
    }

    fn integrate(
        &self,
        expr: &Expr,
        var: &str,
        lower: &Expr,
        upper: &Expr,
    ) -> monopolist::Result<Scalar> {
        self.calls.borrow_mut().push("integrate");
        ExactEngine.integrate(expr, var, lower, upper)
    }
}

#[test]
fn solver_only_uses_the_engine_capabilities() {
    let solver = EquilibriumSolver::new(RecordingEngine::default(), MarketConfig::default());
    let record = solver.compute("100 - Q", "10 + 2Q").unwrap();
    assert_eq!(record, linear_market());

    let calls = solver.engine().calls.borrow();
    let count = |name| calls.iter().filter(|c| **c == name).count();
    assert_eq!(count("parse"), 2);
    assert_eq!(count("differentiate"), 2);
    assert_eq!(count("solve"), 1);
    assert_eq!(count("integrate"), 2);
    assert!(count("substitute") >= 6);
}

#[test]
fn repeated_solves_are_identical() {
    let first = compute("100 - Q", "Q^3/3 - 10Q^2 + 50Q").unwrap();
    let second = compute("100 - Q", "Q^3/3 - 10Q^2 + 50Q").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.quantity.approx.to_bits(), second.quantity.approx.to_bits());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn linear_markets_match_closed_form(
        a in 21i64..200,
        b in 1i64..10,
        c in 0i64..100,
        d in 0i64..20,
    ) {
        let record = compute(&format!("{a} - {b}Q"), &format!("{c} + {d}Q")).unwrap();
        let quantity = Rational::new((a - d).into(), (2 * b).into());
        prop_assert_eq!(&record.quantity.exact, &Expr::Constant(quantity));
        prop_assert_eq!(
            &record.price.exact,
            &Expr::Constant(Rational::new((a + d).into(), 2.into()))
        );

        let q = (a - d) as f64 / (2 * b) as f64;
        let consumer = b as f64 * q * q / 2.0;
        prop_assert!((record.consumer_surplus.approx - consumer).abs() < 1e-9 * (1.0 + consumer));

        let again = compute(&format!("{a} - {b}Q"), &format!("{c} + {d}Q")).unwrap();
        prop_assert_eq!(record, again);
    }
}
