use tracing::{debug, info, warn};

use crate::engine::{ExactEngine, SymbolicEngine};
use crate::error::MarketError;
use crate::expr::Expr;
use crate::scalar::Scalar;

use super::config::{MarketConfig, RootPolicy};
use super::curves::CurveSamples;
use super::model::MarketModel;
use super::normalize::normalize;
use super::validate::{ValidatedExpr, validate_expression};

/// Everything known about the market at the profit-maximizing quantity.
///
/// Every field is evaluated at `Q = quantity`. Records are plain values: two solves of the
/// same inputs compare equal.
#[derive(Clone, Debug, PartialEq)]
pub struct EquilibriumRecord {
    pub quantity: Scalar,
    pub price: Scalar,
    pub profit: Scalar,
    pub revenue: Scalar,
    pub cost: Scalar,
    pub marginal_revenue: Scalar,
    pub marginal_cost: Scalar,
    /// ∫₀^Q* P(Q) dQ - P*·Q*
    pub consumer_surplus: Scalar,
    /// P*·Q* - ∫₀^Q* MC(Q) dQ
    pub producer_surplus: Scalar,
}

impl EquilibriumRecord {
    pub fn total_surplus(&self) -> f64 {
        self.consumer_surplus.approx + self.producer_surplus.approx
    }
}

/// Solves for the profit-maximizing equilibrium through a [`SymbolicEngine`].
#[derive(Clone, Debug)]
pub struct EquilibriumSolver<E = ExactEngine> {
    engine: E,
    config: MarketConfig,
}

impl Default for EquilibriumSolver<ExactEngine> {
    fn default() -> Self {
        EquilibriumSolver::new(ExactEngine, MarketConfig::default())
    }
}

impl<E: SymbolicEngine> EquilibriumSolver<E> {
    pub fn new(engine: E, config: MarketConfig) -> Self {
        EquilibriumSolver { engine, config }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Validate normalized demand and cost text for this solver's variable.
    ///
    /// Demand must mention the variable; cost may be a constant. Either failing yields one
    /// [`MarketError::InvalidExpression`] that does not say which field was at fault.
    pub fn validate_pair(
        &self,
        demand_text: &str,
        cost_text: &str,
    ) -> Result<(ValidatedExpr, ValidatedExpr), MarketError> {
        let var = self.config.variable.as_str();
        let demand = validate_expression(&self.engine, demand_text, var, false);
        let cost = validate_expression(&self.engine, cost_text, var, true);
        match (demand, cost) {
            (Ok(demand), Ok(cost)) => Ok((demand, cost)),
            _ => Err(MarketError::InvalidExpression(format!(
                "demand and cost must be valid expressions in {var}, and demand must depend on {var}"
            ))),
        }
    }

    pub fn model(
        &self,
        demand: &ValidatedExpr,
        cost: &ValidatedExpr,
    ) -> Result<MarketModel, MarketError> {
        Ok(MarketModel::build(
            &self.engine,
            demand,
            cost,
            &self.config.variable,
        )?)
    }

    /// Solve MR = MC, pick a root with the configured [`RootPolicy`] and evaluate the
    /// market there.
    pub fn solve(
        &self,
        demand: &ValidatedExpr,
        cost: &ValidatedExpr,
    ) -> Result<EquilibriumRecord, MarketError> {
        let model = self.model(demand, cost)?;
        self.solve_model(&model)
    }

    pub fn solve_model(&self, model: &MarketModel) -> Result<EquilibriumRecord, MarketError> {
        let var = model.variable.as_str();
        let roots = self
            .engine
            .solve(&model.marginal_revenue, &model.marginal_cost, var)?;
        debug!(
            candidates = ?roots.iter().map(ToString::to_string).collect::<Vec<_>>(),
            "solved MR = MC"
        );

        let (root, quantity) = self.select_root(model, &roots)?;
        let at = |expr: &Expr| self.engine.substitute(expr, var, &root);

        let price = at(&model.price)?;
        let revenue = at(&model.revenue)?;
        let cost = at(&model.cost)?;
        let profit = at(&model.profit)?;
        let marginal_revenue = at(&model.marginal_revenue)?;
        let marginal_cost = at(&model.marginal_cost)?;

        let origin = Expr::integer(0);
        let demand_area = self.engine.integrate(&model.price, var, &origin, &root)?;
        let cost_area = self
            .engine
            .integrate(&model.marginal_cost, var, &origin, &root)?;
        let expenditure = price.mul(&quantity)?;
        let consumer_surplus = demand_area.sub(&expenditure)?;
        let producer_surplus = expenditure.sub(&cost_area)?;

        let record = EquilibriumRecord {
            quantity,
            price,
            profit,
            revenue,
            cost,
            marginal_revenue,
            marginal_cost,
            consumer_surplus,
            producer_surplus,
        };
        info!(
            target: "equilibrium",
            quantity = record.quantity.approx,
            price = record.price.approx,
            profit = record.profit.approx,
            consumer_surplus = record.consumer_surplus.approx,
            producer_surplus = record.producer_surplus.approx,
        );
        Ok(record)
    }

    fn select_root(
        &self,
        model: &MarketModel,
        roots: &[Expr],
    ) -> Result<(Expr, Scalar), MarketError> {
        let var = model.variable.as_str();
        let quantity_of = |root: &Expr| self.engine.substitute(&Expr::var(var), var, root);

        let mut candidates = Vec::with_capacity(roots.len());
        for root in roots {
            candidates.push((root.clone(), quantity_of(root)?));
        }

        let chosen = match self.config.root_policy {
            RootPolicy::First => candidates.into_iter().next(),
            RootPolicy::SmallestNonNegative => candidates
                .into_iter()
                .find(|(_, quantity)| !quantity.is_negative()),
            RootPolicy::MaxProfit => {
                let mut best: Option<(Expr, Scalar, f64)> = None;
                for (root, quantity) in candidates {
                    if quantity.is_negative() {
                        continue;
                    }
                    let profit = self.engine.substitute(&model.profit, var, &root)?.approx;
                    let better = best.as_ref().map_or(true, |(_, _, top)| profit > *top);
                    if better {
                        best = Some((root, quantity, profit));
                    }
                }
                best.map(|(root, quantity, _)| (root, quantity))
            }
        };

        chosen.ok_or_else(|| {
            let listed: Vec<String> = roots.iter().map(ToString::to_string).collect();
            let detail = if listed.is_empty() {
                format!(
                    "MR = MC has no real solution for {var} (MR = {}, MC = {})",
                    model.marginal_revenue, model.marginal_cost
                )
            } else {
                format!(
                    "no root of MR = MC satisfies {:?}: [{}]",
                    self.config.root_policy,
                    listed.join(", ")
                )
            };
            warn!(%detail, "no equilibrium");
            MarketError::NoEquilibrium(detail)
        })
    }

    /// Validate already-normalized text, then solve.
    pub fn solve_text(
        &self,
        demand_text: &str,
        cost_text: &str,
    ) -> Result<EquilibriumRecord, MarketError> {
        let (demand, cost) = self.validate_pair(demand_text, cost_text)?;
        self.solve(&demand, &cost)
    }

    /// Normalize, validate and solve raw user input.
    pub fn compute(
        &self,
        raw_demand: &str,
        raw_cost: &str,
    ) -> Result<EquilibriumRecord, MarketError> {
        self.solve_text(&normalize(raw_demand), &normalize(raw_cost))
    }

    /// Sample the demand and profit curves around `record` for plotting.
    pub fn curves(&self, model: &MarketModel, record: &EquilibriumRecord) -> CurveSamples {
        CurveSamples::sample(
            model,
            record.quantity.approx,
            self.config.curve_points,
            self.config.curve_span,
        )
    }
}

/// Solve validated-on-entry demand and cost text with the default configuration.
pub fn solve_equilibrium(
    demand_text: &str,
    cost_text: &str,
) -> Result<EquilibriumRecord, MarketError> {
    EquilibriumSolver::<ExactEngine>::default().solve_text(demand_text, cost_text)
}

/// The whole pipeline on raw input: normalize, validate, solve.
pub fn compute(raw_demand: &str, raw_cost: &str) -> Result<EquilibriumRecord, MarketError> {
    EquilibriumSolver::<ExactEngine>::default().compute(raw_demand, raw_cost)
}
