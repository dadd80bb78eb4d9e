use tracing::debug;

use crate::engine::SymbolicEngine;
use crate::error::Result;
use crate::expr::{Expr, mul, sub};

use super::validate::ValidatedExpr;

/// The symbolic economics of one demand/cost pair.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketModel {
    pub variable: String,
    /// Inverse demand P(Q).
    pub price: Expr,
    /// Total cost C(Q).
    pub cost: Expr,
    /// TR = P(Q)*Q.
    pub revenue: Expr,
    /// π = TR - C.
    pub profit: Expr,
    pub marginal_revenue: Expr,
    pub marginal_cost: Expr,
}

impl MarketModel {
    pub fn build<E: SymbolicEngine + ?Sized>(
        engine: &E,
        demand: &ValidatedExpr,
        cost: &ValidatedExpr,
        var: &str,
    ) -> Result<Self> {
        let price = demand.expr().clone();
        let cost = cost.expr().clone();
        let revenue = mul(price.clone(), Expr::var(var));
        let profit = sub(revenue.clone(), cost.clone());
        let marginal_revenue = engine.differentiate(&revenue, var)?;
        let marginal_cost = engine.differentiate(&cost, var)?;
        debug!(
            mr = %marginal_revenue,
            mc = %marginal_cost,
            "built marginal revenue and marginal cost"
        );

        Ok(MarketModel {
            variable: var.to_string(),
            price,
            cost,
            revenue,
            profit,
            marginal_revenue,
            marginal_cost,
        })
    }
}
