use crate::format::expr::pretty;
use crate::market::{EquilibriumRecord, MarketModel};

/// Render an `EquilibriumRecord` as labelled lines, two decimals each.
pub fn equilibrium_summary(record: &EquilibriumRecord) -> Vec<String> {
    vec![
        format!("Profit Maximizing Price: {:.2}", record.price.approx),
        format!("Profit Maximizing Quantity: {:.2}", record.quantity.approx),
        format!("Marginal Cost: {:.2}", record.marginal_cost.approx),
        format!("Marginal Revenue: {:.2}", record.marginal_revenue.approx),
        format!("Total Cost: {:.2}", record.cost.approx),
        format!("Total Revenue: {:.2}", record.revenue.approx),
        format!("Total Profit: {:.2}", record.profit.approx),
        format!("Total Surplus: {:.2}", record.total_surplus()),
        format!("Consumer Surplus: {:.2}", record.consumer_surplus.approx),
        format!("Producer Surplus: {:.2}", record.producer_surplus.approx),
    ]
}

/// The symbolic pieces of a model, one per line.
pub fn model_summary(model: &MarketModel) -> Vec<String> {
    let q = &model.variable;
    vec![
        format!("P({q}) = {}", pretty(&model.price)),
        format!("C({q}) = {}", pretty(&model.cost)),
        format!("TR({q}) = {}", pretty(&model.revenue)),
        format!("π({q}) = {}", pretty(&model.profit)),
        format!("MR({q}) = {}", pretty(&model.marginal_revenue)),
        format!("MC({q}) = {}", pretty(&model.marginal_cost)),
    ]
}
