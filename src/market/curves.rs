use crate::eval::evaluate_at;
use crate::expr::Expr;

use super::model::MarketModel;

/// Evenly spaced samples of the demand and profit curves, ready for plotting.
///
/// A curve that is undefined at a sample holds `f64::NAN` there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CurveSamples {
    pub quantities: Vec<f64>,
    pub prices: Vec<f64>,
    pub profits: Vec<f64>,
    /// True where the quantity lies between 0 and Q*, the region shaded as surplus.
    pub in_surplus: Vec<bool>,
}

impl CurveSamples {
    /// Sample `points` quantities over `[0, span * quantity]`.
    pub fn sample(model: &MarketModel, quantity: f64, points: usize, span: f64) -> Self {
        let end = span * quantity;
        let step = if points > 1 {
            end / (points - 1) as f64
        } else {
            0.0
        };
        let quantities: Vec<f64> = (0..points).map(|i| step * i as f64).collect();

        let curve = |expr: &Expr| -> Vec<f64> {
            quantities
                .iter()
                .map(|&q| evaluate_at(expr, &model.variable, q).unwrap_or(f64::NAN))
                .collect()
        };
        let prices = curve(&model.price);
        let profits = curve(&model.profit);
        let in_surplus = quantities
            .iter()
            .map(|q| q.abs() <= quantity.abs())
            .collect();

        CurveSamples {
            quantities,
            prices,
            profits,
            in_surplus,
        }
    }

    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }
}
