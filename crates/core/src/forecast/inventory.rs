use serde::{Deserialize, Serialize};

use super::types::ForecastReport;

/// Stock coverage derived from a demand forecast.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InventoryForecast {
    pub current_stock: u32,
    /// First period at which cumulative demand meets current stock.
    pub stockout_day: Option<u32>,
    pub stockout_confidence: Option<f64>,
    pub cumulative_demand: f64,
    pub recommended_reorder_quantity: f64,
    pub demand_forecast: ForecastReport,
}

impl InventoryForecast {
    pub fn project(current_stock: u32, demand_forecast: ForecastReport) -> Self {
        let stock = f64::from(current_stock);
        let mut cumulative_demand = 0.0;
        let mut stockout = None;

        for point in &demand_forecast.predictions {
            cumulative_demand += point.value;
            if stockout.is_none() && cumulative_demand >= stock {
                stockout = Some((point.period, point.confidence));
            }
        }

        Self {
            current_stock,
            stockout_day: stockout.map(|(period, _)| period),
            stockout_confidence: stockout.map(|(_, confidence)| confidence),
            cumulative_demand,
            recommended_reorder_quantity: (cumulative_demand - stock).max(0.0),
            demand_forecast,
        }
    }

    pub fn will_stock_out(&self) -> bool {
        self.stockout_day.is_some()
    }
}
