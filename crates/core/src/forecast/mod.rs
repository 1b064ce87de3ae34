//! Local statistical forecasts: per-subject point projections, inventory
//! stockout projection and week-over-week trend analysis.

mod inventory;
pub mod strategies;
mod trend;
mod types;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

pub use inventory::InventoryForecast;
pub use trend::{TrendAnalysis, TrendDirection};
pub use types::{ForecastMethod, ForecastPoint, ForecastReport, ForecastSubject};

use crate::config::ForecastingConfig;
use crate::domain::series::TimeSeries;

pub const DEFAULT_FORECAST_PERIODS: u32 = 30;
pub const DEFAULT_INVENTORY_HORIZON_DAYS: u32 = 90;
pub const DEFAULT_TREND_WINDOW_DAYS: u32 = 30;
/// Longest forecast horizon, trend window or inventory horizon in days.
pub const MAX_FORECAST_DAYS: u32 = 365;
/// Confidence attached to forecasts made without any history.
pub const NO_HISTORY_CONFIDENCE: f64 = 0.5;

#[derive(Clone, Debug)]
pub struct Forecaster {
    default_periods: u32,
    inventory_horizon_days: u32,
    trend_window_days: u32,
}

impl Default for Forecaster {
    fn default() -> Self {
        Self {
            default_periods: DEFAULT_FORECAST_PERIODS,
            inventory_horizon_days: DEFAULT_INVENTORY_HORIZON_DAYS,
            trend_window_days: DEFAULT_TREND_WINDOW_DAYS,
        }
    }
}

impl Forecaster {
    pub fn from_config(config: &ForecastingConfig) -> Self {
        Self {
            default_periods: config.default_periods,
            inventory_horizon_days: config.inventory_horizon_days,
            trend_window_days: config.trend_window_days,
        }
    }

    /// Projects `periods` days (or the configured default) past `origin`.
    /// Horizons beyond [`MAX_FORECAST_DAYS`] are cut to that limit.
    pub fn forecast(
        &self,
        subject: ForecastSubject,
        series: &TimeSeries,
        periods: Option<u32>,
        origin: DateTime<Utc>,
    ) -> ForecastReport {
        let requested = periods.unwrap_or(self.default_periods);
        let periods = requested.min(MAX_FORECAST_DAYS);
        if periods < requested {
            warn!(
                event_name = "forecast.horizon_clamped",
                requested,
                periods,
                "forecast horizon clamped"
            );
        }

        if series.is_empty() {
            info!(
                event_name = "forecast.default_used",
                subject = subject.as_str(),
                periods,
                "no history, using subject default"
            );
            return ForecastReport {
                subject,
                method: ForecastMethod::Default,
                confidence_level: NO_HISTORY_CONFIDENCE,
                forecast_periods: periods,
                predictions: strategies::constant(
                    subject.default_value(),
                    NO_HISTORY_CONFIDENCE,
                    periods,
                    origin,
                ),
                generated_at: origin,
            };
        }

        let method = subject.method();
        let (predictions, confidence_level) = match subject {
            ForecastSubject::Product => (
                strategies::moving_average(series, periods, origin),
                strategies::MOVING_AVERAGE_CONFIDENCE,
            ),
            ForecastSubject::Category => (
                strategies::trend_adjusted(series, periods, origin),
                strategies::TREND_CONFIDENCE,
            ),
            ForecastSubject::Revenue => {
                (strategies::seasonal(series, periods, origin), strategies::SEASONAL_CONFIDENCE)
            }
        };

        debug!(
            event_name = "forecast.generated",
            subject = subject.as_str(),
            method = method.as_str(),
            history_len = series.len(),
            periods,
            "forecast generated"
        );

        ForecastReport {
            subject,
            method,
            confidence_level,
            forecast_periods: periods,
            predictions,
            generated_at: origin,
        }
    }

    /// Product demand over `horizon` days (or the configured horizon) against
    /// current stock.
    pub fn inventory(
        &self,
        current_stock: u32,
        demand: &TimeSeries,
        horizon: Option<u32>,
        origin: DateTime<Utc>,
    ) -> InventoryForecast {
        let horizon = horizon.unwrap_or(self.inventory_horizon_days);
        let report = self.forecast(ForecastSubject::Product, demand, Some(horizon), origin);
        let projection = InventoryForecast::project(current_stock, report);
        info!(
            event_name = "forecast.inventory.projected",
            current_stock,
            stockout_day = ?projection.stockout_day,
            reorder = projection.recommended_reorder_quantity,
            "inventory projected"
        );
        projection
    }

    /// Trend over the observations inside the trend window ending at `origin`.
    pub fn trend(&self, series: &TimeSeries, origin: DateTime<Utc>) -> TrendAnalysis {
        let start = origin.date_naive() - Duration::days(i64::from(self.trend_window_days));
        TrendAnalysis::analyze(&series.since(start))
    }
}
