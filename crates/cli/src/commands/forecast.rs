use std::path::Path;

use chrono::{DateTime, Utc};
use shopsense_core::config::LoadOptions;
use shopsense_core::errors::ApplicationError;
use shopsense_core::forecast::{ForecastSubject, Forecaster, MAX_FORECAST_DAYS};

use super::input::load_series;
use super::{load_config, respond, CommandResult};

pub fn forecast(
    options: &LoadOptions,
    series_path: &Path,
    subject: ForecastSubject,
    periods: Option<u32>,
    origin: DateTime<Utc>,
) -> CommandResult {
    respond("forecast", || {
        let periods = checked_days("--periods", periods)?;
        let config = load_config(options)?;
        let series = load_series(series_path)?;
        let report =
            Forecaster::from_config(&config.forecasting).forecast(subject, &series, periods, origin);
        Ok(CommandResult::with_data(
            "forecast",
            format!(
                "{} forecast over {} periods using {}",
                subject.as_str(),
                report.forecast_periods,
                report.method.as_str()
            ),
            report,
        ))
    })
}

pub fn inventory(
    options: &LoadOptions,
    series_path: &Path,
    current_stock: u32,
    horizon: Option<u32>,
    origin: DateTime<Utc>,
) -> CommandResult {
    respond("inventory", || {
        let horizon = checked_days("--horizon", horizon)?;
        let config = load_config(options)?;
        let demand = load_series(series_path)?;
        let projection = Forecaster::from_config(&config.forecasting).inventory(
            current_stock,
            &demand,
            horizon,
            origin,
        );
        let message = match projection.stockout_day {
            Some(day) => format!("stock runs out on day {day}"),
            None => "stock covers the forecast horizon".to_string(),
        };
        Ok(CommandResult::with_data("inventory", message, projection))
    })
}

pub fn trend(options: &LoadOptions, series_path: &Path, origin: DateTime<Utc>) -> CommandResult {
    respond("trend", || {
        let config = load_config(options)?;
        let series = load_series(series_path)?;
        let analysis = Forecaster::from_config(&config.forecasting).trend(&series, origin);
        Ok(CommandResult::with_data(
            "trend",
            format!("trend is {}", analysis.direction.as_str()),
            analysis,
        ))
    })
}

fn checked_days(flag: &str, days: Option<u32>) -> Result<Option<u32>, ApplicationError> {
    match days {
        Some(value) if !(1..=MAX_FORECAST_DAYS).contains(&value) => Err(ApplicationError::Input(
            format!("{flag} must be in range 1..={MAX_FORECAST_DAYS}, got {value}"),
        )),
        _ => Ok(days),
    }
}
