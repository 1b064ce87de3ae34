//! Point forecasts over a daily series. Each strategy always returns exactly
//! `periods` points numbered from 1, dated `origin + period` days.

use chrono::{DateTime, Datelike, Utc, Weekday};

use super::types::{period_date, ForecastPoint};
use crate::domain::series::TimeSeries;

pub const WINDOW_DAYS: usize = 7;

pub const MOVING_AVERAGE_CONFIDENCE: f64 = 0.8;
pub const TREND_CONFIDENCE: f64 = 0.75;
pub const SEASONAL_CONFIDENCE: f64 = 0.7;

const MOVING_AVERAGE_EMPTY_VALUE: f64 = 1.0;
const TREND_EMPTY_VALUE: f64 = 100.0;
const SEASONAL_EMPTY_VALUE: f64 = 1000.0;

/// Mean of the last week, floored at 0 and repeated across the horizon.
pub fn moving_average(series: &TimeSeries, periods: u32, origin: DateTime<Utc>) -> Vec<ForecastPoint> {
    let average = series.tail_mean(WINDOW_DAYS).unwrap_or(MOVING_AVERAGE_EMPTY_VALUE);
    constant(average.max(0.0), MOVING_AVERAGE_CONFIDENCE, periods, origin)
}

/// Last-week mean grown linearly by the week-over-week change ratio.
pub fn trend_adjusted(series: &TimeSeries, periods: u32, origin: DateTime<Utc>) -> Vec<ForecastPoint> {
    let (base, trend) = if series.len() < 2 {
        (series.tail_mean(usize::MAX).unwrap_or(TREND_EMPTY_VALUE), 0.0)
    } else {
        let recent = series.tail_mean(WINDOW_DAYS).unwrap_or_default();
        let prior = series.prior_window_mean(WINDOW_DAYS).unwrap_or(recent);
        (recent, trend_ratio(recent, prior))
    };

    (1..=periods)
        .map(|period| {
            let value = base * (1.0 + trend * f64::from(period));
            ForecastPoint::new(period, value.max(0.0), TREND_CONFIDENCE, origin)
        })
        .collect()
}

/// Last-week mean scaled by a fixed weekday profile.
pub fn seasonal(series: &TimeSeries, periods: u32, origin: DateTime<Utc>) -> Vec<ForecastPoint> {
    let base = series.tail_mean(WINDOW_DAYS).unwrap_or(SEASONAL_EMPTY_VALUE);

    (1..=periods)
        .map(|period| {
            let value = base * weekday_factor(period_date(origin, period).weekday());
            ForecastPoint::new(period, value.max(0.0), SEASONAL_CONFIDENCE, origin)
        })
        .collect()
}

pub fn constant(value: f64, confidence: f64, periods: u32, origin: DateTime<Utc>) -> Vec<ForecastPoint> {
    (1..=periods).map(|period| ForecastPoint::new(period, value, confidence, origin)).collect()
}

pub fn weekday_factor(weekday: Weekday) -> f64 {
    match weekday {
        Weekday::Fri | Weekday::Sat => 1.2,
        Weekday::Mon => 0.9,
        _ => 1.0,
    }
}

/// Relative change with the denominator floored at 1.
pub fn trend_ratio(recent: f64, prior: f64) -> f64 {
    (recent - prior) / prior.max(1.0)
}
