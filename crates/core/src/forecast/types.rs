use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub period: u32,
    pub value: f64,
    pub confidence: f64,
    pub date: DateTime<Utc>,
}

impl ForecastPoint {
    /// Point for `period` days after `origin`.
    pub fn new(period: u32, value: f64, confidence: f64, origin: DateTime<Utc>) -> Self {
        Self { period, value, confidence, date: period_date(origin, period) }
    }
}

/// `origin` plus `period` days, saturating at the last representable instant.
pub fn period_date(origin: DateTime<Utc>, period: u32) -> DateTime<Utc> {
    origin
        .checked_add_signed(Duration::days(i64::from(period)))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    MovingAverage,
    TrendAnalysis,
    SeasonalAnalysis,
    Default,
}

impl ForecastMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MovingAverage => "moving_average",
            Self::TrendAnalysis => "trend_analysis",
            Self::SeasonalAnalysis => "seasonal_analysis",
            Self::Default => "default",
        }
    }
}

/// What a series measures. Each subject carries its own strategy and fallback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSubject {
    /// Units sold per day for one product.
    Product,
    /// Revenue per day for one category.
    Category,
    /// Total revenue per day.
    Revenue,
}

impl ForecastSubject {
    pub fn method(&self) -> ForecastMethod {
        match self {
            Self::Product => ForecastMethod::MovingAverage,
            Self::Category => ForecastMethod::TrendAnalysis,
            Self::Revenue => ForecastMethod::SeasonalAnalysis,
        }
    }

    /// Flat value reported when there is no history at all.
    pub fn default_value(&self) -> f64 {
        match self {
            Self::Product => 1.0,
            Self::Category => 100.0,
            Self::Revenue => 1000.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Category => "category",
            Self::Revenue => "revenue",
        }
    }
}

impl std::str::FromStr for ForecastSubject {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "product" => Ok(Self::Product),
            "category" => Ok(Self::Category),
            "revenue" => Ok(Self::Revenue),
            other => Err(format!(
                "unsupported forecast subject `{other}` (expected product|category|revenue)"
            )),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    pub subject: ForecastSubject,
    pub method: ForecastMethod,
    pub confidence_level: f64,
    pub forecast_periods: u32,
    pub predictions: Vec<ForecastPoint>,
    pub generated_at: DateTime<Utc>,
}
