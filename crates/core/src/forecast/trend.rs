use serde::{Deserialize, Serialize};

use super::strategies::WINDOW_DAYS;
use crate::domain::series::{Observation, TimeSeries};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increasing => "increasing",
            Self::Decreasing => "decreasing",
            Self::Stable => "stable",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    pub direction: TrendDirection,
    pub strength: f64,
    pub recent_average: f64,
    pub prior_average: f64,
    pub trend_data: Vec<Observation>,
}

impl TrendAnalysis {
    /// Compares the last week against the week before it. Fewer than two
    /// observations is reported as a flat, zero-strength trend.
    pub fn analyze(series: &TimeSeries) -> Self {
        if series.len() < 2 {
            return Self {
                direction: TrendDirection::Stable,
                strength: 0.0,
                recent_average: 0.0,
                prior_average: 0.0,
                trend_data: series.observations().to_vec(),
            };
        }

        let recent = series.tail_mean(WINDOW_DAYS).unwrap_or_default();
        let prior = series.prior_window_mean(WINDOW_DAYS).unwrap_or(recent);
        let direction = if recent > prior {
            TrendDirection::Increasing
        } else if recent < prior {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        };

        Self {
            direction,
            strength: (recent - prior).abs() / prior.max(1.0),
            recent_average: recent,
            prior_average: prior,
            trend_data: series.observations().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{TrendAnalysis, TrendDirection};
    use crate::domain::series::{fixtures::daily, TimeSeries};

    #[test]
    fn short_series_is_stable() {
        for series in [TimeSeries::empty(), daily(&[12.0])] {
            let analysis = TrendAnalysis::analyze(&series);
            assert_eq!(analysis.direction, TrendDirection::Stable);
            assert_eq!(analysis.strength, 0.0);
            assert_eq!(analysis.recent_average, 0.0);
        }
    }

    #[test]
    fn rising_fortnight_is_increasing() {
        let mut values = vec![10.0; 7];
        values.extend([15.0; 7]);
        let analysis = TrendAnalysis::analyze(&daily(&values));

        assert_eq!(analysis.direction, TrendDirection::Increasing);
        assert!((analysis.strength - 0.5).abs() < 1e-12);
        assert_eq!(analysis.prior_average, 10.0);
        assert_eq!(analysis.trend_data.len(), 14);
    }

    #[test]
    fn falling_fortnight_is_decreasing() {
        let mut values = vec![0.5; 7];
        values.extend([0.0; 7]);
        let analysis = TrendAnalysis::analyze(&daily(&values));

        assert_eq!(analysis.direction, TrendDirection::Decreasing);
        // denominator floored at 1
        assert_eq!(analysis.strength, 0.5);
    }

    #[test]
    fn without_prior_week_trend_is_stable() {
        let analysis = TrendAnalysis::analyze(&daily(&[1.0, 9.0, 20.0]));
        assert_eq!(analysis.direction, TrendDirection::Stable);
        assert_eq!(analysis.strength, 0.0);
        assert_eq!(analysis.recent_average, 10.0);
    }
}
