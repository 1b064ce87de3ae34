use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

impl Observation {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// Daily observations with strictly increasing dates. Gaps between days are allowed.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

impl TimeSeries {
    pub fn new(observations: Vec<Observation>) -> Result<Self, DomainError> {
        if let Some(index) =
            observations.windows(2).position(|pair| pair[1].date <= pair[0].date)
        {
            return Err(DomainError::InvalidTimeSeries { index: index + 1 });
        }
        Ok(Self { observations })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|observation| observation.value)
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Mean of the last `window` values, or of every value when the series is shorter.
    pub fn tail_mean(&self, window: usize) -> Option<f64> {
        let start = self.observations.len().saturating_sub(window);
        mean(&self.observations[start..])
    }

    /// Mean of the `window` values that precede the last `window`, when the series
    /// holds at least two full windows.
    pub fn prior_window_mean(&self, window: usize) -> Option<f64> {
        let len = self.observations.len();
        if window == 0 || len < window * 2 {
            return None;
        }
        mean(&self.observations[len - window * 2..len - window])
    }

    /// Observations dated on or after `start`.
    pub fn since(&self, start: NaiveDate) -> TimeSeries {
        let first = self.observations.partition_point(|observation| observation.date < start);
        Self { observations: self.observations[first..].to_vec() }
    }
}

impl<'de> Deserialize<'de> for TimeSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let observations = Vec::<Observation>::deserialize(deserializer)?;
        Self::new(observations).map_err(serde::de::Error::custom)
    }
}

fn mean(observations: &[Observation]) -> Option<f64> {
    if observations.is_empty() {
        return None;
    }
    let total: f64 = observations.iter().map(|observation| observation.value).sum();
    Some(total / observations.len() as f64)
}
