use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use shopsense_core::domain::product::{Catalog, ProductSummary};
use shopsense_core::domain::series::TimeSeries;
use shopsense_core::errors::ApplicationError;
use tracing::debug;

pub fn read_json<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T, ApplicationError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        ApplicationError::Input(format!("could not read {what} `{}`: {error}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|error| {
        ApplicationError::Input(format!("could not parse {what} `{}`: {error}", path.display()))
    })
}

/// A JSON array of products.
pub fn load_catalog(path: &Path) -> Result<Catalog, ApplicationError> {
    let products: Vec<ProductSummary> = read_json(path, "catalog")?;
    debug!(event_name = "cli.input.catalog_loaded", products = products.len(), "catalog loaded");
    Ok(Catalog::new(products))
}

/// A JSON array of `{date, value}` observations in increasing date order.
pub fn load_series(path: &Path) -> Result<TimeSeries, ApplicationError> {
    let series: TimeSeries = read_json(path, "series")?;
    debug!(event_name = "cli.input.series_loaded", observations = series.len(), "series loaded");
    Ok(series)
}
