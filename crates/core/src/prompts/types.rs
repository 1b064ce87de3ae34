use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const FALLBACK_NAME: &str = "Valued Customer";

/// Purchase history used to personalise an email.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub total_orders: u32,
    #[serde(default)]
    pub avg_order_value: f64,
    #[serde(default)]
    pub last_order_date: Option<NaiveDate>,
}

impl UserProfile {
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().map(str::trim).filter(|name| !name.is_empty());
        let last = self.last_name.as_deref().map(str::trim).filter(|name| !name.is_empty());
        match (first, last) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(first), None) => first.to_owned(),
            (None, Some(last)) => format!("{FALLBACK_NAME} {last}"),
            (None, None) => FALLBACK_NAME.to_owned(),
        }
    }
}

/// Browsing affinity for one category.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryPreference {
    pub category: String,
    pub view_count: u32,
    pub avg_rating: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}
