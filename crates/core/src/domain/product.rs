use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Read-only catalog entry supplied by the store collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    #[serde(alias = "product_id")]
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub brand: String,
    pub price: f64,
    pub rating: f64,
    pub stock_quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductSummary {
    pub fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Catalog ordering shared by every non-embedding ranking: best rated first,
    /// cheaper first among equally rated products.
    pub fn popularity_order(left: &Self, right: &Self) -> Ordering {
        right.rating.total_cmp(&left.rating).then_with(|| left.price.total_cmp(&right.price))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    products: Vec<ProductSummary>,
}

impl Catalog {
    pub fn new(products: Vec<ProductSummary>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&ProductSummary> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn products(&self) -> &[ProductSummary] {
        &self.products
    }

    pub fn in_stock(&self) -> impl Iterator<Item = &ProductSummary> {
        self.products.iter().filter(|product| product.in_stock())
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl From<Vec<ProductSummary>> for Catalog {
    fn from(products: Vec<ProductSummary>) -> Self {
        Self::new(products)
    }
}
