pub mod product;
pub mod series;
