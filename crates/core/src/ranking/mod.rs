//! Product ranking fallbacks used when warehouse vector search is unavailable.

mod engine;
mod types;

pub use engine::{explain_substitution, ProductRanker, MAX_SUBSTITUTIONS, SUBSTITUTION_POOL};
pub use types::*;

/// Similar products returned when the caller does not ask for a count.
pub const DEFAULT_SIMILAR_TOP_K: usize = 5;

/// Text search results returned when the caller does not ask for a count.
pub const DEFAULT_SEARCH_TOP_K: usize = 10;
