use std::collections::HashSet;

use tracing::{debug, info};

use super::types::{RankingTier, ScoredProduct, Substitution, SubstitutionReason};
use crate::domain::product::{Catalog, ProductId, ProductSummary};
use crate::embedding::EmbeddingIndex;

/// Similar products considered before substitution filters apply.
pub const SUBSTITUTION_POOL: usize = 10;
/// Substitutions returned at most.
pub const MAX_SUBSTITUTIONS: usize = 5;
const OUT_OF_STOCK_MIN_STOCK: u32 = 10;
const OUT_OF_STOCK_MIN_SCORE: f64 = 0.7;
const PRICE_CEILING_RATIO: f64 = 1.2;
const PRICE_MIN_SCORE: f64 = 0.6;

/// Catalog ranking with graceful degradation.
///
/// Only in-stock products are ever returned. Similarity ranking tries the
/// embedding tier, then same-category, then overall popularity, moving on when a
/// tier is unavailable or yields no candidates.
#[derive(Clone, Debug, Default)]
pub struct ProductRanker;

impl ProductRanker {
    pub fn new() -> Self {
        Self
    }

    pub fn rank_similar(
        &self,
        target: &ProductSummary,
        catalog: &Catalog,
        index: Option<&EmbeddingIndex>,
        top_k: usize,
    ) -> Vec<ScoredProduct> {
        let embedded = index.and_then(|index| index.get(&target.id).map(|vector| (index, vector)));
        if let Some((index, target_vector)) = embedded {
            let mut scored: Vec<ScoredProduct> = catalog
                .in_stock()
                .filter(|candidate| candidate.id != target.id)
                .filter_map(|candidate| {
                    index.get(&candidate.id).map(|vector| ScoredProduct {
                        product: candidate.clone(),
                        score: target_vector.cosine_similarity(vector),
                        tier: RankingTier::Embedding,
                    })
                })
                .collect();

            if !scored.is_empty() {
                scored.sort_by(|left, right| {
                    right.score.total_cmp(&left.score).then_with(|| {
                        ProductSummary::popularity_order(&left.product, &right.product)
                    })
                });
                scored.truncate(top_k);
                return scored;
            }
            debug!(
                event_name = "ranking.similar.embedding_empty",
                product_id = %target.id,
                "no embedded in-stock candidates, degrading to category"
            );
        }

        let category = self.ranked(
            catalog
                .in_stock()
                .filter(|candidate| candidate.id != target.id && candidate.category == target.category),
            RankingTier::Category,
            top_k,
        );
        if !category.is_empty() {
            info!(
                event_name = "ranking.similar.category_fallback",
                product_id = %target.id,
                category = %target.category,
                results = category.len(),
                "ranked similar products by category"
            );
            return category;
        }

        info!(
            event_name = "ranking.similar.popular_fallback",
            product_id = %target.id,
            "no in-stock category peers, using popular products"
        );
        self.popular(catalog, Some(&target.id), top_k)
    }

    /// Looks the target up in the catalog first; unknown ids go straight to
    /// popular products.
    pub fn rank_similar_by_id(
        &self,
        product_id: &ProductId,
        catalog: &Catalog,
        index: Option<&EmbeddingIndex>,
        top_k: usize,
    ) -> Vec<ScoredProduct> {
        match catalog.find(product_id) {
            Some(target) => self.rank_similar(target, catalog, index, top_k),
            None => {
                info!(
                    event_name = "ranking.similar.unknown_target",
                    product_id = %product_id,
                    "target not in catalog, using popular products"
                );
                self.popular(catalog, None, top_k)
            }
        }
    }

    pub fn popular(
        &self,
        catalog: &Catalog,
        exclude: Option<&ProductId>,
        top_k: usize,
    ) -> Vec<ScoredProduct> {
        self.ranked(
            catalog.in_stock().filter(|candidate| Some(&candidate.id) != exclude),
            RankingTier::Popular,
            top_k,
        )
    }

    /// Case-insensitive substring search over name, description, category and brand.
    pub fn search_text(&self, query: &str, catalog: &Catalog, top_k: usize) -> Vec<ScoredProduct> {
        let needle = query.to_lowercase();
        self.ranked(
            catalog.in_stock().filter(|product| {
                [&product.name, &product.description, &product.category, &product.brand]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }),
            RankingTier::TextMatch,
            top_k,
        )
    }

    pub fn substitutions(
        &self,
        target: &ProductSummary,
        catalog: &Catalog,
        index: Option<&EmbeddingIndex>,
        reason: SubstitutionReason,
    ) -> Vec<Substitution> {
        self.rank_similar(target, catalog, index, SUBSTITUTION_POOL)
            .into_iter()
            .filter(|candidate| match reason {
                SubstitutionReason::OutOfStock => {
                    candidate.product.stock_quantity > OUT_OF_STOCK_MIN_STOCK
                        && candidate.score > OUT_OF_STOCK_MIN_SCORE
                }
                SubstitutionReason::Price => {
                    candidate.product.price <= target.price * PRICE_CEILING_RATIO
                        && candidate.score > PRICE_MIN_SCORE
                }
                SubstitutionReason::Other => true,
            })
            .take(MAX_SUBSTITUTIONS)
            .map(|candidate| {
                let explanation = explain_substitution(target, &candidate.product, reason);
                Substitution { candidate, reason, explanation }
            })
            .collect()
    }

    /// Products from categories the shopper has not engaged with yet.
    pub fn cross_category(
        &self,
        preferred: &[ProductSummary],
        catalog: &Catalog,
        top_k: usize,
    ) -> Vec<ScoredProduct> {
        if preferred.is_empty() {
            return self.popular(catalog, None, top_k);
        }

        let seen_categories: HashSet<&str> =
            preferred.iter().map(|product| product.category.as_str()).collect();
        let seen_ids: HashSet<&ProductId> = preferred.iter().map(|product| &product.id).collect();

        self.ranked(
            catalog.in_stock().filter(|candidate| {
                !seen_categories.contains(candidate.category.as_str())
                    && !seen_ids.contains(&candidate.id)
            }),
            RankingTier::CrossCategory,
            top_k,
        )
    }

    fn ranked<'a>(
        &self,
        candidates: impl Iterator<Item = &'a ProductSummary>,
        tier: RankingTier,
        top_k: usize,
    ) -> Vec<ScoredProduct> {
        let mut products: Vec<&ProductSummary> = candidates.collect();
        products.sort_by(|left, right| ProductSummary::popularity_order(left, right));
        let score = tier.fixed_score().unwrap_or_default();
        products
            .into_iter()
            .take(top_k)
            .map(|product| ScoredProduct { product: product.clone(), score, tier })
            .collect()
    }
}

pub fn explain_substitution(
    original: &ProductSummary,
    substitute: &ProductSummary,
    reason: SubstitutionReason,
) -> String {
    match reason {
        SubstitutionReason::OutOfStock => {
            format!("Great alternative to {} - similar features and quality", original.name)
        }
        SubstitutionReason::Price => {
            let difference = substitute.price - original.price;
            if difference < 0.0 {
                format!("More affordable option: {} (${:.2} less)", substitute.name, difference.abs())
            } else {
                format!("Premium alternative: {} with enhanced features", substitute.name)
            }
        }
        SubstitutionReason::Other => {
            format!("Similar to {} with comparable quality and features", original.name)
        }
    }
}
