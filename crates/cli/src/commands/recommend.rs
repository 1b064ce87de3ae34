use std::path::Path;

use serde::Serialize;
use shopsense_core::config::{AppConfig, LoadOptions};
use shopsense_core::domain::product::{Catalog, ProductId, ProductSummary};
use shopsense_core::embedding::{EmbeddingIndex, PseudoEmbedder};
use shopsense_core::errors::{ApplicationError, DomainError};
use shopsense_core::ranking::{ProductRanker, ScoredProduct, SubstitutionReason, DEFAULT_SEARCH_TOP_K};
use tracing::info;

use super::input::load_catalog;
use super::{load_config, respond, CommandResult};

#[derive(Debug, Serialize)]
struct SimilarOutput {
    product_id: String,
    similarity_threshold: f64,
    above_threshold: usize,
    results: Vec<ScoredProduct>,
}

fn build_index(config: &AppConfig, catalog: &Catalog) -> EmbeddingIndex {
    let embedder = PseudoEmbedder::new(config.embedding.dimension);
    let index = EmbeddingIndex::build(catalog, &embedder, config.embedding.batch_size);
    info!(
        event_name = "cli.recommend.index_built",
        vectors = index.len(),
        dimension = config.embedding.dimension,
        "embedding index built"
    );
    index
}

/// Products similar to `product_id`; `top_k` defaults to the configured maximum.
pub fn similar(
    options: &LoadOptions,
    catalog_path: &Path,
    product_id: &str,
    top_k: Option<usize>,
    use_embeddings: bool,
) -> CommandResult {
    respond("similar", || {
        let config = load_config(options)?;
        let catalog = load_catalog(catalog_path)?;
        let index = use_embeddings.then(|| build_index(&config, &catalog));
        let top_k = top_k.unwrap_or(config.recommendation.max_recommendations);

        let results = ProductRanker::new().rank_similar_by_id(
            &ProductId::from(product_id),
            &catalog,
            index.as_ref(),
            top_k,
        );
        let threshold = config.recommendation.similarity_threshold;
        let output = SimilarOutput {
            product_id: product_id.to_string(),
            similarity_threshold: threshold,
            above_threshold: results.iter().filter(|result| result.score >= threshold).count(),
            results,
        };
        Ok(CommandResult::with_data(
            "similar",
            format!("found {} similar products", output.results.len()),
            output,
        ))
    })
}

pub fn search(catalog_path: &Path, query: &str, top_k: Option<usize>) -> CommandResult {
    respond("search", || {
        let catalog = load_catalog(catalog_path)?;
        let results = ProductRanker::new().search_text(
            query,
            &catalog,
            top_k.unwrap_or(DEFAULT_SEARCH_TOP_K),
        );
        Ok(CommandResult::with_data(
            "search",
            format!("{} products match `{query}`", results.len()),
            results,
        ))
    })
}

pub fn substitutes(
    options: &LoadOptions,
    catalog_path: &Path,
    product_id: &str,
    reason: SubstitutionReason,
) -> CommandResult {
    respond("substitutes", || {
        let config = load_config(options)?;
        let catalog = load_catalog(catalog_path)?;
        let id = ProductId::from(product_id);
        let target = catalog
            .find(&id)
            .ok_or_else(|| ApplicationError::from(DomainError::UnknownProduct(id.clone())))?;
        let index = build_index(&config, &catalog);

        let substitutions = ProductRanker::new().substitutions(target, &catalog, Some(&index), reason);
        Ok(CommandResult::with_data(
            "substitutes",
            format!("found {} substitutes for {}", substitutions.len(), target.name),
            substitutions,
        ))
    })
}

/// Products outside the categories of the shopper's `preferred` products.
pub fn discover(
    options: &LoadOptions,
    catalog_path: &Path,
    preferred: &[String],
    top_k: Option<usize>,
) -> CommandResult {
    respond("discover", || {
        let config = load_config(options)?;
        let catalog = load_catalog(catalog_path)?;
        let preferred: Vec<ProductSummary> = preferred
            .iter()
            .map(|id| {
                let id = ProductId::from(id.as_str());
                catalog
                    .find(&id)
                    .cloned()
                    .ok_or_else(|| ApplicationError::from(DomainError::UnknownProduct(id)))
            })
            .collect::<Result<_, _>>()?;

        let results = ProductRanker::new().cross_category(
            &preferred,
            &catalog,
            top_k.unwrap_or(config.recommendation.max_recommendations),
        );
        Ok(CommandResult::with_data(
            "discover",
            format!("found {} products in new categories", results.len()),
            results,
        ))
    })
}
