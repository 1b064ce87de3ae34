//! Placeholder embeddings.
//!
//! Vectors are derived from the MD5 hex digest of the input text. They are
//! deterministic per input but carry no semantic meaning; they only stand in for a
//! managed embedding service so similarity plumbing can run end to end.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::product::{Catalog, ProductId, ProductSummary};

pub const DEFAULT_DIMENSION: usize = 768;
pub const DEFAULT_BATCH_SIZE: usize = 100;
const ALPHABET_SIZE: f64 = 26.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmbeddingVector(Vec<f64>);

impl EmbeddingVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn dimension(&self) -> usize {
        self.0.len()
    }

    pub fn norm(&self) -> f64 {
        self.0.iter().map(|value| value * value).sum::<f64>().sqrt()
    }

    /// Cosine similarity. Zero-norm vectors and mismatched dimensions score 0.
    pub fn cosine_similarity(&self, other: &EmbeddingVector) -> f64 {
        if self.dimension() != other.dimension() {
            debug!(
                event_name = "embedding.cosine.dimension_mismatch",
                left = self.dimension(),
                right = other.dimension(),
                "embedding dimensions differ"
            );
            return 0.0;
        }

        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        let dot: f64 = self.0.iter().zip(&other.0).map(|(a, b)| a * b).sum();
        dot / (norm_a * norm_b)
    }
}

#[derive(Clone, Debug)]
pub struct PseudoEmbedder {
    dimension: usize,
}

impl Default for PseudoEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSION)
    }
}

impl PseudoEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn embed(&self, text: &str) -> EmbeddingVector {
        let digest = format!("{:x}", md5::compute(text.as_bytes()));
        let digits = digest.as_bytes();
        let values =
            (0..self.dimension).map(|index| digit_value(digits[index % digits.len()])).collect();
        EmbeddingVector(values)
    }

    /// One vector per input, in input order.
    pub fn embed_batch<S>(&self, texts: &[S]) -> Vec<EmbeddingVector>
    where
        S: AsRef<str> + Sync,
    {
        texts.par_iter().map(|text| self.embed(text.as_ref())).collect()
    }
}

/// Letters map to their alphabet rank over 26; the decimal digits of the hex
/// digest fall outside `a..=z` and clamp to 0.
fn digit_value(digit: u8) -> f64 {
    if digit.is_ascii_lowercase() {
        f64::from(digit - b'a') / ALPHABET_SIZE
    } else {
        0.0
    }
}

/// Text a product is embedded from.
pub fn product_text(product: &ProductSummary) -> String {
    format!("{} {} {} {}", product.name, product.description, product.category, product.brand)
}

#[derive(Clone, Debug, Default)]
pub struct EmbeddingIndex {
    vectors: HashMap<ProductId, EmbeddingVector>,
}

impl EmbeddingIndex {
    /// Embeds every product of the catalog, `batch_size` products at a time.
    pub fn build(catalog: &Catalog, embedder: &PseudoEmbedder, batch_size: usize) -> Self {
        let mut vectors = HashMap::with_capacity(catalog.len());
        for (batch_number, batch) in catalog.products().chunks(batch_size.max(1)).enumerate() {
            let texts: Vec<String> = batch.iter().map(product_text).collect();
            let embeddings = embedder.embed_batch(&texts);
            debug!(
                event_name = "embedding.index.batch_embedded",
                batch_number,
                batch_len = batch.len(),
                "embedded product batch"
            );
            vectors.extend(batch.iter().map(|product| product.id.clone()).zip(embeddings));
        }
        Self { vectors }
    }

    pub fn insert(&mut self, id: ProductId, vector: EmbeddingVector) {
        self.vectors.insert(id, vector);
    }

    pub fn get(&self, id: &ProductId) -> Option<&EmbeddingVector> {
        self.vectors.get(id)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{digit_value, product_text, EmbeddingIndex, EmbeddingVector, PseudoEmbedder};
    use crate::domain::product::{fixtures::product, Catalog, ProductId};

    #[test]
    fn embedding_is_deterministic_with_fixed_length() {
        let embedder = PseudoEmbedder::default();
        let first = embedder.embed("wireless headphones");
        let second = embedder.embed("wireless headphones");

        assert_eq!(first, second);
        assert_eq!(first.dimension(), 768);
        assert_eq!(embedder.embed("").dimension(), 768);
    }

    #[test]
    fn different_inputs_produce_different_vectors() {
        let embedder = PseudoEmbedder::default();
        assert_ne!(embedder.embed("yoga mat"), embedder.embed("water bottle"));
    }

    #[test]
    fn values_stay_within_unit_interval() {
        let vector = PseudoEmbedder::default().embed("Organic Cotton T-Shirt");
        assert!(vector.values().iter().all(|value| (0.0..=1.0).contains(value)));
    }

    #[test]
    fn digest_characters_map_to_alphabet_rank() {
        assert_eq!(digit_value(b'a'), 0.0);
        assert_eq!(digit_value(b'f'), 5.0 / 26.0);
        assert_eq!(digit_value(b'7'), 0.0);
    }

    #[test]
    fn vector_repeats_digest_every_thirty_two_components() {
        let vector = PseudoEmbedder::new(64).embed("smart watch");
        assert_eq!(vector.values()[..32], vector.values()[32..]);
    }

    #[test]
    fn batch_preserves_order() {
        let embedder = PseudoEmbedder::new(16);
        let texts = vec!["alpha", "beta", "gamma"];
        let batch = embedder.embed_batch(&texts);

        assert_eq!(batch.len(), 3);
        for (text, vector) in texts.iter().zip(&batch) {
            assert_eq!(&embedder.embed(text), vector);
        }
    }

    #[test]
    fn cosine_similarity_handles_identity_zero_and_mismatch() {
        let a = EmbeddingVector::new(vec![1.0, 0.0, 1.0]);
        let b = EmbeddingVector::new(vec![0.0, 1.0, 0.0]);
        let zero = EmbeddingVector::new(vec![0.0, 0.0, 0.0]);
        let short = EmbeddingVector::new(vec![1.0, 0.0]);

        assert!((a.cosine_similarity(&a) - 1.0).abs() < 1e-12);
        assert_eq!(a.cosine_similarity(&b), 0.0);
        assert_eq!(a.cosine_similarity(&zero), 0.0);
        assert_eq!(a.cosine_similarity(&short), 0.0);
    }

    #[test]
    fn index_covers_every_catalog_product_across_batches() {
        let catalog = Catalog::new(vec![
            product("P1", "electronics", 10.0, 4.0, 1),
            product("P2", "electronics", 10.0, 4.0, 1),
            product("P3", "clothing", 10.0, 4.0, 0),
        ]);
        let embedder = PseudoEmbedder::new(8);
        let index = EmbeddingIndex::build(&catalog, &embedder, 2);

        assert_eq!(index.len(), 3);
        let p3 = catalog.find(&ProductId::from("P3")).expect("fixture product");
        assert_eq!(index.get(&p3.id), Some(&embedder.embed(&product_text(p3))));
    }
}
