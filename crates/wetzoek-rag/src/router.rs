//! Hybrid retrieval router.
//!
//! Statute queries get a narrow, metadata-filtered search blended with a
//! broad unfiltered one; domain precision outranks general recall, so
//! narrow hits always come first in the merge. Everything else is a single
//! broad search. Search failures propagate; a partial result without the
//! narrow/broad distinction would mislead downstream ranking.

use anyhow::Result;
use std::collections::HashSet;
use tracing::debug;

use wetzoek_core::traits::{Embedder, VectorIndex};
use wetzoek_core::types::{keys, MetaFilter, RetrievalHit, LAWS_CATEGORY};

use crate::classify::QueryClassifier;

pub struct HybridRetriever {
    classifier: QueryClassifier,
    /// Prefix queries with `"query: "` for passage/query-asymmetric models.
    query_prefix: bool,
}

impl HybridRetriever {
    pub fn new(classifier: QueryClassifier, query_prefix: bool) -> Self {
        Self { classifier, query_prefix }
    }

    pub async fn retrieve(
        &self,
        index: &dyn VectorIndex,
        embedder: &dyn Embedder,
        question: &str,
        k: usize,
    ) -> Result<Vec<RetrievalHit>> {
        let query_text = if self.query_prefix {
            format!("query: {}", question)
        } else {
            question.to_string()
        };
        let query_vec = embedder.embed_query(&query_text)?;

        let classification = self.classifier.classify(question);
        if !classification.is_statute_query {
            return index.search(&query_vec, k, None).await;
        }

        let narrow_k = std::cmp::max(2, k / 2);
        let filter: MetaFilter = match &classification.article_id {
            Some(id) => vec![(keys::ARTICLE.to_string(), id.clone())],
            None => vec![(keys::CATEGORY.to_string(), LAWS_CATEGORY.to_string())],
        };
        debug!(?filter, narrow_k, k, "statute query, running narrow + broad search");

        let narrow = index.search(&query_vec, narrow_k, Some(&filter)).await?;
        let broad = index.search(&query_vec, k, None).await?;
        Ok(merge_hits(narrow, broad, k))
    }
}

/// Narrow hits first in rank order, then broad hits in rank order, each
/// passage admitted once, capped at `k`.
pub fn merge_hits(
    narrow: Vec<RetrievalHit>,
    broad: Vec<RetrievalHit>,
    k: usize,
) -> Vec<RetrievalHit> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for hit in narrow.into_iter().chain(broad) {
        if merged.len() >= k {
            break;
        }
        if seen.insert(dedup_key(&hit)) {
            merged.push(hit);
        }
    }
    merged
}

/// Same-passage detection across the two searches: source, page and a
/// content hash of the full chunk text.
fn dedup_key(hit: &RetrievalHit) -> (String, String, String) {
    let source = hit
        .metadata
        .get(keys::SOURCE_PATH)
        .or_else(|| hit.metadata.get(keys::SOURCE_REL))
        .cloned()
        .unwrap_or_default();
    let page = hit.metadata.get(keys::PAGE).cloned().unwrap_or_default();
    let digest = blake3::hash(hit.text.as_bytes()).to_hex().to_string();
    (source, page, digest)
}
