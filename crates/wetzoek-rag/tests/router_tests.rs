use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use wetzoek_core::traits::{Embedder, VectorIndex};
use wetzoek_core::types::{keys, Chunk, Meta, MetaFilter, RetrievalHit};
use wetzoek_rag::{HybridRetriever, QueryClassifier};

fn hit(text: &str, source: &str) -> RetrievalHit {
    let mut meta = Meta::new();
    meta.insert(keys::SOURCE_PATH.to_string(), source.to_string());
    RetrievalHit { text: text.to_string(), metadata: meta, score: 0.9 }
}

/// Records every search call and serves canned hits: filtered calls get the
/// narrow set, unfiltered calls the broad set.
struct StubIndex {
    narrow: Vec<RetrievalHit>,
    broad: Vec<RetrievalHit>,
    calls: Mutex<Vec<(usize, Option<MetaFilter>)>>,
    fail: bool,
}

impl StubIndex {
    fn new(narrow: Vec<RetrievalHit>, broad: Vec<RetrievalHit>) -> Self {
        Self { narrow, broad, calls: Mutex::new(Vec::new()), fail: false }
    }

    fn failing() -> Self {
        Self { narrow: vec![], broad: vec![], calls: Mutex::new(Vec::new()), fail: true }
    }
}

#[async_trait]
impl VectorIndex for StubIndex {
    async fn rebuild(&self, _chunks: &[Chunk], _vectors: &[Vec<f32>]) -> Result<usize> {
        Ok(0)
    }

    async fn search(
        &self,
        _query_vec: &[f32],
        k: usize,
        filter: Option<&MetaFilter>,
    ) -> Result<Vec<RetrievalHit>> {
        if self.fail {
            return Err(anyhow!("index unreachable"));
        }
        self.calls.lock().expect("lock").push((k, filter.cloned()));
        let hits = if filter.is_some() { &self.narrow } else { &self.broad };
        Ok(hits.iter().take(k).cloned().collect())
    }
}

struct StubEmbedder {
    queries: Mutex<Vec<String>>,
}

impl StubEmbedder {
    fn new() -> Self {
        Self { queries: Mutex::new(Vec::new()) }
    }
}

impl Embedder for StubEmbedder {
    fn dim(&self) -> usize {
        4
    }

    fn max_len(&self) -> usize {
        16
    }

    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.0; 4]).collect())
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.queries.lock().expect("lock").push(text.to_string());
        Ok(vec![0.0; 4])
    }
}

fn retriever(prefix: bool) -> HybridRetriever {
    HybridRetriever::new(QueryClassifier::new("7"), prefix)
}

#[tokio::test]
async fn statute_query_runs_narrow_then_broad() -> Result<()> {
    let index = StubIndex::new(
        vec![hit("narrow a", "laws/a.txt"), hit("narrow b", "laws/b.txt")],
        vec![hit("broad c", "guides/c.txt"), hit("broad d", "guides/d.txt")],
    );
    let embedder = StubEmbedder::new();

    let hits = retriever(false)
        .retrieve(&index, &embedder, "Wat zegt 7:244 BW over onderhuur?", 4)
        .await?;

    let calls = index.calls.lock().expect("lock").clone();
    assert_eq!(calls.len(), 2);
    // Narrow search: k_narrow = max(2, 4 / 2) with the exact-article filter.
    assert_eq!(calls[0].0, 2);
    assert_eq!(
        calls[0].1,
        Some(vec![("article".to_string(), "7:244".to_string())])
    );
    // Broad search: full k, unfiltered.
    assert_eq!(calls[1].0, 4);
    assert_eq!(calls[1].1, None);

    let texts: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
    assert_eq!(texts, vec!["narrow a", "narrow b", "broad c", "broad d"]);
    Ok(())
}

#[tokio::test]
async fn statute_query_without_article_filters_on_category() -> Result<()> {
    let index = StubIndex::new(vec![hit("narrow a", "laws/a.txt")], vec![]);
    let embedder = StubEmbedder::new();

    retriever(false)
        .retrieve(&index, &embedder, "Welk artikel van het burgerlijk wetboek regelt huur?", 4)
        .await?;

    let calls = index.calls.lock().expect("lock").clone();
    assert_eq!(
        calls[0].1,
        Some(vec![("category".to_string(), "laws".to_string())])
    );
    Ok(())
}

#[tokio::test]
async fn small_k_still_asks_for_two_narrow_hits() -> Result<()> {
    let index = StubIndex::new(vec![], vec![]);
    let embedder = StubEmbedder::new();

    retriever(false).retrieve(&index, &embedder, "Wat zegt 7:2 BW?", 1).await?;

    let calls = index.calls.lock().expect("lock").clone();
    assert_eq!(calls[0].0, 2, "k_narrow = max(2, k / 2)");
    Ok(())
}

#[tokio::test]
async fn non_statute_query_is_a_single_broad_search() -> Result<()> {
    let index = StubIndex::new(vec![], vec![hit("broad c", "guides/c.txt")]);
    let embedder = StubEmbedder::new();

    let hits = retriever(false)
        .retrieve(&index, &embedder, "What is the capital of France?", 4)
        .await?;

    let calls = index.calls.lock().expect("lock").clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, None);
    assert_eq!(hits.len(), 1);
    Ok(())
}

#[tokio::test]
async fn query_prefix_is_applied_for_asymmetric_models() -> Result<()> {
    let index = StubIndex::new(vec![], vec![]);
    let embedder = StubEmbedder::new();

    retriever(true).retrieve(&index, &embedder, "Wie is de verhuurder?", 4).await?;

    let queries = embedder.queries.lock().expect("lock").clone();
    assert_eq!(queries, vec!["query: Wie is de verhuurder?".to_string()]);
    Ok(())
}

#[tokio::test]
async fn search_failure_propagates() {
    let index = StubIndex::failing();
    let embedder = StubEmbedder::new();

    let result = retriever(false).retrieve(&index, &embedder, "Wat zegt 7:244 BW?", 4).await;
    assert!(result.is_err(), "no silent partial results on index failure");
}
