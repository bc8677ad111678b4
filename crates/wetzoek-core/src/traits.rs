//! Collaborator contracts consumed by the chunking pipeline and the
//! retrieval router. Implementations live in the sibling crates
//! (`wetzoek-ingest`, `wetzoek-embed`, `wetzoek-store`, `wetzoek-rag`);
//! everything here is replaceable.

use async_trait::async_trait;
use std::path::Path;

use crate::types::{Chunk, MetaFilter, RetrievalHit, SourceDocument};

/// Produces documents with `source_path`/`source_rel`/`category` metadata
/// derived from the directory structure under the data root.
pub trait DocumentLoader: Send + Sync {
    fn load_dir(&self, data_dir: &Path) -> anyhow::Result<Vec<SourceDocument>>;
}

/// Text to fixed-length vector. Callers are responsible for any
/// passage/query prefixing the model family expects; the embedder itself
/// only encodes what it is given.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_documents(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// Persistent nearest-neighbor index over chunk vectors.
///
/// `rebuild` replaces any prior collection of the same name entirely.
/// `search` is read-only; `filter` is an exact-match conjunction over
/// metadata fields.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn rebuild(&self, chunks: &[Chunk], vectors: &[Vec<f32>]) -> anyhow::Result<usize>;
    async fn search(
        &self,
        query_vec: &[f32],
        k: usize,
        filter: Option<&MetaFilter>,
    ) -> anyhow::Result<Vec<RetrievalHit>>;
}

/// Turns an assembled prompt into answer text. Consumed only after
/// retrieval.
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
