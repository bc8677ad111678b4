//! Domain types shared by the chunking pipeline and the retrieval router.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Open string-keyed metadata map attached to documents, chunks and hits.
///
/// Kept as a map (rather than fixed struct fields) because chunk metadata is
/// the union of loader-, segmenter- and pipeline-provided fields, and the
/// vector store filters on arbitrary keys.
pub type Meta = HashMap<String, String>;

/// Well-known metadata keys.
pub mod keys {
    /// Path of the source file as given to the loader.
    pub const SOURCE_PATH: &str = "source_path";
    /// Path relative to the data root, `/`-separated.
    pub const SOURCE_REL: &str = "source_rel";
    /// Top-level classification inferred from the storage location
    /// (first path segment under the data root, `"root"` otherwise).
    pub const CATEGORY: &str = "category";
    /// 0-based page number, present only for paged sources (PDF).
    pub const PAGE: &str = "page";
    /// Statute book number, e.g. `"7"`.
    pub const BOOK: &str = "book";
    /// Bare article number with optional letter suffix, e.g. `"244a"`.
    pub const ARTICLE_NUM: &str = "article_num";
    /// Full article identifier, `"{book}:{article_num}"` or the bare
    /// number when no book could be derived.
    pub const ARTICLE: &str = "article";
}

/// Category string routed through law-specific pre-segmentation.
pub const LAWS_CATEGORY: &str = "laws";

/// A loaded document before chunking.
///
/// Produced by the loader with `source_path`/`category` (and `source_rel`)
/// already set; immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub text: String,
    pub metadata: Meta,
}

impl SourceDocument {
    pub fn new(text: impl Into<String>, metadata: Meta) -> Self {
        Self { text: text.into(), metadata }
    }

    pub fn category(&self) -> Option<&str> {
        self.metadata.get(keys::CATEGORY).map(String::as_str)
    }
}

/// A bounded, overlap-aware slice of a document's text.
///
/// `text` is never empty. `metadata` is the parent document's metadata plus
/// chunk-local additions; it is the record actually indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: Meta,
}

/// A single retrieved passage.
///
/// Rank is implicit in the position within the returned sequence. `score`
/// is similarity-derived, higher is better; it is carried for display only
/// and never re-sorted by the router.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub text: String,
    pub metadata: Meta,
    pub score: f32,
}

/// Exact-match conjunction over metadata fields, e.g.
/// `[("category", "laws")]` or `[("article", "7:244")]`.
pub type MetaFilter = Vec<(String, String)>;

/// Size statistics over a chunked document set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkStats {
    pub count: usize,
    pub avg_len: usize,
    pub p95_len: usize,
    pub max_len: usize,
}

impl ChunkStats {
    pub fn empty() -> Self {
        Self { count: 0, avg_len: 0, p95_len: 0, max_len: 0 }
    }
}
