//! Interchangeable chunking strategies.
//!
//! Strategy selection is an explicit resolution step: `resolve` returns the
//! concrete splitter together with its effective name and whether the
//! requested strategy had to fall back to `recursive` (unknown name or a
//! missing tokenizer). Retrieval quality degrading beats the index build
//! failing, so fallback is a warning, never an error.

mod markdown;
mod recursive;
mod sentences;
mod tokens;

pub use markdown::MarkdownSplitter;
pub use recursive::RecursiveCharacterSplitter;
pub use sentences::SentenceSplitter;
pub use tokens::TokenSplitter;

use tracing::warn;

use wetzoek_core::config::AppConfig;
use wetzoek_core::types::{Chunk, SourceDocument};

/// Splits one text into bounded passages. Implementations guarantee: no
/// emitted piece is empty, and piece order follows original text order.
pub trait TextSplitter: Send + Sync {
    fn split_text(&self, text: &str) -> anyhow::Result<Vec<String>>;
}

/// Outcome of strategy resolution.
pub struct ResolvedStrategy {
    /// Effective strategy name after any fallback.
    pub name: &'static str,
    /// True when the requested strategy was substituted by `recursive`.
    pub fell_back: bool,
    splitter: Box<dyn TextSplitter>,
}

impl ResolvedStrategy {
    pub fn split_text(&self, text: &str) -> anyhow::Result<Vec<String>> {
        self.splitter.split_text(text)
    }

    /// Split every document, attaching each chunk the metadata of its parent.
    pub fn split_documents(&self, docs: &[SourceDocument]) -> anyhow::Result<Vec<Chunk>> {
        let mut chunks = Vec::new();
        for doc in docs {
            for piece in self.split_text(&doc.text)? {
                let text = piece.trim();
                if text.is_empty() {
                    continue;
                }
                chunks.push(Chunk { text: text.to_string(), metadata: doc.metadata.clone() });
            }
        }
        Ok(chunks)
    }
}

/// Resolve the configured strategy name to a concrete splitter.
pub fn resolve(cfg: &AppConfig) -> ResolvedStrategy {
    let c = &cfg.chunking;
    match c.strategy.to_lowercase().as_str() {
        "recursive" => recursive_strategy(c.chunk_size, c.chunk_overlap, false),
        "tokens" => {
            let tokenizer_path = cfg.embedding.model_dir.join("tokenizer.json");
            match TokenSplitter::from_file(&tokenizer_path, c.token_chunk_size, c.token_overlap)
            {
                Ok(s) => {
                    ResolvedStrategy { name: "tokens", fell_back: false, splitter: Box::new(s) }
                }
                Err(e) => {
                    warn!(error = %e, "token splitter unavailable, falling back to recursive");
                    recursive_strategy(c.chunk_size, c.chunk_overlap, true)
                }
            }
        }
        "sentences" => ResolvedStrategy {
            name: "sentences",
            fell_back: false,
            splitter: Box::new(SentenceSplitter::new(c.chunk_size, c.chunk_overlap)),
        },
        "markdown" => ResolvedStrategy {
            name: "markdown",
            fell_back: false,
            splitter: Box::new(MarkdownSplitter::new(c.chunk_size, c.chunk_overlap)),
        },
        other => {
            warn!(strategy = %other, "unknown chunking strategy, falling back to recursive");
            recursive_strategy(c.chunk_size, c.chunk_overlap, true)
        }
    }
}

fn recursive_strategy(chunk_size: usize, chunk_overlap: usize, fell_back: bool) -> ResolvedStrategy {
    ResolvedStrategy {
        name: "recursive",
        fell_back,
        splitter: Box::new(RecursiveCharacterSplitter::new(chunk_size, chunk_overlap)),
    }
}
