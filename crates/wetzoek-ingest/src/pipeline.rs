//! Chunking pipeline: category-driven pre-segmentation, then the resolved
//! chunking strategy over both subsets. Article boundaries act as soft
//! hints, not hard caps; an oversized article body is still subdivided by
//! the strategy.

use anyhow::Result;

use wetzoek_core::config::AppConfig;
use wetzoek_core::types::{Chunk, ChunkStats, SourceDocument};

use crate::article::Segmenters;
use crate::strategy::{resolve, ResolvedStrategy};

pub struct ChunkPipeline {
    strategy: ResolvedStrategy,
    segmenters: Segmenters,
}

impl ChunkPipeline {
    pub fn new(cfg: &AppConfig) -> Self {
        Self { strategy: resolve(cfg), segmenters: Segmenters::with_defaults() }
    }

    pub fn with_parts(strategy: ResolvedStrategy, segmenters: Segmenters) -> Self {
        Self { strategy, segmenters }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name
    }

    /// Split a mixed document set into annotated chunks. Documents whose
    /// category has a registered pre-segmenter are segmented first; their
    /// chunks come before the rest, each subset in input order.
    pub fn chunk(&self, docs: &[SourceDocument]) -> Result<Vec<Chunk>> {
        let mut segmented: Vec<SourceDocument> = Vec::new();
        let mut plain: Vec<SourceDocument> = Vec::new();
        for doc in docs {
            match doc.category().and_then(|c| self.segmenters.get(c)) {
                Some(segmenter) => segmented.extend(segmenter.segment(doc)),
                None => plain.push(doc.clone()),
            }
        }

        let mut chunks = self.strategy.split_documents(&segmented)?;
        chunks.extend(self.strategy.split_documents(&plain)?);
        Ok(chunks)
    }

    /// Chunk-size statistics for preview/diagnostics; runs the same chunking
    /// without touching any index. `p95` is nearest-rank on sorted lengths.
    pub fn stats(&self, docs: &[SourceDocument]) -> Result<ChunkStats> {
        let chunks = self.chunk(docs)?;
        if chunks.is_empty() {
            return Ok(ChunkStats::empty());
        }
        let mut sizes: Vec<usize> = chunks.iter().map(|c| c.text.chars().count()).collect();
        sizes.sort_unstable();
        let n = sizes.len();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let p95_idx = (0.95 * (n - 1) as f64).floor() as usize;
        Ok(ChunkStats {
            count: n,
            avg_len: sizes.iter().sum::<usize>() / n,
            p95_len: sizes[p95_idx],
            max_len: sizes[n - 1],
        })
    }
}
