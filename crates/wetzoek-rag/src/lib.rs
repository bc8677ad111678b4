//! wetzoek-rag
//!
//! End-to-end pipeline: load + chunk + embed + rebuild on the indexing
//! side, classify + narrow/broad search + merge + generate on the query
//! side. Retrieval and indexing failures surface unmodified; masking them
//! would corrupt answer grounding.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod classify;
pub mod generate;
pub mod prompt;
pub mod router;

pub use classify::{Classification, QueryClassifier};
pub use generate::ChatGenerator;
pub use prompt::build_prompt;
pub use router::{merge_hits, HybridRetriever};

use anyhow::Result;
use std::path::Path;

use wetzoek_core::config::AppConfig;
use wetzoek_core::traits::{AnswerGenerator, DocumentLoader, Embedder};
use wetzoek_core::types::{ChunkStats, RetrievalHit};
use wetzoek_embed::{get_default_embedder, is_e5_model};
use wetzoek_ingest::{ChunkPipeline, FsLoader};
use wetzoek_store::LancePassageIndex;

pub struct RagPipeline {
    cfg: AppConfig,
    loader: FsLoader,
    chunker: ChunkPipeline,
    embedder: Box<dyn Embedder>,
    index: LancePassageIndex,
    retriever: HybridRetriever,
    /// Passage/query prefixing contract with E5-family embedders.
    e5_prefix: bool,
}

impl RagPipeline {
    pub async fn new(cfg: AppConfig) -> Result<Self> {
        let embedder = get_default_embedder(&cfg.embedding)?;
        let index =
            LancePassageIndex::open(&cfg.paths.index_dir, &cfg.retrieval.collection).await?;
        let e5_prefix = is_e5_model(&cfg.embedding.model_name);
        let retriever = HybridRetriever::new(
            QueryClassifier::new(cfg.retrieval.default_book.clone()),
            e5_prefix,
        );
        let chunker = ChunkPipeline::new(&cfg);
        Ok(Self { cfg, loader: FsLoader::new(), chunker, embedder, index, retriever, e5_prefix })
    }

    pub fn config(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn strategy_name(&self) -> &'static str {
        self.chunker.strategy_name()
    }

    /// Load, chunk, embed and rebuild the index. Returns the number of
    /// indexed chunks; zero is a valid (if useless) outcome.
    pub async fn ingest_and_index(&self, data_dir: Option<&Path>) -> Result<usize> {
        let dir = data_dir.unwrap_or(&self.cfg.paths.data_dir);
        let docs = self.loader.load_dir(dir)?;
        let chunks = self.chunker.chunk(&docs)?;
        let texts: Vec<String> = chunks
            .iter()
            .map(|c| {
                if self.e5_prefix {
                    format!("passage: {}", c.text)
                } else {
                    c.text.clone()
                }
            })
            .collect();
        let vectors = self.embedder.embed_documents(&texts)?;
        self.index.rebuild(&chunks, &vectors).await
    }

    /// Chunk-size preview without touching the index.
    pub fn chunk_stats(&self, data_dir: Option<&Path>) -> Result<ChunkStats> {
        let dir = data_dir.unwrap_or(&self.cfg.paths.data_dir);
        let docs = self.loader.load_dir(dir)?;
        self.chunker.stats(&docs)
    }

    pub async fn retrieve(&self, question: &str) -> Result<Vec<RetrievalHit>> {
        self.retriever
            .retrieve(&self.index, self.embedder.as_ref(), question, self.cfg.retrieval.k)
            .await
    }

    /// Retrieve, assemble the grounded prompt and generate an answer.
    pub async fn ask(
        &self,
        question: &str,
        generator: &dyn AnswerGenerator,
    ) -> Result<(String, Vec<RetrievalHit>)> {
        let hits = self.retrieve(question).await?;
        let prompt = build_prompt(question, &hits);
        let answer = generator.generate(&prompt).await?;
        Ok((answer, hits))
    }
}
