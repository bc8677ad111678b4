//! wetzoek-store
//!
//! LanceDB-backed passage index: rebuild-not-merge writes and filtered
//! nearest-neighbor search. The `LancePassageIndex` type is the concrete
//! `VectorIndex` collaborator used by the retrieval pipeline.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod schema;
pub mod search;
pub mod table;
pub mod writer;

use anyhow::Result;
use async_trait::async_trait;
use lancedb::Connection;
use std::path::Path;

use wetzoek_core::traits::VectorIndex;
use wetzoek_core::types::{Chunk, MetaFilter, RetrievalHit};

pub struct LancePassageIndex {
    db: Connection,
    table_name: String,
}

impl LancePassageIndex {
    pub async fn open(db_path: &Path, table_name: &str) -> Result<Self> {
        let db = table::open_db(db_path.to_string_lossy().as_ref()).await?;
        Ok(Self { db, table_name: table_name.to_string() })
    }

    pub async fn rebuild(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> Result<usize> {
        writer::rebuild_table(&self.db, &self.table_name, chunks, embeddings).await
    }

    pub async fn search(
        &self,
        query_vec: &[f32],
        k: usize,
        filter: Option<&MetaFilter>,
    ) -> Result<Vec<RetrievalHit>> {
        search::search_table(&self.db, &self.table_name, query_vec, k, filter).await
    }

    pub async fn count(&self) -> Result<usize> {
        if !table::table_exists(&self.db, &self.table_name).await? {
            return Ok(0);
        }
        let table = self.db.open_table(&self.table_name).execute().await?;
        Ok(table.count_rows(None).await?)
    }
}

#[async_trait]
impl VectorIndex for LancePassageIndex {
    async fn rebuild(&self, chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<usize> {
        LancePassageIndex::rebuild(self, chunks, vectors).await
    }

    async fn search(
        &self,
        query_vec: &[f32],
        k: usize,
        filter: Option<&MetaFilter>,
    ) -> Result<Vec<RetrievalHit>> {
        LancePassageIndex::search(self, query_vec, k, filter).await
    }
}
