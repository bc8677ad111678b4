//! Rebuild-not-merge passage writer.
//!
//! Every index run drops the existing table and writes the new chunk set
//! from scratch, so indexing the same data twice never duplicates rows.

use anyhow::{anyhow, Result};
use arrow_array::{FixedSizeListArray, Int32Array, RecordBatch, RecordBatchIterator, StringArray};
use indicatif::{ProgressBar, ProgressStyle};
use lancedb::Connection;
use std::sync::Arc;
use tracing::info;

use wetzoek_core::types::{keys, Chunk};

use crate::schema::{build_arrow_schema, EMBEDDING_DIM};
use crate::table::table_exists;

const WRITE_BATCH_SIZE: usize = 1000;

pub async fn rebuild_table(
    conn: &Connection,
    table_name: &str,
    chunks: &[Chunk],
    embeddings: &[Vec<f32>],
) -> Result<usize> {
    if chunks.len() != embeddings.len() {
        return Err(anyhow!(
            "chunks and embeddings length mismatch: {} vs {}",
            chunks.len(),
            embeddings.len()
        ));
    }

    if table_exists(conn, table_name).await? {
        conn.drop_table(table_name, &[]).await?;
    }

    let schema = build_arrow_schema();
    if chunks.is_empty() {
        // An empty rebuild is a valid outcome; leave an empty table behind.
        let reader = RecordBatchIterator::new(vec![].into_iter(), schema);
        conn.create_table(table_name, Box::new(reader)).execute().await?;
        info!(table = table_name, "rebuilt empty passage table");
        return Ok(0);
    }

    info!(table = table_name, chunks = chunks.len(), "rebuilding passage table");
    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}",
            )
            .expect("progress template")
            .progress_chars("#>-"),
    );

    let mut created = false;
    let mut written = 0usize;
    for (batch_no, batch) in chunks.chunks(WRITE_BATCH_SIZE).enumerate() {
        let offset = batch_no * WRITE_BATCH_SIZE;
        let vectors = &embeddings[offset..offset + batch.len()];
        let record_batch = chunks_to_record_batch(batch, vectors, offset)?;
        let reader = Box::new(RecordBatchIterator::new(
            vec![Ok(record_batch)].into_iter(),
            schema.clone(),
        ));
        if created {
            conn.open_table(table_name).execute().await?.add(reader).execute().await?;
        } else {
            conn.create_table(table_name, reader).execute().await?;
            created = true;
        }
        written += batch.len();
        pb.set_position(written as u64);
    }
    pb.finish_with_message("indexing completed");
    info!(table = table_name, rows = written, "passage table rebuilt");
    Ok(written)
}

fn chunks_to_record_batch(
    chunks: &[Chunk],
    embeddings: &[Vec<f32>],
    offset: usize,
) -> Result<RecordBatch> {
    let mut ids = Vec::new();
    let mut source_paths = Vec::new();
    let mut source_rels = Vec::new();
    let mut categories = Vec::new();
    let mut pages: Vec<Option<i32>> = Vec::new();
    let mut books: Vec<Option<String>> = Vec::new();
    let mut article_nums: Vec<Option<String>> = Vec::new();
    let mut articles: Vec<Option<String>> = Vec::new();
    let mut texts = Vec::new();
    let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();

    for (i, (chunk, embedding)) in chunks.iter().zip(embeddings.iter()).enumerate() {
        let meta = &chunk.metadata;
        let source_rel = meta.get(keys::SOURCE_REL).cloned().unwrap_or_default();
        ids.push(chunk_id(&source_rel, offset + i, &chunk.text));
        source_paths.push(meta.get(keys::SOURCE_PATH).cloned().unwrap_or_default());
        source_rels.push(source_rel);
        categories.push(meta.get(keys::CATEGORY).cloned().unwrap_or_else(|| "root".to_string()));
        pages.push(meta.get(keys::PAGE).and_then(|p| p.parse::<i32>().ok()));
        books.push(meta.get(keys::BOOK).cloned());
        article_nums.push(meta.get(keys::ARTICLE_NUM).cloned());
        articles.push(meta.get(keys::ARTICLE).cloned());
        texts.push(chunk.text.clone());
        vectors.push(Some(embedding.iter().map(|&x| Some(x)).collect()));
    }

    let record_batch = RecordBatch::try_new(
        build_arrow_schema(),
        vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(StringArray::from(source_paths)),
            Arc::new(StringArray::from(source_rels)),
            Arc::new(StringArray::from(categories)),
            Arc::new(Int32Array::from(pages)),
            Arc::new(StringArray::from(books)),
            Arc::new(StringArray::from(article_nums)),
            Arc::new(StringArray::from(articles)),
            Arc::new(StringArray::from(texts)),
            Arc::new(FixedSizeListArray::from_iter_primitive::<
                arrow_array::types::Float32Type,
                _,
                _,
            >(vectors.into_iter(), EMBEDDING_DIM)),
        ],
    )?;
    Ok(record_batch)
}

/// Content-addressed chunk id; stable across rebuilds of identical data.
fn chunk_id(source_rel: &str, seq: usize, text: &str) -> String {
    let digest = blake3::hash(format!("{}:{}:{}", source_rel, seq, text).as_bytes());
    digest.to_hex().to_string()
}
