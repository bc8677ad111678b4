//! Filtered nearest-neighbor search over the passage table.

use anyhow::{anyhow, Result};
use arrow_array::{Array, Float32Array, Int32Array, RecordBatch, StringArray};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::Connection;

use wetzoek_core::types::{keys, Meta, MetaFilter, RetrievalHit};

pub async fn search_table(
    conn: &Connection,
    table_name: &str,
    query_vec: &[f32],
    k: usize,
    filter: Option<&MetaFilter>,
) -> Result<Vec<RetrievalHit>> {
    let table = conn.open_table(table_name).execute().await?;
    let mut query = table.vector_search(query_vec.to_vec())?.limit(k);
    if let Some(filter) = filter {
        query = query.only_if(filter_sql(filter)?);
    }
    let mut stream = query.execute().await?;

    let mut hits = Vec::new();
    while let Some(batch) = stream.try_next().await? {
        for i in 0..batch.num_rows() {
            hits.push(hit_from_row(&batch, i)?);
        }
    }
    Ok(hits)
}

/// Exact-match conjunction rendered as a LanceDB predicate. Keys must be
/// bare column identifiers; values are single-quote escaped.
fn filter_sql(filter: &MetaFilter) -> Result<String> {
    let mut terms = Vec::with_capacity(filter.len());
    for (key, value) in filter {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(anyhow!("invalid filter key: {:?}", key));
        }
        terms.push(format!("{} = '{}'", key, value.replace('\'', "''")));
    }
    Ok(terms.join(" AND "))
}

fn hit_from_row(batch: &RecordBatch, row: usize) -> Result<RetrievalHit> {
    let mut metadata = Meta::new();
    for key in [
        keys::SOURCE_PATH,
        keys::SOURCE_REL,
        keys::CATEGORY,
        keys::BOOK,
        keys::ARTICLE_NUM,
        keys::ARTICLE,
    ] {
        if let Some(value) = string_value(batch, key, row)? {
            metadata.insert(key.to_string(), value);
        }
    }
    if let Some(col) = batch.column_by_name("page") {
        let pages = col
            .as_any()
            .downcast_ref::<Int32Array>()
            .ok_or_else(|| anyhow!("page column has wrong type"))?;
        if !pages.is_null(row) {
            metadata.insert(keys::PAGE.to_string(), pages.value(row).to_string());
        }
    }

    let text = string_value(batch, "text", row)?
        .ok_or_else(|| anyhow!("text column missing from search result"))?;
    let score = match batch.column_by_name("_distance") {
        Some(col) => {
            let distances = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .ok_or_else(|| anyhow!("_distance column has wrong type"))?;
            1.0 - distances.value(row)
        }
        None => 0.0,
    };
    Ok(RetrievalHit { text, metadata, score })
}

fn string_value(batch: &RecordBatch, column: &str, row: usize) -> Result<Option<String>> {
    let Some(col) = batch.column_by_name(column) else {
        return Ok(None);
    };
    let strings = col
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| anyhow!("{} column has wrong type", column))?;
    if strings.is_null(row) {
        return Ok(None);
    }
    let value = strings.value(row);
    if value.is_empty() {
        Ok(None)
    } else {
        Ok(Some(value.to_string()))
    }
}
