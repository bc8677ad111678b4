use wetzoek_core::types::{keys, Chunk, Meta};
use wetzoek_store::schema::EMBEDDING_DIM;
use wetzoek_store::LancePassageIndex;

fn law_chunk(text: &str, article: &str, page: Option<u32>) -> Chunk {
    let mut meta = Meta::new();
    meta.insert(keys::SOURCE_PATH.to_string(), "data/laws/Boek7/titel4.txt".to_string());
    meta.insert(keys::SOURCE_REL.to_string(), "laws/Boek7/titel4.txt".to_string());
    meta.insert(keys::CATEGORY.to_string(), "laws".to_string());
    meta.insert(keys::BOOK.to_string(), "7".to_string());
    meta.insert(keys::ARTICLE.to_string(), article.to_string());
    meta.insert(
        keys::ARTICLE_NUM.to_string(),
        article.split(':').next_back().unwrap_or(article).to_string(),
    );
    if let Some(p) = page {
        meta.insert(keys::PAGE.to_string(), p.to_string());
    }
    Chunk { text: text.to_string(), metadata: meta }
}

fn prose_chunk(text: &str) -> Chunk {
    let mut meta = Meta::new();
    meta.insert(keys::SOURCE_PATH.to_string(), "data/guides/huren.md".to_string());
    meta.insert(keys::SOURCE_REL.to_string(), "guides/huren.md".to_string());
    meta.insert(keys::CATEGORY.to_string(), "guides".to_string());
    Chunk { text: text.to_string(), metadata: meta }
}

/// Unit vector with a single hot dimension; distinct seeds are orthogonal.
fn axis_vector(seed: usize) -> Vec<f32> {
    let mut v = vec![0f32; EMBEDDING_DIM as usize];
    v[seed % EMBEDDING_DIM as usize] = 1.0;
    v
}

fn fixture() -> (Vec<Chunk>, Vec<Vec<f32>>) {
    let chunks = vec![
        law_chunk("De huurder mag niet onderverhuren.", "7:244", None),
        law_chunk("Tenzij de verhuurder instemt.", "7:244a", None),
        prose_chunk("Praktische uitleg over onderhuur."),
    ];
    let vectors = (0..chunks.len()).map(axis_vector).collect();
    (chunks, vectors)
}

#[tokio::test]
async fn rebuild_then_search_roundtrips_text_and_metadata() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let index = LancePassageIndex::open(tmp.path(), "passages").await?;
    let (chunks, vectors) = fixture();
    let written = index.rebuild(&chunks, &vectors).await?;
    assert_eq!(written, 3);

    let hits = index.search(&axis_vector(0), 1, None).await?;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].text, "De huurder mag niet onderverhuren.");
    assert_eq!(hits[0].metadata.get(keys::ARTICLE).map(String::as_str), Some("7:244"));
    assert_eq!(hits[0].metadata.get(keys::CATEGORY).map(String::as_str), Some("laws"));
    assert_eq!(
        hits[0].metadata.get(keys::SOURCE_REL).map(String::as_str),
        Some("laws/Boek7/titel4.txt")
    );
    // No page on a text source; key stays absent rather than defaulted.
    assert!(!hits[0].metadata.contains_key(keys::PAGE));
    Ok(())
}

#[tokio::test]
async fn metadata_filters_are_exact_match_conjunctions() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let index = LancePassageIndex::open(tmp.path(), "passages").await?;
    let (chunks, vectors) = fixture();
    index.rebuild(&chunks, &vectors).await?;

    let laws_only = index
        .search(&axis_vector(2), 10, Some(&vec![("category".to_string(), "laws".to_string())]))
        .await?;
    assert_eq!(laws_only.len(), 2);
    for hit in &laws_only {
        assert_eq!(hit.metadata.get(keys::CATEGORY).map(String::as_str), Some("laws"));
    }

    let exact_article = index
        .search(&axis_vector(0), 10, Some(&vec![("article".to_string(), "7:244a".to_string())]))
        .await?;
    assert_eq!(exact_article.len(), 1);
    assert_eq!(exact_article[0].metadata.get(keys::ARTICLE).map(String::as_str), Some("7:244a"));
    Ok(())
}

#[tokio::test]
async fn rebuild_replaces_instead_of_appending() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let index = LancePassageIndex::open(tmp.path(), "passages").await?;
    let (chunks, vectors) = fixture();

    index.rebuild(&chunks, &vectors).await?;
    let second = index.rebuild(&chunks, &vectors).await?;
    assert_eq!(second, 3);
    assert_eq!(index.count().await?, 3, "second rebuild must not duplicate rows");
    Ok(())
}

#[tokio::test]
async fn empty_rebuild_is_a_valid_outcome() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let index = LancePassageIndex::open(tmp.path(), "passages").await?;

    let written = index.rebuild(&[], &[]).await?;
    assert_eq!(written, 0);
    assert_eq!(index.count().await?, 0);

    let hits = index.search(&axis_vector(0), 4, None).await?;
    assert!(hits.is_empty());
    Ok(())
}

#[tokio::test]
async fn page_metadata_survives_the_roundtrip() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let index = LancePassageIndex::open(tmp.path(), "passages").await?;
    let chunks = vec![law_chunk("Paginagebonden tekst.", "7:1", Some(3))];
    let vectors = vec![axis_vector(0)];
    index.rebuild(&chunks, &vectors).await?;

    let hits = index.search(&axis_vector(0), 1, None).await?;
    assert_eq!(hits[0].metadata.get(keys::PAGE).map(String::as_str), Some("3"));
    Ok(())
}
