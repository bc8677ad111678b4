use wetzoek_core::config::AppConfig;
use wetzoek_core::types::{keys, ChunkStats, Meta, SourceDocument};

#[test]
fn config_defaults_match_shipped_values() {
    let cfg = AppConfig::default();
    assert_eq!(cfg.chunking.strategy, "recursive");
    assert_eq!(cfg.chunking.chunk_size, 1000);
    assert_eq!(cfg.chunking.chunk_overlap, 150);
    assert_eq!(cfg.chunking.token_chunk_size, 350);
    assert_eq!(cfg.chunking.token_overlap, 60);
    assert_eq!(cfg.retrieval.k, 4);
    assert_eq!(cfg.retrieval.default_book, "7");
    assert!(cfg.embedding.model_name.contains("e5"));
}

#[test]
fn source_document_category_accessor() {
    let mut meta = Meta::new();
    meta.insert(keys::CATEGORY.to_string(), "laws".to_string());
    let doc = SourceDocument::new("Artikel 1 tekst", meta);
    assert_eq!(doc.category(), Some("laws"));

    let bare = SourceDocument::new("plain", Meta::new());
    assert_eq!(bare.category(), None);
}

#[test]
fn empty_stats_are_all_zero() {
    let stats = ChunkStats::empty();
    assert_eq!(stats.count, 0);
    assert_eq!(stats.avg_len, 0);
    assert_eq!(stats.p95_len, 0);
    assert_eq!(stats.max_len, 0);
}
