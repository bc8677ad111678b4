use wetzoek_core::types::{keys, Meta, SourceDocument};
use wetzoek_ingest::{ArticleSegmenter, PreSegmenter, Segmenters};

fn law_doc(text: &str, source_rel: &str) -> SourceDocument {
    let mut meta = Meta::new();
    meta.insert(keys::CATEGORY.to_string(), "laws".to_string());
    meta.insert(keys::SOURCE_REL.to_string(), source_rel.to_string());
    meta.insert(keys::SOURCE_PATH.to_string(), format!("data/{}", source_rel));
    SourceDocument::new(text, meta)
}

#[test]
fn splits_per_article_with_book_from_path() {
    let doc = law_doc("Artikel 244\nBody1\nArtikel 244a\nBody2", "laws/Boek7/titel4.txt");
    let parts = ArticleSegmenter::new().segment(&doc);

    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].text, "Body1");
    assert_eq!(parts[1].text, "Body2");
    assert_eq!(parts[0].metadata.get(keys::ARTICLE_NUM).map(String::as_str), Some("244"));
    assert_eq!(parts[1].metadata.get(keys::ARTICLE_NUM).map(String::as_str), Some("244a"));
    assert_eq!(parts[0].metadata.get(keys::BOOK).map(String::as_str), Some("7"));
    assert_eq!(parts[0].metadata.get(keys::ARTICLE).map(String::as_str), Some("7:244"));
    assert_eq!(parts[1].metadata.get(keys::ARTICLE).map(String::as_str), Some("7:244a"));
    // Parent metadata carries through untouched.
    assert_eq!(parts[0].metadata.get(keys::CATEGORY).map(String::as_str), Some("laws"));
    assert_eq!(
        parts[1].metadata.get(keys::SOURCE_REL).map(String::as_str),
        Some("laws/Boek7/titel4.txt")
    );
}

#[test]
fn zero_matches_returns_input_unchanged() {
    let doc = law_doc("Just some prose without any headings.", "laws/notes.txt");
    let parts = ArticleSegmenter::new().segment(&doc);

    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].text, doc.text);
    assert!(!parts[0].metadata.contains_key(keys::ARTICLE));
}

#[test]
fn article_id_is_bare_number_without_book_in_path() {
    let doc = law_doc("Artikel 12\nInhoud.", "laws/huurwet.txt");
    let parts = ArticleSegmenter::new().segment(&doc);

    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].metadata.get(keys::ARTICLE).map(String::as_str), Some("12"));
    assert!(!parts[0].metadata.contains_key(keys::BOOK));
}

#[test]
fn heading_case_and_indent_are_tolerated() {
    let doc = law_doc("  artikel 3b Opschrift\nTekst van drie b.", "laws/Boek3/x.txt");
    let parts = ArticleSegmenter::new().segment(&doc);

    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].metadata.get(keys::ARTICLE_NUM).map(String::as_str), Some("3b"));
    assert_eq!(parts[0].text, "Tekst van drie b.");
}

#[test]
fn empty_body_keeps_heading_line() {
    let doc = law_doc("Artikel 1\nTekst.\nArtikel 2", "laws/Boek7/kort.txt");
    let parts = ArticleSegmenter::new().segment(&doc);

    assert_eq!(parts.len(), 2);
    assert_eq!(parts[0].text, "Tekst.");
    // Trailing heading with no body still yields a non-empty sub-document.
    assert_eq!(parts[1].text, "Artikel 2");
    assert_eq!(parts[1].metadata.get(keys::ARTICLE).map(String::as_str), Some("7:2"));
}

#[test]
fn default_registry_only_knows_laws() {
    let segmenters = Segmenters::with_defaults();
    assert!(segmenters.get("laws").is_some());
    assert!(segmenters.get("manuals").is_none());
    assert!(segmenters.get("root").is_none());
}
