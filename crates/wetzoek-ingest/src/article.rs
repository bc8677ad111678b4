//! Statutory-article pre-segmentation.
//!
//! Dutch statutes number their provisions as `Artikel <num>[letter]` under a
//! book (`Boek7/...` in the data tree). Splitting a law text into one
//! sub-document per article before generic chunking lets retrieval filter on
//! an exact article id instead of hoping a size-based chunk boundary lands
//! near the heading.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use wetzoek_core::types::{keys, SourceDocument, LAWS_CATEGORY};

/// `Artikel 244`, `artikel 244a` at line start; the rest of the heading line
/// is absorbed into the match so the body starts on the next line.
static HEADING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^[ \t]*artikel[ \t]+(\d+[a-z]?)\b[^\n]*").expect("article heading regex")
});

/// `Boek7`, `boek2` anywhere in the relative source path.
static BOOK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)boek(\d+)").expect("book regex"));

/// Splits one document of a category into sub-documents before generic
/// chunking. Implementations must return the input unchanged (as a
/// single-element sequence) when they find nothing to split on.
pub trait PreSegmenter: Send + Sync {
    fn segment(&self, doc: &SourceDocument) -> Vec<SourceDocument>;
}

/// Per-article segmentation for law texts.
#[derive(Debug, Default)]
pub struct ArticleSegmenter;

impl ArticleSegmenter {
    pub fn new() -> Self {
        Self
    }

    fn book_for(doc: &SourceDocument) -> Option<String> {
        let src = doc
            .metadata
            .get(keys::SOURCE_REL)
            .or_else(|| doc.metadata.get(keys::SOURCE_PATH))?;
        BOOK_RE.captures(src).map(|c| c[1].to_string())
    }
}

impl PreSegmenter for ArticleSegmenter {
    fn segment(&self, doc: &SourceDocument) -> Vec<SourceDocument> {
        let text = doc.text.as_str();
        let headings: Vec<(usize, usize, String)> = HEADING_RE
            .captures_iter(text)
            .map(|c| {
                let m = c.get(0).expect("whole match");
                (m.start(), m.end(), c[1].to_lowercase())
            })
            .collect();

        // Zero matches: downstream chunking still sees the full document.
        if headings.is_empty() {
            return vec![doc.clone()];
        }

        let book = Self::book_for(doc);
        let mut out = Vec::with_capacity(headings.len());
        for (i, (start, heading_end, num)) in headings.iter().enumerate() {
            let body_end = headings.get(i + 1).map_or(text.len(), |next| next.0);
            let body = text[*heading_end..body_end].trim();
            // A heading with nothing under it keeps its heading line so the
            // article still indexes non-empty.
            let body = if body.is_empty() { text[*start..*heading_end].trim() } else { body };

            let mut meta = doc.metadata.clone();
            meta.insert(keys::ARTICLE_NUM.to_string(), num.clone());
            match &book {
                Some(b) => {
                    meta.insert(keys::BOOK.to_string(), b.clone());
                    meta.insert(keys::ARTICLE.to_string(), format!("{}:{}", b, num));
                }
                None => {
                    meta.insert(keys::ARTICLE.to_string(), num.clone());
                }
            }
            out.push(SourceDocument::new(body, meta));
        }
        out
    }
}

/// Registry mapping a document category to its pre-segmentation strategy.
/// Categories without an entry go straight to the chunking strategy.
#[derive(Default)]
pub struct Segmenters {
    by_category: HashMap<String, Box<dyn PreSegmenter>>,
}

impl Segmenters {
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped registry: law texts get per-article segmentation.
    pub fn with_defaults() -> Self {
        let mut s = Self::new();
        s.register(LAWS_CATEGORY, Box::new(ArticleSegmenter::new()));
        s
    }

    pub fn register(&mut self, category: &str, segmenter: Box<dyn PreSegmenter>) {
        self.by_category.insert(category.to_string(), segmenter);
    }

    pub fn get(&self, category: &str) -> Option<&dyn PreSegmenter> {
        self.by_category.get(category).map(Box::as_ref)
    }
}
