//! Statute-query classification.
//!
//! Decides whether a question targets a specific legal article, and if so
//! which one. A bare "artikel N" mention is resolved against a configurable
//! default book rather than a hard-coded one; the shipped default of book 7
//! reflects the Dutch tenancy corpus this system was built for and will
//! mis-tag other statutory domains if left unchanged there.

use once_cell::sync::Lazy;
use regex::Regex;

/// `7:244`, `3:12a` style citations.
static CITATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2}:\d{1,4}[a-z]?)\b").expect("citation regex"));

/// `artikel 244`, `art. 244a`, `article 12`, `чл. 5` mentions.
static ARTICLE_MENTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:art\.|artikel|article|чл\.|член)\s*(\d{1,4}[a-z]?)\b")
        .expect("article mention regex")
});

/// Words meaning "civil code" / "book 7" across the supported languages.
const BOOK_KEYWORDS: [&str; 5] = ["bw", "burgerlijk", "civil code", "boek 7", "book 7"];

/// Words meaning "article" across the supported languages (nl/en/bg).
const ARTICLE_KEYWORDS: [&str; 5] = ["art.", "artikel", "article", "чл.", "член"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub is_statute_query: bool,
    pub article_id: Option<String>,
}

impl Classification {
    fn not_statute() -> Self {
        Self { is_statute_query: false, article_id: None }
    }
}

#[derive(Debug, Clone)]
pub struct QueryClassifier {
    default_book: String,
}

impl QueryClassifier {
    pub fn new(default_book: impl Into<String>) -> Self {
        Self { default_book: default_book.into() }
    }

    /// Rules, in order: an explicit `book:number` citation wins; otherwise a
    /// book keyword together with an article keyword marks a statute query,
    /// with the article id derived from an "artikel N" mention under the
    /// default book when present.
    pub fn classify(&self, question: &str) -> Classification {
        let ql = question.to_lowercase();

        let citation = CITATION_RE.captures(&ql).map(|c| c[1].to_string());
        let mentions_book = BOOK_KEYWORDS.iter().any(|w| ql.contains(w));
        let mentions_article = ARTICLE_KEYWORDS.iter().any(|w| ql.contains(w));

        let is_statute = citation.is_some() || (mentions_book && mentions_article);
        if !is_statute {
            return Classification::not_statute();
        }

        let article_id = citation.or_else(|| {
            ARTICLE_MENTION_RE
                .captures(&ql)
                .map(|c| format!("{}:{}", self.default_book, &c[1]))
        });
        Classification { is_statute_query: true, article_id }
    }
}
