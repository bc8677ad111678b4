//! Prompt assembly for grounded answering.

use wetzoek_core::types::{keys, RetrievalHit};

pub const SYSTEM_PROMPT: &str = "\
You are a careful assistant that answers with grounded, concise explanations.
Use only the provided context. If something is missing, say what's missing.
Answer in the language of the question (e.g., English or Dutch).
At the end, include short source attributions like [source: <file>, p.<page>].";

fn format_sources(hits: &[RetrievalHit]) -> String {
    let mut lines = Vec::with_capacity(hits.len());
    for hit in hits {
        let src = hit
            .metadata
            .get(keys::SOURCE_REL)
            .or_else(|| hit.metadata.get(keys::SOURCE_PATH))
            .map(String::as_str)
            .unwrap_or("unknown");
        match hit.metadata.get(keys::PAGE).and_then(|p| p.parse::<i64>().ok()) {
            // Stored pages are 0-based; readers expect 1-based.
            Some(page) => lines.push(format!("- {} p.{}", src, page + 1)),
            None => lines.push(format!("- {}", src)),
        }
    }
    lines.join("\n")
}

pub fn build_prompt(question: &str, hits: &[RetrievalHit]) -> String {
    let context: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
    format!(
        "{system}\n\nContext:\n{context}\n\nQuestion: {question}\n\n\
         Answer using only the context above. Then list the sources as bullets.\nSources:\n{sources}",
        system = SYSTEM_PROMPT,
        context = context.join("\n\n"),
        question = question,
        sources = format_sources(hits),
    )
}
