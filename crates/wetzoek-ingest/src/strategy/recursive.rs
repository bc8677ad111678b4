//! Default character-based splitter.
//!
//! Splits on the coarsest separator present (paragraph break, line break,
//! sentence end, space), descending to finer separators only for pieces
//! still over the size bound, then greedily packs adjacent pieces up to the
//! bound with the configured character overlap carried from one chunk into
//! the next. All sizes count characters, not bytes, so multi-byte UTF-8
//! never lands inside a chunk boundary.

use std::collections::VecDeque;

use super::TextSplitter;

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", ". ", " "];

pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self::with_separators(
            chunk_size,
            chunk_overlap,
            DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        )
    }

    pub fn with_separators(
        chunk_size: usize,
        chunk_overlap: usize,
        separators: Vec<String>,
    ) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        assert!(chunk_overlap < chunk_size, "chunk_overlap must be < chunk_size");
        assert!(!separators.is_empty(), "separators must not be empty");
        Self { chunk_size, chunk_overlap, separators }
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        // Coarsest separator actually present in the text wins; the finer
        // ones remain available for oversized pieces.
        let mut sep = separators.last().cloned().unwrap_or_default();
        let mut remaining: &[String] = &[];
        for (i, s) in separators.iter().enumerate() {
            if text.contains(s.as_str()) {
                sep = s.clone();
                remaining = &separators[i + 1..];
                break;
            }
        }

        let pieces: Vec<&str> = text.split(sep.as_str()).filter(|s| !s.is_empty()).collect();
        let mut finals = Vec::new();
        let mut packable: Vec<String> = Vec::new();
        for piece in pieces {
            if char_len(piece) < self.chunk_size {
                packable.push(piece.to_string());
            } else {
                if !packable.is_empty() {
                    finals.extend(self.pack(&packable, &sep));
                    packable.clear();
                }
                if remaining.is_empty() {
                    // Atomic piece with no finer separator left; emitted
                    // whole even though it exceeds the bound.
                    finals.push(piece.to_string());
                } else {
                    finals.extend(self.split_with(piece, remaining));
                }
            }
        }
        if !packable.is_empty() {
            finals.extend(self.pack(&packable, &sep));
        }
        finals
    }

    /// Greedily pack pieces up to the size bound; when a chunk is emitted,
    /// trailing pieces up to the overlap budget seed the next one.
    fn pack(&self, pieces: &[String], sep: &str) -> Vec<String> {
        let sep_len = char_len(sep);
        let mut docs = Vec::new();
        let mut current: VecDeque<String> = VecDeque::new();
        let mut total = 0usize;
        for piece in pieces {
            let len = char_len(piece);
            let extra = if current.is_empty() { 0 } else { sep_len };
            if total + len + extra > self.chunk_size && !current.is_empty() {
                if let Some(doc) = join_pieces(&current, sep) {
                    docs.push(doc);
                }
                loop {
                    let overflow = {
                        let extra = if current.is_empty() { 0 } else { sep_len };
                        total + len + extra > self.chunk_size && total > 0
                    };
                    if !(total > self.chunk_overlap || overflow) {
                        break;
                    }
                    match current.pop_front() {
                        Some(front) => {
                            total -= char_len(&front)
                                + if current.is_empty() { 0 } else { sep_len };
                        }
                        None => break,
                    }
                }
            }
            current.push_back(piece.clone());
            total += len + if current.len() > 1 { sep_len } else { 0 };
        }
        if let Some(doc) = join_pieces(&current, sep) {
            docs.push(doc);
        }
        docs
    }
}

impl TextSplitter for RecursiveCharacterSplitter {
    fn split_text(&self, text: &str) -> anyhow::Result<Vec<String>> {
        Ok(self.split_with(text, &self.separators))
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn join_pieces(pieces: &VecDeque<String>, sep: &str) -> Option<String> {
    if pieces.is_empty() {
        return None;
    }
    let joined = pieces.iter().cloned().collect::<Vec<_>>().join(sep);
    let joined = joined.trim();
    if joined.is_empty() {
        None
    } else {
        Some(joined.to_string())
    }
}
