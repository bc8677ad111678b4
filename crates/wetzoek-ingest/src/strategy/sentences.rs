//! Sentence-aligned splitter.
//!
//! Segments at natural-language sentence boundaries, then packs whole
//! sentences up to the character bound. Paragraph separators are preserved
//! inside a chunk, and the overlap re-includes trailing sentences instead of
//! cutting mid-sentence.

use super::TextSplitter;

#[derive(Debug, Clone)]
struct Unit {
    text: String,
    /// First sentence of a paragraph; rendered with a paragraph break
    /// before it instead of a space.
    opens_paragraph: bool,
}

impl Unit {
    fn len(&self) -> usize {
        self.text.chars().count()
    }
}

pub struct SentenceSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl SentenceSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(chunk_size > 0, "chunk_size must be > 0");
        assert!(chunk_overlap < chunk_size, "chunk_overlap must be < chunk_size");
        Self { chunk_size, chunk_overlap }
    }

    fn units(text: &str) -> Vec<Unit> {
        let mut units = Vec::new();
        for para in text.split("\n\n") {
            let para = para.trim();
            if para.is_empty() {
                continue;
            }
            for (i, sentence) in split_sentences(para).into_iter().enumerate() {
                units.push(Unit { text: sentence, opens_paragraph: i == 0 });
            }
        }
        units
    }

    fn render(units: &[Unit]) -> String {
        let mut out = String::new();
        for (i, u) in units.iter().enumerate() {
            if i > 0 {
                out.push_str(if u.opens_paragraph { "\n\n" } else { " " });
            }
            out.push_str(&u.text);
        }
        out
    }

    fn sep_len(prev_exists: bool, unit: &Unit) -> usize {
        if !prev_exists {
            0
        } else if unit.opens_paragraph {
            2
        } else {
            1
        }
    }

    /// Trailing sentences of the emitted chunk that seed the next one:
    /// bounded by the overlap budget, and never so many that the incoming
    /// sentence no longer fits the size bound.
    fn carry(&self, emitted: &[Unit], incoming: &Unit) -> Vec<Unit> {
        let incoming_len = incoming.len();
        let mut carried: Vec<Unit> = Vec::new();
        let mut carried_len = 0usize;
        for u in emitted.iter().rev() {
            let added = u.len() + if carried.is_empty() { 0 } else { 1 };
            let incoming_sep = Self::sep_len(true, incoming);
            if carried_len + added > self.chunk_overlap
                || carried_len + added + incoming_sep + incoming_len > self.chunk_size
            {
                break;
            }
            carried_len += added;
            carried.push(u.clone());
        }
        carried.reverse();
        carried
    }
}

impl TextSplitter for SentenceSplitter {
    fn split_text(&self, text: &str) -> anyhow::Result<Vec<String>> {
        let units = Self::units(text);
        let mut chunks = Vec::new();
        let mut current: Vec<Unit> = Vec::new();
        let mut current_len = 0usize;

        for unit in units {
            let sep = Self::sep_len(!current.is_empty(), &unit);
            if !current.is_empty() && current_len + sep + unit.len() > self.chunk_size {
                chunks.push(Self::render(&current));
                current = self.carry(&current, &unit);
                current_len = current.iter().map(Unit::len).sum::<usize>()
                    + current.len().saturating_sub(1);
            }
            current_len += unit.len() + Self::sep_len(!current.is_empty(), &unit);
            current.push(unit);
        }
        if !current.is_empty() {
            chunks.push(Self::render(&current));
        }
        Ok(chunks)
    }
}

/// Cut after terminal punctuation followed by whitespace (or end of text).
/// Runs of punctuation ("...", "?!") stay attached to their sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                let end = i + c.len_utf8();
                let sentence = text[start..end].trim();
                if !sentence.is_empty() {
                    out.push(sentence.to_string());
                }
                start = end;
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail.to_string());
    }
    out
}
