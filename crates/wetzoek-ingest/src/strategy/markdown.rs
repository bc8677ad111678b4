//! Markdown-aware splitter: heading boundaries first, then the usual
//! paragraph/line/sentence/space descent of the recursive splitter.

use super::recursive::RecursiveCharacterSplitter;
use super::TextSplitter;

const MARKDOWN_SEPARATORS: [&str; 8] =
    ["\n# ", "\n## ", "\n### ", "\n#### ", "\n\n", "\n", ". ", " "];

pub struct MarkdownSplitter {
    inner: RecursiveCharacterSplitter,
}

impl MarkdownSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            inner: RecursiveCharacterSplitter::with_separators(
                chunk_size,
                chunk_overlap,
                MARKDOWN_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            ),
        }
    }
}

impl TextSplitter for MarkdownSplitter {
    fn split_text(&self, text: &str) -> anyhow::Result<Vec<String>> {
        self.inner.split_text(text)
    }
}
