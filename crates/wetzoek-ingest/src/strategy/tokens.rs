//! Token-count splitter.
//!
//! Windows the embedding model's own token ids so chunk boundaries match
//! what the encoder actually consumes; overlap is counted in tokens. Needs
//! the model's tokenizer.json on disk, which is why resolution can fall
//! back to the recursive splitter.

use anyhow::anyhow;
use std::path::Path;
use tokenizers::Tokenizer;

use super::TextSplitter;

pub struct TokenSplitter {
    tokenizer: Tokenizer,
    tokens_per_chunk: usize,
    token_overlap: usize,
}

impl TokenSplitter {
    pub fn from_file(
        tokenizer_path: &Path,
        tokens_per_chunk: usize,
        token_overlap: usize,
    ) -> anyhow::Result<Self> {
        assert!(tokens_per_chunk > 0, "tokens_per_chunk must be > 0");
        assert!(token_overlap < tokens_per_chunk, "token_overlap must be < tokens_per_chunk");
        let tokenizer = Tokenizer::from_file(tokenizer_path).map_err(|e| {
            anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e)
        })?;
        Ok(Self { tokenizer, tokens_per_chunk, token_overlap })
    }
}

impl TextSplitter for TokenSplitter {
    fn split_text(&self, text: &str) -> anyhow::Result<Vec<String>> {
        let enc = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let ids = enc.get_ids();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let stride = self.tokens_per_chunk.saturating_sub(self.token_overlap).max(1);
        let mut out = Vec::new();
        let mut start = 0usize;
        loop {
            let end = (start + self.tokens_per_chunk).min(ids.len());
            let piece = self
                .tokenizer
                .decode(&ids[start..end], true)
                .map_err(|e| anyhow!("Token decode failed: {}", e))?;
            let piece = piece.trim();
            if !piece.is_empty() {
                out.push(piece.to_string());
            }
            if end >= ids.len() {
                break;
            }
            start += stride;
        }
        Ok(out)
    }
}
