//! Multilingual embedding model.
//!
//! Runs `intfloat/multilingual-e5-base` (XLM-RoBERTa architecture) locally
//! via candle: tokenize, forward, masked mean pooling, L2 normalization.
//! E5 models are passage/query-asymmetric; callers prefix texts with
//! `"passage: "` / `"query: "` before embedding (see `is_e5_model`).
//!
//! `WETZOEK_USE_FAKE_EMBEDDINGS=1` swaps in a deterministic hash-based
//! embedder so tests and development runs never load model weights.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod device;
pub mod pool;
pub mod tokenize;

use anyhow::{anyhow, Result};
use std::path::PathBuf;
use tracing::info;

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;

use wetzoek_core::config::EmbeddingConfig;
use wetzoek_core::traits::Embedder;

use crate::pool::masked_mean_l2;
use crate::tokenize::tokenize_on_device;

pub const EMBEDDING_DIM: usize = 768;
pub const MAX_TOKENS: usize = 512;

/// E5-family models expect `passage:`/`query:` input prefixes.
pub fn is_e5_model(model_name: &str) -> bool {
    model_name.to_lowercase().contains("e5")
}

pub struct EmbeddingModel {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl EmbeddingModel {
    pub fn new(cfg: &EmbeddingConfig) -> Result<Self> {
        let device = device::select_device();
        let model_dir = resolve_model_dir(cfg)?;
        info!(model_dir = %model_dir.display(), model = %cfg.model_name, "loading embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path).map_err(|e| {
            anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e)
        })?;

        let config_path = model_dir.join("config.json");
        let config: XLMRobertaConfig =
            serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let dtype = DType::F32;
        let safetensors_path = model_dir.join("model.safetensors");
        let vb = if safetensors_path.exists() {
            // Safety: the file comes from the configured model directory.
            unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors_path], dtype, &device)? }
        } else {
            let weights_path = model_dir.join("pytorch_model.bin");
            let weights = candle_core::pickle::read_all(&weights_path)?;
            let weights_map: std::collections::HashMap<String, Tensor> =
                weights.into_iter().collect();
            VarBuilder::from_tensors(weights_map, dtype, &device)
        };
        let model = XLMRobertaModel::new(&config, vb)?;
        info!("embedding model ready");
        Ok(Self { model, tokenizer, device })
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let (input_ids, attention_mask) =
            tokenize_on_device(&self.tokenizer, text, MAX_TOKENS, &self.device)?;
        let token_type_ids = Tensor::zeros((1, MAX_TOKENS), DType::I64, &self.device)?;
        let hidden_states = self.model.forward(
            &input_ids,
            &attention_mask,
            &token_type_ids,
            None,
            None,
            None,
        )?;
        let pooled = masked_mean_l2(&hidden_states, &attention_mask)?;
        let vec: Vec<f32> = pooled.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if vec.len() != EMBEDDING_DIM {
            return Err(anyhow!("unexpected embedding dim {} (want {})", vec.len(), EMBEDDING_DIM));
        }
        Ok(vec)
    }
}

impl Embedder for EmbeddingModel {
    fn dim(&self) -> usize {
        EMBEDDING_DIM
    }

    fn max_len(&self) -> usize {
        MAX_TOKENS
    }

    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_text(text)
    }
}

/// Deterministic hash-based stand-in with the real model's shape contract.
struct FakeEmbedder {
    dim: usize,
}

impl FakeEmbedder {
    fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

impl Embedder for FakeEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        MAX_TOKENS
    }

    fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_text(text))
    }
}

pub fn get_default_embedder(cfg: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    let use_fake = std::env::var("WETZOEK_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        info!("using fake embeddings");
        return Ok(Box::new(FakeEmbedder::new(EMBEDDING_DIM)));
    }
    Ok(Box::new(EmbeddingModel::new(cfg)?))
}

fn resolve_model_dir(cfg: &EmbeddingConfig) -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("WETZOEK_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            return Ok(p);
        }
    }
    if cfg.model_dir.exists() {
        return Ok(cfg.model_dir.clone());
    }
    Err(anyhow!(
        "Could not locate embedding model directory (tried WETZOEK_MODEL_DIR and {})",
        cfg.model_dir.display()
    ))
}
