//! Typed configuration loader.
//!
//! Merges built-in defaults with `config.toml`, an environment-specific
//! `config.<env>.toml` selected by `RUST_ENV`, and `WETZOEK_*` environment
//! variables (double underscore as the section separator, e.g.
//! `WETZOEK_CHUNKING__STRATEGY=tokens`).

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub index_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from("data"), index_dir: PathBuf::from("index") }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// One of `recursive`, `tokens`, `sentences`, `markdown`.
    pub strategy: String,
    /// Size bound in characters (non-token strategies).
    pub chunk_size: usize,
    /// Overlap in characters carried between consecutive chunks.
    pub chunk_overlap: usize,
    /// Size bound in tokens (`tokens` strategy only).
    pub token_chunk_size: usize,
    /// Overlap in tokens (`tokens` strategy only).
    pub token_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            strategy: "recursive".to_string(),
            chunk_size: 1000,
            chunk_overlap: 150,
            token_chunk_size: 350,
            token_overlap: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model family name; E5 models get passage:/query: prefixes.
    pub model_name: String,
    /// Directory holding tokenizer.json, config.json and model weights.
    pub model_dir: PathBuf,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model_name: "intfloat/multilingual-e5-base".to_string(),
            model_dir: PathBuf::from("models/multilingual-e5-base"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Top-k passages returned to the caller.
    pub k: usize,
    /// LanceDB table name; rebuilt wholesale on each index run.
    pub collection: String,
    /// Book number assumed for bare "artikel N" mentions. Domain default
    /// for the Dutch tenancy corpus (book 7 of the civil code).
    pub default_book: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { k: 4, collection: "passages".to_string(), default_book: "7".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// `groq` or `openai`; both speak the same chat-completions shape.
    pub provider: String,
    pub groq_model: String,
    pub openai_model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "groq".to_string(),
            groq_model: "llama-3.3-70b-versatile".to_string(),
            openai_model: "gpt-4o-mini".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub paths: PathsConfig,
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("WETZOEK_").split("__"));

        let config: AppConfig = figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.chunking.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunking.chunk_size must be > 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::InvalidConfig(
                "chunking.chunk_overlap must be < chunking.chunk_size".to_string(),
            ));
        }
        if self.chunking.token_overlap >= self.chunking.token_chunk_size {
            return Err(Error::InvalidConfig(
                "chunking.token_overlap must be < chunking.token_chunk_size".to_string(),
            ));
        }
        if self.retrieval.k == 0 {
            return Err(Error::InvalidConfig("retrieval.k must be > 0".to_string()));
        }
        Ok(())
    }
}
