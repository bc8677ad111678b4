//! wetzoek-ingest
//!
//! Document loading, statutory-article pre-segmentation and strategy-selected
//! chunking. The `pipeline` module ties the pieces together; see the crate
//! tests for end-to-end usage.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod article;
pub mod loader;
pub mod pipeline;
pub mod strategy;

pub use article::{ArticleSegmenter, PreSegmenter, Segmenters};
pub use loader::FsLoader;
pub use pipeline::ChunkPipeline;
pub use strategy::{resolve, ResolvedStrategy, TextSplitter};
