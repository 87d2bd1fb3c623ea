//! Text embedding using local models
//!
//! Sentence-transformer models run through the fastembed crate (ONNX runtime).
//! The default is `all-mpnet-base-v2`.
//!
//! # Model Details
//!
//! - Dimensions: 768
//! - Max tokens: 384
//!
//! `all-MiniLM-L6-v2` (384 dimensions, 256 tokens) is a smaller, faster alternative.
//!
//! # Usage
//!
//! ```ignore
//! use matchscore_lib::embed::{Embedder, ModelCache, SentenceEmbedder};
//!
//! let spec = SentenceEmbedder::lookup("all-mpnet-base-v2")?;
//! let cache = ModelCache::new(".", spec.name);
//! let mut embedder = SentenceEmbedder::load(&spec, &cache)?;
//!
//! let reference = embedder.embed_query("Senior backend engineer")?;
//! let chunks = embedder.embed_documents(&["resume chunk one", "resume chunk two"])?;
//! ```

use crate::Result;

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
pub trait Embedder {
    /// Embed multiple documents, one vector per input text
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed the single reference text everything else is compared against
    fn embed_query(&mut self, text: &str) -> Result<Embedding>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

mod cache;
mod sentence;

pub use cache::*;
pub use sentence::*;
