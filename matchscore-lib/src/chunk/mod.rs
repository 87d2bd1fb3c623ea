//! Token-window chunking
//!
//! Embedding models only see a bounded number of tokens per input. Long
//! resumes are therefore split into overlapping windows measured in the
//! model's own tokens, so that no part of the document falls outside what the
//! model can read.
//!
//! # Usage
//!
//! ```ignore
//! use matchscore_lib::chunk::{ChunkMetadata, TokenChunker};
//!
//! let chunker = TokenChunker::new(256, 64)?;
//! let chunks = chunker.chunk(&mut embedder, &resume_text, ChunkMetadata::for_source("cv.pdf"))?;
//! ```

use serde::{Deserialize, Serialize};

use crate::Result;

/// A chunk of text with its metadata
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Chunk {
    /// The decoded text content of this chunk
    pub content: String,
    /// Metadata about the source and position
    pub metadata: ChunkMetadata,
}

/// Metadata associated with a chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct ChunkMetadata {
    /// Source document identifier
    pub source_id: Option<String>,
    /// Token offset of the window start within the source document
    pub position: usize,
    /// Number of tokens in this window
    pub token_count: usize,
    /// Total number of chunks from this source
    pub total_chunks: Option<usize>,
}

impl ChunkMetadata {
    /// Metadata for chunks taken from the named source.
    pub fn for_source(source_id: impl Into<String>) -> Self {
        Self {
            source_id: Some(source_id.into()),
            ..Self::default()
        }
    }
}

/// Turns text into token ids and back.
///
/// Methods take `&mut self` because backends may need to reconfigure
/// truncation around a call.
pub trait Tokenizer {
    /// Tokenize `text` without special tokens and without truncation.
    fn encode(&mut self, text: &str) -> Result<Vec<u32>>;

    /// Decode ids back into text, skipping special tokens.
    fn decode(&mut self, ids: &[u32]) -> Result<String>;
}

mod token;

pub use token::*;
