//! Run configuration
//!
//! Defaults mirror the layout of a single-operator batch job run from the
//! folder that holds the inputs: `job_desc.txt` next to a `resumes/` folder,
//! with the model cached alongside and the report written to the same place.

use std::path::PathBuf;

use tracing::warn;

use crate::chunk::TokenChunker;
use crate::report::ReportFormat;
use crate::{Error, Result};

pub const DEFAULT_MODEL: &str = "all-mpnet-base-v2";
pub const DEFAULT_OVERLAP: usize = 64;
pub const DEFAULT_REFERENCE: &str = "job_desc.txt";
pub const DEFAULT_CANDIDATE_DIR: &str = "resumes";
pub const DEFAULT_CANDIDATE_EXTENSION: &str = "pdf";

/// Settings for one matching run
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Embedding model name
    pub model: String,
    /// Chunk size in tokens; `None` uses the model's input limit
    pub max_tokens: Option<usize>,
    /// Tokens shared by consecutive chunks
    pub overlap: usize,
    /// Directory holding `cached-<model>`
    pub cache_root: PathBuf,
    /// Job description text file
    pub reference_path: PathBuf,
    /// Folder scanned for candidates
    pub candidate_dir: PathBuf,
    /// Extension candidates must have, without the dot
    pub candidate_extension: String,
    /// Where the report is written
    pub output_dir: PathBuf,
    pub format: ReportFormat,
    /// Abort on the first candidate failure instead of skipping it
    pub fail_fast: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: None,
            overlap: DEFAULT_OVERLAP,
            cache_root: PathBuf::from("."),
            reference_path: PathBuf::from(DEFAULT_REFERENCE),
            candidate_dir: PathBuf::from(DEFAULT_CANDIDATE_DIR),
            candidate_extension: DEFAULT_CANDIDATE_EXTENSION.to_string(),
            output_dir: PathBuf::from("."),
            format: ReportFormat::default(),
            fail_fast: false,
        }
    }
}

impl MatchConfig {
    /// Check settings that do not depend on the model.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(Error::InvalidInput("model name is empty".to_string()));
        }
        if self.candidate_extension.is_empty() || self.candidate_extension.starts_with('.') {
            return Err(Error::InvalidInput(format!(
                "candidate extension must be non-empty and without a leading dot, got '{}'",
                self.candidate_extension
            )));
        }
        if let Some(max_tokens) = self.max_tokens {
            TokenChunker::new(max_tokens, self.overlap)?;
        }
        Ok(())
    }

    /// Build the chunker for a model whose input limit is `model_max_tokens`.
    pub fn chunker(&self, model_max_tokens: usize) -> Result<TokenChunker> {
        let max_tokens = match self.max_tokens {
            Some(max_tokens) if max_tokens > model_max_tokens => {
                warn!(
                    max_tokens,
                    model_max_tokens, "chunk size exceeds the model input limit, chunks will be truncated"
                );
                max_tokens
            }
            Some(max_tokens) => max_tokens,
            None => model_max_tokens,
        };
        TokenChunker::new(max_tokens, self.overlap)
    }
}
