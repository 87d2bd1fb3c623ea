//! matchscore - rank candidate resumes against a job description
//!
//! # Architecture
//!
//! ```text
//! Job description -> Normalize -> Embedder ---------------------+
//!                                                               |
//! Resume PDF -> Extract -> Normalize -> Chunker -> Embedder -> Score -> Report
//! ```
//!
//! Every resume is split into overlapping token windows, each window is
//! embedded, and the resume's score is the best cosine similarity between the
//! job description and any of its windows.
//!
//! # Example
//!
//! ```ignore
//! use matchscore_lib::{
//!     config::MatchConfig,
//!     embed::{ModelCache, SentenceEmbedder},
//!     extract::PdfExtractor,
//!     pipeline::run_job,
//! };
//!
//! let config = MatchConfig::default();
//! let spec = SentenceEmbedder::lookup(&config.model)?;
//! let embedder = SentenceEmbedder::load(&spec, &ModelCache::new(&config.cache_root, spec.name))?;
//!
//! let summary = run_job(&config, embedder, PdfExtractor::new(), config.chunker(spec.max_tokens)?, |p| {
//!     println!("{p}");
//! })?;
//! println!("Check results in {}", summary.output.display());
//! ```

pub mod candidates;
pub mod chunk;
pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod score;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
