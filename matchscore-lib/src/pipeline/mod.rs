//! Candidate matching pipeline
//!
//! Combines extractor, normalizer, chunker, embedder and scorer into a
//! single sequential run over the candidate folder.
//!
//! ```text
//! job_desc.txt -> normalize -> embed_query ------------------+
//!                                                            |
//! *.pdf -> extract -> normalize -> chunk -> embed_documents -> max cosine -> row
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use matchscore_lib::pipeline::run_job;
//!
//! let chunker = config.chunker(spec.max_tokens)?;
//! let summary = run_job(&config, embedder, PdfExtractor::new(), chunker, |progress| {
//!     println!("{progress}");
//! })?;
//! ```

use std::fmt;

use tracing::{debug, info, warn};

use crate::candidates::{self, Candidate};
use crate::chunk::{ChunkMetadata, TokenChunker, Tokenizer};
use crate::config::MatchConfig;
use crate::embed::{Embedder, Embedding};
use crate::extract::{PlainTextExtractor, TextExtractor};
use crate::normalize::normalize;
use crate::report::{write_report, MatchReport, MatchResult, SkipReason, SkippedCandidate};
use crate::score::match_score;
use crate::{Error, Result};

/// Result of processing one candidate
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    Scored(MatchResult),
    Skipped(SkippedCandidate),
}

/// Progress notification sent after each candidate.
///
/// Displays as `[i/total] - Match score <name>: <score>` or
/// `[i/total] - Skipped <name>: <reason>`.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// 1-based position of this candidate
    pub index: usize,
    pub total: usize,
    pub outcome: &'a CandidateOutcome,
}

impl fmt::Display for Progress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.outcome {
            CandidateOutcome::Scored(row) => write!(
                f,
                "[{}/{}] - Match score {}: {:.2}",
                self.index, self.total, row.resume_name, row.match_score
            ),
            CandidateOutcome::Skipped(skip) => write!(
                f,
                "[{}/{}] - Skipped {}: {}",
                self.index, self.total, skip.resume_name, skip.reason
            ),
        }
    }
}

/// Scores candidates against one reference text.
pub struct MatchPipeline<M: Embedder + Tokenizer, X: TextExtractor> {
    model: M,
    extractor: X,
    chunker: TokenChunker,
    fail_fast: bool,
}

impl<M: Embedder + Tokenizer, X: TextExtractor> MatchPipeline<M, X> {
    #[must_use]
    pub fn new(model: M, extractor: X, chunker: TokenChunker) -> Self {
        Self {
            model,
            extractor,
            chunker,
            fail_fast: false,
        }
    }

    /// Abort on the first failing candidate instead of recording a skip.
    #[must_use]
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Normalize and embed the reference text.
    pub fn prepare_reference(&mut self, raw: &str) -> Result<Embedding> {
        let text = normalize(raw);
        if text.is_empty() {
            return Err(Error::InvalidInput("reference text is empty after cleanup".to_string()));
        }
        self.model.embed_query(&text)
    }

    /// Chunk already-normalized text, embed every chunk and score it.
    pub fn score_text(&mut self, reference: &[f32], source: &str, text: &str) -> Result<f64> {
        let chunks = self
            .chunker
            .chunk(&mut self.model, text, ChunkMetadata::for_source(source))?;
        if chunks.is_empty() {
            return Err(Error::Chunking(format!("'{source}' produced no chunks")));
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
        let vectors = self.model.embed_documents(&texts)?;
        debug!(source, chunks = vectors.len(), "embedded candidate");

        match_score(reference, &vectors)
    }

    /// Extract, normalize and score a single candidate.
    ///
    /// Failures become [`CandidateOutcome::Skipped`] unless fail-fast is on.
    pub fn score_candidate(&mut self, reference: &[f32], candidate: &Candidate) -> Result<CandidateOutcome> {
        let raw = match self.extractor.extract(&candidate.path) {
            Ok(raw) => raw,
            Err(e) => return self.skip_or_fail(candidate, e, SkipReason::ExtractionFailed),
        };

        let text = normalize(&raw);
        if text.is_empty() {
            warn!(candidate = %candidate.name, "no extractable text");
            return Ok(CandidateOutcome::Skipped(SkippedCandidate {
                resume_name: candidate.name.clone(),
                reason: SkipReason::NoExtractableText,
            }));
        }

        match self.score_text(reference, &candidate.name, &text) {
            Ok(match_score) => Ok(CandidateOutcome::Scored(MatchResult {
                resume_name: candidate.name.clone(),
                match_score,
            })),
            Err(e) => self.skip_or_fail(candidate, e, SkipReason::EmbeddingFailed),
        }
    }

    fn skip_or_fail(
        &self,
        candidate: &Candidate,
        error: Error,
        reason: fn(String) -> SkipReason,
    ) -> Result<CandidateOutcome> {
        if self.fail_fast {
            return Err(error);
        }

        warn!(candidate = %candidate.name, error = %error, "skipping candidate");
        Ok(CandidateOutcome::Skipped(SkippedCandidate {
            resume_name: candidate.name.clone(),
            reason: reason(error.to_string()),
        }))
    }

    /// Score every candidate in order and return the sorted report.
    pub fn run<F>(
        &mut self,
        reference: &[f32],
        candidates: &[Candidate],
        mut on_progress: F,
    ) -> Result<MatchReport>
    where
        F: FnMut(Progress<'_>),
    {
        let total = candidates.len();
        if total == 0 {
            warn!("no candidates found, report will be empty");
        }

        let mut report = MatchReport::new();
        for (i, candidate) in candidates.iter().enumerate() {
            let outcome = self.score_candidate(reference, candidate)?;
            on_progress(Progress {
                index: i + 1,
                total,
                outcome: &outcome,
            });

            match outcome {
                CandidateOutcome::Scored(row) => report.rows.push(row),
                CandidateOutcome::Skipped(skip) => report.skipped.push(skip),
            }
        }

        report.sort();
        info!(
            scored = report.rows.len(),
            skipped = report.skipped.len(),
            "matching finished"
        );
        Ok(report)
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

/// Outcome of [`run_job`]
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: MatchReport,
    /// Path of the written report
    pub output: std::path::PathBuf,
}

/// Run a whole job: read the reference, score every candidate, write the report.
///
/// A missing or empty reference aborts before any candidate is touched. A
/// missing candidate folder produces an empty report.
pub fn run_job<M, X, F>(
    config: &MatchConfig,
    model: M,
    extractor: X,
    chunker: TokenChunker,
    on_progress: F,
) -> Result<RunSummary>
where
    M: Embedder + Tokenizer,
    X: TextExtractor,
    F: FnMut(Progress<'_>),
{
    let raw_reference = PlainTextExtractor.extract(&config.reference_path)?;

    let mut pipeline = MatchPipeline::new(model, extractor, chunker).fail_fast(config.fail_fast);
    let reference = pipeline.prepare_reference(&raw_reference)?;

    let candidates = candidates::discover(&config.candidate_dir, &config.candidate_extension)?;
    info!(
        count = candidates.len(),
        dir = %config.candidate_dir.display(),
        "discovered candidates"
    );

    let report = pipeline.run(&reference, &candidates, on_progress)?;
    let output = write_report(&report, &config.output_dir, config.format)?;

    Ok(RunSummary { report, output })
}
