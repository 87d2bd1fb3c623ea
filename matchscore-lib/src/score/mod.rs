//! Similarity scoring between the reference vector and a candidate's chunks
//!
//! A candidate matches well when *any* region of it is close to the reference,
//! so the score is the best cosine similarity over all chunk vectors, scaled
//! to a percentage.

use crate::embed::Embedding;
use crate::{Error, Result};

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 means identical direction. A zero vector
/// is treated as unrelated to everything (similarity 0).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(Error::InvalidInput(format!(
            "vector dimensions differ: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}

/// Highest cosine similarity between `reference` and any of `candidates`.
///
/// Fails on an empty candidate set, and on vectors holding NaN or infinite
/// components, which have no meaningful similarity.
pub fn best_similarity(reference: &[f32], candidates: &[Embedding]) -> Result<f32> {
    if candidates.is_empty() {
        return Err(Error::InvalidInput("no candidate vectors to score".to_string()));
    }

    let mut best = f32::NEG_INFINITY;
    for (i, candidate) in candidates.iter().enumerate() {
        let sim = cosine_similarity(reference, candidate)?;
        if !sim.is_finite() {
            return Err(Error::Embedding(format!(
                "similarity with chunk {i} is not a finite number"
            )));
        }
        best = best.max(sim);
    }
    Ok(best)
}

/// Match score in [-100, 100]: [`best_similarity`] scaled by 100.
pub fn match_score(reference: &[f32], candidates: &[Embedding]) -> Result<f64> {
    best_similarity(reference, candidates).map(|sim| f64::from(sim) * 100.0)
}
