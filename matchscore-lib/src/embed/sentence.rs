use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::chunk::Tokenizer;
use crate::embed::{CacheState, Embedder, Embedding, ModelCache};
use crate::{Error, Result};

/// A supported sentence-embedding model.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    /// Name used on the command line and in the cache directory
    pub name: &'static str,
    /// fastembed identifier
    pub model: EmbeddingModel,
    /// Output dimension
    pub dimension: usize,
    /// Longest input the model was trained on, used as the chunk size
    pub max_tokens: usize,
}

fn registry() -> Vec<ModelSpec> {
    vec![
        ModelSpec {
            name: "all-mpnet-base-v2",
            model: EmbeddingModel::AllMpnetBaseV2,
            dimension: 768,
            max_tokens: 384,
        },
        ModelSpec {
            name: "all-MiniLM-L6-v2",
            model: EmbeddingModel::AllMiniLML6V2,
            dimension: 384,
            max_tokens: 256,
        },
        ModelSpec {
            name: "all-MiniLM-L12-v2",
            model: EmbeddingModel::AllMiniLML12V2,
            dimension: 384,
            max_tokens: 256,
        },
        ModelSpec {
            name: "paraphrase-multilingual-mpnet-base-v2",
            model: EmbeddingModel::ParaphraseMLMpnetBaseV2,
            dimension: 768,
            max_tokens: 128,
        },
        ModelSpec {
            name: "bge-small-en-v1.5",
            model: EmbeddingModel::BGESmallENV15,
            dimension: 384,
            max_tokens: 512,
        },
        ModelSpec {
            name: "bge-base-en-v1.5",
            model: EmbeddingModel::BGEBaseENV15,
            dimension: 768,
            max_tokens: 512,
        },
        ModelSpec {
            name: "bge-large-en-v1.5",
            model: EmbeddingModel::BGELargeENV15,
            dimension: 1024,
            max_tokens: 512,
        },
    ]
}

/// Sentence embedder backed by fastembed.
///
/// Also exposes the model's own tokenizer so chunk windows are measured in the
/// same tokens the model sees.
pub struct SentenceEmbedder {
    spec: ModelSpec,
    model: TextEmbedding,
}

impl SentenceEmbedder {
    /// Names accepted by [`SentenceEmbedder::lookup`].
    pub fn supported_models() -> Vec<&'static str> {
        registry().into_iter().map(|spec| spec.name).collect()
    }

    /// Find a supported model by name (case-insensitive).
    pub fn lookup(name: &str) -> Result<ModelSpec> {
        registry()
            .into_iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unsupported model '{name}', expected one of: {}",
                    Self::supported_models().join(", ")
                ))
            })
    }

    /// Load the model from `cache`, downloading into it on first use.
    pub fn load(spec: &ModelSpec, cache: &ModelCache) -> Result<Self> {
        let state = cache.prepare()?;

        let opts = InitOptions::new(spec.model.clone())
            .with_cache_dir(cache.path())
            .with_show_download_progress(state == CacheState::Miss);

        TextEmbedding::try_new(opts)
            .map(|model| Self {
                spec: spec.clone(),
                model,
            })
            .map_err(|e| Error::Embedding(e.to_string()))
    }

    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }
}

impl Embedder for SentenceEmbedder {
    fn model_name(&self) -> &str {
        self.spec.name
    }

    fn dimension(&self) -> usize {
        self.spec.dimension
    }

    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        self.model
            .embed(texts.to_vec(), None)
            .map_err(|e| Error::Embedding(e.to_string()))
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        self.model
            .embed(vec![text], None)
            .map_err(|e| Error::Embedding(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("model returned no embeddings".to_string()))
    }
}

impl Tokenizer for SentenceEmbedder {
    fn encode(&mut self, text: &str) -> Result<Vec<u32>> {
        let tokenizer = &mut self.model.tokenizer;

        // the model tokenizer truncates to its input limit; chunking needs every token
        let truncation = tokenizer.get_truncation().cloned();
        let padding = tokenizer.get_padding().cloned();
        tokenizer
            .with_truncation(None)
            .map_err(|e| Error::Tokenization(e.to_string()))?;
        tokenizer.with_padding(None);

        let encoded = tokenizer.encode(text, false);

        tokenizer
            .with_truncation(truncation)
            .map_err(|e| Error::Tokenization(e.to_string()))?;
        tokenizer.with_padding(padding);

        encoded
            .map(|encoding| encoding.get_ids().to_vec())
            .map_err(|e| Error::Tokenization(e.to_string()))
    }

    fn decode(&mut self, ids: &[u32]) -> Result<String> {
        self.model
            .tokenizer
            .decode(ids, true)
            .map_err(|e| Error::Tokenization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_model() {
        let spec = SentenceEmbedder::lookup("all-mpnet-base-v2").unwrap();
        assert!(matches!(spec.model, EmbeddingModel::AllMpnetBaseV2));
        assert_eq!(spec.dimension, 768);
        assert_eq!(spec.max_tokens, 384);

        let spec = SentenceEmbedder::lookup("all-MiniLM-L6-v2").unwrap();
        assert_eq!(spec.dimension, 384);
        assert_eq!(spec.max_tokens, 256);
    }

    #[test]
    fn test_default_model_is_registered() {
        let spec = SentenceEmbedder::lookup(crate::config::DEFAULT_MODEL).unwrap();
        assert_eq!(spec.name, "all-mpnet-base-v2");
        assert!(crate::config::DEFAULT_OVERLAP < spec.max_tokens);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let spec = SentenceEmbedder::lookup("BGE-SMALL-EN-V1.5").unwrap();
        assert_eq!(spec.name, "bge-small-en-v1.5");
    }

    #[test]
    fn test_lookup_unknown_model() {
        let err = SentenceEmbedder::lookup("word2vec").unwrap_err();
        assert!(err.to_string().contains("all-mpnet-base-v2"));
        assert!(err.to_string().contains("all-MiniLM-L6-v2"));
    }

    #[test]
    #[ignore] // Requires model download, run with: cargo test -- --ignored
    fn test_identical_texts_are_most_similar() {
        let dir = tempfile::tempdir().unwrap();
        let spec = SentenceEmbedder::lookup("all-MiniLM-L6-v2").unwrap();
        let cache = ModelCache::new(dir.path(), spec.name);
        let mut embedder = SentenceEmbedder::load(&spec, &cache).unwrap();

        let reference = "Senior backend engineer with distributed systems experience.";
        let query = embedder.embed_query(reference).unwrap();
        let docs = embedder
            .embed_documents(&[reference, "Pastry chef specializing in French desserts."])
            .unwrap();

        assert_eq!(query.len(), embedder.dimension());
        let same = crate::score::cosine_similarity(&query, &docs[0]).unwrap();
        let other = crate::score::cosine_similarity(&query, &docs[1]).unwrap();
        assert!(same > 0.99, "self similarity was {same}");
        assert!(other < same);
    }

    #[test]
    #[ignore] // Requires model download
    fn test_tokenizer_ignores_truncation() {
        let dir = tempfile::tempdir().unwrap();
        let spec = SentenceEmbedder::lookup("all-MiniLM-L6-v2").unwrap();
        let cache = ModelCache::new(dir.path(), spec.name);
        let mut embedder = SentenceEmbedder::load(&spec, &cache).unwrap();

        let long_text = "distributed systems ".repeat(1000);
        let ids = embedder.encode(&long_text).unwrap();
        assert!(ids.len() > 1000);

        let decoded = embedder.decode(&ids[..2]).unwrap();
        assert_eq!(decoded, "distributed systems");
    }
}
