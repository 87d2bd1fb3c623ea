//! Deterministic stand-ins for the model and the PDF extractor

use std::collections::HashMap;
use std::path::Path;

use crate::chunk::Tokenizer;
use crate::embed::{Embedder, Embedding};
use crate::extract::TextExtractor;
use crate::{Error, Result};

/// Whitespace tokenizer with a growing vocabulary.
#[derive(Debug, Default)]
pub struct WordTokenizer {
    vocab: HashMap<String, u32>,
    words: Vec<String>,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tokenizer for WordTokenizer {
    fn encode(&mut self, text: &str) -> Result<Vec<u32>> {
        let mut ids = Vec::new();
        for word in text.split_whitespace() {
            let id = match self.vocab.get(word) {
                Some(id) => *id,
                None => {
                    let id = self.words.len() as u32;
                    self.vocab.insert(word.to_string(), id);
                    self.words.push(word.to_string());
                    id
                }
            };
            ids.push(id);
        }
        Ok(ids)
    }

    fn decode(&mut self, ids: &[u32]) -> Result<String> {
        let words = ids
            .iter()
            .map(|id| {
                self.words
                    .get(*id as usize)
                    .map(String::as_str)
                    .ok_or_else(|| Error::Tokenization(format!("unknown token id {id}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(words.join(" "))
    }
}

/// Bag-of-words "model": each lowercased word is hashed into a bucket.
///
/// Texts with the same word proportions get identical directions.
pub struct BagOfWordsModel {
    tokenizer: WordTokenizer,
    dimension: usize,
    fail_on: Option<String>,
    pub documents_embedded: usize,
}

impl BagOfWordsModel {
    pub fn new() -> Self {
        Self {
            tokenizer: WordTokenizer::new(),
            dimension: 512,
            fail_on: None,
            documents_embedded: 0,
        }
    }

    /// Fail `embed_documents` whenever a text contains `word`.
    pub fn failing_on(mut self, word: &str) -> Self {
        self.fail_on = Some(word.to_string());
        self
    }

    fn vector(&self, text: &str) -> Embedding {
        let mut v = vec![0.0; self.dimension];
        for word in text.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if word.is_empty() {
                continue;
            }
            v[bucket(&word, self.dimension)] += 1.0;
        }
        v
    }
}

fn bucket(word: &str, dimension: usize) -> usize {
    // FNV-1a
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in word.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0100_0000_01b3);
    }
    (hash % dimension as u64) as usize
}

impl Embedder for BagOfWordsModel {
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if let Some(word) = &self.fail_on {
            if texts.iter().any(|t| t.contains(word.as_str())) {
                return Err(Error::Embedding(format!("refusing to embed '{word}'")));
            }
        }
        self.documents_embedded += texts.len();
        Ok(texts.iter().map(|t| self.vector(t)).collect())
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        Ok(self.vector(text))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "bag-of-words"
    }
}

impl Tokenizer for BagOfWordsModel {
    fn encode(&mut self, text: &str) -> Result<Vec<u32>> {
        self.tokenizer.encode(text)
    }

    fn decode(&mut self, ids: &[u32]) -> Result<String> {
        self.tokenizer.decode(ids)
    }
}

/// Serves canned text per file name; unknown files fail extraction.
#[derive(Debug, Default)]
pub struct MapExtractor {
    texts: HashMap<String, String>,
}

impl MapExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, text: &str) -> Self {
        self.texts.insert(name.to_string(), text.to_string());
        self
    }
}

impl TextExtractor for MapExtractor {
    fn extract(&mut self, path: &Path) -> Result<String> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        self.texts.get(name).cloned().ok_or_else(|| Error::Extraction {
            path: path.to_path_buf(),
            message: "invalid file header".to_string(),
        })
    }
}
