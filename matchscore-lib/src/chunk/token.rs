use std::ops::Range;

use tracing::debug;

use crate::chunk::{Chunk, ChunkMetadata, Tokenizer};
use crate::{Error, Result};

/// Splits tokenized text into fixed-size windows that overlap by a fixed
/// number of tokens.
///
/// The window start advances by `max_tokens - overlap` each step and the walk
/// stops at the first window that reaches the end of the text, so a text of at
/// most `max_tokens` tokens is always a single chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenChunker {
    max_tokens: usize,
    overlap: usize,
}

impl TokenChunker {
    /// Create a chunker. Fails unless `0 < max_tokens` and `overlap < max_tokens`.
    pub fn new(max_tokens: usize, overlap: usize) -> Result<Self> {
        if max_tokens == 0 {
            return Err(Error::Chunking("max_tokens must be greater than zero".to_string()));
        }
        if overlap >= max_tokens {
            return Err(Error::Chunking(format!(
                "overlap ({overlap}) must be smaller than max_tokens ({max_tokens})"
            )));
        }
        Ok(Self { max_tokens, overlap })
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Window ranges over a sequence of `len` tokens.
    pub fn windows(&self, len: usize) -> TokenWindows {
        TokenWindows {
            len,
            size: self.max_tokens,
            stride: self.max_tokens - self.overlap,
            start: 0,
            done: false,
        }
    }

    /// Tokenize `content`, cut it into windows and decode each window.
    ///
    /// Empty content yields no chunks.
    pub fn chunk<T: Tokenizer + ?Sized>(
        &self,
        tokenizer: &mut T,
        content: &str,
        mut metadata: ChunkMetadata,
    ) -> Result<Vec<Chunk>> {
        let ids = tokenizer.encode(content)?;
        let windows = self.windows(ids.len());

        let total = windows.clone().count();
        metadata.total_chunks = Some(total);
        debug!(
            source = metadata.source_id.as_deref().unwrap_or("-"),
            tokens = ids.len(),
            chunks = total,
            "chunked document"
        );

        let mut chunks = Vec::with_capacity(total);
        for range in windows {
            let content = tokenizer.decode(&ids[range.clone()])?;

            let mut m = metadata.clone();
            m.position = range.start;
            m.token_count = range.len();

            chunks.push(Chunk { content, metadata: m });
        }
        Ok(chunks)
    }
}

/// Iterator over the token ranges produced by [`TokenChunker::windows`].
#[derive(Debug, Clone)]
pub struct TokenWindows {
    len: usize,
    size: usize,
    stride: usize,
    start: usize,
    done: bool,
}

impl Iterator for TokenWindows {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.start >= self.len {
            return None;
        }

        let start = self.start;
        let end = (start + self.size).min(self.len);
        if end == self.len {
            self.done = true;
        } else {
            self.start += self.stride;
        }
        Some(start..end)
    }
}
