use crate::error::{NewsragError, Result};
use crate::models::{ChunkSource, Document, TextChunk};

/// Deterministic fixed-size splitter with overlap
///
/// Boundaries are character-based so multi-byte text never splits inside a
/// code point. Offsets in [`ChunkSource`] are character offsets.
#[derive(Debug, Clone)]
pub struct ChunkSplitter {
    /// Target chunk size in characters
    chunk_size: usize,

    /// Character overlap between consecutive chunks
    overlap: usize,
}

impl Default for ChunkSplitter {
    fn default() -> Self {
        Self { chunk_size: 1000, overlap: 200 }
    }
}

impl ChunkSplitter {
    /// Create a new splitter with custom parameters
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(NewsragError::ConfigInvalid {
                key: "chunk_size".to_string(),
                reason: "chunk_size must be greater than zero".to_string(),
            });
        }

        if overlap >= chunk_size {
            return Err(NewsragError::ConfigInvalid {
                key: "chunk_overlap".to_string(),
                reason: format!(
                    "overlap ({}) must be less than chunk_size ({})",
                    overlap, chunk_size
                ),
            });
        }

        Ok(Self { chunk_size, overlap })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Split a document into overlapping chunks covering its full content
    ///
    /// Each chunk after the first starts `overlap` characters before the end
    /// of the previous chunk. Identical input always yields identical
    /// boundaries. Content shorter than the chunk size yields exactly one
    /// chunk equal to the full content; empty content yields none.
    pub fn split(&self, document: &Document) -> Vec<TextChunk> {
        let text = document.content.as_str();

        // Byte offset of every character boundary, including the end of text.
        let boundaries: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let char_len = boundaries.len() - 1;

        if char_len == 0 {
            return Vec::new();
        }

        let step = self.chunk_size - self.overlap;
        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = (start + self.chunk_size).min(char_len);
            chunks.push(TextChunk {
                text: text[boundaries[start]..boundaries[end]].to_string(),
                source: ChunkSource { url: document.source.url.clone(), offset: start },
            });

            if end == char_len {
                break;
            }

            start += step;
        }

        chunks
    }
}
