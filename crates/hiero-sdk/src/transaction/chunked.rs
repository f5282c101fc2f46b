//! Payloads split across several transactions.

/// Default chunk size of file appends.
pub const FILE_APPEND_CHUNK_SIZE: usize = 4096;
/// Default chunk size of topic messages.
pub const TOPIC_MESSAGE_CHUNK_SIZE: usize = 1024;
/// Default upper bound on chunks.
pub const DEFAULT_MAX_CHUNKS: usize = 20;

/// A payload that is submitted in `chunk_size` pieces, one transaction each.
///
/// Chunk `k` is sent with the base transaction id's valid start advanced by
/// `k` nanoseconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkData {
    pub(crate) data: Vec<u8>,
    pub(crate) chunk_size: usize,
    pub(crate) max_chunks: usize,
    /// Whether each body carries its chunk position.
    pub(crate) with_chunk_info: bool,
}

impl ChunkData {
    pub(crate) fn new(chunk_size: usize, with_chunk_info: bool) -> Self {
        Self {
            data: Vec::new(),
            chunk_size,
            max_chunks: DEFAULT_MAX_CHUNKS,
            with_chunk_info,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn max_chunks(&self) -> usize {
        self.max_chunks
    }

    /// Number of chunks; an empty payload still takes one.
    pub fn chunk_count(&self) -> usize {
        self.data.len().div_ceil(self.chunk_size.max(1)).max(1)
    }

    /// Bytes of chunk `index`.
    pub fn chunk(&self, index: usize) -> &[u8] {
        let size = self.chunk_size.max(1);
        let start = (index * size).min(self.data.len());
        let end = (start + size).min(self.data.len());
        &self.data[start..end]
    }
}
