//! Appending to a file, chunked.

use super::{ChunkData, FILE_APPEND_CHUNK_SIZE, Transaction, TransactionData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{FileId, Hbar, LedgerId};

#[derive(Clone, Debug)]
pub struct FileAppendTransactionData {
    file_id: Option<FileId>,
    chunks: ChunkData,
}

impl Default for FileAppendTransactionData {
    fn default() -> Self {
        Self {
            file_id: None,
            chunks: ChunkData::new(FILE_APPEND_CHUNK_SIZE, false),
        }
    }
}

/// Append contents to a file.
///
/// Contents longer than the chunk size (4 KiB by default) are sent as one
/// transaction per chunk, each awaited before the next.
pub type FileAppendTransaction = Transaction<FileAppendTransactionData>;

impl FileAppendTransaction {
    pub fn file_id(&mut self, id: FileId) -> Result<&mut Self, Error> {
        self.data_mut()?.file_id = Some(id);
        Ok(self)
    }

    pub fn contents(&mut self, contents: impl Into<Vec<u8>>) -> Result<&mut Self, Error> {
        self.data_mut()?.chunks.data = contents.into();
        Ok(self)
    }

    pub fn chunk_size(&mut self, size: usize) -> Result<&mut Self, Error> {
        if size == 0 {
            return Err(Error::config("chunk size must be positive"));
        }
        self.data_mut()?.chunks.chunk_size = size;
        Ok(self)
    }

    pub fn max_chunks(&mut self, max: usize) -> Result<&mut Self, Error> {
        self.data_mut()?.chunks.max_chunks = max;
        Ok(self)
    }

    pub fn get_file_id(&self) -> Option<FileId> {
        self.data().file_id
    }

    pub fn get_contents(&self) -> &[u8] {
        self.data().chunks.data()
    }
}

impl TransactionData for FileAppendTransactionData {
    fn method(&self) -> RpcMethod {
        methods::APPEND_CONTENT
    }

    fn default_max_transaction_fee(&self) -> Hbar {
        Hbar::new(5)
    }

    fn to_schema(&self, chunk_index: usize) -> schema::TransactionData {
        schema::TransactionData::FileAppend(schema::FileAppendBody {
            file_id: self.file_id.map(|id| id.to_schema()),
            contents: self.chunks.chunk(chunk_index).to_vec(),
        })
    }

    fn chunk_data(&self) -> Option<&ChunkData> {
        Some(&self.chunks)
    }

    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), Error> {
        if let Some(id) = &self.file_id {
            id.validate_checksum_for_ledger(ledger_id)?;
        }
        Ok(())
    }
}
