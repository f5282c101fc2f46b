//! Consensus topic messages, chunked.

use super::{ChunkData, TOPIC_MESSAGE_CHUNK_SIZE, Transaction, TransactionData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{LedgerId, TopicId};

#[derive(Clone, Debug)]
pub struct TopicMessageSubmitTransactionData {
    topic_id: Option<TopicId>,
    chunks: ChunkData,
}

impl Default for TopicMessageSubmitTransactionData {
    fn default() -> Self {
        Self {
            topic_id: None,
            chunks: ChunkData::new(TOPIC_MESSAGE_CHUNK_SIZE, true),
        }
    }
}

/// Submit a message to a topic.
///
/// Messages longer than the chunk size (1 KiB by default) are split; each
/// chunk carries its index, the total, and the first chunk's transaction id
/// so subscribers can reassemble it.
pub type TopicMessageSubmitTransaction = Transaction<TopicMessageSubmitTransactionData>;

impl TopicMessageSubmitTransaction {
    pub fn topic_id(&mut self, id: TopicId) -> Result<&mut Self, Error> {
        self.data_mut()?.topic_id = Some(id);
        Ok(self)
    }

    pub fn message(&mut self, message: impl Into<Vec<u8>>) -> Result<&mut Self, Error> {
        self.data_mut()?.chunks.data = message.into();
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

    pub fn get_topic_id(&self) -> Option<TopicId> {
        self.data().topic_id
    }

    pub fn get_message(&self) -> &[u8] {
        self.data().chunks.data()
    }
}

impl TransactionData for TopicMessageSubmitTransactionData {
    fn method(&self) -> RpcMethod {
        methods::SUBMIT_MESSAGE
    }

    fn to_schema(&self, chunk_index: usize) -> schema::TransactionData {
        schema::TransactionData::ConsensusSubmitMessage(schema::ConsensusSubmitMessageBody {
            topic_id: self.topic_id.map(|id| id.to_schema()),
            message: self.chunks.chunk(chunk_index).to_vec(),
        })
    }

    fn chunk_data(&self) -> Option<&ChunkData> {
        Some(&self.chunks)
    }

    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), Error> {
        if let Some(id) = &self.topic_id {
            id.validate_checksum_for_ledger(ledger_id)?;
        }
        Ok(())
    }
}
