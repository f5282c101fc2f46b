//! File creation.

use super::{Transaction, TransactionData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{Hbar, KeyList, Timestamp};

#[derive(Clone, Debug, Default)]
pub struct FileCreateTransactionData {
    keys: KeyList,
    contents: Vec<u8>,
    expiration_time: Option<Timestamp>,
    file_memo: String,
}

/// Create a file. Larger contents are added afterwards with
/// [`FileAppendTransaction`](super::FileAppendTransaction).
pub type FileCreateTransaction = Transaction<FileCreateTransactionData>;

impl FileCreateTransaction {
    /// Keys that must sign updates and deletion; all of them by default.
    pub fn keys(&mut self, keys: impl Into<KeyList>) -> Result<&mut Self, Error> {
        self.data_mut()?.keys = keys.into();
        Ok(self)
    }

    pub fn contents(&mut self, contents: impl Into<Vec<u8>>) -> Result<&mut Self, Error> {
        self.data_mut()?.contents = contents.into();
        Ok(self)
    }

    pub fn expiration_time(&mut self, at: Timestamp) -> Result<&mut Self, Error> {
        self.data_mut()?.expiration_time = Some(at);
        Ok(self)
    }

    pub fn file_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self, Error> {
        self.data_mut()?.file_memo = memo.into();
        Ok(self)
    }

    pub fn get_keys(&self) -> &KeyList {
        &self.data().keys
    }

    pub fn get_contents(&self) -> &[u8] {
        &self.data().contents
    }
}

impl TransactionData for FileCreateTransactionData {
    fn method(&self) -> RpcMethod {
        methods::CREATE_FILE
    }

    fn default_max_transaction_fee(&self) -> Hbar {
        Hbar::new(5)
    }

    fn to_schema(&self, _chunk_index: usize) -> schema::TransactionData {
        schema::TransactionData::FileCreate(schema::FileCreateBody {
            keys: self.keys.keys.iter().map(|k| k.to_schema_key()).collect(),
            contents: self.contents.clone(),
            expiration_time: self.expiration_time.map(|t| t.to_schema()),
            memo: self.file_memo.clone(),
        })
    }
}
