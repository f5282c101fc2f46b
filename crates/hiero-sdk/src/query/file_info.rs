//! File info.

use super::{Query, QueryData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{FileId, Key, KeyList, LedgerId, Timestamp};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileInfo {
    pub file_id: FileId,
    pub size: u64,
    pub expiration_time: Option<Timestamp>,
    pub is_deleted: bool,
    pub keys: KeyList,
    pub file_memo: String,
    pub ledger_id: LedgerId,
}

#[derive(Clone, Debug, Default)]
pub struct FileInfoQueryData {
    file_id: Option<FileId>,
}

/// Metadata of a file. Paid.
pub type FileInfoQuery = Query<FileInfoQueryData>;

impl FileInfoQuery {
    pub fn file_id(&mut self, id: FileId) -> &mut Self {
        self.data_mut().file_id = Some(id);
        self
    }

    pub fn get_file_id(&self) -> Option<FileId> {
        self.data().file_id
    }
}

impl QueryData for FileInfoQueryData {
    type Output = FileInfo;

    fn method(&self) -> RpcMethod {
        methods::GET_FILE_INFO
    }

    fn to_schema(&self) -> Result<schema::QueryData, Error> {
        let file_id = self
            .file_id
            .ok_or_else(|| Error::config("file info query needs a file id"))?;
        Ok(schema::QueryData::FileGetInfo {
            file_id: file_id.to_schema(),
        })
    }

    fn make_output(&self, data: schema::ResponseData) -> Result<Self::Output, Error> {
        let schema::ResponseData::FileGetInfo(info) = data else {
            return Err(Error::codec("expected a file info answer"));
        };
        let keys = info
            .keys
            .iter()
            .map(Key::from_schema_key)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FileInfo {
            file_id: FileId::from_schema(&info.file_id),
            size: info.size.max(0) as u64,
            expiration_time: info.expiration_time.as_ref().map(Timestamp::from_schema),
            is_deleted: info.deleted,
            keys: KeyList {
                keys,
                threshold: None,
            },
            file_memo: info.memo,
            ledger_id: LedgerId::from_bytes(&info.ledger_id),
        })
    }

    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), Error> {
        if let Some(id) = &self.file_id {
            id.validate_checksum_for_ledger(ledger_id)?;
        }
        Ok(())
    }
}
