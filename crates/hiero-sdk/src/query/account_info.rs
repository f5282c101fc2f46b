//! Account info.

use std::time::Duration;

use super::{Query, QueryData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{AccountId, Hbar, Key, LedgerId, Timestamp};

/// State of an account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountInfo {
    pub account_id: AccountId,
    pub contract_account_id: String,
    pub is_deleted: bool,
    pub key: Option<Key>,
    pub balance: Hbar,
    pub is_receiver_signature_required: bool,
    pub expiration_time: Option<Timestamp>,
    pub auto_renew_period: Duration,
    pub account_memo: String,
    pub owned_nfts: u64,
    pub max_automatic_token_associations: i32,
    pub ledger_id: LedgerId,
}

impl AccountInfo {
    fn from_schema(info: schema::AccountInfo) -> Result<Self, Error> {
        Ok(Self {
            account_id: AccountId::from_schema(&info.account_id)?,
            contract_account_id: info.contract_account_id,
            is_deleted: info.deleted,
            key: info.key.as_ref().map(Key::from_schema_key).transpose()?,
            balance: Hbar::from_tinybars(info.balance.min(i64::MAX as u64) as i64),
            is_receiver_signature_required: info.receiver_sig_required,
            expiration_time: info.expiration_time.as_ref().map(Timestamp::from_schema),
            auto_renew_period: Duration::from_secs(info.auto_renew_period_seconds.max(0) as u64),
            account_memo: info.memo,
            owned_nfts: info.owned_nfts.max(0) as u64,
            max_automatic_token_associations: info.max_automatic_token_associations,
            ledger_id: LedgerId::from_bytes(&info.ledger_id),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct AccountInfoQueryData {
    account_id: Option<AccountId>,
}

/// Current state of an account. Paid.
pub type AccountInfoQuery = Query<AccountInfoQueryData>;

impl AccountInfoQuery {
    pub fn account_id(&mut self, id: AccountId) -> &mut Self {
        self.data_mut().account_id = Some(id);
        self
    }

    pub fn get_account_id(&self) -> Option<AccountId> {
        self.data().account_id
    }
}

impl QueryData for AccountInfoQueryData {
    type Output = AccountInfo;

    fn method(&self) -> RpcMethod {
        methods::GET_ACCOUNT_INFO
    }

    fn to_schema(&self) -> Result<schema::QueryData, Error> {
        let account_id = self
            .account_id
            .ok_or_else(|| Error::config("account info query needs an account id"))?;
        Ok(schema::QueryData::CryptoGetInfo {
            account_id: account_id.to_schema(),
        })
    }

    fn make_output(&self, data: schema::ResponseData) -> Result<Self::Output, Error> {
        let schema::ResponseData::CryptoGetInfo(info) = data else {
            return Err(Error::codec("expected an account info answer"));
        };
        AccountInfo::from_schema(info)
    }

    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), Error> {
        if let Some(id) = &self.account_id {
            id.validate_checksum_for_ledger(ledger_id)?;
        }
        Ok(())
    }
}
