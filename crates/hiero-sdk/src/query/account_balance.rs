//! Account balance.

use super::{Query, QueryData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{AccountId, ContractId, Hbar, LedgerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub hbars: Hbar,
}

#[derive(Clone, Debug, Default)]
pub struct AccountBalanceQueryData {
    source: Option<BalanceSource>,
}

#[derive(Clone, Copy, Debug)]
enum BalanceSource {
    Account(AccountId),
    Contract(ContractId),
}

/// Hbar balance of an account or contract. Free.
pub type AccountBalanceQuery = Query<AccountBalanceQueryData>;

impl AccountBalanceQuery {
    /// Query this account. Replaces any contract set before.
    pub fn account_id(&mut self, id: AccountId) -> &mut Self {
        self.data_mut().source = Some(BalanceSource::Account(id));
        self
    }

    /// Query this contract. Replaces any account set before.
    pub fn contract_id(&mut self, id: ContractId) -> &mut Self {
        self.data_mut().source = Some(BalanceSource::Contract(id));
        self
    }

    pub fn get_account_id(&self) -> Option<AccountId> {
        match self.data().source {
            Some(BalanceSource::Account(id)) => Some(id),
            _ => None,
        }
    }

    pub fn get_contract_id(&self) -> Option<ContractId> {
        match self.data().source {
            Some(BalanceSource::Contract(id)) => Some(id),
            _ => None,
        }
    }
}

impl QueryData for AccountBalanceQueryData {
    type Output = AccountBalance;

    fn method(&self) -> RpcMethod {
        methods::GET_ACCOUNT_BALANCE
    }

    fn to_schema(&self) -> Result<schema::QueryData, Error> {
        match self.source {
            Some(BalanceSource::Account(id)) => Ok(schema::QueryData::CryptoGetAccountBalance {
                account_id: Some(id.to_schema()),
                contract_id: None,
            }),
            Some(BalanceSource::Contract(id)) => Ok(schema::QueryData::CryptoGetAccountBalance {
                account_id: None,
                contract_id: Some(id.to_schema()),
            }),
            None => Err(Error::config("balance query needs an account or contract id")),
        }
    }

    fn is_paid(&self) -> bool {
        false
    }

    fn make_output(&self, data: schema::ResponseData) -> Result<Self::Output, Error> {
        let schema::ResponseData::CryptoGetAccountBalance { account_id, balance } = data else {
            return Err(Error::codec("expected a balance answer"));
        };
        Ok(AccountBalance {
            account_id: AccountId::from_schema(&account_id)?,
            hbars: Hbar::from_tinybars(balance.min(i64::MAX as u64) as i64),
        })
    }

    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), Error> {
        match &self.source {
            Some(BalanceSource::Account(id)) => id.validate_checksum_for_ledger(ledger_id)?,
            Some(BalanceSource::Contract(id)) => id.validate_checksum_for_ledger(ledger_id)?,
            None => {}
        }
        Ok(())
    }
}
