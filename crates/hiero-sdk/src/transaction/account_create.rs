//! Account creation.

use std::time::Duration;

use super::{Transaction, TransactionData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{EvmAddress, Hbar, Key};

/// Default auto-renew period of new accounts (about 90 days).
pub const DEFAULT_AUTO_RENEW_PERIOD: Duration = Duration::from_secs(7_890_000);

#[derive(Clone, Debug)]
pub struct AccountCreateTransactionData {
    key: Option<Key>,
    initial_balance: Hbar,
    receiver_signature_required: bool,
    auto_renew_period: Duration,
    account_memo: String,
    max_automatic_token_associations: i32,
    alias: Option<EvmAddress>,
}

impl Default for AccountCreateTransactionData {
    fn default() -> Self {
        Self {
            key: None,
            initial_balance: Hbar::ZERO,
            receiver_signature_required: false,
            auto_renew_period: DEFAULT_AUTO_RENEW_PERIOD,
            account_memo: String::new(),
            max_automatic_token_associations: 0,
            alias: None,
        }
    }
}

/// Create an account.
pub type AccountCreateTransaction = Transaction<AccountCreateTransactionData>;

impl AccountCreateTransaction {
    pub fn key(&mut self, key: impl Into<Key>) -> Result<&mut Self, Error> {
        self.data_mut()?.key = Some(key.into());
        Ok(self)
    }

    /// Hbar moved from the payer into the new account.
    pub fn initial_balance(&mut self, balance: Hbar) -> Result<&mut Self, Error> {
        if balance.is_negative() {
            return Err(Error::config("initial balance must be non-negative"));
        }
        self.data_mut()?.initial_balance = balance;
        Ok(self)
    }

    pub fn receiver_signature_required(&mut self, required: bool) -> Result<&mut Self, Error> {
        self.data_mut()?.receiver_signature_required = required;
        Ok(self)
    }

    pub fn auto_renew_period(&mut self, period: Duration) -> Result<&mut Self, Error> {
        self.data_mut()?.auto_renew_period = period;
        Ok(self)
    }

    pub fn account_memo(&mut self, memo: impl Into<String>) -> Result<&mut Self, Error> {
        self.data_mut()?.account_memo = memo.into();
        Ok(self)
    }

    /// `-1` for unlimited.
    pub fn max_automatic_token_associations(&mut self, max: i32) -> Result<&mut Self, Error> {
        self.data_mut()?.max_automatic_token_associations = max;
        Ok(self)
    }

    pub fn alias(&mut self, alias: EvmAddress) -> Result<&mut Self, Error> {
        self.data_mut()?.alias = Some(alias);
        Ok(self)
    }

    pub fn get_key(&self) -> Option<&Key> {
        self.data().key.as_ref()
    }

    pub fn get_initial_balance(&self) -> Hbar {
        self.data().initial_balance
    }
}

impl TransactionData for AccountCreateTransactionData {
    fn method(&self) -> RpcMethod {
        methods::CREATE_ACCOUNT
    }

    fn default_max_transaction_fee(&self) -> Hbar {
        Hbar::new(5)
    }

    fn to_schema(&self, _chunk_index: usize) -> schema::TransactionData {
        schema::TransactionData::CryptoCreateAccount(schema::CryptoCreateAccountBody {
            key: self.key.as_ref().map(Key::to_schema_key),
            initial_balance: self.initial_balance.to_tinybars().max(0) as u64,
            receiver_sig_required: self.receiver_signature_required,
            auto_renew_period_seconds: self.auto_renew_period.as_secs() as i64,
            memo: self.account_memo.clone(),
            max_automatic_token_associations: self.max_automatic_token_associations,
            alias: self
                .alias
                .map(|a| a.as_bytes().to_vec())
                .unwrap_or_default(),
        })
    }
}
