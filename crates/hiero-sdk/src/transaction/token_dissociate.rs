//! Token dissociation.

use super::{Transaction, TransactionData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{AccountId, Hbar, LedgerId, TokenId};

#[derive(Clone, Debug, Default)]
pub struct TokenDissociateTransactionData {
    account_id: Option<AccountId>,
    token_ids: Vec<TokenId>,
}

/// Remove the association between an account and tokens. The account's key
/// must sign.
pub type TokenDissociateTransaction = Transaction<TokenDissociateTransactionData>;

impl TokenDissociateTransaction {
    pub fn account_id(&mut self, id: AccountId) -> Result<&mut Self, Error> {
        self.data_mut()?.account_id = Some(id);
        Ok(self)
    }

    pub fn token_ids(&mut self, ids: impl IntoIterator<Item = TokenId>) -> Result<&mut Self, Error> {
        self.data_mut()?.token_ids = ids.into_iter().collect();
        Ok(self)
    }

    pub fn get_account_id(&self) -> Option<AccountId> {
        self.data().account_id
    }

    pub fn get_token_ids(&self) -> &[TokenId] {
        &self.data().token_ids
    }
}

impl TransactionData for TokenDissociateTransactionData {
    fn method(&self) -> RpcMethod {
        methods::DISSOCIATE_TOKENS
    }

    fn default_max_transaction_fee(&self) -> Hbar {
        Hbar::new(5)
    }

    fn to_schema(&self, _chunk_index: usize) -> schema::TransactionData {
        schema::TransactionData::TokenDissociate(schema::TokenDissociateBody {
            account: self.account_id.map(|id| id.to_schema()),
            tokens: self.token_ids.iter().map(|id| id.to_schema()).collect(),
        })
    }

    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), Error> {
        if let Some(account) = &self.account_id {
            account.validate_checksum_for_ledger(ledger_id)?;
        }
        for id in &self.token_ids {
            id.validate_checksum_for_ledger(ledger_id)?;
        }
        Ok(())
    }
}
