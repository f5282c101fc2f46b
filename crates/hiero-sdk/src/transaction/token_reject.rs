//! Returning tokens to their treasury.

use super::{Transaction, TransactionData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{AccountId, LedgerId, NftId, TokenId};

#[derive(Clone, Debug, Default)]
pub struct TokenRejectTransactionData {
    owner: Option<AccountId>,
    token_ids: Vec<TokenId>,
    nft_ids: Vec<NftId>,
}

/// Reject fungible tokens and NFTs held by `owner` (the payer when unset),
/// sending them back to the token treasury.
pub type TokenRejectTransaction = Transaction<TokenRejectTransactionData>;

impl TokenRejectTransaction {
    pub fn owner(&mut self, owner: AccountId) -> Result<&mut Self, Error> {
        self.data_mut()?.owner = Some(owner);
        Ok(self)
    }

    pub fn token_ids(&mut self, ids: impl IntoIterator<Item = TokenId>) -> Result<&mut Self, Error> {
        self.data_mut()?.token_ids = ids.into_iter().collect();
        Ok(self)
    }

    pub fn add_token_id(&mut self, id: TokenId) -> Result<&mut Self, Error> {
        self.data_mut()?.token_ids.push(id);
        Ok(self)
    }

    pub fn nft_ids(&mut self, ids: impl IntoIterator<Item = NftId>) -> Result<&mut Self, Error> {
        self.data_mut()?.nft_ids = ids.into_iter().collect();
        Ok(self)
    }

    pub fn add_nft_id(&mut self, id: NftId) -> Result<&mut Self, Error> {
        self.data_mut()?.nft_ids.push(id);
        Ok(self)
    }

    pub fn get_owner(&self) -> Option<AccountId> {
        self.data().owner
    }

    pub fn get_token_ids(&self) -> &[TokenId] {
        &self.data().token_ids
    }

    pub fn get_nft_ids(&self) -> &[NftId] {
        &self.data().nft_ids
    }
}

impl TransactionData for TokenRejectTransactionData {
    fn method(&self) -> RpcMethod {
        methods::REJECT_TOKEN
    }

    fn to_schema(&self, _chunk_index: usize) -> schema::TransactionData {
        let fungible = self
            .token_ids
            .iter()
            .map(|id| schema::TokenReference::FungibleToken(id.to_schema()));
        let nfts = self.nft_ids.iter().map(|nft| schema::TokenReference::Nft {
            token_id: nft.token_id.to_schema(),
            serial: nft.serial,
        });
        schema::TransactionData::TokenReject(schema::TokenRejectBody {
            owner: self.owner.map(|id| id.to_schema()),
            rejections: fungible.chain(nfts).collect(),
        })
    }

    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), Error> {
        if let Some(owner) = &self.owner {
            owner.validate_checksum_for_ledger(ledger_id)?;
        }
        for id in self
            .token_ids
            .iter()
            .chain(self.nft_ids.iter().map(|nft| &nft.token_id))
        {
            id.validate_checksum_for_ledger(ledger_id)?;
        }
        Ok(())
    }
}
