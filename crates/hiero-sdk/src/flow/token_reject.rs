//! Reject tokens, then dissociate from them.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::client::{Client, Signer};
use crate::error::Error;
use crate::transaction::{TokenDissociateTransaction, TokenRejectTransaction, TransactionResponse};
use crate::types::{AccountId, NftId, TokenId};

/// Reject tokens held by `owner` and then dissociate `owner` from them.
///
/// Both transactions are signed with the receiver key (the owner's key).
/// The dissociation covers every rejected fungible token and the token type
/// of every rejected NFT.
///
/// # Example
///
/// ```rust,no_run
/// use hiero_sdk::{AccountId, Client, PrivateKey, TokenId, TokenRejectFlow};
///
/// # async fn example(client: Client, owner_key: PrivateKey) -> Result<(), hiero_sdk::Error> {
/// let response = TokenRejectFlow::new()
///     .owner(AccountId::from_num(1001))
///     .add_token_id(TokenId::from_num(5005))
///     .receiver_key(owner_key)
///     .execute(&client)
///     .await?;
/// println!("rejected in {}", response.transaction_id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct TokenRejectFlow {
    owner: Option<AccountId>,
    token_ids: Vec<TokenId>,
    nft_ids: Vec<NftId>,
    receiver_key: Option<Arc<dyn Signer>>,
    node_account_ids: Option<Vec<AccountId>>,
}

impl TokenRejectFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Holder of the tokens; the operator when unset.
    pub fn owner(&mut self, owner: AccountId) -> &mut Self {
        self.owner = Some(owner);
        self
    }

    pub fn token_ids(&mut self, ids: impl IntoIterator<Item = TokenId>) -> &mut Self {
        self.token_ids = ids.into_iter().collect();
        self
    }

    pub fn add_token_id(&mut self, id: TokenId) -> &mut Self {
        self.token_ids.push(id);
        self
    }

    pub fn nft_ids(&mut self, ids: impl IntoIterator<Item = NftId>) -> &mut Self {
        self.nft_ids = ids.into_iter().collect();
        self
    }

    pub fn add_nft_id(&mut self, id: NftId) -> &mut Self {
        self.nft_ids.push(id);
        self
    }

    /// Key of the owner, used to sign both transactions.
    pub fn receiver_key(&mut self, signer: impl Signer + 'static) -> &mut Self {
        self.receiver_key = Some(Arc::new(signer));
        self
    }

    pub fn node_account_ids(&mut self, ids: impl IntoIterator<Item = AccountId>) -> &mut Self {
        self.node_account_ids = Some(ids.into_iter().collect());
        self
    }

    pub fn get_owner(&self) -> Option<AccountId> {
        self.owner
    }

    pub fn get_token_ids(&self) -> &[TokenId] {
        &self.token_ids
    }

    pub fn get_nft_ids(&self) -> &[NftId] {
        &self.nft_ids
    }

    /// Token ids the dissociation covers, without duplicates, in order.
    pub fn dissociated_token_ids(&self) -> Vec<TokenId> {
        let mut ids = Vec::with_capacity(self.token_ids.len() + self.nft_ids.len());
        let candidates = self
            .token_ids
            .iter()
            .copied()
            .chain(self.nft_ids.iter().map(|nft| nft.token_id));
        for id in candidates {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Run the flow, returning the response of the reject transaction.
    pub async fn execute(&self, client: &Client) -> Result<TransactionResponse, Error> {
        self.execute_with_timeout(client, None).await
    }

    /// Run the flow with `timeout` applied to each execution and receipt.
    pub async fn execute_with_timeout(
        &self,
        client: &Client,
        timeout: Option<Duration>,
    ) -> Result<TransactionResponse, Error> {
        if self.token_ids.is_empty() && self.nft_ids.is_empty() {
            return Err(Error::illegal_state("token reject flow has nothing to reject"));
        }

        let response = self
            .reject(client, timeout)
            .await
            .map_err(|e| flow_error("token reject", e))?;
        tracing::debug!(transaction_id = %response.transaction_id, "tokens rejected");

        self.dissociate(client, timeout)
            .await
            .map_err(|e| flow_error("token dissociate", e))?;
        tracing::debug!(owner = ?self.owner, "tokens dissociated");

        Ok(response)
    }

    async fn reject(
        &self,
        client: &Client,
        timeout: Option<Duration>,
    ) -> Result<TransactionResponse, Error> {
        let mut tx = TokenRejectTransaction::new();
        tx.token_ids(self.token_ids.iter().copied())?
            .nft_ids(self.nft_ids.iter().copied())?;
        if let Some(owner) = self.owner {
            tx.owner(owner)?;
        }
        if let Some(ids) = &self.node_account_ids {
            tx.node_account_ids(ids.iter().copied())?;
        }
        tx.freeze_with(client)?;
        if let Some(key) = &self.receiver_key {
            tx.sign_with_signer(key.as_ref())?;
        }

        let response = tx.execute_with_timeout(client, timeout).await?;
        response.get_receipt_with_timeout(client, timeout).await?;
        Ok(response)
    }

    async fn dissociate(&self, client: &Client, timeout: Option<Duration>) -> Result<(), Error> {
        let account_id = self
            .owner
            .or_else(|| client.operator_account_id())
            .ok_or_else(|| Error::config("token reject flow needs an owner or a client operator"))?;

        let mut tx = TokenDissociateTransaction::new();
        tx.account_id(account_id)?
            .token_ids(self.dissociated_token_ids())?;
        if let Some(ids) = &self.node_account_ids {
            tx.node_account_ids(ids.iter().copied())?;
        }
        tx.freeze_with(client)?;
        if let Some(key) = &self.receiver_key {
            tx.sign_with_signer(key.as_ref())?;
        }

        tx.execute_with_timeout(client, timeout)
            .await?
            .get_receipt_with_timeout(client, timeout)
            .await?;
        Ok(())
    }
}

fn flow_error(step: &'static str, source: Error) -> Error {
    Error::Flow {
        step,
        source: Box::new(source),
    }
}

impl fmt::Debug for TokenRejectFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRejectFlow")
            .field("owner", &self.owner)
            .field("token_ids", &self.token_ids)
            .field("nft_ids", &self.nft_ids)
            .field("receiver_key", &self.receiver_key.as_ref().map(|k| k.public_key()))
            .finish()
    }
}
