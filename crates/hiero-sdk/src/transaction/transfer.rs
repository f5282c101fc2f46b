//! Hbar transfers.

use super::{Transaction, TransactionData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::{AccountId, Hbar, LedgerId};

/// One side of a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HbarTransfer {
    pub account_id: AccountId,
    /// Negative for the sending side.
    pub amount: Hbar,
    /// Spend from an allowance granted to the payer.
    pub is_approved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct TransferTransactionData {
    transfers: Vec<HbarTransfer>,
}

/// Move hbar between accounts. The amounts must sum to zero.
pub type TransferTransaction = Transaction<TransferTransactionData>;

impl TransferTransaction {
    /// Add `amount` to `account_id` (subtract when negative).
    ///
    /// Several transfers for the same account and approval flag are merged.
    pub fn hbar_transfer(&mut self, account_id: AccountId, amount: Hbar) -> Result<&mut Self, Error> {
        self.data_mut()?.push(account_id, amount, false)?;
        Ok(self)
    }

    /// Like [`hbar_transfer`](Self::hbar_transfer), spending an allowance.
    pub fn approved_hbar_transfer(
        &mut self,
        account_id: AccountId,
        amount: Hbar,
    ) -> Result<&mut Self, Error> {
        self.data_mut()?.push(account_id, amount, true)?;
        Ok(self)
    }

    pub fn get_hbar_transfers(&self) -> &[HbarTransfer] {
        &self.data().transfers
    }
}

impl TransferTransactionData {
    fn push(&mut self, account_id: AccountId, amount: Hbar, is_approved: bool) -> Result<(), Error> {
        let existing = self
            .transfers
            .iter_mut()
            .find(|t| t.account_id == account_id && t.is_approved == is_approved);
        match existing {
            Some(transfer) => {
                transfer.amount = transfer
                    .amount
                    .checked_add(amount)
                    .ok_or_else(|| Error::config("transfer amount overflows"))?;
            }
            None => self.transfers.push(HbarTransfer {
                account_id,
                amount,
                is_approved,
            }),
        }
        Ok(())
    }
}

impl TransactionData for TransferTransactionData {
    fn method(&self) -> RpcMethod {
        methods::CRYPTO_TRANSFER
    }

    fn to_schema(&self, _chunk_index: usize) -> schema::TransactionData {
        schema::TransactionData::CryptoTransfer(schema::TransferList {
            account_amounts: self
                .transfers
                .iter()
                .map(|t| schema::AccountAmount {
                    account_id: t.account_id.to_schema(),
                    amount: t.amount.to_tinybars(),
                    is_approval: t.is_approved,
                })
                .collect(),
        })
    }

    fn validate_checksums(&self, ledger_id: &LedgerId) -> Result<(), Error> {
        for transfer in &self.transfers {
            transfer.account_id.validate_checksum_for_ledger(ledger_id)?;
        }
        Ok(())
    }
}
