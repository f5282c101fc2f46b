//! Atomic batches.

use super::{Transaction, TransactionData};
use crate::error::Error;
use crate::schema::{self, RpcMethod, methods};
use crate::types::TransactionId;

#[derive(Clone, Debug, Default)]
pub struct BatchTransactionData {
    inner_transactions: Vec<Vec<u8>>,
    inner_transaction_ids: Vec<TransactionId>,
}

/// Execute several transactions atomically: all succeed or none do.
///
/// Inner transactions must be [batchified](Transaction::batchify) first. The
/// batch itself must be signed by every inner transaction's batch key.
pub type BatchTransaction = Transaction<BatchTransactionData>;

impl BatchTransaction {
    /// Append a batchified transaction.
    ///
    /// Fails with [`Error::IllegalState`] if `transaction` is not batchified
    /// or is itself a batch.
    pub fn add_inner_transaction<D: TransactionData>(
        &mut self,
        transaction: &Transaction<D>,
    ) -> Result<&mut Self, Error> {
        if transaction.data().method() == methods::ATOMIC_BATCH {
            return Err(Error::illegal_state("batches cannot be nested"));
        }
        let (id, bytes) = transaction.batch_inner()?;
        let data = self.data_mut()?;
        data.inner_transactions.push(bytes);
        data.inner_transaction_ids.push(id);
        Ok(self)
    }

    pub fn get_inner_transaction_ids(&self) -> &[TransactionId] {
        &self.data().inner_transaction_ids
    }
}

impl TransactionData for BatchTransactionData {
    fn method(&self) -> RpcMethod {
        methods::ATOMIC_BATCH
    }

    fn to_schema(&self, _chunk_index: usize) -> schema::TransactionData {
        schema::TransactionData::AtomicBatch(schema::AtomicBatchBody {
            transactions: self.inner_transactions.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::transaction::TransferTransaction;
    use crate::transport::mock::MockTransport;
    use crate::types::{AccountId, Hbar, PrivateKey};

    fn client(key: PrivateKey) -> Client {
        Client::builder()
            .network([("127.0.0.1:50211", AccountId::from_num(3))])
            .unwrap()
            .transport(MockTransport::new())
            .operator(AccountId::from_num(2), key)
            .build()
            .unwrap()
    }

    fn transfer(amount: i64) -> TransferTransaction {
        let mut tx = TransferTransaction::new();
        tx.hbar_transfer(AccountId::from_num(2), Hbar::from_tinybars(-amount))
            .unwrap()
            .hbar_transfer(AccountId::from_num(1001), Hbar::from_tinybars(amount))
            .unwrap();
        tx
    }

    #[test]
    fn test_collects_inner_transactions() {
        let key = PrivateKey::generate_ed25519();
        let client = client(key.clone());
        let mut first = transfer(1);
        first.batchify(&client, key.public_key()).unwrap();
        let mut second = transfer(2);
        second.batchify(&client, key.public_key()).unwrap();

        let mut batch = BatchTransaction::new();
        batch
            .add_inner_transaction(&first)
            .unwrap()
            .add_inner_transaction(&second)
            .unwrap();

        assert_eq!(
            batch.get_inner_transaction_ids(),
            &[
                first.get_transaction_id().unwrap(),
                second.get_transaction_id().unwrap()
            ]
        );
        let schema::TransactionData::AtomicBatch(body) = batch.data().to_schema(0) else {
            panic!("expected a batch body");
        };
        assert_eq!(body.transactions.len(), 2);
        assert_eq!(body.transactions[0], first.batch_inner().unwrap().1);
    }

    #[test]
    fn test_rejects_unbatchified() {
        let mut batch = BatchTransaction::new();
        let err = batch.add_inner_transaction(&transfer(1)).unwrap_err();
        assert!(matches!(err, Error::IllegalState(_)));
    }

    #[test]
    fn test_rejects_nested_batch() {
        let key = PrivateKey::generate_ed25519();
        let client = client(key.clone());
        let mut inner = transfer(1);
        inner.batchify(&client, key.public_key()).unwrap();
        let mut nested = BatchTransaction::new();
        nested.add_inner_transaction(&inner).unwrap();
        nested.batchify(&client, key.public_key()).unwrap();

        let mut batch = BatchTransaction::new();
        let err = batch.add_inner_transaction(&nested).unwrap_err();
        assert!(matches!(err, Error::IllegalState(_)));
    }
}
