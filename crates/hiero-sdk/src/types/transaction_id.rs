//! Transaction identifiers.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use rand::Rng;

use super::{AccountId, Timestamp};
use crate::error::{Error, ParseIdError};
use crate::schema;

/// Range of the backdating applied to generated valid-start times, in ms.
const VALID_START_JITTER_MS: std::ops::Range<u64> = 5_000..8_000;

/// Identifies a transaction: the paying account and the time from which the
/// transaction is valid.
///
/// The `(account_id, valid_start)` pair must be unique within the network's
/// deduplication window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start: Timestamp,
    pub scheduled: bool,
    pub nonce: Option<i32>,
}

impl TransactionId {
    /// Generate an ID for `account_id` valid from slightly before now.
    ///
    /// The valid start is backdated by a random 5–8 s so that clocks running
    /// ahead of the network do not cause `INVALID_TRANSACTION_START` and two
    /// IDs generated in the same instant are unlikely to collide.
    pub fn generate(account_id: AccountId) -> Self {
        let jitter = rand::thread_rng().gen_range(VALID_START_JITTER_MS);
        let valid_start = Timestamp::now().saturating_sub(Duration::from_millis(jitter));
        Self::with_valid_start(account_id, valid_start)
    }

    /// Create an ID with an explicit valid start.
    pub const fn with_valid_start(account_id: AccountId, valid_start: Timestamp) -> Self {
        Self {
            account_id,
            valid_start,
            scheduled: false,
            nonce: None,
        }
    }

    /// This ID with the scheduled flag set.
    pub fn scheduled(mut self) -> Self {
        self.scheduled = true;
        self
    }

    /// This ID with a child-transaction nonce.
    pub fn with_nonce(mut self, nonce: i32) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// The same payer with valid start advanced by `nanos` nanoseconds.
    pub fn offset_nanos(&self, nanos: u64) -> Self {
        Self {
            valid_start: self.valid_start.plus_nanos(nanos),
            ..*self
        }
    }

    pub(crate) fn to_schema(&self) -> schema::TransactionId {
        schema::TransactionId {
            account_id: self.account_id.to_schema(),
            valid_start: self.valid_start.to_schema(),
            scheduled: self.scheduled,
            nonce: self.nonce.unwrap_or(0),
        }
    }

    pub(crate) fn from_schema(id: &schema::TransactionId) -> Result<Self, Error> {
        Ok(Self {
            account_id: AccountId::from_schema(&id.account_id)?,
            valid_start: Timestamp::from_schema(&id.valid_start),
            scheduled: id.scheduled,
            nonce: (id.nonce != 0).then_some(id.nonce),
        })
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.account_id, self.valid_start)?;
        if self.scheduled {
            f.write_str("?scheduled")?;
        }
        if let Some(nonce) = self.nonce {
            write!(f, "/{}", nonce)?;
        }
        Ok(())
    }
}

impl FromStr for TransactionId {
    type Err = ParseIdError;

    /// Parses `0.0.2@1700000000.000000123[?scheduled][/nonce]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseIdError::MalformedTransactionId(s.to_string());

        let (rest, nonce) = match s.rsplit_once('/') {
            Some((rest, nonce)) => (rest, Some(nonce.parse::<i32>().map_err(|_| malformed())?)),
            None => (s, None),
        };
        let (rest, scheduled) = match rest.strip_suffix("?scheduled") {
            Some(rest) => (rest, true),
            None => (rest, false),
        };
        let (account, valid_start) = rest.split_once('@').ok_or_else(malformed)?;

        Ok(Self {
            account_id: account.parse().map_err(|_| malformed())?,
            valid_start: valid_start.parse().map_err(|_| malformed())?,
            scheduled,
            nonce,
        })
    }
}
