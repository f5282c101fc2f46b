//! Consensus timestamps.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::ParseIdError;
use crate::schema;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Seconds and nanoseconds since the Unix epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: u32,
}

impl Timestamp {
    /// Create a timestamp. `nanos` above one second carry into `seconds`.
    pub const fn new(seconds: i64, nanos: u32) -> Self {
        let carry = (nanos as u64 / NANOS_PER_SECOND) as i64;
        Self {
            seconds: seconds + carry,
            nanos: (nanos as u64 % NANOS_PER_SECOND) as u32,
        }
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Convert from a `SystemTime`; times before the epoch clamp to zero.
    pub fn from_system_time(time: SystemTime) -> Self {
        let since_epoch = time.duration_since(UNIX_EPOCH).unwrap_or_default();
        Self {
            seconds: since_epoch.as_secs() as i64,
            nanos: since_epoch.subsec_nanos(),
        }
    }

    /// Total nanoseconds since the epoch.
    pub fn as_nanos(&self) -> i128 {
        self.seconds as i128 * NANOS_PER_SECOND as i128 + self.nanos as i128
    }

    /// Advance by `nanos` nanoseconds.
    pub fn plus_nanos(self, nanos: u64) -> Self {
        let total = self.nanos as u64 + nanos % NANOS_PER_SECOND;
        Self {
            seconds: self.seconds
                + (nanos / NANOS_PER_SECOND) as i64
                + (total / NANOS_PER_SECOND) as i64,
            nanos: (total % NANOS_PER_SECOND) as u32,
        }
    }

    /// Move back by `duration`, saturating at the epoch.
    pub fn saturating_sub(self, duration: Duration) -> Self {
        let total = (self.as_nanos() - duration.as_nanos() as i128).max(0);
        Self {
            seconds: (total / NANOS_PER_SECOND as i128) as i64,
            nanos: (total % NANOS_PER_SECOND as i128) as u32,
        }
    }

    pub(crate) fn to_schema(self) -> schema::Timestamp {
        schema::Timestamp {
            seconds: self.seconds,
            nanos: self.nanos as i32,
        }
    }

    pub(crate) fn from_schema(timestamp: &schema::Timestamp) -> Self {
        Self::new(timestamp.seconds, timestamp.nanos.max(0) as u32)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanos)
    }
}

impl FromStr for Timestamp {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseIdError::Malformed(s.to_string());
        let (seconds, nanos) = s.split_once('.').ok_or_else(malformed)?;
        if nanos.is_empty()
            || nanos.len() > 9
            || !nanos.bytes().all(|b| b.is_ascii_digit())
            || seconds.is_empty()
            || !seconds.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }
        let seconds: i64 = seconds.parse().map_err(|_| malformed())?;
        // "1.5" means half a second
        let scaled = format!("{:0<9}", nanos);
        let nanos: u32 = scaled.parse().map_err(|_| malformed())?;
        Ok(Self::new(seconds, nanos))
    }
}
