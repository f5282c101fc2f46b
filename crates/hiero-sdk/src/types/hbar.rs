//! Hbar amounts.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ParseAmountError;

/// Tinybars in one hbar.
const TINYBARS_PER_HBAR: i64 = 100_000_000;

/// Denominations of hbar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HbarUnit {
    Tinybar,
    Microbar,
    Millibar,
    Hbar,
    Kilobar,
    Megabar,
    Gigabar,
}

impl HbarUnit {
    /// Tinybars in one of this unit.
    pub const fn tinybars(&self) -> i64 {
        match self {
            Self::Tinybar => 1,
            Self::Microbar => 100,
            Self::Millibar => 100_000,
            Self::Hbar => TINYBARS_PER_HBAR,
            Self::Kilobar => 1_000 * TINYBARS_PER_HBAR,
            Self::Megabar => 1_000_000 * TINYBARS_PER_HBAR,
            Self::Gigabar => 1_000_000_000 * TINYBARS_PER_HBAR,
        }
    }

    /// The unit symbol, e.g. `tℏ`.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Tinybar => "tℏ",
            Self::Microbar => "μℏ",
            Self::Millibar => "mℏ",
            Self::Hbar => "ℏ",
            Self::Kilobar => "kℏ",
            Self::Megabar => "Mℏ",
            Self::Gigabar => "Gℏ",
        }
    }

    fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "tℏ" => Self::Tinybar,
            "μℏ" => Self::Microbar,
            "mℏ" => Self::Millibar,
            "ℏ" => Self::Hbar,
            "kℏ" => Self::Kilobar,
            "Mℏ" => Self::Megabar,
            "Gℏ" => Self::Gigabar,
            _ => return None,
        })
    }
}

/// An amount of hbar, stored as a signed count of tinybars.
///
/// Negative amounts are valid; they represent the debit side of a transfer.
///
/// ```
/// use hiero_sdk::{Hbar, HbarUnit};
///
/// let fee = Hbar::new(2);
/// assert_eq!(fee.to_tinybars(), 200_000_000);
///
/// let small: Hbar = "1.5 ℏ".parse().unwrap();
/// assert_eq!(small, Hbar::from_tinybars(150_000_000));
///
/// assert_eq!(Hbar::from_unit(3, HbarUnit::Millibar).unwrap().to_tinybars(), 300_000);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hbar(i64);

impl Hbar {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(i64::MAX);
    pub const MIN: Self = Self(i64::MIN);

    /// Create an amount of whole hbars, or `None` if it does not fit in an
    /// `i64` count of tinybars.
    pub const fn checked_new(hbars: i64) -> Option<Self> {
        match hbars.checked_mul(TINYBARS_PER_HBAR) {
            Some(tinybars) => Some(Self(tinybars)),
            None => None,
        }
    }

    /// Create an amount of whole hbars from a literal.
    ///
    /// # Panics
    ///
    /// Panics if the amount does not fit in an `i64` count of tinybars. Use
    /// [`Hbar::checked_new`] for amounts that are not known to fit.
    pub const fn new(hbars: i64) -> Self {
        match Self::checked_new(hbars) {
            Some(amount) => amount,
            None => panic!("overflow in Hbar::new"),
        }
    }

    /// Create an amount from tinybars.
    pub const fn from_tinybars(tinybars: i64) -> Self {
        Self(tinybars)
    }

    /// Create an amount from a value in `unit`, failing on overflow.
    pub fn from_unit(amount: i64, unit: HbarUnit) -> Result<Self, ParseAmountError> {
        amount
            .checked_mul(unit.tinybars())
            .map(Self)
            .ok_or(ParseAmountError::Overflow)
    }

    /// The raw tinybar count.
    pub const fn to_tinybars(&self) -> i64 {
        self.0
    }

    /// The value expressed in `unit` (may lose precision).
    pub fn to_f64(&self, unit: HbarUnit) -> f64 {
        self.0 as f64 / unit.tinybars() as f64
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_mul(self, factor: i64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    pub fn checked_neg(self) -> Option<Self> {
        self.0.checked_neg().map(Self)
    }

    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal number of `unit`, requiring a whole number of tinybars.
    fn parse_decimal(s: &str, unit: HbarUnit) -> Result<Self, ParseAmountError> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (integer_part, fraction_part) = digits.split_once('.').unwrap_or((digits, ""));

        let is_digits = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
        if (integer_part.is_empty() && fraction_part.is_empty())
            || !is_digits(integer_part)
            || !is_digits(fraction_part)
        {
            return Err(ParseAmountError::InvalidNumber(s.to_string()));
        }

        let factor = unit.tinybars();
        let integer: i64 = if integer_part.is_empty() {
            0
        } else {
            integer_part.parse().map_err(|_| ParseAmountError::Overflow)?
        };
        let mut tinybars = integer
            .checked_mul(factor)
            .ok_or(ParseAmountError::Overflow)?;

        let fraction = fraction_part.trim_end_matches('0');
        if !fraction.is_empty() {
            let scale = 10i64
                .checked_pow(fraction.len() as u32)
                .ok_or_else(|| ParseAmountError::FractionalTinybars(s.to_string()))?;
            if factor % scale != 0 {
                return Err(ParseAmountError::FractionalTinybars(s.to_string()));
            }
            let fraction: i64 = fraction
                .parse()
                .map_err(|_| ParseAmountError::InvalidNumber(s.to_string()))?;
            tinybars = tinybars
                .checked_add(fraction * (factor / scale))
                .ok_or(ParseAmountError::Overflow)?;
        }

        Ok(Self(if negative { -tinybars } else { tinybars }))
    }
}

impl FromStr for Hbar {
    type Err = ParseAmountError;

    /// Accepts `"<amount> <symbol>"` (e.g. `"10 tℏ"`, `"-1.5 ℏ"`) or a bare
    /// number of hbars.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseAmountError::InvalidFormat(s.to_string()));
        }
        match s.split_once(' ') {
            Some((amount, symbol)) => {
                let unit = HbarUnit::from_symbol(symbol.trim())
                    .ok_or_else(|| ParseAmountError::UnknownUnit(symbol.to_string()))?;
                Self::parse_decimal(amount.trim(), unit)
            }
            None => Self::parse_decimal(s, HbarUnit::Hbar),
        }
    }
}

impl TryFrom<&str> for Hbar {
    type Error = ParseAmountError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.unsigned_abs() < 10_000 {
            return write!(f, "{} tℏ", self.0);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / TINYBARS_PER_HBAR as u64;
        let remainder = abs % TINYBARS_PER_HBAR as u64;
        if remainder == 0 {
            write!(f, "{}{} ℏ", sign, whole)
        } else {
            let decimal = format!("{:08}", remainder);
            write!(f, "{}{}.{} ℏ", sign, whole, decimal.trim_end_matches('0'))
        }
    }
}

impl From<Hbar> for i64 {
    fn from(amount: Hbar) -> Self {
        amount.0
    }
}
