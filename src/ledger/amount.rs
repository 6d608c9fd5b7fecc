use super::Value;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The ledger only ever holds one currency. There is no conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "GBP")]
    Gbp,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Gbp => write!(f, "GBP"),
        }
    }
}

/// An immutable amount of money.
///
/// The value is signed: a negative amount is a debit when used as a delta.
/// Balances themselves are never negative, see `safety::check`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    value: Value,
    currency: Currency,
}

impl Amount {
    pub const ZERO: Amount = Amount::new(0.0);

    pub const fn new(value: Value) -> Self {
        Self {
            value,
            currency: Currency::Gbp,
        }
    }

    pub const fn value(&self) -> Value {
        self.value
    }

    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// The same amount, with the opposite sign.
    pub fn negated(&self) -> Self {
        Self::new(-self.value)
    }

    /// Adds a signed delta. This doesn't check anything: callers are expected
    /// to run `safety::check` first.
    pub fn plus(&self, delta: Amount) -> Self {
        Self::new(self.value + delta.value)
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}
