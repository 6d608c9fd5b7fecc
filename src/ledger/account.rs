use super::AccountNumber;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// Identity and profile of an account holder.
///
/// An account never changes once it has been stored: balances live in the
/// store, next to it, so that reading an account never needs a lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_number: AccountNumber,
    pub first_name: String,
    pub other_name: String,
    pub surname: String,
    pub created_at: DateTime<FixedOffset>,
}

impl Account {
    pub fn new(
        account_number: impl Into<AccountNumber>,
        first_name: impl Into<String>,
        other_name: impl Into<String>,
        surname: impl Into<String>,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            first_name: first_name.into(),
            other_name: other_name.into(),
            surname: surname.into(),
            created_at,
        }
    }
}
