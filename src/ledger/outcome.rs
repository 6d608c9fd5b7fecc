use super::{safety::Violation, AccountNumber};

use thiserror::Error;

/// Creating or looking up an account can fail in two ways only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    /// The generated account number is already in use.
    #[error("account {0} already exists")]
    AlreadyExists(AccountNumber),

    #[error("account {0} not found")]
    NotFound(AccountNumber),
}

/// Every way adding funds to one account can end.
///
/// None of these is fatal: they are all reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddFundsOutcome {
    Success,

    AccountNotFound,

    /// The idempotency key was already applied to this account. Nothing changed.
    AlreadyProcessed,

    /// The new balance would get too close to the largest representable value.
    Overflow,

    /// The new balance would be negative.
    Underflow,

    /// The account lock couldn't be acquired in time. Safe to retry.
    LockTimeout,
}

/// Every way a transfer between two accounts can end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Success,

    /// The source (debit) account doesn't exist.
    AccountNotFound,

    /// The destination (credit) account doesn't exist.
    DestAccountNotFound,

    /// Source and destination are the same account.
    SameAccount,

    AlreadyProcessed,
    Overflow,
    Underflow,
    LockTimeout,
}

/// Result of checking one leg before any lock is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PreCheck {
    Pass,
    NotFound,
    AlreadyProcessed,
}

impl From<Violation> for AddFundsOutcome {
    fn from(violation: Violation) -> Self {
        match violation {
            Violation::Overflow => AddFundsOutcome::Overflow,
            Violation::Underflow => AddFundsOutcome::Underflow,
        }
    }
}

impl From<Violation> for TransferOutcome {
    fn from(violation: Violation) -> Self {
        match violation {
            Violation::Overflow => TransferOutcome::Overflow,
            Violation::Underflow => TransferOutcome::Underflow,
        }
    }
}

impl AddFundsOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AddFundsOutcome::Success)
    }
}

impl TransferOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success)
    }
}
