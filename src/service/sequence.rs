use crate::ledger::AccountNumber;

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out account numbers. Every number must be unique: the store refuses
/// numbers it already knows.
pub trait AccountNumberSource: Send + Sync {
    fn next_account_number(&self) -> AccountNumber;
}

const ACCOUNT_NUMBER_WIDTH: usize = 9;

/// Monotonic, zero-padded account numbers: `000000001`, `000000002`, ...
#[derive(Debug, Default)]
pub struct SequentialAccountNumbers {
    issued: AtomicU64,
}

impl SequentialAccountNumbers {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountNumberSource for SequentialAccountNumbers {
    fn next_account_number(&self) -> AccountNumber {
        let next = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{:0width$}", next, width = ACCOUNT_NUMBER_WIDTH)
    }
}
