use super::LedgerStore;
use crate::ledger::{outcome::PreCheck, safety, Transfer, TransferOutcome};

use tracing::{info, warn};

impl LedgerStore {
    /// Moves funds between two accounts: both legs are applied, or neither.
    ///
    /// Both account locks are taken with a bounded wait, in ascending account
    /// number order. There is no global lock: transfers between other
    /// accounts carry on in parallel.
    pub fn transfer_funds(&self, transfer: &Transfer) -> TransferOutcome {
        let (debit, credit) = (&transfer.debit, &transfer.credit);
        let request_id = &debit.idempotency_key;

        // Callers check this first. Taking the same lock twice would only ever time out.
        if transfer.is_same_account() {
            info!(%request_id, "transfer within same account is not allowed");
            return TransferOutcome::SameAccount;
        }

        match self.pre_check(debit) {
            PreCheck::Pass => {}
            PreCheck::NotFound => return TransferOutcome::AccountNotFound,
            PreCheck::AlreadyProcessed => return TransferOutcome::AlreadyProcessed,
        }
        match self.pre_check(credit) {
            PreCheck::Pass => {}
            PreCheck::NotFound => return TransferOutcome::DestAccountNotFound,
            PreCheck::AlreadyProcessed => return TransferOutcome::AlreadyProcessed,
        }

        let Some(debit_lock) = self.account_lock(&debit.account_number) else {
            return TransferOutcome::AccountNotFound;
        };
        let Some(credit_lock) = self.account_lock(&credit.account_number) else {
            return TransferOutcome::DestAccountNotFound;
        };

        let (first, second) = if debit.account_number < credit.account_number {
            (&debit_lock, &credit_lock)
        } else {
            (&credit_lock, &debit_lock)
        };

        let Some(first_guard) = first.try_lock_for(self.lock_timeout) else {
            warn!(%request_id, "lock acquisition timed out");
            return TransferOutcome::LockTimeout;
        };
        let Some(second_guard) = second.try_lock_for(self.lock_timeout) else {
            drop(first_guard);
            warn!(%request_id, "lock acquisition timed out");
            return TransferOutcome::LockTimeout;
        };

        // The same request may have been applied while we were waiting.
        if self.is_applied(debit) || self.is_applied(credit) {
            info!(%request_id, "transaction already completed");
            return TransferOutcome::AlreadyProcessed;
        }

        let (Some(old_debit), Some(old_credit)) = (
            self.balance_of(&debit.account_number),
            self.balance_of(&credit.account_number),
        ) else {
            return TransferOutcome::AccountNotFound;
        };

        // Each leg is checked against its own balance. Nothing is written
        // until both legs are known to be safe.
        let checked = safety::check(old_debit, debit.amount)
            .and_then(|_| safety::check(old_credit, credit.amount));
        if let Err(violation) = checked {
            info!(%request_id, ?violation, "transfer refused");
            return violation.into();
        }

        self.apply_locked(debit, old_debit);
        self.apply_locked(credit, old_credit);

        drop(second_guard);
        drop(first_guard);

        info!(%request_id, "transaction completed successfully");

        TransferOutcome::Success
    }
}
