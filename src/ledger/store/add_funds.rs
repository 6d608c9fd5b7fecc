use super::LedgerStore;
use crate::ledger::{outcome::PreCheck, safety, AddFundsOutcome, FundDelta};

use tracing::{info, warn};

impl LedgerStore {
    /// Applies a signed delta to one account, at most once per idempotency key.
    pub fn add_funds(&self, delta: &FundDelta) -> AddFundsOutcome {
        match self.pre_check(delta) {
            PreCheck::Pass => {}
            PreCheck::NotFound => return AddFundsOutcome::AccountNotFound,
            PreCheck::AlreadyProcessed => return AddFundsOutcome::AlreadyProcessed,
        }

        let lock = match self.account_lock(&delta.account_number) {
            Some(lock) => lock,
            None => return AddFundsOutcome::AccountNotFound,
        };

        let _guard = match lock.try_lock_for(self.lock_timeout) {
            Some(guard) => guard,
            None => {
                warn!(request_id = %delta.idempotency_key, "lock acquisition timed out");
                return AddFundsOutcome::LockTimeout;
            }
        };

        // The same request may have been applied while we were waiting.
        if self.is_applied(delta) {
            info!(request_id = %delta.idempotency_key, "transaction already completed");
            return AddFundsOutcome::AlreadyProcessed;
        }

        let old = match self.balance_of(&delta.account_number) {
            Some(old) => old,
            None => return AddFundsOutcome::AccountNotFound,
        };

        if let Err(violation) = safety::check(old, delta.amount) {
            info!(request_id = %delta.idempotency_key, ?violation, "fund change refused");
            return violation.into();
        }

        self.apply_locked(delta, old);
        info!(request_id = %delta.idempotency_key, "transaction completed successfully");

        AddFundsOutcome::Success
    }
}

#[cfg(test)]
mod add_funds_tests {
    use crate::ledger::{
        safety::MAX_BALANCE,
        store::tests::{account, store_with},
        AddFundsOutcome, Amount, FundDelta,
    };

    #[test]
    fn test_add_funds_ok() {
        let store = store_with(&["000000001"]);

        let got = store.add_funds(&FundDelta::new("000000001", Amount::new(10.0), "k1"));
        assert_eq!(AddFundsOutcome::Success, got);
        assert_eq!(Ok(Amount::new(10.0)), store.get_balance("000000001"));
    }

    #[test]
    fn test_add_funds_is_idempotent() {
        let store = store_with(&["000000001"]);
        let delta = FundDelta::new("000000001", Amount::new(10.0), "k1");

        assert_eq!(AddFundsOutcome::Success, store.add_funds(&delta));
        assert_eq!(AddFundsOutcome::AlreadyProcessed, store.add_funds(&delta));
        assert_eq!(Ok(Amount::new(10.0)), store.get_balance("000000001"));
        assert_eq!(1, store.statement("000000001").unwrap().len());

        // Same key, different amount: still the same request.
        let replay = FundDelta::new("000000001", Amount::new(999.0), "k1");
        assert_eq!(AddFundsOutcome::AlreadyProcessed, store.add_funds(&replay));
        assert_eq!(Ok(Amount::new(10.0)), store.get_balance("000000001"));
    }

    #[test]
    fn test_same_key_on_other_account() {
        let store = store_with(&["000000001", "000000002"]);

        let first = FundDelta::new("000000001", Amount::new(10.0), "k1");
        let second = FundDelta::new("000000002", Amount::new(10.0), "k1");
        assert_eq!(AddFundsOutcome::Success, store.add_funds(&first));
        assert_eq!(AddFundsOutcome::Success, store.add_funds(&second));
    }

    #[test]
    fn test_add_funds_account_not_found() {
        let store = store_with(&["000000001"]);

        let got = store.add_funds(&FundDelta::new("000000002", Amount::new(10.0), "k1"));
        assert_eq!(AddFundsOutcome::AccountNotFound, got);
    }

    #[test]
    fn test_add_funds_underflow() {
        let store = store_with(&["000000001"]);
        store.add_funds(&FundDelta::new("000000001", Amount::new(10.0), "k1"));

        let got = store.add_funds(&FundDelta::new("000000001", Amount::new(-10.5), "k2"));
        assert_eq!(AddFundsOutcome::Underflow, got);
        assert_eq!(Ok(Amount::new(10.0)), store.get_balance("000000001"));

        // A refused request is not recorded, it can be retried.
        assert_eq!(1, store.statement("000000001").unwrap().len());
        let got = store.add_funds(&FundDelta::new("000000001", Amount::new(-10.0), "k2"));
        assert_eq!(AddFundsOutcome::Success, got);
        assert_eq!(Ok(Amount::ZERO), store.get_balance("000000001"));
    }

    #[test]
    fn test_add_funds_overflow() {
        let store = store_with(&["000000001"]);
        store.add_funds(&FundDelta::new("000000001", Amount::new(MAX_BALANCE / 2.0), "k1"));

        let got = store.add_funds(&FundDelta::new(
            "000000001",
            Amount::new(MAX_BALANCE / 2.0),
            "k2",
        ));
        assert_eq!(AddFundsOutcome::Overflow, got);
        assert_eq!(
            Ok(Amount::new(MAX_BALANCE / 2.0)),
            store.get_balance("000000001")
        );
    }

    #[test]
    fn test_add_funds_lock_timeout() {
        let store = store_with(&["000000001"]);
        let lock = store.account_lock("000000001").unwrap();
        let _held = lock.lock();

        let got = store.add_funds(&FundDelta::new("000000001", Amount::new(10.0), "k1"));
        assert_eq!(AddFundsOutcome::LockTimeout, got);
        assert_eq!(Ok(Amount::ZERO), store.get_balance("000000001"));
        assert_eq!(Ok(vec![]), store.statement("000000001"));
        assert_eq!(Some(account("000000001")), store.get_account("000000001"));
    }
}
