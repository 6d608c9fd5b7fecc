//! The ledger store owns every account and everything needed to mutate it
//! safely from many threads at once.
//!
//! For each account number, it keeps four entries:
//! - the account itself, never modified once inserted,
//! - the current balance, replaced as a whole while holding the account lock,
//! - the audit of applied requests, keyed by idempotency key, each with its
//!   position in the account's history,
//! - the account lock, a mutex with a bounded wait.
//!
//! The four entries are created together, under a store-level lock that is
//! only ever taken to create accounts. Mutations only take the locks of the
//! accounts they touch, so unrelated accounts progress independently.
//!
//! Adding funds lives in `add_funds.rs`, transfers in `transfer.rs`.

mod add_funds;
mod transfer;

use super::{
    outcome::PreCheck, Account, AccountError, AccountNumber, Amount, FundDelta, IdempotencyKey,
};
use crate::config::Config;

use dashmap::DashMap;
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info};

type AccountLock = Arc<Mutex<()>>;

// Position of a request in its account's history, and the amount it applied.
// Positions start at 0 and have no gaps.
type AuditEntry = (u64, Amount);

pub struct LedgerStore {
    accounts: DashMap<AccountNumber, Account>,
    balances: DashMap<AccountNumber, Amount>,
    applied: DashMap<AccountNumber, DashMap<IdempotencyKey, AuditEntry>>,
    locks: DashMap<AccountNumber, AccountLock>,

    // Only taken when creating an account. Never taken by a mutation.
    creation: Mutex<()>,

    lock_timeout: Duration,
}

impl LedgerStore {
    pub fn new(lock_timeout: Duration) -> Self {
        Self {
            accounts: DashMap::new(),
            balances: DashMap::new(),
            applied: DashMap::new(),
            locks: DashMap::new(),
            creation: Mutex::new(()),
            lock_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.lock_timeout())
    }

    pub fn lock_timeout(&self) -> Duration {
        self.lock_timeout
    }

    /// Stores a new account, with a zero balance and an empty audit.
    ///
    /// The account number must not be known to the store in any way. If it
    /// is only known to some of the internal maps, the store is inconsistent:
    /// we log it, and refuse the account.
    pub fn create_account(&self, account: Account) -> Result<Account, AccountError> {
        let account_number = account.account_number.clone();
        let _creation = self.creation.lock();

        if self.accounts.contains_key(&account_number) {
            info!(account = %account_number, "account number already in use");
            return Err(AccountError::AlreadyExists(account_number));
        }

        if self.balances.contains_key(&account_number)
            || self.applied.contains_key(&account_number)
            || self.locks.contains_key(&account_number)
        {
            error!(
                account = %account_number,
                "account number found in other data structures when creating new account"
            );
            return Err(AccountError::AlreadyExists(account_number));
        }

        // The account goes in last: once it is visible, everything else is there.
        self.locks
            .insert(account_number.clone(), Arc::new(Mutex::new(())));
        self.applied.insert(account_number.clone(), DashMap::new());
        self.balances.insert(account_number.clone(), Amount::ZERO);
        self.accounts
            .insert(account_number.clone(), account.clone());

        info!(account = %account_number, "created new account");

        Ok(account)
    }

    pub fn get_account(&self, account_number: &str) -> Option<Account> {
        self.accounts
            .get(account_number)
            .map(|account| account.value().clone())
    }

    pub fn account_exists(&self, account_number: &str) -> bool {
        self.accounts.contains_key(account_number)
    }

    /// Reads the currently published balance, without taking the account lock.
    /// A concurrent mutation may be in flight: we get the value before or
    /// after it, never a mix of both.
    pub fn get_balance(&self, account_number: &str) -> Result<Amount, AccountError> {
        if !self.account_exists(account_number) {
            return Err(AccountError::NotFound(account_number.to_string()));
        }

        match self.balances.get(account_number) {
            Some(balance) => Ok(*balance),
            None => {
                error!(
                    account = %account_number,
                    "expecting account in internal data structures, but not found"
                );
                Err(AccountError::NotFound(account_number.to_string()))
            }
        }
    }

    /// Every request applied to an account, ordered by idempotency key.
    pub fn statement(
        &self,
        account_number: &str,
    ) -> Result<Vec<(IdempotencyKey, Amount)>, AccountError> {
        let applied = self
            .applied
            .get(account_number)
            .filter(|_| self.account_exists(account_number))
            .ok_or_else(|| AccountError::NotFound(account_number.to_string()))?;

        let mut entries: Vec<(IdempotencyKey, Amount)> = applied
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().1))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        Ok(entries)
    }

    /// Checks that the published balance is exactly what we get by replaying
    /// the applied requests, in the order they were applied.
    pub fn reconcile(&self, account_number: &str) -> Result<bool, AccountError> {
        let mut entries = self.history(account_number)?;
        let balance = self.get_balance(account_number)?;

        entries.sort_by_key(|(position, _)| *position);
        let replayed = entries
            .iter()
            .fold(Amount::ZERO, |total, (_, amount)| total.plus(*amount));

        Ok(replayed == balance)
    }

    /// A snapshot of every account and its balance, ordered by account number.
    pub fn accounts(&self) -> Vec<(Account, Amount)> {
        let mut accounts: Vec<(Account, Amount)> = self
            .accounts
            .iter()
            .filter_map(|entry| {
                let balance = self.balances.get(entry.key())?;
                Some((entry.value().clone(), *balance))
            })
            .collect();
        accounts.sort_by(|a, b| a.0.account_number.cmp(&b.0.account_number));

        accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Checks a mutation before taking any lock: the account must exist in
    /// every map, and the request must not have been applied yet.
    pub(crate) fn pre_check(&self, delta: &FundDelta) -> PreCheck {
        let account_number = &delta.account_number;

        if !self.account_exists(account_number) {
            info!(
                request_id = %delta.idempotency_key,
                account = %account_number,
                "account not found when attempting to change funds"
            );
            return PreCheck::NotFound;
        }

        if !self.applied.contains_key(account_number)
            || !self.locks.contains_key(account_number)
            || !self.balances.contains_key(account_number)
        {
            error!(
                request_id = %delta.idempotency_key,
                account = %account_number,
                "expecting account in internal data structures, but not found"
            );
            return PreCheck::NotFound;
        }

        if self.is_applied(delta) {
            info!(request_id = %delta.idempotency_key, "transaction already completed");
            return PreCheck::AlreadyProcessed;
        }

        debug!(request_id = %delta.idempotency_key, "pre check before fund changes passed");

        PreCheck::Pass
    }

    fn is_applied(&self, delta: &FundDelta) -> bool {
        let key = &delta.idempotency_key;
        self.applied
            .get(&delta.account_number)
            .map_or(false, |applied| applied.contains_key(key))
    }

    fn history(&self, account_number: &str) -> Result<Vec<AuditEntry>, AccountError> {
        let applied = self
            .applied
            .get(account_number)
            .filter(|_| self.account_exists(account_number))
            .ok_or_else(|| AccountError::NotFound(account_number.to_string()))?;

        Ok(applied.iter().map(|entry| *entry.value()).collect())
    }

    // The lock is cloned out of the map, so that we never wait for an account
    // while holding a map shard.
    fn account_lock(&self, account_number: &str) -> Option<AccountLock> {
        self.locks
            .get(account_number)
            .map(|lock| Arc::clone(lock.value()))
    }

    fn balance_of(&self, account_number: &str) -> Option<Amount> {
        self.balances.get(account_number).map(|balance| *balance)
    }

    /// Publishes the new balance, and records the request in the audit.
    /// Must only be called while holding the account lock.
    fn apply_locked(&self, delta: &FundDelta, old: Amount) {
        let new = old.plus(delta.amount);

        if let Some(mut balance) = self.balances.get_mut(&delta.account_number) {
            *balance = new;
        }

        // Only ever inserted into under the account lock, so the length is the
        // next position.
        if let Some(applied) = self.applied.get(&delta.account_number) {
            let position = applied.len() as u64;
            applied.insert(delta.idempotency_key.clone(), (position, delta.amount));
        }
    }
}
