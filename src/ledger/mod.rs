//! Handles account balances through a concurrent, in-memory ledger.
//!
//! Store: owns every account, its balance, its lock and its audit of applied requests.
//! Amount: a single-currency monetary value.
//! FundDelta / Transfer: the mutations we can apply to the store.

pub mod account;
pub mod amount;
pub mod funds;
pub mod outcome;
pub mod safety;
pub mod store;

// Using named types doesn't provide any compiler help, but it helps a lot with
// readability.
// Consider the following, when creating the balances map:
// (1) balances: DashMap<String, Amount>
// (2) balances: DashMap<AccountNumber, Amount>
// Implementation (1) would most likely need comments, and could be confusing.
// Implementation (2) is self-explanatory.
pub type AccountNumber = String;
pub type IdempotencyKey = String;

// Amounts are binary floating point numbers, like in the service this ledger
// replaces. Switching to integer minor units would change the overflow rules,
// see `safety`.
pub type Value = f32;

pub use account::Account;
pub use amount::{Amount, Currency};
pub use funds::{FundDelta, Transfer};
pub use outcome::{AccountError, AddFundsOutcome, TransferOutcome};
pub use store::LedgerStore;
