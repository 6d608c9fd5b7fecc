//! An in-memory ledger of accounts, applying concurrent deposits and
//! transfers at most once each, without ever letting a balance go negative.
//!
//! `ledger` is the engine. `service` is what a request handler would call.
//! `run` replays a CSV command script against a fresh ledger.

pub mod config;
pub mod error_handler;
pub mod input;
pub mod ledger;
pub mod logging;
pub mod output;
pub mod run;
pub mod service;
