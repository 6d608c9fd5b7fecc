use crate::ledger::{AccountNumber, IdempotencyKey, Value};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("invalid amount: {0}")]
    InvalidAmount(Value),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountRequest {
    pub first_name: String,
    pub other_name: String,
    pub surname: String,
}

/// Adds (or, with a negative amount, removes) funds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmountRequest {
    pub amount: Value,
    #[serde(rename = "requestID")]
    pub request_id: IdempotencyKey,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub amount: Value,
    pub to: AccountNumber,
    #[serde(rename = "requestID")]
    pub request_id: IdempotencyKey,
}

impl AmountRequest {
    pub fn validate(&self) -> Result<(), RequestError> {
        if !self.amount.is_finite() {
            return Err(RequestError::InvalidAmount(self.amount));
        }
        Ok(())
    }
}

impl TransferRequest {
    // A negative amount would silently swap the debit and credit legs, and a
    // zero one would use up the request id without moving anything.
    pub fn validate(&self) -> Result<(), RequestError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(RequestError::InvalidAmount(self.amount));
        }
        Ok(())
    }
}
