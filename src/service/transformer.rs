//! Turns ledger outcomes into the status codes and bodies a caller sees.

use super::RequestError;
use crate::ledger::{Account, AddFundsOutcome, Amount, TransferOutcome, Value};

use serde::Serialize;

const ACCOUNT_NOT_FOUND: &str = "No account with specified accountNumber";

/// Response body. Fields that don't apply to a response are left out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHttpResponse {
    pub reason: String,
    pub status: u16,

    #[serde(rename = "requestID", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub surname: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<Value>,
}

impl AccountHttpResponse {
    pub fn new(reason: impl Into<String>, status: u16) -> Self {
        Self {
            reason: reason.into(),
            status,
            request_id: None,
            first_name: None,
            other_name: None,
            surname: None,
            account_number: None,
            total_amount: None,
        }
    }

    fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }

    fn with_total(mut self, amount: Option<Amount>) -> Self {
        self.total_amount = amount.map(|amount| amount.value());
        self
    }

    fn with_account(mut self, account: &Account) -> Self {
        self.first_name = Some(account.first_name.clone());
        self.other_name = Some(account.other_name.clone());
        self.surname = Some(account.surname.clone());
        self.account_number = Some(account.account_number.clone());
        self
    }
}

pub fn new_account(account: &Account, amount: Amount) -> AccountHttpResponse {
    AccountHttpResponse::new("Success", 201)
        .with_account(account)
        .with_total(Some(amount))
}

pub fn existing_account(account: &Account, amount: Amount) -> AccountHttpResponse {
    AccountHttpResponse::new("Success", 200)
        .with_account(account)
        .with_total(Some(amount))
}

pub fn balance(amount: Amount) -> AccountHttpResponse {
    AccountHttpResponse::new("Success", 200).with_total(Some(amount))
}

pub fn account_conflict() -> AccountHttpResponse {
    AccountHttpResponse::new("Please try again. Unexpected conflict.", 500)
}

pub fn account_not_found() -> AccountHttpResponse {
    AccountHttpResponse::new(ACCOUNT_NOT_FOUND, 404)
}

pub fn invalid_request(request_id: &str, err: &RequestError) -> AccountHttpResponse {
    let reason = match err {
        RequestError::InvalidAmount(_) => "Invalid amount",
    };
    AccountHttpResponse::new(reason, 400).with_request_id(request_id)
}

pub fn add_funds(
    request_id: &str,
    outcome: AddFundsOutcome,
    total: Option<Amount>,
) -> AccountHttpResponse {
    let (reason, status) = match outcome {
        AddFundsOutcome::Success => ("Funds added", 200),
        AddFundsOutcome::AccountNotFound => (ACCOUNT_NOT_FOUND, 404),
        AddFundsOutcome::AlreadyProcessed => ("Transaction already complete", 409),
        AddFundsOutcome::Overflow => ("Too much money in account", 400),
        AddFundsOutcome::Underflow => ("Not enough funds in account", 400),
        AddFundsOutcome::LockTimeout => ("Timed out, please try again", 408),
    };

    AccountHttpResponse::new(reason, status)
        .with_request_id(request_id)
        .with_total(total)
}

pub fn transfer(
    request_id: &str,
    outcome: TransferOutcome,
    total: Option<Amount>,
) -> AccountHttpResponse {
    let (reason, status) = match outcome {
        TransferOutcome::Success => ("Funds added", 200),
        TransferOutcome::AccountNotFound => (ACCOUNT_NOT_FOUND, 404),
        TransferOutcome::DestAccountNotFound => ("Destination account not found", 404),
        TransferOutcome::SameAccount => ("Void transaction within same account", 400),
        TransferOutcome::AlreadyProcessed => ("Transaction already complete", 409),
        TransferOutcome::Overflow => ("Too much money in account", 400),
        TransferOutcome::Underflow => ("Not enough funds in account", 400),
        TransferOutcome::LockTimeout => ("Timed out, please try again", 408),
    };

    AccountHttpResponse::new(reason, status)
        .with_request_id(request_id)
        .with_total(total)
}
