use super::{
    transformer, AccountHttpResponse, AccountNumberSource, AccountRequest, AmountRequest,
    TransferRequest,
};
use crate::ledger::{
    Account, AccountError, Amount, FundDelta, IdempotencyKey, LedgerStore, Transfer,
    TransferOutcome,
};

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

/// The caller-facing side of the ledger. Builds domain values out of
/// requests, checks what the store shouldn't have to, and maps every
/// outcome to a response.
pub struct AccountsService {
    store: Arc<LedgerStore>,
    account_numbers: Box<dyn AccountNumberSource>,
}

impl AccountsService {
    pub fn new(store: Arc<LedgerStore>, account_numbers: Box<dyn AccountNumberSource>) -> Self {
        Self {
            store,
            account_numbers,
        }
    }

    pub fn store(&self) -> &Arc<LedgerStore> {
        &self.store
    }

    pub fn create_account(&self, request: AccountRequest) -> AccountHttpResponse {
        let account = Account::new(
            self.account_numbers.next_account_number(),
            request.first_name,
            request.other_name,
            request.surname,
            Utc::now().fixed_offset(),
        );

        let account = match self.store.create_account(account) {
            Ok(account) => account,
            Err(err) => {
                error!(%err, "failed to create account");
                return transformer::account_conflict();
            }
        };

        match self.store.get_balance(&account.account_number) {
            Ok(amount) => transformer::new_account(&account, amount),
            Err(err) => {
                error!(%err, "new account with no amount");
                transformer::account_conflict()
            }
        }
    }

    pub fn get_account(&self, account_number: &str) -> AccountHttpResponse {
        let Some(account) = self.store.get_account(account_number) else {
            return transformer::account_not_found();
        };

        match self.store.get_balance(account_number) {
            Ok(amount) => transformer::existing_account(&account, amount),
            Err(err) => {
                error!(%err, "found account with no amount");
                transformer::account_not_found()
            }
        }
    }

    pub fn get_balance(&self, account_number: &str) -> AccountHttpResponse {
        match self.store.get_balance(account_number) {
            Ok(amount) => transformer::balance(amount),
            Err(_) => transformer::account_not_found(),
        }
    }

    pub fn add_funds(&self, account_number: &str, request: AmountRequest) -> AccountHttpResponse {
        if let Err(err) = request.validate() {
            info!(request_id = %request.request_id, %err, "refusing fund request");
            return transformer::invalid_request(&request.request_id, &err);
        }

        let delta = FundDelta::new(
            account_number,
            Amount::new(request.amount),
            request.request_id.clone(),
        );
        let outcome = self.store.add_funds(&delta);

        transformer::add_funds(
            &request.request_id,
            outcome,
            self.current_total(account_number),
        )
    }

    /// Transfers from `account_number` to the account named in the request.
    /// The response carries the source account's total.
    pub fn transfer_funds(
        &self,
        account_number: &str,
        request: TransferRequest,
    ) -> AccountHttpResponse {
        if account_number == request.to {
            info!(request_id = %request.request_id, "transfer within same account is not allowed");
            return transformer::transfer(&request.request_id, TransferOutcome::SameAccount, None);
        }

        if let Err(err) = request.validate() {
            info!(request_id = %request.request_id, %err, "refusing transfer request");
            return transformer::invalid_request(&request.request_id, &err);
        }

        let transfer = Transfer::new(
            account_number,
            request.to.as_str(),
            request.amount,
            request.request_id.clone(),
        );
        let outcome = self.store.transfer_funds(&transfer);

        transformer::transfer(
            &request.request_id,
            outcome,
            self.current_total(account_number),
        )
    }

    pub fn statement(
        &self,
        account_number: &str,
    ) -> Result<Vec<(IdempotencyKey, Amount)>, AccountError> {
        self.store.statement(account_number)
    }

    fn current_total(&self, account_number: &str) -> Option<Amount> {
        self.store.get_balance(account_number).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::AccountsService;
    use crate::{
        ledger::{Amount, LedgerStore},
        service::{
            AccountNumberSource, AccountRequest, AmountRequest, SequentialAccountNumbers,
            TransferRequest,
        },
    };

    use std::{sync::Arc, time::Duration};

    fn service() -> AccountsService {
        AccountsService::new(
            Arc::new(LedgerStore::new(Duration::from_millis(50))),
            Box::new(SequentialAccountNumbers::new()),
        )
    }

    fn open(service: &AccountsService) -> String {
        let response = service.create_account(AccountRequest {
            first_name: "Ada".to_string(),
            other_name: "".to_string(),
            surname: "Lovelace".to_string(),
        });
        assert_eq!(201, response.status);
        response.account_number.unwrap()
    }

    fn fund(amount: f32, request_id: &str) -> AmountRequest {
        AmountRequest {
            amount,
            request_id: request_id.to_string(),
        }
    }

    fn transfer_to(to: &str, amount: f32, request_id: &str) -> TransferRequest {
        TransferRequest {
            amount,
            to: to.to_string(),
            request_id: request_id.to_string(),
        }
    }

    #[test]
    fn test_scenario() {
        let service = service();
        let source = open(&service);
        let destination = open(&service);
        assert_eq!("000000001", source);
        assert_eq!("000000002", destination);

        let response = service.get_balance(&source);
        assert_eq!(Some(0.0), response.total_amount);

        let response = service.add_funds(&source, fund(10.0, "k1"));
        assert_eq!((200, Some(10.0)), (response.status, response.total_amount));

        let response = service.add_funds(&source, fund(10.0, "k1"));
        assert_eq!((409, Some(10.0)), (response.status, response.total_amount));

        let response = service.add_funds(&source, fund(90.0, "k2"));
        assert_eq!((200, Some(100.0)), (response.status, response.total_amount));

        let response = service.transfer_funds(&source, transfer_to(&destination, 65.0, "t1"));
        assert_eq!((200, Some(35.0)), (response.status, response.total_amount));
        assert_eq!(Some(65.0), service.get_balance(&destination).total_amount);

        let response = service.transfer_funds(&source, transfer_to(&source, 1.0, "t2"));
        assert_eq!(400, response.status);
        assert_eq!("Void transaction within same account", response.reason);
        assert_eq!(Some(35.0), service.get_balance(&source).total_amount);

        let response = service.transfer_funds(&source, transfer_to(&destination, 100.0, "t3"));
        assert_eq!((400, Some(35.0)), (response.status, response.total_amount));
        assert_eq!("Not enough funds in account", response.reason);
        assert_eq!(Some(65.0), service.get_balance(&destination).total_amount);
    }

    #[test]
    fn test_same_account_does_not_touch_store() {
        let service = service();
        let source = open(&service);

        let response = service.transfer_funds(&source, transfer_to(&source, 1.0, "t1"));
        assert_eq!(400, response.status);
        assert_eq!(Ok(vec![]), service.statement(&source));
    }

    #[test]
    fn test_get_account() {
        let service = service();
        let number = open(&service);

        let response = service.get_account(&number);
        assert_eq!(200, response.status);
        assert_eq!(Some("Ada".to_string()), response.first_name);
        assert_eq!(Some(number), response.account_number);

        let response = service.get_account("000000999");
        assert_eq!(404, response.status);
        assert_eq!(None, response.total_amount);
    }

    #[test]
    fn test_unknown_accounts() {
        let service = service();
        let number = open(&service);

        assert_eq!(404, service.get_balance("000000999").status);

        let response = service.add_funds("000000999", fund(1.0, "k1"));
        assert_eq!((404, None), (response.status, response.total_amount));

        let response = service.transfer_funds("000000999", transfer_to(&number, 1.0, "t1"));
        assert_eq!(404, response.status);

        let response = service.transfer_funds(&number, transfer_to("000000999", 1.0, "t2"));
        assert_eq!(404, response.status);
        assert_eq!("Destination account not found", response.reason);
    }

    #[test]
    fn test_invalid_amounts() {
        let service = service();
        let source = open(&service);
        let destination = open(&service);
        service.add_funds(&source, fund(10.0, "k1"));

        assert_eq!(400, service.add_funds(&source, fund(f32::NAN, "k2")).status);

        let response = service.transfer_funds(&source, transfer_to(&destination, -5.0, "t1"));
        assert_eq!(400, response.status);
        assert_eq!("Invalid amount", response.reason);
        assert_eq!(Ok(Amount::new(10.0)), service.store().get_balance(&source));
        assert_eq!(Ok(Amount::ZERO), service.store().get_balance(&destination));

        // A zero transfer is refused, and doesn't use up its request id.
        let response = service.transfer_funds(&source, transfer_to(&destination, 0.0, "t2"));
        assert_eq!(400, response.status);
        assert_eq!(Ok(vec![]), service.statement(&destination));

        let response = service.transfer_funds(&source, transfer_to(&destination, 1.0, "t2"));
        assert_eq!((200, Some(9.0)), (response.status, response.total_amount));
    }

    struct RepeatingNumbers;

    impl AccountNumberSource for RepeatingNumbers {
        fn next_account_number(&self) -> String {
            "000000001".to_string()
        }
    }

    #[test]
    fn test_duplicate_account_number() {
        let service = AccountsService::new(
            Arc::new(LedgerStore::new(Duration::from_millis(50))),
            Box::new(RepeatingNumbers),
        );
        open(&service);

        let response = service.create_account(AccountRequest::default());
        assert_eq!(500, response.status);
        assert_eq!(1, service.store().len());
    }
}
