use super::{AccountNumber, Amount, IdempotencyKey, Value};

/// One intended mutation of a single account.
///
/// The amount is a signed delta: deposits are positive, debits negative.
#[derive(Debug, Clone, PartialEq)]
pub struct FundDelta {
    pub account_number: AccountNumber,
    pub amount: Amount,
    pub idempotency_key: IdempotencyKey,
}

impl FundDelta {
    pub fn new(
        account_number: impl Into<AccountNumber>,
        amount: Amount,
        idempotency_key: impl Into<IdempotencyKey>,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            amount,
            idempotency_key: idempotency_key.into(),
        }
    }
}

/// Two legs applied as a single unit: both or neither.
/// Both legs carry the same idempotency key.
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub debit: FundDelta,
    pub credit: FundDelta,
}

impl Transfer {
    /// Builds a transfer of `magnitude` from one account to another.
    /// The debit leg gets the negated amount.
    pub fn new(
        from: impl Into<AccountNumber>,
        to: impl Into<AccountNumber>,
        magnitude: Value,
        idempotency_key: impl Into<IdempotencyKey>,
    ) -> Self {
        let idempotency_key = idempotency_key.into();
        let amount = Amount::new(magnitude);

        Self {
            debit: FundDelta::new(from, amount.negated(), idempotency_key.clone()),
            credit: FundDelta::new(to, amount, idempotency_key),
        }
    }

    pub fn is_same_account(&self) -> bool {
        self.debit.account_number == self.credit.account_number
    }
}
