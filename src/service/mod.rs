//! Everything between a caller (e.g. an HTTP handler) and the ledger store:
//! account numbers, request validation, and status codes.

pub mod accounts;
pub mod requests;
pub mod sequence;
pub mod transformer;

pub use accounts::AccountsService;
pub use requests::{AccountRequest, AmountRequest, RequestError, TransferRequest};
pub use sequence::{AccountNumberSource, SequentialAccountNumbers};
pub use transformer::AccountHttpResponse;
