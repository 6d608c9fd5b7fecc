use crate::{
    ledger::{LedgerStore, Value},
    service::AccountHttpResponse,
};

use serde::Serialize;
use std::io::Write;
use tracing::error;

#[derive(Serialize)]
struct AccountRecord {
    #[serde(rename = "account")]
    account_number: String,

    first_name: String,
    other_name: String,
    surname: String,

    balance: Value,
    currency: String,

    // Number of requests applied to the account.
    entries: usize,
}

/// Writes one response as a line of JSON.
pub fn write_response(
    output_stream: &mut impl Write,
    response: &AccountHttpResponse,
) -> Result<(), serde_json::Error> {
    serde_json::to_writer(&mut *output_stream, response)?;
    writeln!(output_stream).map_err(serde_json::Error::io)
}

/// Writes every account of the store, with its balance, as CSV.
pub fn write_accounts(output_stream: impl Write, store: &LedgerStore) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(output_stream);

    for (account, balance) in store.accounts() {
        let entries = match store.statement(&account.account_number) {
            Ok(entries) => entries.len(),
            Err(err) => {
                error!(%err, "account listed without an audit");
                0
            }
        };

        writer.serialize(AccountRecord {
            account_number: account.account_number,
            first_name: account.first_name,
            other_name: account.other_name,
            surname: account.surname,
            balance: balance.value(),
            currency: balance.currency().to_string(),
            entries,
        })?;
    }

    writer.flush()?;
    Ok(())
}
