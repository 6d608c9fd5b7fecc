use crate::{
    config::Config,
    error_handler,
    input::{self, Command},
    ledger::LedgerStore,
    output,
    service::{AccountHttpResponse, AccountsService, SequentialAccountNumbers},
};

use std::{io::Write, sync::Arc};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write accounts: {0}")]
    Csv(#[from] csv::Error),
}

/// Applies a command script to a fresh ledger, writing one JSON response per
/// command. Returns the service, so the final state can be inspected.
pub fn run(
    input_stream: (impl std::io::Read + Send + 'static),
    mut output_stream: impl Write,
    config: &Config,
) -> Result<AccountsService, RunError> {
    let service = AccountsService::new(
        Arc::new(LedgerStore::from_config(config)),
        Box::new(SequentialAccountNumbers::new()),
    );

    let (commands, input_errors) = input::parse(input_stream);
    let errors_handle = error_handler::sink(input_errors);

    let mut applied = 0;
    for command in commands {
        let response = apply(&service, command);
        output::write_response(&mut output_stream, &response)?;
        applied += 1;
    }
    output_stream.flush()?;

    let skipped = errors_handle.join().unwrap_or_default();
    info!(applied, skipped, "command script completed");

    Ok(service)
}

/// Same as `run`, followed by a CSV summary of every account.
pub fn run_with_summary(
    input_stream: (impl std::io::Read + Send + 'static),
    output_stream: impl Write,
    summary_stream: impl Write,
    config: &Config,
) -> Result<AccountsService, RunError> {
    let service = run(input_stream, output_stream, config)?;
    output::write_accounts(summary_stream, service.store())?;

    Ok(service)
}

fn apply(service: &AccountsService, command: Command) -> AccountHttpResponse {
    match command {
        Command::Open(request) => service.create_account(request),
        Command::Fund { account, request } => service.add_funds(&account, request),
        Command::Transfer { from, request } => service.transfer_funds(&from, request),
        Command::Balance(account) => service.get_balance(&account),
        Command::Account(account) => service.get_account(&account),
    }
}
