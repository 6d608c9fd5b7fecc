use crate::{
    ledger::{AccountNumber, Value},
    service::{AccountRequest, AmountRequest, TransferRequest},
};

use serde::Deserialize;
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("malformed CSV: {0}")]
    Csv(String), // CSV is malformed

    #[error("invalid command: {0}")]
    Format(String), // Data format is incorrect
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<<CommandRecord as TryInto<Command>>::Error> for Error {
    fn from(err: <CommandRecord as TryInto<Command>>::Error) -> Self {
        Self::Format(err.to_string())
    }
}

/// One operation of a command script, in the order it should be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Open(AccountRequest),
    Fund {
        account: AccountNumber,
        request: AmountRequest,
    },
    Transfer {
        from: AccountNumber,
        request: TransferRequest,
    },
    Balance(AccountNumber),
    Account(AccountNumber),
}

// Like for transaction files, we don't abort on a bad row: it is reported on
// the error channel, and we carry on with the next one.
pub fn parse(
    input_stream: (impl std::io::Read + Send + 'static),
) -> (Receiver<Command>, Receiver<Error>) {
    let (command_tx, command_rx): (Sender<Command>, Receiver<Command>) = mpsc::channel();
    let (error_tx, error_rx): (Sender<Error>, Receiver<Error>) = mpsc::channel();

    let buffered = std::io::BufReader::new(input_stream);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(buffered);

    // Moving to a new thread so we can start applying commands immediately.
    std::thread::spawn(move || {
        for record in reader.deserialize::<CommandRecord>() {
            let sent = match convert(record) {
                Ok(command) => command_tx.send(command).is_ok(),
                Err(err) => error_tx.send(err).is_ok(),
            };

            // Nobody is listening anymore.
            if !sent {
                break;
            }
        }
    });

    (command_rx, error_rx)
}

// Convert from a csv deserialise result into a command result.
fn convert(record: Result<CommandRecord, csv::Error>) -> Result<Command, Error> {
    Ok(record?.try_into()?)
}

// I have a CommandRecord type because I can't directly deserialise into my "domain" type, i.e. Command.
// See https://github.com/BurntSushi/rust-csv/issues/211.
#[derive(Debug, Deserialize)]
pub struct CommandRecord {
    op: CommandRecordType,
    account: Option<AccountNumber>,
    to: Option<AccountNumber>,
    amount: Option<Value>,
    request_id: Option<String>,
    first_name: Option<String>,
    other_name: Option<String>,
    surname: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandRecordType {
    Open,
    Fund,
    Transfer,
    Balance,
    Account,
}

impl TryFrom<CommandRecord> for Command {
    type Error = &'static str;
    fn try_from(record: CommandRecord) -> Result<Self, Self::Error> {
        let command = match record.op {
            CommandRecordType::Open => Command::Open(AccountRequest {
                first_name: record.first_name.unwrap_or_default(),
                other_name: record.other_name.unwrap_or_default(),
                surname: record.surname.unwrap_or_default(),
            }),
            CommandRecordType::Fund => Command::Fund {
                account: record.account.ok_or("missing account for fund")?,
                request: AmountRequest {
                    amount: record.amount.ok_or("missing amount for fund")?,
                    request_id: record.request_id.ok_or("missing request_id for fund")?,
                },
            },
            CommandRecordType::Transfer => Command::Transfer {
                from: record.account.ok_or("missing account for transfer")?,
                request: TransferRequest {
                    amount: record.amount.ok_or("missing amount for transfer")?,
                    to: record.to.ok_or("missing destination for transfer")?,
                    request_id: record.request_id.ok_or("missing request_id for transfer")?,
                },
            },
            CommandRecordType::Balance => {
                Command::Balance(record.account.ok_or("missing account for balance")?)
            }
            CommandRecordType::Account => {
                Command::Account(record.account.ok_or("missing account for account")?)
            }
        };

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse, Command, CommandRecord, CommandRecordType, Error};
    use crate::service::{AccountRequest, AmountRequest, TransferRequest};

    const HEADER: &str = "op,account,to,amount,request_id,first_name,other_name,surname";

    #[test]
    // Parsing well-formed data should stream every command, in order.
    fn test_parse_ok() {
        let data = format!(
            "{}\n{}",
            HEADER,
            r#"open,,,,,Ada,,Lovelace
fund,000000001,,10.0,k1
transfer,000000001,000000002,6.5,t1
balance,000000001
account,000000002"#
        );
        let reader = std::io::Cursor::new(data);
        let (commands, errors) = parse(reader);

        let commands: Vec<Command> = commands.iter().collect();
        assert_eq!(0, errors.iter().count());
        assert_eq!(
            vec![
                Command::Open(AccountRequest {
                    first_name: "Ada".to_string(),
                    other_name: "".to_string(),
                    surname: "Lovelace".to_string(),
                }),
                Command::Fund {
                    account: "000000001".to_string(),
                    request: AmountRequest {
                        amount: 10.0,
                        request_id: "k1".to_string(),
                    },
                },
                Command::Transfer {
                    from: "000000001".to_string(),
                    request: TransferRequest {
                        amount: 6.5,
                        to: "000000002".to_string(),
                        request_id: "t1".to_string(),
                    },
                },
                Command::Balance("000000001".to_string()),
                Command::Account("000000002".to_string()),
            ],
            commands
        );
    }

    #[test]
    fn test_parse_ok_with_whitespace() {
        let data = format!(
            "{}\n{}",
            HEADER,
            r#"  open ,  ,  ,  ,  , Ada ,  , Lovelace
fund , 000000001 ,   , 10.0 , k1
    balance ,000000001"#
        );
        let reader = std::io::Cursor::new(data);
        let (commands, errors) = parse(reader);

        assert_eq!(3, commands.iter().count());
        assert_eq!(0, errors.iter().count());
    }

    #[test]
    // Bad rows are reported, and don't stop the good ones.
    fn test_parse_invalid_rows() {
        let data = format!(
            "{}\n{}",
            HEADER,
            r#"withdraw,000000001,,1.0,k1
fund,000000001,,,k1
fund,000000001,,abc,k1
balance,000000001"#
        );
        let reader = std::io::Cursor::new(data);
        let (commands, errors) = parse(reader);

        assert_eq!(1, commands.iter().count());

        let errs: Vec<Error> = errors.iter().collect();
        assert_eq!(3, errs.len());
        match &errs[0] {
            Error::Csv(msg) => assert!(msg.contains("unknown variant `withdraw`"), "{:?}", msg),
            _ => panic!("unexpected error"),
        }
        assert_eq!(
            Error::Format("missing amount for fund".to_string()),
            errs[1]
        );
        assert!(matches!(errs[2], Error::Csv(_)));
    }

    #[test]
    // When the records are malformed, they should return an Err.
    fn test_command_record_into_command_invalid_data() {
        let record = CommandRecord {
            op: CommandRecordType::Transfer,
            account: Some("000000001".to_string()),
            to: None,
            amount: Some(1.0),
            request_id: Some("t1".to_string()),
            first_name: None,
            other_name: None,
            surname: None,
        };

        let got = Command::try_from(record);
        assert_eq!(Err("missing destination for transfer"), got);
    }
}
