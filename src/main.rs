use clap::Parser;
use std::{fs::File, io, path::PathBuf};
use transfer_engine::{config::Config, logging, run::run_with_summary};

#[derive(Parser)]
#[command(name = "transfer_engine")]
#[command(about = "Replays a CSV command script against an in-memory ledger")]
struct Cli {
    /// Command script to apply, as CSV.
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,

    /// Where to write the final account balances, as CSV.
    #[arg(short, long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// JSON config file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum wait for an account lock. Overrides the config file.
    #[arg(long, env = "LEDGER_LOCK_TIMEOUT_MS", value_name = "MS")]
    lock_timeout_ms: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    if let Some(lock_timeout_ms) = cli.lock_timeout_ms {
        config = config.with_lock_timeout_ms(lock_timeout_ms).validate()?;
    }

    let input = File::open(&cli.script)?;
    let stdout = io::stdout().lock();

    match &cli.summary {
        Some(path) => run_with_summary(input, stdout, File::create(path)?, &config)?,
        None => run_with_summary(input, stdout, io::sink(), &config)?,
    };

    Ok(())
}
