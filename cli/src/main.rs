//! Levy command line: a fee-bearing mint over a local ledger file.

mod commands;
mod config;
mod session;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use levy_types::amount::format_ui;
use levy_utils::LogFormat;

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "levy", about = "Transfer-fee token accounting over a local ledger")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// flags and env vars override them.
    #[arg(long, env = "LEVY_CONFIG")]
    config: Option<PathBuf>,

    /// Ledger state file.
    #[arg(long, env = "LEVY_STATE")]
    state: Option<PathBuf>,

    /// Keystore file holding the role key pairs.
    #[arg(long, env = "LEVY_KEYSTORE")]
    keystore: Option<PathBuf>,

    /// Password sealing the keystore entries.
    #[arg(long, env = "LEVY_KEYSTORE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "LEVY_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "LEVY_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate role keys, create the mint, then mint, transfer and withdraw once.
    Setup,
    /// Transfer from the owner to the destination owner.
    Transfer {
        /// Whole tokens; defaults to `transfer_amount` from the config.
        #[arg(long)]
        amount: Option<u64>,
    },
    /// Withdraw withheld fees to the fee vault.
    Withdraw {
        /// Harvest into the mint pool first, then withdraw from the mint.
        #[arg(long)]
        via_mint: bool,
    },
    /// Print the fee charged on a transfer of `amount` whole tokens.
    Quote {
        #[arg(long)]
        amount: u64,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => CliConfig::from_toml_file(path)?,
        None => CliConfig::default(),
    };
    if let Some(state) = cli.state {
        config.state_path = state;
    }
    if let Some(keystore) = cli.keystore {
        config.keystore_path = keystore;
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    levy_utils::init_logging(config.log_format, &config.log_level);
    if let Some(ref path) = cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }
    config.validate()?;

    let password = || {
        cli.password
            .as_deref()
            .context("a keystore password is required (--password or LEVY_KEYSTORE_PASSWORD)")
    };

    match cli.command {
        Command::Setup => {
            let report = commands::setup(&config, password()?)?;
            println!("mint:        {}", report.mint);
            println!("minted:      {}", format_ui(report.minted, report.decimals));
            print_transfer(&report.transfer, report.decimals);
            match report.withdraw {
                Some(batch) => println!(
                    "withdrawn:   {} from {} account(s), tx {}",
                    format_ui(saturate(batch.total), report.decimals),
                    batch.entries.len(),
                    batch.tx
                ),
                None => println!("withdrawn:   nothing"),
            }
        }
        Command::Transfer { amount } => {
            let result = commands::transfer(&config, password()?, amount)?;
            print_transfer(&result, config.decimals);
        }
        Command::Withdraw { via_mint } => match commands::withdraw(&config, password()?, via_mint)? {
            Some(batch) => println!(
                "withdrew {} to {}, tx {}",
                format_ui(saturate(batch.total), config.decimals),
                batch.vault,
                batch.tx
            ),
            None => println!("nothing to withdraw"),
        },
        Command::Quote { amount } => {
            let quote = commands::quote(&config, amount)?;
            println!("amount: {}", format_ui(quote.amount, quote.decimals));
            println!("fee:    {}", format_ui(quote.fee, quote.decimals));
            println!("net:    {}", format_ui(quote.net_amount, quote.decimals));
        }
        Command::Config => print!("{}", config.to_toml_string()?),
    }
    Ok(())
}

fn print_transfer(result: &levy_fee::TransferResult, decimals: u8) {
    println!("transferred: {}", format_ui(result.amount, decimals));
    println!("fee:         {}", format_ui(result.fee, decimals));
    println!("received:    {}", format_ui(result.net_amount, decimals));
    println!("tx:          {}", result.tx);
}

/// Totals are sums over one mint's `u64` amounts.
fn saturate(total: u128) -> u64 {
    u64::try_from(total).unwrap_or(u64::MAX)
}
