use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use kurz::cli::{FetchOptions, parse_date};
use kurz::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct DateArgs {
    /// Date of the exchange rates (YYYY-MM-DD or DD.MM.YYYY), defaults to today
    #[arg(short, long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Days to walk back when no rates are published for the date
    #[arg(short, long)]
    max_attempts: Option<u32>,
}

impl From<DateArgs> for FetchOptions {
    fn from(args: DateArgs) -> FetchOptions {
        FetchOptions {
            date: args.date,
            max_attempts: args.max_attempts,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        amount: f64,
        /// Base currency code, e.g. EUR
        from: String,
        /// Target currency code, e.g. CZK
        to: String,
        #[command(flatten)]
        date: DateArgs,
    },
    /// Display the exchange rate table
    Rates {
        /// Print the table as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        date: DateArgs,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let command = match cli.command {
        Some(Commands::Setup) => {
            let result = kurz::cli::setup::setup();
            if let Err(e) = &result {
                tracing::error!(error = %e, "Setup failed");
            }
            return result;
        }
        Some(Commands::Convert {
            amount,
            from,
            to,
            date,
        }) => kurz::AppCommand::Convert {
            amount,
            from,
            to,
            options: date.into(),
        },
        Some(Commands::Rates { json, date }) => kurz::AppCommand::Rates {
            json,
            options: date.into(),
        },
        None => {
            Cli::command().print_help()?;
            return Ok(());
        }
    };

    let result = kurz::run_command(command, cli.config_path.as_deref()).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
