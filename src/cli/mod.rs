//! `budgetter` command line: argument parsing and dispatch.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{errors::CliError, optimizer::FitChoice};

#[derive(Debug, Parser)]
#[command(
    name = "budgetter",
    version,
    about = "Forecast account balances and pick which debts to pay off"
)]
pub struct Cli {
    /// Config file to use instead of the one in the user config directory
    #[arg(long, global = true, env = "BUDGETTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only print results and warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Forecast the checking account from debts, expenses and incomes
    Forecast(ForecastArgs),
    /// Summarize a forecast into one balance per day
    BalanceSheet(BalanceSheetArgs),
    /// Choose which debts to close with a lump sum
    BestFit(BestFitArgs),
    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct ForecastArgs {
    /// Debts CSV (name, current balance, monthly, due date, debt type)
    #[arg(short, long)]
    pub debts: PathBuf,

    /// Expenses CSV (name, monthly, due date, expense type)
    #[arg(short, long)]
    pub expenses: PathBuf,

    /// Incomes CSV (name, amount, pay date, income type)
    #[arg(short, long)]
    pub incomes: PathBuf,

    #[arg(short, long, default_value = "output.csv")]
    pub output: PathBuf,

    /// Date of the starting balance, defaults to now
    #[arg(long, value_parser = parse_iso_date)]
    pub as_of: Option<NaiveDate>,

    /// Money in the checking account today
    #[arg(value_parser = parse_starting_balance)]
    pub starting_balance: f64,

    /// Last day to forecast, YYYY-MM-DD
    #[arg(value_parser = parse_iso_date)]
    pub end_date: NaiveDate,
}

#[derive(Debug, Args)]
pub struct BalanceSheetArgs {
    /// Transactions CSV written by `forecast`
    #[arg(short, long)]
    pub forecast: PathBuf,

    #[arg(short, long, default_value = "output.csv")]
    pub output: PathBuf,
}

#[derive(Debug, Args)]
pub struct BestFitArgs {
    #[arg(short, long)]
    pub debts: PathBuf,

    #[arg(short, long, default_value = "best-fit.csv")]
    pub output: PathBuf,

    /// Money available for paying debts off
    #[arg(short, long, allow_negative_numbers = true)]
    pub limit: f64,

    /// What to maximize, defaults to the configured choice
    #[arg(short, long, value_enum)]
    pub kind: Option<FitKind>,
}

/// Command-line spelling of [`FitChoice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FitKind {
    MonthlySavings,
    MostDebts,
}

impl From<FitKind> for FitChoice {
    fn from(kind: FitKind) -> Self {
        match kind {
            FitKind::MonthlySavings => FitChoice::MonthlySavings,
            FitKind::MostDebts => FitChoice::MostDebts,
        }
    }
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write the default configuration if no file exists yet
    #[arg(long)]
    pub init: bool,
}

/// Parses the process arguments and runs the selected command.
pub fn run_cli() -> Result<(), CliError> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    output::set_preferences(output::OutputPreferences {
        quiet_mode: cli.quiet,
    });
    let manager = commands::config_manager(cli.config.as_deref())?;
    match cli.command {
        Commands::Forecast(args) => commands::forecast(&manager, &args),
        Commands::BalanceSheet(args) => commands::balance_sheet(&manager, &args),
        Commands::BestFit(args) => commands::best_fit(&manager, &args),
        Commands::Config(args) => commands::show_config(&manager, &args),
    }
}

fn parse_iso_date(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|err| format!("expected YYYY-MM-DD, got `{text}`: {err}"))
}

fn parse_starting_balance(text: &str) -> Result<f64, String> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| format!("`{text}` is not a number"))?;
    if !value.is_finite() || value < 0.0 {
        return Err(format!("starting balance must be zero or more, got {text}"));
    }
    Ok(value)
}
