use std::path::Path;

use chrono::{Local, NaiveDateTime, NaiveTime};
use tracing::{info, warn};

use super::{output, BalanceSheetArgs, BestFitArgs, ConfigArgs, ForecastArgs};
use crate::{
    config::{Config, ConfigManager},
    currency::format_currency_value,
    errors::{BudgetError, CliError},
    ledger::{planner::plan_budget, Account},
    optimizer::{find_best_fit, FitChoice, FitSummary},
    storage,
};

/// Resolves `--config`, falling back to the user config directory.
pub fn config_manager(path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match path {
        Some(path) => Ok(ConfigManager::with_path(path)),
        None => Ok(ConfigManager::new()?),
    }
}

pub fn forecast(manager: &ConfigManager, args: &ForecastArgs) -> Result<(), CliError> {
    let config = manager.load()?;
    let as_of = args
        .as_of
        .map(|day| NaiveDateTime::new(day, NaiveTime::MIN))
        .unwrap_or_else(|| Local::now().naive_local());
    if args.end_date < as_of.date() {
        warn!(end = %args.end_date, as_of = %as_of.date(), "end date precedes the starting balance");
    }

    let debts = storage::load_debts(&args.debts, &config.date_format)?;
    let expenses = storage::load_expenses(&args.expenses, &config.date_format)?;
    let incomes = storage::load_incomes(&args.incomes, &config.date_format)?;
    info!(
        debts = debts.len(),
        expenses = expenses.len(),
        incomes = incomes.len(),
        "loaded records"
    );

    let budget = plan_budget(
        &config,
        args.starting_balance,
        as_of,
        &expenses,
        &debts,
        &incomes,
    )?;
    let forecasted = budget.forecast_account(&config.checking_account, args.end_date)?;
    storage::save_transactions(&args.output, &forecasted)?;
    info!(
        transactions = forecasted.transactions.len(),
        output = %args.output.display(),
        "forecast written"
    );

    output::section(format!("Forecast through {}", args.end_date));
    output::info(format!(
        "{} transactions written to {}",
        forecasted.transactions.len(),
        args.output.display()
    ));
    output::success(format!(
        "Ending Balance: {}",
        format_currency_value(forecasted.balance(), &config.currency_code())
    ));
    Ok(())
}

pub fn balance_sheet(manager: &ConfigManager, args: &BalanceSheetArgs) -> Result<(), CliError> {
    let config = manager.load()?;
    let transactions = storage::load_transactions(&args.forecast)?;
    let account = Account::with_transactions(config.checking_account.clone(), transactions);
    storage::save_balance_sheet(&args.output, &account)?;

    let days = account.balance_sheet().len();
    info!(days, output = %args.output.display(), "balance sheet written");
    output::success(format!(
        "Balance sheet with {days} days written to {}",
        args.output.display()
    ));
    Ok(())
}

pub fn best_fit(manager: &ConfigManager, args: &BestFitArgs) -> Result<(), CliError> {
    let config = manager.load()?;
    let choice = args.kind.map(FitChoice::from).unwrap_or(config.default_fit);
    let debts = storage::load_debts(&args.debts, &config.date_format)?;
    let currency = config.currency_code();

    let selection = find_best_fit(&debts, args.limit, choice);
    storage::save_debts(&args.output, &selection)?;
    info!(
        selected = selection.len(),
        %choice,
        output = %args.output.display(),
        "best fit written"
    );

    output::section(format!(
        "Best fit for {} ({choice})",
        format_currency_value(args.limit, &currency)
    ));
    if selection.is_empty() {
        warn!(limit = args.limit, "no debt fits the limit");
        output::warning("No debt can be paid off with this limit");
    }
    for debt in &selection {
        output::detail(format!(
            "{:<24} {:>12} {:>10}/mo",
            debt.name,
            format_currency_value(debt.current_balance, &currency),
            format_currency_value(debt.monthly, &currency)
        ));
    }

    let summary = FitSummary::from_selection(&selection);
    output::success(format!(
        "Cost: {}",
        format_currency_value(summary.cost, &currency)
    ));
    output::success(format!(
        "Monthly Savings: {}",
        format_currency_value(summary.monthly_savings, &currency)
    ));
    output::success(format!("Total Closed Debts: {}", summary.closed));
    Ok(())
}

pub fn show_config(manager: &ConfigManager, args: &ConfigArgs) -> Result<(), CliError> {
    if args.init {
        if manager.path().exists() {
            output::warning(format!(
                "{} already exists, leaving it untouched",
                manager.path().display()
            ));
        } else {
            manager.save(&Config::default())?;
            info!(path = %manager.path().display(), "wrote default config");
            output::success(format!("Wrote {}", manager.path().display()));
        }
    }

    let config = manager.load()?;
    let json = serde_json::to_string_pretty(&config).map_err(BudgetError::from)?;
    output::section(format!("Config ({})", manager.path().display()));
    println!("{json}");
    Ok(())
}
