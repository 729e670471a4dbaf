//! Turns parsed debts, expenses and incomes into accounts and schedules.

use chrono::NaiveDateTime;
use tracing::debug;

use super::{
    account::Account,
    budget::Budget,
    records::{Debt, Expense, Income},
};
use crate::{config::Config, errors::Result};

const OPENING_SOURCE: &str = "Me";
const OPENING_DESCRIPTION: &str = "initial deposit";

/// Builds a budget around a checking account holding `starting_balance` at `as_of`.
pub fn plan_budget(
    config: &Config,
    starting_balance: f64,
    as_of: NaiveDateTime,
    expenses: &[Expense],
    debts: &[Debt],
    incomes: &[Income],
) -> Result<Budget> {
    let mut budget = Budget::new();
    let mut checking = Account::new(config.checking_account.clone());
    checking.submit_transaction(OPENING_SOURCE, starting_balance, OPENING_DESCRIPTION, Some(as_of));
    budget.add_account(checking);

    for expense in expenses {
        register_expense(&mut budget, config, expense)?;
    }
    for debt in debts {
        register_debt(&mut budget, config, debt, as_of)?;
    }
    for income in incomes {
        register_income(&mut budget, config, income)?;
    }

    debug!(
        expenses = expenses.len(),
        debts = debts.len(),
        incomes = incomes.len(),
        "planned budget"
    );
    Ok(budget)
}

/// An expense is a recurring withdrawal from checking.
pub fn register_expense(budget: &mut Budget, config: &Config, expense: &Expense) -> Result<()> {
    budget.add_payment_schedule(
        &expense.name,
        &config.checking_account,
        &config.expense_repeat,
        -expense.monthly,
        expense.due_date,
    )
}

/// A debt gets its own account opened at `-current_balance`, plus two transfer
/// legs: the payment landing on the debt and the same payment leaving checking.
/// Payday loans are paid off on their own cadence.
pub fn register_debt(
    budget: &mut Budget,
    config: &Config,
    debt: &Debt,
    as_of: NaiveDateTime,
) -> Result<()> {
    let checking = config.checking_account.as_str();
    let mut debt_account = Account::new(debt.name.clone());
    debt_account.submit_transaction(
        OPENING_SOURCE,
        -debt.current_balance,
        OPENING_DESCRIPTION,
        Some(as_of),
    );
    budget.add_account(debt_account);

    budget.add_transfer_schedule(
        &debt.name,
        checking,
        &debt.name,
        &config.debt_repeat,
        debt.monthly,
        debt.due_date,
    )?;

    let repayment_repeat = if debt.debt_type == config.payday_loan_type {
        &config.payday_loan_repeat
    } else {
        &config.debt_repeat
    };
    budget.add_transfer_schedule(
        &debt.name,
        &debt.name,
        checking,
        repayment_repeat,
        -debt.monthly,
        debt.due_date,
    )
}

pub fn register_income(budget: &mut Budget, config: &Config, income: &Income) -> Result<()> {
    budget.add_payment_schedule(
        &income.name,
        &config.checking_account,
        &config.income_repeat,
        income.amount,
        income.pay_date,
    )
}
