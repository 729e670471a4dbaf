use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use tracing::debug;

use super::{
    account::Account,
    interest::InterestFrequency,
    schedule::{Schedule, ScheduleKind},
};
use crate::errors::{BudgetError, Result};

/// Named accounts plus the schedules that feed each of them.
///
/// Schedules are keyed by the name of the account they project into and refer
/// to other accounts by name only; names are resolved when forecasting.
#[derive(Debug, Clone, Default)]
pub struct Budget {
    accounts: BTreeMap<String, Account>,
    payment_schedules: HashMap<String, Vec<Schedule>>,
    transfer_schedules: HashMap<String, Vec<Schedule>>,
    interest_schedules: HashMap<String, Vec<Schedule>>,
}

impl Budget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `account`, replacing any account with the same name.
    pub fn add_account(&mut self, account: Account) {
        self.accounts.insert(account.name.clone(), account);
    }

    pub fn account(&self, name: &str) -> Option<&Account> {
        self.accounts.get(name)
    }

    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    pub fn add_payment_schedule(
        &mut self,
        schedule_name: &str,
        account: &str,
        repeat_str: &str,
        amount: f64,
        start_date: NaiveDate,
    ) -> Result<()> {
        let schedule = Schedule::payment(schedule_name, account, repeat_str, amount, start_date)?;
        self.add_schedule(schedule);
        Ok(())
    }

    /// Registers a transfer projected into the `to` ledger only.
    pub fn add_transfer_schedule(
        &mut self,
        schedule_name: &str,
        from: &str,
        to: &str,
        repeat_str: &str,
        amount: f64,
        start_date: NaiveDate,
    ) -> Result<()> {
        let schedule = Schedule::transfer(schedule_name, from, to, repeat_str, amount, start_date)?;
        self.add_schedule(schedule);
        Ok(())
    }

    /// Registers compounding interest on `account`, seeded with its current balance.
    /// The account must already exist.
    pub fn add_interest_schedule(
        &mut self,
        schedule_name: &str,
        account: &str,
        repeat_str: &str,
        rate: f64,
        frequency: InterestFrequency,
        start_date: NaiveDate,
    ) -> Result<()> {
        let opening_balance = self
            .accounts
            .get(account)
            .map(Account::balance)
            .ok_or_else(|| BudgetError::AccountNotFound(account.to_string()))?;
        let schedule = Schedule::interest(
            schedule_name,
            account,
            repeat_str,
            rate,
            frequency,
            opening_balance,
            start_date,
        )?;
        self.add_schedule(schedule);
        Ok(())
    }

    pub fn add_schedule(&mut self, schedule: Schedule) {
        let registry = match schedule.kind {
            ScheduleKind::Payment { .. } => &mut self.payment_schedules,
            ScheduleKind::Transfer { .. } => &mut self.transfer_schedules,
            ScheduleKind::Interest { .. } => &mut self.interest_schedules,
        };
        registry
            .entry(schedule.target().to_string())
            .or_default()
            .push(schedule);
    }

    /// All schedules projecting into `account_name`: payments, then transfers,
    /// then interest, each in registration order.
    pub fn schedules_for(&self, account_name: &str) -> Vec<&Schedule> {
        [
            &self.payment_schedules,
            &self.transfer_schedules,
            &self.interest_schedules,
        ]
        .into_iter()
        .filter_map(|registry| registry.get(account_name))
        .flatten()
        .collect()
    }

    /// Projects every schedule attached to `account_name` up to `end` (exclusive)
    /// on top of the registered account. The registered account is not modified,
    /// so repeated calls return the same ledger.
    pub fn forecast_account(&self, account_name: &str, end: NaiveDate) -> Result<Account> {
        let account = self
            .accounts
            .get(account_name)
            .ok_or_else(|| BudgetError::AccountNotFound(account_name.to_string()))?;

        let schedules = self.schedules_for(account_name);
        if schedules.is_empty() {
            return Err(BudgetError::NoSchedules(account_name.to_string()));
        }

        for schedule in &schedules {
            if let Some(missing) = schedule
                .referenced_accounts()
                .into_iter()
                .find(|name| !self.accounts.contains_key(*name))
            {
                return Err(BudgetError::AccountNotFound(format!(
                    "{missing} (referenced by schedule `{}`)",
                    schedule.name
                )));
            }
        }

        let mut forecasted = account.clone();
        for schedule in schedules {
            let before = forecasted.transactions.len();
            forecasted = forecasted.forecast(schedule.calculate_future_payments(end));
            debug!(
                account = account_name,
                schedule = %schedule.name,
                repeat = %schedule.repeat(),
                projected = forecasted.transactions.len() - before,
                "expanded schedule"
            );
        }

        Ok(forecasted)
    }
}
