use std::collections::HashSet;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// A named ledger of transactions.
///
/// `transactions` keeps insertion order; every balance query works on the
/// chronologically sorted view instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Account {
    /// Creates an empty account.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transactions: Vec::new(),
        }
    }

    pub fn with_transactions(name: impl Into<String>, transactions: Vec<Transaction>) -> Self {
        Self {
            name: name.into(),
            transactions,
        }
    }

    /// Transactions ordered by `when`. Entries sharing a timestamp keep their
    /// insertion order.
    pub fn sorted_transactions(&self) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = self.transactions.iter().collect();
        sorted.sort_by_key(|txn| txn.when);
        sorted
    }

    pub fn balance(&self) -> f64 {
        self.sorted_transactions()
            .into_iter()
            .map(|txn| txn.amount)
            .sum()
    }

    /// Sum of every transaction dated on or before `day`.
    pub fn balance_on_day(&self, day: NaiveDate) -> f64 {
        self.sorted_transactions()
            .into_iter()
            .filter(|txn| txn.day() <= day)
            .map(|txn| txn.amount)
            .sum()
    }

    /// One closing balance per distinct transaction day, oldest first.
    ///
    /// Runs a single prefix sum over the sorted ledger, adding amounts in the
    /// same order as [`Account::balance_on_day`], so both agree bit for bit.
    pub fn balance_sheet(&self) -> Vec<(NaiveDate, f64)> {
        let mut sheet: Vec<(NaiveDate, f64)> = Vec::new();
        let mut running = 0.0;
        for txn in self.sorted_transactions() {
            running += txn.amount;
            match sheet.last_mut() {
                Some((day, balance)) if *day == txn.day() => *balance = running,
                _ => sheet.push((txn.day(), running)),
            }
        }
        sheet
    }

    /// Records money arriving from `source`. Without `when` the entry is stamped
    /// with the current local time.
    pub fn submit_transaction(
        &mut self,
        source: impl Into<String>,
        amount: f64,
        description: impl Into<String>,
        when: Option<NaiveDateTime>,
    ) {
        let when = when.unwrap_or_else(now);
        let txn = Transaction::new(amount, description, when, source, self.name.clone());
        self.transactions.push(txn);
    }

    /// Moves `amount` from `from` into this account, writing one entry on each side.
    pub fn transfer_from(
        &mut self,
        from: &mut Account,
        amount: f64,
        description: impl Into<String>,
        when: Option<NaiveDateTime>,
    ) {
        let when = when.unwrap_or_else(now);
        let txn = Transaction::new(amount, description, when, from.name.clone(), self.name.clone());
        from.transactions.push(txn.flip());
        self.transactions.push(txn);
    }

    /// Moves `amount` from this account into `to`, writing one entry on each side.
    pub fn transfer_to(
        &mut self,
        to: &mut Account,
        amount: f64,
        description: impl Into<String>,
        when: Option<NaiveDateTime>,
    ) {
        let when = when.unwrap_or_else(now);
        let txn = Transaction::new(amount, description, when, self.name.clone(), to.name.clone());
        self.transactions.push(txn.flip());
        to.transactions.push(txn);
    }

    /// Returns a new account holding `projected` followed by the current ledger.
    ///
    /// Projected entries already present in this ledger are dropped, which makes
    /// re-forecasting a forecasted account a no-op. `self` is left untouched.
    pub fn forecast(&self, projected: impl IntoIterator<Item = Transaction>) -> Account {
        let existing: HashSet<_> = self
            .transactions
            .iter()
            .map(Transaction::identity_key)
            .collect();

        let mut transactions: Vec<Transaction> = projected
            .into_iter()
            .filter(|txn| !existing.contains(&txn.identity_key()))
            .collect();
        transactions.extend(self.transactions.iter().cloned());

        Account {
            name: self.name.clone(),
            transactions,
        }
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
