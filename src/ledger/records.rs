//! Typed input records. Parsing them out of CSV rows lives in
//! [`crate::storage::csv_backend`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An outstanding debt: what it costs to close and what it costs every month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub name: String,
    pub current_balance: f64,
    pub monthly: f64,
    pub due_date: NaiveDate,
    pub debt_type: String,
}

impl Debt {
    pub fn new(
        name: impl Into<String>,
        current_balance: f64,
        monthly: f64,
        due_date: NaiveDate,
        debt_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current_balance,
            monthly,
            due_date,
            debt_type: debt_type.into(),
        }
    }

    /// A debt with nothing left to pay is already closed.
    pub fn is_open(&self) -> bool {
        self.current_balance > 0.0
    }
}

/// A recurring bill paid out of checking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub name: String,
    pub monthly: f64,
    pub due_date: NaiveDate,
    pub expense_type: String,
}

impl Expense {
    pub fn new(
        name: impl Into<String>,
        monthly: f64,
        due_date: NaiveDate,
        expense_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            monthly,
            due_date,
            expense_type: expense_type.into(),
        }
    }
}

/// A paycheck or other recurring deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub name: String,
    pub amount: f64,
    pub pay_date: NaiveDate,
    pub income_type: String,
}

impl Income {
    pub fn new(
        name: impl Into<String>,
        amount: f64,
        pay_date: NaiveDate,
        income_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            amount,
            pay_date,
            income_type: income_type.into(),
        }
    }
}
