use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single ledger entry.
///
/// A positive `amount` credits the `to` account, a negative one debits it. Accounts
/// are referenced by name only, so a transfer is stored as two separate values,
/// one per ledger (see [`Transaction::flip`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: f64,
    pub description: String,
    pub when: NaiveDateTime,
    #[serde(rename = "from_")]
    pub from: String,
    #[serde(rename = "to_")]
    pub to: String,
}

impl Transaction {
    pub fn new(
        amount: f64,
        description: impl Into<String>,
        when: NaiveDateTime,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            description: description.into(),
            when,
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns the counterpart entry for the other side of a transfer.
    pub fn flip(&self) -> Self {
        Self {
            amount: -self.amount,
            description: self.description.clone(),
            when: self.when,
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    pub fn day(&self) -> NaiveDate {
        self.when.date()
    }

    pub(crate) fn identity_key(&self) -> (NaiveDateTime, u64, &str, &str, &str) {
        (
            self.when,
            self.amount.to_bits(),
            self.description.as_str(),
            self.from.as_str(),
            self.to.as_str(),
        )
    }
}
