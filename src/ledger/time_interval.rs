use std::{fmt, str::FromStr};

use chrono::{Days, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::BudgetError;

static COUNTED_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s+(day|week|month|year)s?$").expect("recurrence token pattern is valid")
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

impl TimeUnit {
    fn name(self) -> &'static str {
        match self {
            TimeUnit::Day => "Day",
            TimeUnit::Week => "Week",
            TimeUnit::Month => "Month",
            TimeUnit::Year => "Year",
        }
    }
}

/// A strictly positive calendar step such as "2 weeks" or "1 month".
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeInterval {
    pub every: u32,
    pub unit: TimeUnit,
}

impl TimeInterval {
    pub fn new(every: u32, unit: TimeUnit) -> Result<Self, BudgetError> {
        if every == 0 {
            return Err(BudgetError::InvalidSchedule(format!(
                "interval must be at least one {}",
                unit.name().to_lowercase()
            )));
        }
        Ok(Self { every, unit })
    }

    /// Parses a recurrence token.
    ///
    /// Accepts `N days|weeks|months|years` (singular too), `daily`, `weekly`,
    /// `bi-weekly`, `monthly`, `yearly` and `annually`, ignoring case and
    /// surrounding whitespace.
    pub fn parse(token: &str) -> Result<Self, BudgetError> {
        let normalized = token.trim().to_lowercase();
        let named = match normalized.as_str() {
            "daily" => Some((1, TimeUnit::Day)),
            "weekly" => Some((1, TimeUnit::Week)),
            "bi-weekly" => Some((2, TimeUnit::Week)),
            "monthly" => Some((1, TimeUnit::Month)),
            "yearly" | "annually" => Some((1, TimeUnit::Year)),
            _ => None,
        };
        if let Some((every, unit)) = named {
            return Self::new(every, unit);
        }

        let captures = COUNTED_TOKEN
            .captures(&normalized)
            .ok_or_else(|| BudgetError::InvalidSchedule(format!("unknown schedule: {token}")))?;
        let every: u32 = captures[1]
            .parse()
            .map_err(|_| BudgetError::InvalidSchedule(format!("count out of range: {token}")))?;
        let unit = match &captures[2] {
            "day" => TimeUnit::Day,
            "week" => TimeUnit::Week,
            "month" => TimeUnit::Month,
            _ => TimeUnit::Year,
        };
        Self::new(every, unit)
    }

    /// The date one step after `from`, or `None` past the end of the calendar.
    ///
    /// Month and year steps clamp to the last day of the target month, so
    /// Jan 31 + 1 month is Feb 28 (or 29).
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        match self.unit {
            TimeUnit::Day => from.checked_add_days(Days::new(self.every as u64)),
            TimeUnit::Week => from.checked_add_days(Days::new(self.every as u64 * 7)),
            TimeUnit::Month => from.checked_add_months(Months::new(self.every)),
            TimeUnit::Year => {
                let months = self.every.checked_mul(12)?;
                from.checked_add_months(Months::new(months))
            }
        }
    }

    pub fn label(&self) -> String {
        match (self.every, self.unit) {
            (1, TimeUnit::Day) => "Daily".into(),
            (1, TimeUnit::Week) => "Weekly".into(),
            (1, TimeUnit::Month) => "Monthly".into(),
            (1, TimeUnit::Year) => "Yearly".into(),
            (n, unit) => format!("Every {} {}s", n, unit.name()),
        }
    }
}

impl FromStr for TimeInterval {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
