use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{
    interest::{calc_interest, InterestFrequency},
    time_interval::TimeInterval,
    transaction::Transaction,
};
use crate::errors::Result;

/// What a schedule does on each occurrence.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleKind {
    /// A fixed amount booked directly on `account`.
    Payment { account: String },
    /// A fixed amount moving from `from` into `to`. Only the `to` side is
    /// projected; the opposite leg is registered as its own schedule.
    Transfer { from: String, to: String },
    /// Compounding interest on `account`, seeded with the account balance
    /// observed when the schedule was built.
    Interest {
        account: String,
        rate: f64,
        frequency: InterestFrequency,
        opening_balance: f64,
    },
}

/// A recurring rule: start date, amount and a parsed recurrence interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub name: String,
    pub amount: f64,
    pub started: NaiveDate,
    pub repeat_str: String,
    repeat: TimeInterval,
    pub kind: ScheduleKind,
}

impl Schedule {
    fn build(
        name: impl Into<String>,
        repeat_str: impl Into<String>,
        amount: f64,
        started: NaiveDate,
        kind: ScheduleKind,
    ) -> Result<Self> {
        let repeat_str = repeat_str.into();
        let repeat = TimeInterval::parse(&repeat_str)?;
        Ok(Self {
            name: name.into(),
            amount,
            started,
            repeat_str,
            repeat,
            kind,
        })
    }

    pub fn payment(
        name: impl Into<String>,
        account: impl Into<String>,
        repeat_str: impl Into<String>,
        amount: f64,
        started: NaiveDate,
    ) -> Result<Self> {
        let kind = ScheduleKind::Payment {
            account: account.into(),
        };
        Self::build(name, repeat_str, amount, started, kind)
    }

    pub fn transfer(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        repeat_str: impl Into<String>,
        amount: f64,
        started: NaiveDate,
    ) -> Result<Self> {
        let kind = ScheduleKind::Transfer {
            from: from.into(),
            to: to.into(),
        };
        Self::build(name, repeat_str, amount, started, kind)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn interest(
        name: impl Into<String>,
        account: impl Into<String>,
        repeat_str: impl Into<String>,
        rate: f64,
        frequency: InterestFrequency,
        opening_balance: f64,
        started: NaiveDate,
    ) -> Result<Self> {
        let kind = ScheduleKind::Interest {
            account: account.into(),
            rate,
            frequency,
            opening_balance,
        };
        Self::build(name, repeat_str, 0.0, started, kind)
    }

    pub fn repeat(&self) -> TimeInterval {
        self.repeat
    }

    /// The account whose ledger receives the projected entries.
    pub fn target(&self) -> &str {
        match &self.kind {
            ScheduleKind::Payment { account } => account,
            ScheduleKind::Transfer { to, .. } => to,
            ScheduleKind::Interest { account, .. } => account,
        }
    }

    /// Every account name the schedule refers to.
    pub fn referenced_accounts(&self) -> Vec<&str> {
        match &self.kind {
            ScheduleKind::Transfer { from, to } => vec![from.as_str(), to.as_str()],
            _ => vec![self.target()],
        }
    }

    /// Occurrence dates from `started`, strictly before `end`.
    pub fn occurrences(&self, end: NaiveDate) -> Occurrences {
        Occurrences {
            next: Some(self.started),
            end,
            repeat: self.repeat,
        }
    }

    /// Lazily projects one transaction per occurrence before `end`.
    pub fn calculate_future_payments(&self, end: NaiveDate) -> ProjectedTransactions<'_> {
        let running_balance = match &self.kind {
            ScheduleKind::Interest {
                opening_balance, ..
            } => *opening_balance,
            _ => 0.0,
        };
        ProjectedTransactions {
            schedule: self,
            occurrences: self.occurrences(end),
            running_balance,
        }
    }

    fn project(&self, day: NaiveDate, running_balance: &mut f64) -> Transaction {
        let when = NaiveDateTime::new(day, NaiveTime::MIN);
        match &self.kind {
            ScheduleKind::Payment { account } => Transaction::new(
                self.amount,
                format!("Scheduled payment of {} for {}", self.name, account),
                when,
                account.clone(),
                account.clone(),
            ),
            ScheduleKind::Transfer { from, to } => Transaction::new(
                self.amount,
                format!("Transfer from {} to {}", from, to),
                when,
                from.clone(),
                to.clone(),
            ),
            ScheduleKind::Interest {
                account,
                rate,
                frequency,
                ..
            } => {
                let amount = calc_interest(*running_balance, *rate, *frequency);
                *running_balance += amount;
                Transaction::new(
                    amount,
                    format!("Interest on {} from {}", account, self.name),
                    when,
                    self.name.clone(),
                    account.clone(),
                )
            }
        }
    }
}

/// Iterator over the dates a schedule fires on.
#[derive(Debug, Clone)]
pub struct Occurrences {
    next: Option<NaiveDate>,
    end: NaiveDate,
    repeat: TimeInterval,
}

impl Iterator for Occurrences {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next.filter(|day| *day < self.end)?;
        // A step that fails to advance would never reach `end`.
        self.next = self
            .repeat
            .next_date(current)
            .filter(|following| *following > current);
        Some(current)
    }
}

/// Iterator over the transactions a schedule projects.
#[derive(Debug, Clone)]
pub struct ProjectedTransactions<'a> {
    schedule: &'a Schedule,
    occurrences: Occurrences,
    running_balance: f64,
}

impl Iterator for ProjectedTransactions<'_> {
    type Item = Transaction;

    fn next(&mut self) -> Option<Transaction> {
        let day = self.occurrences.next()?;
        Some(self.schedule.project(day, &mut self.running_balance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::BudgetError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monthly_payment_fires_before_end() {
        let schedule = Schedule::payment("Rent", "checking", "monthly", -50.0, date(2024, 1, 1)).unwrap();
        let days: Vec<NaiveDate> = schedule.occurrences(date(2024, 4, 1)).collect();
        assert_eq!(days, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);

        let projected: Vec<Transaction> = schedule.calculate_future_payments(date(2024, 4, 1)).collect();
        assert_eq!(projected.len(), 3);
        assert!(projected.iter().all(|txn| txn.amount == -50.0));
        assert_eq!(projected[0].description, "Scheduled payment of Rent for checking");
        assert_eq!(projected[0].from, "checking");
        assert_eq!(projected[0].to, "checking");
        assert_eq!(projected[2].when, date(2024, 3, 1).and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn end_on_or_before_start_yields_nothing() {
        let schedule = Schedule::payment("Gym", "checking", "weekly", -20.0, date(2024, 6, 1)).unwrap();
        assert_eq!(schedule.occurrences(date(2024, 6, 1)).count(), 0);
        assert_eq!(schedule.occurrences(date(2024, 5, 1)).count(), 0);
        assert_eq!(schedule.occurrences(date(2024, 6, 2)).count(), 1);
    }

    #[test]
    fn cumulative_month_steps_keep_the_clamped_day() {
        let schedule = Schedule::payment("Card", "checking", "monthly", -10.0, date(2023, 1, 31)).unwrap();
        let days: Vec<NaiveDate> = schedule.occurrences(date(2023, 5, 1)).collect();
        assert_eq!(
            days,
            vec![date(2023, 1, 31), date(2023, 2, 28), date(2023, 3, 28), date(2023, 4, 28)]
        );
    }

    #[test]
    fn transfer_labels_both_accounts() {
        let schedule =
            Schedule::transfer("Loan", "checking", "Loan", "bi-weekly", 75.0, date(2024, 1, 5)).unwrap();
        assert_eq!(schedule.target(), "Loan");
        assert_eq!(schedule.referenced_accounts(), vec!["checking", "Loan"]);

        let projected: Vec<Transaction> = schedule.calculate_future_payments(date(2024, 2, 1)).collect();
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[1].when.date(), date(2024, 1, 19));
        assert_eq!(projected[0].from, "checking");
        assert_eq!(projected[0].to, "Loan");
        assert_eq!(projected[0].description, "Transfer from checking to Loan");
    }

    #[test]
    fn interest_compounds_on_the_running_balance() {
        let schedule = Schedule::interest(
            "APR",
            "Card",
            "monthly",
            0.24,
            InterestFrequency::Monthly,
            -1000.0,
            date(2024, 1, 1),
        )
        .unwrap();

        let amounts: Vec<f64> = schedule
            .calculate_future_payments(date(2024, 5, 1))
            .map(|txn| txn.amount)
            .collect();
        assert_eq!(amounts.len(), 4);

        let mut balance = -1000.0;
        for amount in amounts {
            assert_eq!(amount, calc_interest(balance, 0.24, InterestFrequency::Monthly));
            balance += amount;
        }
        assert!(balance < -1080.0);
    }

    #[test]
    fn invalid_tokens_fail_at_construction() {
        let err = Schedule::payment("Bad", "checking", "every other tuesday", 1.0, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, BudgetError::InvalidSchedule(_)));
        assert!(Schedule::transfer("Zero", "a", "b", "0 months", 1.0, date(2024, 1, 1)).is_err());
    }
}
