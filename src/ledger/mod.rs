//! Ledger entities, recurrence rules and the forecasting registry.

pub mod account;
pub mod budget;
pub mod interest;
pub mod planner;
pub mod records;
pub mod schedule;
pub mod time_interval;
pub mod transaction;

pub use account::Account;
pub use budget::Budget;
pub use interest::{calc_interest, InterestFrequency};
pub use records::{Debt, Expense, Income};
pub use schedule::{Occurrences, ProjectedTransactions, Schedule, ScheduleKind};
pub use time_interval::{TimeInterval, TimeUnit};
pub use transaction::Transaction;
