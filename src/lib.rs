#![doc(test(attr(deny(warnings))))]

//! Budgetter forecasts account balances from recurring schedules and picks
//! which debts to pay off first with a fixed amount of cash.
//!
//! The [`ledger`] module holds accounts, transactions and the schedule
//! registry, [`optimizer`] the debt selection, and [`storage`] the CSV
//! readers and writers used by the `budgetter` binary.

pub mod cli;
pub mod config;
pub mod currency;
pub mod errors;
pub mod ledger;
pub mod optimizer;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("budgetter tracing initialized");
    });
}
