//! Reading input records from, and writing reports to, CSV files.

pub mod csv_backend;

pub use csv_backend::{
    load_debts, load_expenses, load_incomes, load_transactions, read_debts, read_expenses,
    read_incomes, read_transactions, save_balance_sheet, save_debts, save_transactions,
    write_balance_sheet, write_debts, write_transactions,
};
