//! CSV decoding of debts, expenses and incomes, and CSV reports.
//!
//! Input headers may use either `snake_case` or the title-case names a
//! spreadsheet export produces (`Current Balance`, `Due Date`, ...). Amounts go
//! through [`parse_currency`], dates through the configured format.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::{
    currency::parse_currency,
    errors::{BudgetError, Result},
    ledger::{Account, Debt, Expense, Income, Transaction},
};

#[derive(Debug, Deserialize)]
struct DebtRow {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Current Balance")]
    current_balance: String,
    #[serde(alias = "Monthly")]
    monthly: String,
    #[serde(alias = "Due Date")]
    due_date: String,
    #[serde(alias = "Debt Type")]
    debt_type: String,
}

#[derive(Debug, Deserialize)]
struct ExpenseRow {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Monthly")]
    monthly: String,
    #[serde(alias = "Due Date")]
    due_date: String,
    #[serde(alias = "Expense Type")]
    expense_type: String,
}

#[derive(Debug, Deserialize)]
struct IncomeRow {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Amount")]
    amount: String,
    #[serde(alias = "Pay Date")]
    pay_date: String,
    #[serde(alias = "Income type", alias = "Income Type")]
    income_type: String,
}

#[derive(Debug, Serialize)]
struct BalanceRow {
    date: NaiveDate,
    balance: String,
}

pub fn read_debts<R: Read>(reader: R, date_format: &str) -> Result<Vec<Debt>> {
    read_rows(reader, |row: DebtRow| {
        Ok(Debt {
            current_balance: parse_currency(&row.current_balance)?,
            monthly: parse_currency(&row.monthly)?,
            due_date: parse_date(&row.due_date, date_format)?,
            name: row.name,
            debt_type: row.debt_type,
        })
    })
}

pub fn read_expenses<R: Read>(reader: R, date_format: &str) -> Result<Vec<Expense>> {
    read_rows(reader, |row: ExpenseRow| {
        Ok(Expense {
            monthly: parse_currency(&row.monthly)?,
            due_date: parse_date(&row.due_date, date_format)?,
            name: row.name,
            expense_type: row.expense_type,
        })
    })
}

pub fn read_incomes<R: Read>(reader: R, date_format: &str) -> Result<Vec<Income>> {
    read_rows(reader, |row: IncomeRow| {
        Ok(Income {
            amount: parse_currency(&row.amount)?,
            pay_date: parse_date(&row.pay_date, date_format)?,
            name: row.name,
            income_type: row.income_type,
        })
    })
}

/// Reads transactions previously written by [`write_transactions`].
pub fn read_transactions<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    read_rows(reader, Ok)
}

pub fn load_debts(path: &Path, date_format: &str) -> Result<Vec<Debt>> {
    read_debts(open(path)?, date_format)
}

pub fn load_expenses(path: &Path, date_format: &str) -> Result<Vec<Expense>> {
    read_expenses(open(path)?, date_format)
}

pub fn load_incomes(path: &Path, date_format: &str) -> Result<Vec<Income>> {
    read_incomes(open(path)?, date_format)
}

pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    read_transactions(open(path)?)
}

/// Writes the ledger of `account` in chronological order.
pub fn write_transactions<W: Write>(writer: W, account: &Account) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for txn in account.sorted_transactions() {
        csv.serialize(txn)?;
    }
    csv.flush()?;
    Ok(())
}

/// Writes one `date,balance` row per day that has activity.
pub fn write_balance_sheet<W: Write>(writer: W, account: &Account) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let sheet = account.balance_sheet();
    if sheet.is_empty() {
        csv.write_record(["date", "balance"])?;
    }
    for (date, balance) in sheet {
        csv.serialize(BalanceRow {
            date,
            balance: format!("{balance:.2}"),
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_debts<W: Write>(writer: W, debts: &[Debt]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    if debts.is_empty() {
        csv.write_record(["name", "current_balance", "monthly", "due_date", "debt_type"])?;
    }
    for debt in debts {
        csv.serialize(debt)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn save_transactions(path: &Path, account: &Account) -> Result<()> {
    write_transactions(create(path)?, account)
}

pub fn save_balance_sheet(path: &Path, account: &Account) -> Result<()> {
    write_balance_sheet(create(path)?, account)
}

pub fn save_debts(path: &Path, debts: &[Debt]) -> Result<()> {
    write_debts(create(path)?, debts)
}

fn create(path: &Path) -> Result<File> {
    File::create(path)
        .map_err(|err| BudgetError::StorageError(format!("{}: {err}", path.display())))
}

fn open(path: &Path) -> Result<File> {
    File::open(path)
        .map_err(|err| BudgetError::StorageError(format!("{}: {err}", path.display())))
}

fn read_rows<R, Row, T, F>(reader: R, mut convert: F) -> Result<Vec<T>>
where
    R: Read,
    Row: DeserializeOwned,
    F: FnMut(Row) -> Result<T>,
{
    let mut csv = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();
    for (index, row) in csv.deserialize::<Row>().enumerate() {
        let row_number = index + 1;
        let record = row
            .map_err(BudgetError::from)
            .and_then(&mut convert)
            .map_err(|err| BudgetError::InvalidRecord {
                row: row_number,
                details: match err {
                    BudgetError::InvalidInput(details) | BudgetError::StorageError(details) => details,
                    other => other.to_string(),
                },
            })?;
        records.push(record);
    }
    debug!(rows = records.len(), "decoded csv rows");
    Ok(records)
}

fn parse_date(text: &str, format: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), format)
        .map_err(|err| BudgetError::InvalidInput(format!("bad date `{text}` for format `{format}`: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const US_DATES: &str = "%m/%d/%Y";

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_title_case_debt_export() {
        let data = "Name,Current Balance,Monthly,Due Date,Debt Type\n\
                    Visa,\"$1,250.40\",$45.00,01/15/2024,Credit Card\n\
                    Quick Cash, $300 , $60 ,02/01/2024,Payday Loan\n";
        let debts = read_debts(data.as_bytes(), US_DATES).unwrap();
        assert_eq!(
            debts,
            vec![
                Debt::new("Visa", 1250.40, 45.0, date(2024, 1, 15), "Credit Card"),
                Debt::new("Quick Cash", 300.0, 60.0, date(2024, 2, 1), "Payday Loan"),
            ]
        );
    }

    #[test]
    fn reads_snake_case_expenses_and_incomes() {
        let expenses = "name,monthly,due_date,expense_type\nRent,$1200,03/01/2024,Housing\n";
        let incomes = "Name,Amount,Pay Date,Income type\nPayroll,\"$2,100.00\",03/08/2024,Salary\n";

        let expenses = read_expenses(expenses.as_bytes(), US_DATES).unwrap();
        let incomes = read_incomes(incomes.as_bytes(), US_DATES).unwrap();
        assert_eq!(expenses, vec![Expense::new("Rent", 1200.0, date(2024, 3, 1), "Housing")]);
        assert_eq!(incomes, vec![Income::new("Payroll", 2100.0, date(2024, 3, 8), "Salary")]);
    }

    #[test]
    fn bad_rows_report_their_position() {
        let data = "Name,Current Balance,Monthly,Due Date,Debt Type\n\
                    Visa,$10,$1,01/15/2024,Card\n\
                    Amex,$10,$1,2024-01-15,Card\n";
        let err = read_debts(data.as_bytes(), US_DATES).unwrap_err();
        assert!(matches!(err, BudgetError::InvalidRecord { row: 2, .. }), "{err}");

        let missing = "Name,Monthly\nVisa,$1\n";
        let err = read_debts(missing.as_bytes(), US_DATES).unwrap_err();
        assert!(matches!(err, BudgetError::InvalidRecord { row: 1, .. }), "{err}");
    }

    #[test]
    fn transactions_round_trip_through_csv() {
        let mut account = Account::new("checking");
        let late = date(2024, 2, 1).and_hms_opt(0, 0, 0).unwrap();
        let early = date(2024, 1, 1).and_hms_opt(12, 30, 0).unwrap();
        account.submit_transaction("Me", -20.5, "later", Some(late));
        account.submit_transaction("Me", 100.0, "first", Some(early));

        let mut buffer = Vec::new();
        write_transactions(&mut buffer, &account).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("amount,description,when,from_,to_\n"));

        let loaded = read_transactions(buffer.as_slice()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].description, "first");
        assert_eq!(loaded[1].when, late);
    }

    #[test]
    fn balance_sheet_rows_are_rounded() {
        let mut account = Account::new("checking");
        let day = date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        account.submit_transaction("Me", 10.005, "a", Some(day));
        account.submit_transaction("Me", -3.0, "b", Some(day + chrono::Duration::days(1)));

        let mut buffer = Vec::new();
        write_balance_sheet(&mut buffer, &account).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,balance");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("2024-01-02,7.0"));
    }

    #[test]
    fn empty_outputs_still_have_headers() {
        let mut buffer = Vec::new();
        write_debts(&mut buffer, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "name,current_balance,monthly,due_date,debt_type\n"
        );
    }
}
