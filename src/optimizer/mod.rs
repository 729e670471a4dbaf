//! Chooses which debts to close first with a fixed amount of cash.

use std::{cmp::Ordering, collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ledger::Debt;

/// What the selection should maximize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitChoice {
    /// Largest total of monthly payments freed up.
    #[default]
    MonthlySavings,
    /// Largest number of debts closed outright.
    MostDebts,
}

impl fmt::Display for FitChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitChoice::MonthlySavings => f.write_str("monthly-savings"),
            FitChoice::MostDebts => f.write_str("most-debts"),
        }
    }
}

/// Totals for a chosen set of debts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitSummary {
    pub cost: f64,
    pub monthly_savings: f64,
    pub closed: usize,
}

impl FitSummary {
    pub fn from_selection(selection: &[Debt]) -> Self {
        Self {
            cost: selection.iter().map(|debt| debt.current_balance).sum(),
            monthly_savings: selection.iter().map(|debt| debt.monthly).sum(),
            closed: selection.len(),
        }
    }
}

/// Picks the debts to pay off with `limit`.
///
/// Only debts with `0 < current_balance <= limit` are considered, ordered by
/// `(current_balance, monthly)`; the result keeps that order and never costs
/// more than `limit`. A non-positive limit selects nothing.
pub fn find_best_fit(debts: &[Debt], limit: f64, choice: FitChoice) -> Vec<Debt> {
    let candidates = payable_debts(debts, limit);
    debug!(
        total = debts.len(),
        payable = candidates.len(),
        limit,
        %choice,
        "selecting debts"
    );
    match choice {
        FitChoice::MonthlySavings => knapsack(&candidates, limit),
        FitChoice::MostDebts => most_debts(&candidates, limit),
    }
}

fn payable_debts(debts: &[Debt], limit: f64) -> Vec<Debt> {
    let mut payable: Vec<Debt> = debts
        .iter()
        .filter(|debt| debt.is_open() && debt.current_balance <= limit)
        .cloned()
        .collect();
    payable.sort_by(by_balance_then_monthly);
    payable
}

fn by_balance_then_monthly(a: &Debt, b: &Debt) -> Ordering {
    a.current_balance
        .total_cmp(&b.current_balance)
        .then(a.monthly.total_cmp(&b.monthly))
}

/// Dense tables above this many cells fall back to a memo over reachable states.
const MAX_TABLE_CELLS: usize = 1 << 24;

/// Slack, in cents, absorbing binary representation error of whole-cent amounts.
const CENT_EPSILON: f64 = 1e-6;

/// 0/1 knapsack over `items` in the given order: weight is the balance, value
/// the monthly payment.
///
/// `best(i, r)` keeps the selection without item `i` unless taking it is
/// strictly better, so among equal-valued selections the one skipping earlier
/// items wins. Amounts are compared in whole cents, balances rounded up and the
/// limit rounded down, so the selection never costs more than `limit`. Items
/// with a non-positive or non-finite balance are never taken.
pub fn knapsack(items: &[Debt], limit: f64) -> Vec<Debt> {
    let Some(capacity) = limit_cents(limit).filter(|cents| *cents > 0) else {
        return Vec::new();
    };
    if items.is_empty() {
        return Vec::new();
    }

    let weights: Vec<Option<u64>> = items
        .iter()
        .map(|item| balance_cents(item.current_balance))
        .collect();
    let unit = weights
        .iter()
        .flatten()
        .fold(0, |acc, weight| gcd(acc, *weight))
        .max(1);
    let weights: Vec<Option<u64>> = weights
        .into_iter()
        .map(|weight| weight.map(|cents| cents / unit))
        .collect();
    // Any capacity covering every item yields the same choices.
    let total = weights
        .iter()
        .flatten()
        .fold(0u64, |acc, weight| acc.saturating_add(*weight));
    let capacity = (capacity / unit).min(total);

    let cells = usize::try_from(capacity)
        .ok()
        .and_then(|capacity| capacity.checked_add(1))
        .and_then(|row| row.checked_mul(items.len()));
    let take = match cells {
        Some(cells) if cells <= MAX_TABLE_CELLS => {
            debug!(items = items.len(), capacity, unit, "knapsack table");
            dense_choices(items, &weights, capacity as usize)
        }
        _ => {
            debug!(items = items.len(), capacity, unit, "knapsack memo");
            sparse_choices(items, &weights, capacity)
        }
    };

    items
        .iter()
        .zip(take)
        .filter(|(_, taken)| *taken)
        .map(|(item, _)| item.clone())
        .collect()
}

fn dense_choices(items: &[Debt], weights: &[Option<u64>], capacity: usize) -> Vec<bool> {
    // values[r] holds best(i + 1, r) before row i is filled and best(i, r) after.
    let mut values = vec![0.0_f64; capacity + 1];
    let mut take = vec![vec![false; capacity + 1]; items.len()];

    for (index, item) in items.iter().enumerate().rev() {
        let Some(weight) = weights[index].map(|weight| weight as usize) else {
            continue;
        };
        if weight > capacity {
            continue;
        }
        for remaining in (weight.max(1)..=capacity).rev() {
            let with_item = values[remaining - weight] + item.monthly;
            if with_item > values[remaining] {
                values[remaining] = with_item;
                take[index][remaining] = true;
            }
        }
    }

    let mut remaining = capacity;
    let mut chosen = vec![false; items.len()];
    for index in 0..items.len() {
        if take[index][remaining] {
            chosen[index] = true;
            remaining -= weights[index].unwrap_or(0) as usize;
        }
    }
    chosen
}

/// Same recurrence as [`dense_choices`], memoized over the `(index, remaining)`
/// states actually reached.
fn sparse_choices(items: &[Debt], weights: &[Option<u64>], capacity: u64) -> Vec<bool> {
    let mut memo = HashMap::new();
    let mut remaining = capacity;
    let mut chosen = vec![false; items.len()];
    for index in 0..items.len() {
        if remaining == 0 {
            break;
        }
        let Some(weight) = weights[index].filter(|weight| *weight <= remaining) else {
            continue;
        };
        let skip = best_value(items, weights, index + 1, remaining, &mut memo);
        let with_item = best_value(items, weights, index + 1, remaining - weight, &mut memo)
            + items[index].monthly;
        if with_item > skip {
            chosen[index] = true;
            remaining -= weight;
        }
    }
    chosen
}

fn best_value(
    items: &[Debt],
    weights: &[Option<u64>],
    index: usize,
    remaining: u64,
    memo: &mut HashMap<(usize, u64), f64>,
) -> f64 {
    if index == items.len() || remaining == 0 {
        return 0.0;
    }
    if let Some(value) = memo.get(&(index, remaining)) {
        return *value;
    }
    let skip = best_value(items, weights, index + 1, remaining, memo);
    let best = match weights[index].filter(|weight| *weight <= remaining) {
        Some(weight) => {
            let with_item =
                best_value(items, weights, index + 1, remaining - weight, memo) + items[index].monthly;
            if with_item > skip {
                with_item
            } else {
                skip
            }
        }
        None => skip,
    };
    memo.insert((index, remaining), best);
    best
}

/// Greedy count maximization: smallest balances first until the next one no
/// longer fits. Closed or negative balances are skipped.
pub fn most_debts(items: &[Debt], limit: f64) -> Vec<Debt> {
    let Some(capacity) = limit_cents(limit) else {
        return Vec::new();
    };

    let mut ordered: Vec<&Debt> = items.iter().filter(|debt| debt.is_open()).collect();
    ordered.sort_by(|a, b| by_balance_then_monthly(a, b));

    let mut spent = 0u64;
    let mut selection = Vec::new();
    for debt in ordered {
        let Some(cost) = balance_cents(debt.current_balance) else {
            continue;
        };
        match spent.checked_add(cost) {
            Some(total) if total <= capacity => spent = total,
            _ => break,
        }
        selection.push(debt.clone());
    }
    selection
}

/// Whole cents available under `limit`, rounded down.
fn limit_cents(limit: f64) -> Option<u64> {
    if !limit.is_finite() || limit <= 0.0 {
        return None;
    }
    Some((limit * 100.0 + CENT_EPSILON).floor() as u64)
}

/// Whole cents needed to close a positive `balance`, rounded up.
fn balance_cents(balance: f64) -> Option<u64> {
    if !balance.is_finite() || balance <= 0.0 {
        return None;
    }
    Some(((balance * 100.0 - CENT_EPSILON).ceil() as u64).max(1))
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}
