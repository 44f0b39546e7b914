//! Aggregations behind the dashboard panels.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{Category, Expense, MoneyCents, UNDEFINED_LABEL};

/// Rows of the recent transactions panel.
pub const RECENT_TRANSACTIONS: usize = 5;
/// Rows of the eco-points panel.
pub const RECENT_REWARDS: usize = 3;

/// Total spend per calendar day, oldest first.
#[must_use]
pub fn spending_by_date(expenses: &[Expense]) -> Vec<(NaiveDate, MoneyCents)> {
    let mut totals: BTreeMap<NaiveDate, MoneyCents> = BTreeMap::new();
    for expense in expenses {
        *totals.entry(expense.date).or_default() += expense.cost;
    }
    totals.into_iter().collect()
}

/// Non-zero spend per category label, in category order with `Undefined`
/// last.
#[must_use]
pub fn category_breakdown(expenses: &[Expense]) -> Vec<(&'static str, MoneyCents)> {
    let mut by_category: BTreeMap<Category, MoneyCents> = BTreeMap::new();
    let mut undefined = MoneyCents::ZERO;
    for expense in expenses {
        match expense.category {
            Some(category) => *by_category.entry(category).or_default() += expense.cost,
            None => undefined += expense.cost,
        }
    }

    let mut out: Vec<(&'static str, MoneyCents)> = by_category
        .into_iter()
        .filter(|(_, total)| !total.is_zero())
        .map(|(category, total)| (category.label(), total))
        .collect();
    if !undefined.is_zero() {
        out.push((UNDEFINED_LABEL, undefined));
    }
    out
}

/// The `limit` most recent expenses, newest first. Same-day expenses keep
/// their collection order.
#[must_use]
pub fn recent(expenses: &[Expense], limit: usize) -> Vec<&Expense> {
    let mut rows: Vec<&Expense> = expenses.iter().collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date));
    rows.truncate(limit);
    rows
}

/// Sum of eco-points across all expenses.
#[must_use]
pub fn total_eco_points(expenses: &[Expense]) -> i64 {
    expenses.iter().map(Expense::eco_points).sum()
}
