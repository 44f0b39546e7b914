//! Budget derivation: per-category spend, utilization and totals.
//!
//! Limits are client-held until saved; nothing here talks to the API.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::{Category, EngineError, Expense, MoneyCents, ResultEngine};

/// Month a set of budget limits applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BudgetPeriod {
    month: u32,
    year: i32,
}

impl BudgetPeriod {
    pub fn new(month: u32, year: i32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod(format!(
                "month must be 1-12, got {month}"
            )));
        }
        Ok(Self { month, year })
    }

    /// The period containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    #[must_use]
    pub fn label(self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }
}

/// Spend aggregated by category. Uncategorized spend is kept apart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpentByCategory {
    pub by_category: BTreeMap<Category, MoneyCents>,
    pub undefined: MoneyCents,
}

impl SpentByCategory {
    #[must_use]
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut out = Self::default();
        for expense in expenses {
            match expense.category {
                Some(category) => *out.by_category.entry(category).or_default() += expense.cost,
                None => out.undefined += expense.cost,
            }
        }
        out
    }

    #[must_use]
    pub fn get(&self, category: Category) -> MoneyCents {
        self.by_category.get(&category).copied().unwrap_or_default()
    }
}

/// Percentage of `limit` consumed by `spent`, clamped to `[0, 100]`.
/// A zero or negative limit always yields 0.
#[must_use]
pub fn utilization_percent(spent: MoneyCents, limit: MoneyCents) -> u16 {
    if !limit.is_positive() || !spent.is_positive() {
        return 0;
    }
    let ratio = spent.cents() as f64 / limit.cents() as f64;
    (ratio * 100.0).clamp(0.0, 100.0) as u16
}

/// One rendered row of the budget manager.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetRow {
    pub category: Category,
    pub spent: MoneyCents,
    pub limit: MoneyCents,
    pub percent: u16,
}

/// Rows for every category in fixed order, with limits absent from `limits`
/// treated as zero.
#[must_use]
pub fn budget_rows(
    limits: &BTreeMap<Category, MoneyCents>,
    spent: &SpentByCategory,
) -> Vec<BudgetRow> {
    Category::ALL
        .into_iter()
        .map(|category| {
            let limit = limits.get(&category).copied().unwrap_or_default();
            let spent = spent.get(category);
            BudgetRow {
                category,
                spent,
                limit,
                percent: utilization_percent(spent, limit),
            }
        })
        .collect()
}

/// Totals shown above the budget manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BudgetSummary {
    pub total_budget: MoneyCents,
    pub total_spent: MoneyCents,
    pub remaining: MoneyCents,
}

impl BudgetSummary {
    #[must_use]
    pub fn compute(limits: &BTreeMap<Category, MoneyCents>, expenses: &[Expense]) -> Self {
        let total_budget: MoneyCents = limits.values().sum();
        let total_spent: MoneyCents = expenses.iter().map(|e| e.cost).sum();
        Self {
            total_budget,
            total_spent,
            remaining: total_budget - total_spent,
        }
    }

    #[must_use]
    pub fn overspent(&self) -> bool {
        self.remaining.is_negative()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spend(category: Option<Category>, cents: i64) -> Expense {
        Expense {
            id: cents.to_string(),
            name: "x".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            cost: MoneyCents::new(cents),
            category,
            sustainability_score: None,
        }
    }

    #[test]
    fn utilization_is_clamped() {
        assert_eq!(
            utilization_percent(MoneyCents::new(15_000), MoneyCents::new(10_000)),
            100
        );
        assert_eq!(
            utilization_percent(MoneyCents::new(2_500), MoneyCents::new(10_000)),
            25
        );
        assert_eq!(utilization_percent(MoneyCents::new(500), MoneyCents::ZERO), 0);
        assert_eq!(utilization_percent(MoneyCents::ZERO, MoneyCents::new(100)), 0);
    }

    #[test]
    fn travel_overspend_renders_full_bar() {
        let expenses = vec![spend(Some(Category::TravelLeisure), 15_000)];
        let limits = BTreeMap::from([(Category::TravelLeisure, MoneyCents::new(10_000))]);
        let rows = budget_rows(&limits, &SpentByCategory::from_expenses(&expenses));
        let travel = rows
            .iter()
            .find(|r| r.category == Category::TravelLeisure)
            .unwrap();
        assert_eq!(travel.percent, 100);
        assert_eq!(travel.spent, MoneyCents::new(15_000));
    }

    #[test]
    fn spent_keeps_uncategorized_apart() {
        let expenses = vec![
            spend(Some(Category::Other), 100),
            spend(None, 250),
            spend(Some(Category::Other), 50),
        ];
        let spent = SpentByCategory::from_expenses(&expenses);
        assert_eq!(spent.get(Category::Other), MoneyCents::new(150));
        assert_eq!(spent.undefined, MoneyCents::new(250));
        assert_eq!(spent.get(Category::FoodDining), MoneyCents::ZERO);
    }

    #[test]
    fn rows_cover_every_category_in_order() {
        let rows = budget_rows(&BTreeMap::new(), &SpentByCategory::default());
        let categories: Vec<Category> = rows.iter().map(|r| r.category).collect();
        assert_eq!(categories, Category::ALL.to_vec());
        assert!(rows.iter().all(|r| r.percent == 0));
    }

    #[test]
    fn summary_totals_and_overspent() {
        let limits = BTreeMap::from([
            (Category::FoodDining, MoneyCents::new(10_000)),
            (Category::Other, MoneyCents::new(5_000)),
        ]);
        let expenses = vec![spend(Some(Category::FoodDining), 12_000), spend(None, 4_000)];
        let summary = BudgetSummary::compute(&limits, &expenses);
        assert_eq!(summary.total_budget, MoneyCents::new(15_000));
        assert_eq!(summary.total_spent, MoneyCents::new(16_000));
        assert_eq!(summary.remaining, MoneyCents::new(-1_000));
        assert!(summary.overspent());
    }

    #[test]
    fn period_validation() {
        assert!(BudgetPeriod::new(0, 2024).is_err());
        assert!(BudgetPeriod::new(13, 2024).is_err());
        let period = BudgetPeriod::new(3, 2024).unwrap();
        assert_eq!(period.label(), "03/2024");
        assert_eq!(
            BudgetPeriod::containing(NaiveDate::from_ymd_opt(2025, 11, 30).unwrap()),
            BudgetPeriod::new(11, 2025).unwrap()
        );
    }
}
