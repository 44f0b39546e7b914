//! Mapping between wire types and engine types.

use std::collections::BTreeMap;

use api_types::{
    budget::{BudgetLimitView, BudgetUpdate},
    expense::{ExpensePayload, ExpenseView},
    profile::GoalView,
};
use engine::{BudgetPeriod, Category, Expense, Goal, MoneyCents, ValidExpense};
use rust_decimal::{Decimal, prelude::ToPrimitive};

/// Rounds to whole cents. Values outside the `i64` range become zero.
pub fn decimal_to_cents(value: Decimal) -> MoneyCents {
    (value * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .map(MoneyCents::new)
        .unwrap_or(MoneyCents::ZERO)
}

pub fn cents_to_decimal(value: MoneyCents) -> Decimal {
    Decimal::new(value.cents(), 2)
}

fn category_from_name(name: &str) -> Option<Category> {
    match name.parse::<Category>() {
        Ok(category) => Some(category),
        Err(err) => {
            tracing::warn!(%err, "treating unrecognised category as undefined");
            None
        }
    }
}

pub fn expense_from_view(view: ExpenseView) -> Expense {
    Expense {
        id: view.id.0,
        name: view.name,
        date: view.date,
        cost: decimal_to_cents(view.cost),
        category: view
            .category
            .as_ref()
            .and_then(|c| category_from_name(&c.name)),
        sustainability_score: view.sustainability_score,
    }
}

pub fn payload_from_valid(expense: &ValidExpense) -> ExpensePayload {
    ExpensePayload {
        name: expense.name.clone(),
        date: expense.date,
        cost: cents_to_decimal(expense.cost),
        category: expense.category.map(|c| c.label().to_string()),
    }
}

pub fn goals_from_views(goals: &[GoalView]) -> Vec<Goal> {
    goals
        .iter()
        .map(|g| Goal {
            title: g.title.clone(),
            progress: g.progress.clone(),
            achieved: g.achieved,
        })
        .collect()
}

pub fn goal_to_view(goal: &Goal) -> GoalView {
    GoalView {
        title: goal.title.clone(),
        progress: goal.progress.clone(),
        achieved: goal.achieved,
    }
}

/// Keeps the last limit seen per known category.
pub fn limits_from_views(views: Vec<BudgetLimitView>) -> BTreeMap<Category, MoneyCents> {
    views
        .into_iter()
        .filter_map(|view| {
            category_from_name(&view.category).map(|c| (c, decimal_to_cents(view.limit)))
        })
        .collect()
}

/// One entry per category, in fixed order. Categories without a limit are
/// sent as zero.
pub fn limits_to_update(
    period: BudgetPeriod,
    limits: &BTreeMap<Category, MoneyCents>,
) -> BudgetUpdate {
    BudgetUpdate {
        month: period.month(),
        year: period.year(),
        budgets: Category::ALL
            .into_iter()
            .map(|category| BudgetLimitView {
                category: category.label().to_string(),
                limit: cents_to_decimal(limits.get(&category).copied().unwrap_or_default()),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use api_types::{RecordId, expense::CategoryRef};
    use chrono::NaiveDate;

    use super::*;

    fn view(category: Option<&str>) -> ExpenseView {
        ExpenseView {
            id: RecordId::from("7"),
            name: "Bus pass".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            cost: Decimal::new(4250, 2),
            category: category.map(|name| CategoryRef {
                name: name.to_string(),
            }),
            sustainability_score: Some(3.6),
        }
    }

    #[test]
    fn expense_maps_cost_and_category() {
        let expense = expense_from_view(view(Some("Travel & Leisure")));
        assert_eq!(expense.id, "7");
        assert_eq!(expense.cost, MoneyCents::new(4250));
        assert_eq!(expense.category, Some(Category::TravelLeisure));
        assert_eq!(expense.eco_points(), 4);
    }

    #[test]
    fn unknown_category_becomes_undefined() {
        let expense = expense_from_view(view(Some("Groceries")));
        assert_eq!(expense.category, None);
        assert_eq!(expense.category_label(), "Undefined");
    }

    #[test]
    fn decimal_rounds_to_cents() {
        assert_eq!(decimal_to_cents(Decimal::new(12345, 3)), MoneyCents::new(1234));
        assert_eq!(decimal_to_cents(Decimal::new(42, 0)), MoneyCents::new(4200));
        assert_eq!(cents_to_decimal(MoneyCents::new(4200)), Decimal::new(4200, 2));
    }

    #[test]
    fn update_lists_every_category() {
        let period = BudgetPeriod::new(6, 2024).unwrap();
        let limits = BTreeMap::from([(Category::FoodDining, MoneyCents::new(30_000))]);
        let update = limits_to_update(period, &limits);
        assert_eq!(update.month, 6);
        assert_eq!(update.budgets.len(), Category::ALL.len());
        let food = update
            .budgets
            .iter()
            .find(|b| b.category == "Food & Dining")
            .unwrap();
        assert_eq!(food.limit, Decimal::new(30_000, 2));
        assert!(
            update
                .budgets
                .iter()
                .filter(|b| b.category != "Food & Dining")
                .all(|b| b.limit.is_zero())
        );
    }

    #[test]
    fn limits_skip_unknown_categories() {
        let limits = limits_from_views(vec![
            BudgetLimitView {
                category: "Other".to_string(),
                limit: Decimal::new(50, 0),
            },
            BudgetLimitView {
                category: "Rent".to_string(),
                limit: Decimal::new(900, 0),
            },
        ]);
        assert_eq!(limits.len(), 1);
        assert_eq!(limits[&Category::Other], MoneyCents::new(5_000));
    }
}
