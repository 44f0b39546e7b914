use chrono::NaiveDate;

use crate::{Category, EngineError, MoneyCents, ResultEngine};

/// Date format used by expense forms and the API.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single recorded expense, as held by a view after a fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: String,
    pub name: String,
    pub date: NaiveDate,
    pub cost: MoneyCents,
    pub category: Option<Category>,
    pub sustainability_score: Option<f64>,
}

impl Expense {
    #[must_use]
    pub fn category_label(&self) -> &'static str {
        Category::label_or_undefined(self.category)
    }

    /// Eco-points earned by this expense: its sustainability score rounded
    /// to the nearest integer, 0 when the score is missing.
    #[must_use]
    pub fn eco_points(&self) -> i64 {
        eco_points(self.sustainability_score)
    }
}

/// Rounds a sustainability score to eco-points (half rounds up).
#[must_use]
pub fn eco_points(score: Option<f64>) -> i64 {
    match score {
        Some(value) if value.is_finite() => (value + 0.5).floor() as i64,
        _ => 0,
    }
}

/// Raw field values of the add/edit expense form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseDraft {
    pub name: String,
    pub date: String,
    pub cost: String,
    /// Empty means no category.
    pub category: String,
}

/// A draft that passed validation and can be sent to the API.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidExpense {
    pub name: String,
    pub date: NaiveDate,
    pub cost: MoneyCents,
    pub category: Option<Category>,
}

impl ExpenseDraft {
    /// Pre-fills the form from an existing expense.
    #[must_use]
    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            name: expense.name.clone(),
            date: expense.date.format(DATE_FORMAT).to_string(),
            cost: expense.cost.plain(),
            category: expense
                .category
                .map(|c| c.label().to_string())
                .unwrap_or_default(),
        }
    }

    /// Checks required fields and parses them.
    pub fn validate(&self) -> ResultEngine<ValidExpense> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(EngineError::MissingField("name"));
        }

        let date_raw = self.date.trim();
        if date_raw.is_empty() {
            return Err(EngineError::MissingField("date"));
        }
        let date = NaiveDate::parse_from_str(date_raw, DATE_FORMAT)
            .map_err(|_| EngineError::InvalidDate(format!("{date_raw} (expected YYYY-MM-DD)")))?;

        if self.cost.trim().is_empty() {
            return Err(EngineError::MissingField("cost"));
        }
        let cost = MoneyCents::parse_nonnegative(&self.cost)?;

        let category = match self.category.trim() {
            "" => None,
            name => Some(name.parse::<Category>()?),
        };

        Ok(ValidExpense {
            name: name.to_string(),
            date,
            cost,
            category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ExpenseDraft {
        ExpenseDraft {
            name: " Lunch ".to_string(),
            date: "2024-06-01".to_string(),
            cost: "12.5".to_string(),
            category: "Food & Dining".to_string(),
        }
    }

    #[test]
    fn validate_parses_fields() {
        let valid = draft().validate().unwrap();
        assert_eq!(valid.name, "Lunch");
        assert_eq!(valid.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(valid.cost, MoneyCents::new(1250));
        assert_eq!(valid.category, Some(Category::FoodDining));
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let mut d = draft();
        d.name = "  ".to_string();
        assert_eq!(d.validate(), Err(EngineError::MissingField("name")));

        let mut d = draft();
        d.cost.clear();
        assert_eq!(d.validate(), Err(EngineError::MissingField("cost")));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut d = draft();
        d.date = "01/06/2024".to_string();
        assert!(matches!(d.validate(), Err(EngineError::InvalidDate(_))));

        let mut d = draft();
        d.cost = "-3".to_string();
        assert!(matches!(d.validate(), Err(EngineError::InvalidAmount(_))));

        let mut d = draft();
        d.category = "Gadgets".to_string();
        assert!(matches!(d.validate(), Err(EngineError::UnknownCategory(_))));
    }

    #[test]
    fn blank_category_is_none() {
        let mut d = draft();
        d.category = String::new();
        assert_eq!(d.validate().unwrap().category, None);
    }

    #[test]
    fn eco_points_round_half_up() {
        assert_eq!(eco_points(Some(41.6)), 42);
        assert_eq!(eco_points(Some(2.5)), 3);
        assert_eq!(eco_points(Some(2.49)), 2);
        assert_eq!(eco_points(None), 0);
        assert_eq!(eco_points(Some(f64::NAN)), 0);
    }

    #[test]
    fn draft_from_expense_round_trips() {
        let expense = Expense {
            id: "1".to_string(),
            name: "Train".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
            cost: MoneyCents::new(4200),
            category: None,
            sustainability_score: None,
        };
        let d = ExpenseDraft::from_expense(&expense);
        assert_eq!(d.date, "2024-01-09");
        assert_eq!(d.cost, "42.00");
        assert!(d.category.is_empty());
        assert_eq!(d.validate().unwrap().cost, expense.cost);
    }
}
