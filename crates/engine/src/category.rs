use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Label shown (and matched by filters) for expenses without a category.
pub const UNDEFINED_LABEL: &str = "Undefined";

/// The closed set of spending categories shared by expenses and budgets.
///
/// Declaration order is the display order used by filters, budget rows and
/// breakdowns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Debts & Loans")]
    DebtsLoans,
    #[serde(rename = "Savings & Investments")]
    SavingsInvestments,
    #[serde(rename = "Shopping & Lifestyle")]
    ShoppingLifestyle,
    #[serde(rename = "Food & Dining")]
    FoodDining,
    #[serde(rename = "Health & Wellness")]
    HealthWellness,
    #[serde(rename = "Travel & Leisure")]
    TravelLeisure,
    #[serde(rename = "Education & Self-Development")]
    EducationSelfDevelopment,
    #[serde(rename = "Giving & Charity")]
    GivingCharity,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::DebtsLoans,
        Category::SavingsInvestments,
        Category::ShoppingLifestyle,
        Category::FoodDining,
        Category::HealthWellness,
        Category::TravelLeisure,
        Category::EducationSelfDevelopment,
        Category::GivingCharity,
        Category::Other,
    ];

    /// Canonical name, identical to the one the API uses.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DebtsLoans => "Debts & Loans",
            Self::SavingsInvestments => "Savings & Investments",
            Self::ShoppingLifestyle => "Shopping & Lifestyle",
            Self::FoodDining => "Food & Dining",
            Self::HealthWellness => "Health & Wellness",
            Self::TravelLeisure => "Travel & Leisure",
            Self::EducationSelfDevelopment => "Education & Self-Development",
            Self::GivingCharity => "Giving & Charity",
            Self::Other => "Other",
        }
    }

    /// Label for an optional category, falling back to [`UNDEFINED_LABEL`].
    #[must_use]
    pub fn label_or_undefined(category: Option<Category>) -> &'static str {
        category.map_or(UNDEFINED_LABEL, Category::label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = EngineError;

    /// Exact match on the canonical name, ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label() == trimmed)
            .ok_or_else(|| EngineError::UnknownCategory(trimmed.to_string()))
    }
}

/// Category selector of the expense list.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
    /// Matches expenses with no category.
    Undefined,
}

impl CategoryFilter {
    /// Every selectable filter, in the order a picker cycles through them.
    #[must_use]
    pub fn options() -> Vec<CategoryFilter> {
        let mut options = Vec::with_capacity(Category::ALL.len() + 2);
        options.push(CategoryFilter::All);
        options.extend(Category::ALL.into_iter().map(CategoryFilter::Only));
        options.push(CategoryFilter::Undefined);
        options
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Only(category) => category.label(),
            Self::Undefined => UNDEFINED_LABEL,
        }
    }

    /// Compares labels, so a missing category only matches `Undefined`.
    #[must_use]
    pub fn matches(self, category: Option<Category>) -> bool {
        match self {
            Self::All => true,
            other => Category::label_or_undefined(category) == other.label(),
        }
    }

    /// The filter after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> CategoryFilter {
        let options = Self::options();
        let idx = options.iter().position(|f| *f == self).unwrap_or(0);
        options[(idx + 1) % options.len()]
    }

    /// The filter before this one, wrapping around.
    #[must_use]
    pub fn prev(self) -> CategoryFilter {
        let options = Self::options();
        let idx = options.iter().position(|f| *f == self).unwrap_or(0);
        options[(idx + options.len() - 1) % options.len()]
    }
}
