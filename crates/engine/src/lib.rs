//! Pure domain logic of the SDG Finance client.
//!
//! Everything here is synchronous and side-effect free: the views in the
//! `tui` crate fetch data, convert it into these types and derive what they
//! render from them.

pub use budget::{BudgetPeriod, BudgetRow, BudgetSummary, SpentByCategory, budget_rows, utilization_percent};
pub use category::{Category, CategoryFilter, UNDEFINED_LABEL};
pub use error::EngineError;
pub use expense::{DATE_FORMAT, Expense, ExpenseDraft, ValidExpense, eco_points};
pub use goals::Goal;
pub use listing::{ListPage, ListQuery, PAGE_SIZE, SortKey, SortOrder};
pub use money::MoneyCents;

pub mod budget;
mod category;
pub mod dashboard;
mod error;
mod expense;
pub mod goals;
pub mod listing;
mod money;

pub type ResultEngine<T> = Result<T, EngineError>;
