use std::collections::BTreeMap;

use chrono::Local;
use engine::{
    BudgetPeriod, BudgetRow, BudgetSummary, Category, Expense, MoneyCents, SpentByCategory,
    budget_rows,
};

use crate::{
    app::Notice,
    client::{FinanceApi, limits_from_views, limits_to_update},
};

/// Which half of the budget section receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetPane {
    Expenses,
    Limits,
}

#[derive(Debug)]
pub struct BudgetState {
    pub period: BudgetPeriod,
    pub limits: BTreeMap<Category, MoneyCents>,
    pub loading: bool,
    /// Copy of the expense manager's collection, refreshed on change events.
    pub expenses: Vec<Expense>,
    pub pane: BudgetPane,
    pub selected: usize,
    /// Input buffer while a limit is being edited.
    pub editing: Option<String>,
    notice: Option<Notice>,
}

impl Default for BudgetState {
    fn default() -> Self {
        Self {
            period: BudgetPeriod::containing(Local::now().date_naive()),
            limits: BTreeMap::new(),
            loading: true,
            expenses: Vec::new(),
            pane: BudgetPane::Expenses,
            selected: 0,
            editing: None,
            notice: None,
        }
    }
}

impl BudgetState {
    pub fn rows(&self) -> Vec<BudgetRow> {
        budget_rows(&self.limits, &SpentByCategory::from_expenses(&self.expenses))
    }

    pub fn summary(&self) -> BudgetSummary {
        BudgetSummary::compute(&self.limits, &self.expenses)
    }

    pub fn undefined_spent(&self) -> MoneyCents {
        SpentByCategory::from_expenses(&self.expenses).undefined
    }

    pub fn on_collection_changed(&mut self, expenses: &[Expense]) {
        self.expenses = expenses.to_vec();
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub async fn load(&mut self, api: &dyn FinanceApi, token: &str) {
        self.loading = true;
        match api
            .get_budgets(token, self.period.month(), self.period.year())
            .await
        {
            Ok(views) => {
                self.limits = limits_from_views(views);
                tracing::info!(period = %self.period.label(), "budget limits loaded");
            }
            Err(err) => {
                tracing::error!(%err, "failed to load budget limits");
                self.notice = Some(Notice::error("Could not load budget limits."));
            }
        }
        self.loading = false;
    }

    pub async fn save(&mut self, api: &dyn FinanceApi, token: &str) {
        let update = limits_to_update(self.period, &self.limits);
        match api.update_budgets(token, &update).await {
            Ok(()) => {
                tracing::info!(period = %self.period.label(), "budget limits saved");
                self.notice = Some(Notice::success("Budget saved."));
            }
            Err(err) => {
                tracing::error!(%err, "failed to save budget limits");
                self.notice = Some(Notice::error("Failed to save budget."));
            }
        }
    }

    pub fn toggle_pane(&mut self) {
        self.pane = match self.pane {
            BudgetPane::Expenses => BudgetPane::Limits,
            BudgetPane::Limits => BudgetPane::Expenses,
        };
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1).min(Category::ALL.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn selected_category(&self) -> Category {
        Category::ALL[self.selected.min(Category::ALL.len() - 1)]
    }

    pub fn begin_edit(&mut self) {
        let current = self
            .limits
            .get(&self.selected_category())
            .copied()
            .unwrap_or_default();
        self.editing = Some(if current.is_zero() {
            String::new()
        } else {
            current.plain()
        });
    }

    /// Stores the edited limit locally. Unparsable input counts as zero.
    pub fn commit_edit(&mut self) {
        let Some(buffer) = self.editing.take() else {
            return;
        };
        let category = self.selected_category();
        self.limits
            .insert(category, MoneyCents::parse_or_zero(&buffer));
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
