//! Expense manager: load, mutation and filter state over the shared list
//! pipeline.

use api_types::RecordId;
use chrono::Local;
use engine::{
    Category, CategoryFilter, DATE_FORMAT, Expense, ExpenseDraft, ListPage, ListQuery, SortKey,
    eco_points, listing,
};

use crate::{
    app::form::{Form, FormOutcome},
    client::{FinanceApi, expense_from_view, payload_from_valid},
    ui::keymap::AppAction,
};

pub const LOAD_FAILED: &str = "Could not load expenses.";
pub const ADD_FAILED: &str = "Failed to add expense.";
pub const UPDATE_FAILED: &str = "Failed to update expense.";
pub const REMOVE_FAILED: &str = "Failed to remove expense.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed,
}

/// Notifications for observers of the expense collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseEvent {
    CollectionChanged,
    PointsEarned { points: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseModal {
    Add(Form),
    Edit { id: String, form: Form },
    Remove { id: String, name: String },
}

#[derive(Debug)]
pub struct ExpensesState {
    pub items: Vec<Expense>,
    pub load: LoadState,
    pub query: ListQuery,
    /// Row within the visible page.
    pub selected: usize,
    pub modal: Option<ExpenseModal>,
    pub error: Option<String>,
    pub searching: bool,
    events: Vec<ExpenseEvent>,
}

impl Default for ExpensesState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            load: LoadState::Loading,
            query: ListQuery::default(),
            selected: 0,
            modal: None,
            error: None,
            searching: false,
            events: Vec::new(),
        }
    }
}

impl ExpensesState {
    pub fn visible(&self) -> ListPage<'_> {
        listing::apply(&self.items, &self.query)
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        self.visible().items.get(self.selected).copied()
    }

    pub fn drain_events(&mut self) -> Vec<ExpenseEvent> {
        std::mem::take(&mut self.events)
    }

    pub async fn load(&mut self, api: &dyn FinanceApi, token: &str) {
        self.load = LoadState::Loading;
        match api.get_expenses(token).await {
            Ok(views) => {
                self.items = views.into_iter().map(expense_from_view).collect();
                self.load = LoadState::Loaded;
                tracing::info!(count = self.items.len(), "expenses loaded");
            }
            Err(err) => {
                tracing::error!(%err, "failed to load expenses");
                self.items.clear();
                self.load = LoadState::Failed;
            }
        }
        self.settle_page();
        self.events.push(ExpenseEvent::CollectionChanged);
    }

    pub fn open_add(&mut self) {
        self.error = None;
        let draft = ExpenseDraft {
            date: Local::now().date_naive().format(DATE_FORMAT).to_string(),
            ..ExpenseDraft::default()
        };
        self.modal = Some(ExpenseModal::Add(expense_form("Add expense", &draft)));
    }

    pub fn open_edit(&mut self) {
        self.error = None;
        let Some(expense) = self.selected_expense() else {
            return;
        };
        let id = expense.id.clone();
        let form = expense_form("Edit expense", &ExpenseDraft::from_expense(expense));
        self.modal = Some(ExpenseModal::Edit { id, form });
    }

    pub fn open_remove(&mut self) {
        self.error = None;
        let Some(expense) = self.selected_expense() else {
            return;
        };
        self.modal = Some(ExpenseModal::Remove {
            id: expense.id.clone(),
            name: expense.name.clone(),
        });
    }

    /// Routes a key to the open modal. Submitting runs the mutation.
    pub async fn handle_modal_key(
        &mut self,
        action: AppAction,
        api: &dyn FinanceApi,
        token: &str,
    ) {
        let outcome = match self.modal.as_mut() {
            Some(ExpenseModal::Add(form) | ExpenseModal::Edit { form, .. }) => form.handle(action),
            Some(ExpenseModal::Remove { .. }) => match action {
                AppAction::Submit | AppAction::Input('y') => FormOutcome::Submit,
                AppAction::Cancel | AppAction::Input('n') => FormOutcome::Cancel,
                _ => FormOutcome::Edited,
            },
            None => return,
        };
        match outcome {
            FormOutcome::Submit => self.submit(api, token).await,
            FormOutcome::Cancel => self.modal = None,
            FormOutcome::Edited => {}
        }
    }

    /// Validates the open form and applies the mutation. Invalid forms stay
    /// open; otherwise the modal closes whatever the API answers.
    pub async fn submit(&mut self, api: &dyn FinanceApi, token: &str) {
        let Some(modal) = self.modal.take() else {
            return;
        };
        match modal {
            ExpenseModal::Add(mut form) => {
                let valid = match draft_from_form(&form).validate() {
                    Ok(valid) => valid,
                    Err(err) => {
                        form.error = Some(err.to_string());
                        self.modal = Some(ExpenseModal::Add(form));
                        return;
                    }
                };
                match api.add_expense(token, &payload_from_valid(&valid)).await {
                    Ok(view) => {
                        let points = eco_points(view.sustainability_score);
                        let expense = expense_from_view(view);
                        tracing::info!(id = %expense.id, points, "expense added");
                        self.items.push(expense);
                        self.events.push(ExpenseEvent::CollectionChanged);
                        self.events.push(ExpenseEvent::PointsEarned { points });
                    }
                    Err(err) => {
                        tracing::error!(%err, "failed to add expense");
                        self.error = Some(
                            err.server_message()
                                .map_or_else(|| ADD_FAILED.to_string(), str::to_string),
                        );
                    }
                }
            }
            ExpenseModal::Edit { id, mut form } => {
                let valid = match draft_from_form(&form).validate() {
                    Ok(valid) => valid,
                    Err(err) => {
                        form.error = Some(err.to_string());
                        self.modal = Some(ExpenseModal::Edit { id, form });
                        return;
                    }
                };
                let record = RecordId(id.clone());
                match api
                    .update_expense(token, &record, &payload_from_valid(&valid))
                    .await
                {
                    Ok(view) => {
                        let updated = expense_from_view(view);
                        if let Some(slot) = self.items.iter_mut().find(|e| e.id == id) {
                            *slot = updated;
                        }
                        tracing::info!(%id, "expense updated");
                        self.events.push(ExpenseEvent::CollectionChanged);
                    }
                    Err(err) => {
                        tracing::error!(%err, %id, "failed to update expense");
                        self.error = Some(UPDATE_FAILED.to_string());
                    }
                }
            }
            ExpenseModal::Remove { id, .. } => {
                match api.delete_expense(token, &RecordId(id.clone())).await {
                    Ok(()) => {
                        self.items.retain(|e| e.id != id);
                        tracing::info!(%id, "expense removed");
                        self.events.push(ExpenseEvent::CollectionChanged);
                    }
                    Err(err) => {
                        tracing::error!(%err, %id, "failed to remove expense");
                        self.error = Some(REMOVE_FAILED.to_string());
                    }
                }
            }
        }
        self.settle_page();
    }

    pub fn next_page(&mut self) {
        let total = self.visible().total_pages;
        if self.query.go_to_page(self.query.page + 1, total) {
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        let total = self.visible().total_pages;
        if self.query.go_to_page(self.query.page.saturating_sub(1), total) {
            self.selected = 0;
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible().items.len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn push_search(&mut self, ch: char) {
        let mut search = self.query.search.clone();
        search.push(ch);
        self.query.set_search(search);
        self.selected = 0;
    }

    pub fn pop_search(&mut self) {
        let mut search = self.query.search.clone();
        search.pop();
        self.query.set_search(search);
        self.selected = 0;
    }

    pub fn cycle_category(&mut self, forward: bool) {
        let next = if forward {
            self.query.category.next()
        } else {
            self.query.category.prev()
        };
        self.query.set_category(next);
        self.selected = 0;
    }

    pub fn set_category(&mut self, filter: CategoryFilter) {
        self.query.set_category(filter);
        self.selected = 0;
    }

    pub fn cycle_sort_key(&mut self) {
        let next: SortKey = self.query.sort_key.next();
        self.query.set_sort_key(next);
        self.selected = 0;
    }

    pub fn toggle_sort_order(&mut self) {
        let order = self.query.sort_order.toggled();
        self.query.set_sort_order(order);
        self.selected = 0;
    }

    /// Forgets everything held for the signed-out user.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Keeps page and selection inside the current list.
    fn settle_page(&mut self) {
        let total = self.visible().total_pages;
        self.query.clamp_page(total);
        let len = self.visible().items.len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

fn category_options() -> Vec<&'static str> {
    let mut options = vec![""];
    options.extend(Category::ALL.into_iter().map(Category::label));
    options
}

fn expense_form(title: &str, draft: &ExpenseDraft) -> Form {
    Form::new(title)
        .text("Name", draft.name.clone())
        .text("Date", draft.date.clone())
        .text("Cost", draft.cost.clone())
        .choice("Category", category_options(), &draft.category)
}

fn draft_from_form(form: &Form) -> ExpenseDraft {
    ExpenseDraft {
        name: form.value("Name").to_string(),
        date: form.value("Date").to_string(),
        cost: form.value("Cost").to_string(),
        category: form.value("Category").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use engine::{MoneyCents, PAGE_SIZE, SortOrder};

    use super::*;
    use crate::client::fake::{FakeApi, expense_view};

    const TOKEN: &str = "tok";

    fn seeded(count: usize) -> FakeApi {
        FakeApi::with(|state| {
            state.expenses = (1..=count)
                .map(|i| {
                    expense_view(
                        &i.to_string(),
                        &format!("Item {i}"),
                        &format!("2024-01-{:02}", (i % 28) + 1),
                        &format!("{i}.00"),
                        Some("Food & Dining"),
                    )
                })
                .collect();
        })
    }

    fn fill(form: &mut Form, label: &str, value: &str) {
        let field = form.fields.iter_mut().find(|f| f.label == label).unwrap();
        field.value = value.to_string();
    }

    #[tokio::test]
    async fn load_success_and_failure() {
        let api = seeded(3);
        let mut state = ExpensesState::default();
        assert_eq!(state.load, LoadState::Loading);
        state.load(&api, TOKEN).await;
        assert_eq!(state.load, LoadState::Loaded);
        assert_eq!(state.items.len(), 3);
        assert_eq!(state.drain_events(), vec![ExpenseEvent::CollectionChanged]);

        api.fail("get_expenses", None);
        state.load(&api, TOKEN).await;
        assert_eq!(state.load, LoadState::Failed);
        assert!(state.items.is_empty());
        assert_eq!(state.visible().label(), "Page 0 of 0");

        state.open_add();
        state.modal = None;
        assert_eq!(state.load, LoadState::Failed);
    }

    #[tokio::test]
    async fn add_appends_and_reports_points() {
        let api = seeded(12);
        api.state.lock().unwrap().new_score = Some(7.6);
        let mut state = ExpensesState::default();
        state.load(&api, TOKEN).await;
        state.drain_events();

        state.open_add();
        let Some(ExpenseModal::Add(form)) = state.modal.as_mut() else {
            panic!("add modal not open");
        };
        fill(form, "Name", "Recycled paper");
        fill(form, "Date", "2030-01-01");
        fill(form, "Cost", "42");
        fill(form, "Category", "Other");
        state.submit(&api, TOKEN).await;

        assert!(state.modal.is_none());
        assert_eq!(state.items.len(), 13);
        assert_eq!(
            state.drain_events(),
            vec![
                ExpenseEvent::CollectionChanged,
                ExpenseEvent::PointsEarned { points: 8 }
            ]
        );
        let page = state.visible();
        assert_eq!(page.page, 1);
        assert_eq!(page.items[0].name, "Recycled paper");
        assert_eq!(page.items[0].cost, MoneyCents::new(4200));
        assert_eq!(page.items[0].category, Some(Category::Other));
    }

    #[tokio::test]
    async fn invalid_form_stays_open_without_request() {
        let api = seeded(0);
        let mut state = ExpensesState::default();
        state.open_add();
        state.submit(&api, TOKEN).await;
        let Some(ExpenseModal::Add(form)) = &state.modal else {
            panic!("modal should stay open");
        };
        assert_eq!(form.error.as_deref(), Some("name is required"));
        assert_eq!(api.calls("add_expense"), 0);
    }

    #[tokio::test]
    async fn add_failure_uses_server_text_then_fallback() {
        let api = seeded(1);
        let mut state = ExpensesState::default();
        state.load(&api, TOKEN).await;

        api.fail("add_expense", Some("Daily limit reached"));
        state.open_add();
        if let Some(ExpenseModal::Add(form)) = state.modal.as_mut() {
            fill(form, "Name", "Taxi");
            fill(form, "Cost", "9.99");
        }
        state.submit(&api, TOKEN).await;
        assert!(state.modal.is_none());
        assert_eq!(state.error.as_deref(), Some("Daily limit reached"));
        assert_eq!(state.items.len(), 1);

        api.fail("add_expense", None);
        state.open_add();
        assert!(state.error.is_none());
        if let Some(ExpenseModal::Add(form)) = state.modal.as_mut() {
            fill(form, "Name", "Taxi");
            fill(form, "Cost", "9.99");
        }
        state.submit(&api, TOKEN).await;
        assert_eq!(state.error.as_deref(), Some(ADD_FAILED));
    }

    #[tokio::test]
    async fn edit_replaces_by_id() {
        let api = seeded(2);
        let mut state = ExpensesState::default();
        state.load(&api, TOKEN).await;
        state.set_category(CategoryFilter::All);
        state.query.set_sort_key(SortKey::Name);
        state.query.set_sort_order(SortOrder::Ascending);

        state.open_edit();
        let Some(ExpenseModal::Edit { id, form }) = state.modal.as_mut() else {
            panic!("edit modal not open");
        };
        assert_eq!(id.as_str(), "1");
        assert_eq!(form.value("Cost"), "1.00");
        fill(form, "Name", "Groceries");
        fill(form, "Category", "");
        state.submit(&api, TOKEN).await;

        let edited = state.items.iter().find(|e| e.id == "1").unwrap();
        assert_eq!(edited.name, "Groceries");
        assert_eq!(edited.category, None);
        assert_eq!(state.items.len(), 2);
    }

    #[tokio::test]
    async fn failed_update_and_remove_keep_collection() {
        let api = seeded(2);
        let mut state = ExpensesState::default();
        state.load(&api, TOKEN).await;
        let before = state.items.clone();

        api.fail("update_expense", Some("ignored"));
        state.open_edit();
        state.submit(&api, TOKEN).await;
        assert_eq!(state.error.as_deref(), Some(UPDATE_FAILED));

        api.fail("delete_expense", None);
        state.open_remove();
        state.submit(&api, TOKEN).await;
        assert_eq!(state.error.as_deref(), Some(REMOVE_FAILED));
        assert!(state.modal.is_none());
        assert_eq!(state.items, before);
    }

    #[tokio::test]
    async fn removing_last_item_of_last_page_clamps_page() {
        let api = seeded(PAGE_SIZE + 1);
        let mut state = ExpensesState::default();
        state.load(&api, TOKEN).await;
        state.next_page();
        assert_eq!(state.query.page, 2);
        assert_eq!(state.visible().items.len(), 1);

        state.open_remove();
        state.handle_modal_key(AppAction::Input('y'), &api, TOKEN).await;

        let page = state.visible();
        assert_eq!(page.total_pages, 1);
        assert_eq!(state.query.page, 1);
        assert_eq!(page.items.len(), PAGE_SIZE);
    }

    #[tokio::test]
    async fn filter_changes_reset_page() {
        let api = seeded(25);
        let mut state = ExpensesState::default();
        state.load(&api, TOKEN).await;
        state.next_page();
        state.next_page();
        assert_eq!(state.query.page, 3);
        state.next_page();
        assert_eq!(state.query.page, 3);

        state.push_search('1');
        assert_eq!(state.query.page, 1);
        state.next_page();
        state.cycle_sort_key();
        assert_eq!(state.query.page, 1);
        state.next_page();
        state.toggle_sort_order();
        assert_eq!(state.query.page, 1);
        state.cycle_category(true);
        assert_eq!(state.query.category, CategoryFilter::Only(Category::DebtsLoans));
        assert_eq!(state.visible().total_items, 0);
        state.prev_page();
        assert_eq!(state.query.page, 1);
    }

    #[tokio::test]
    async fn cancel_closes_modal_without_request() {
        let api = seeded(1);
        let mut state = ExpensesState::default();
        state.load(&api, TOKEN).await;
        state.open_remove();
        state.handle_modal_key(AppAction::Cancel, &api, TOKEN).await;
        assert!(state.modal.is_none());
        assert_eq!(api.calls("delete_expense"), 0);
    }
}
