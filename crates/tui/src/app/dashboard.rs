use chrono::NaiveDate;
use engine::{
    Expense, MoneyCents,
    dashboard::{
        RECENT_REWARDS, RECENT_TRANSACTIONS, category_breakdown, recent, spending_by_date,
        total_eco_points,
    },
};

/// Aggregates shown on the dashboard, recomputed whenever the expense
/// collection changes.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub spending: Vec<(NaiveDate, MoneyCents)>,
    pub breakdown: Vec<(&'static str, MoneyCents)>,
    pub recent: Vec<Expense>,
    pub total_points: i64,
    pub recent_rewards: Vec<(Expense, i64)>,
}

impl DashboardState {
    pub fn on_collection_changed(&mut self, expenses: &[Expense]) {
        self.spending = spending_by_date(expenses);
        self.breakdown = category_breakdown(expenses);
        self.recent = recent(expenses, RECENT_TRANSACTIONS)
            .into_iter()
            .cloned()
            .collect();
        self.total_points = total_eco_points(expenses);
        self.recent_rewards = recent(expenses, RECENT_REWARDS)
            .into_iter()
            .map(|e| (e.clone(), e.eco_points()))
            .collect();
    }
}
