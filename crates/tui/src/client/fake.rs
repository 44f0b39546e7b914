//! In-memory [`FinanceApi`] used by the view tests.

use std::{collections::HashMap, sync::Mutex};

use api_types::{
    RecordId,
    budget::{BudgetLimitView, BudgetUpdate},
    chat::ChatReply,
    expense::{CategoryRef, ExpensePayload, ExpenseView},
    profile::ProfileView,
    reward::{Redemption, RewardTotal, RewardView},
};
use async_trait::async_trait;

use super::{ChatUpload, ClientError, ClientResult, FinanceApi, UNKNOWN_ERROR};

#[derive(Default)]
pub(crate) struct FakeState {
    pub expenses: Vec<ExpenseView>,
    pub next_id: u64,
    /// Score the "server" assigns to created expenses.
    pub new_score: Option<f64>,
    pub budgets: Vec<BudgetLimitView>,
    pub saved_budgets: Option<BudgetUpdate>,
    pub profile: ProfileView,
    pub profile_updates: Vec<ProfileView>,
    pub rewards: Vec<RewardView>,
    pub redeemed_total: i64,
    pub chat_reply: String,
    pub chats: Vec<ChatUpload>,
    /// When set, any other token is rejected as unauthorized.
    pub valid_token: Option<String>,
    pub failing: HashMap<&'static str, String>,
    pub calls: Vec<&'static str>,
}

#[derive(Default)]
pub(crate) struct FakeApi {
    pub state: Mutex<FakeState>,
}

impl FakeApi {
    pub fn with(f: impl FnOnce(&mut FakeState)) -> Self {
        let api = Self::default();
        f(&mut api.state.lock().unwrap());
        api
    }

    /// Makes `op` fail with a server error carrying `message`.
    pub fn fail(&self, op: &'static str, message: Option<&str>) {
        self.state.lock().unwrap().failing.insert(
            op,
            message.map_or_else(|| UNKNOWN_ERROR.to_string(), str::to_string),
        );
    }

    pub fn calls(&self, op: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| **c == op)
            .count()
    }

    fn enter(&self, op: &'static str, token: &str) -> ClientResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(op);
        if let Some(valid) = &state.valid_token {
            if valid != token {
                return Err(ClientError::Unauthorized);
            }
        }
        if let Some(message) = state.failing.get(op) {
            return Err(ClientError::Server(message.clone()));
        }
        Ok(state)
    }
}

pub(crate) fn expense_view(
    id: &str,
    name: &str,
    date: &str,
    cost: &str,
    category: Option<&str>,
) -> ExpenseView {
    ExpenseView {
        id: RecordId::from(id),
        name: name.to_string(),
        date: date.parse().unwrap(),
        cost: cost.parse().unwrap(),
        category: category.map(|name| CategoryRef {
            name: name.to_string(),
        }),
        sustainability_score: None,
    }
}

fn view_from_payload(id: RecordId, payload: &ExpensePayload, score: Option<f64>) -> ExpenseView {
    ExpenseView {
        id,
        name: payload.name.clone(),
        date: payload.date,
        cost: payload.cost,
        category: payload
            .category
            .as_ref()
            .map(|name| CategoryRef { name: name.clone() }),
        sustainability_score: score,
    }
}

#[async_trait]
impl FinanceApi for FakeApi {
    async fn get_expenses(&self, token: &str) -> ClientResult<Vec<ExpenseView>> {
        let state = self.enter("get_expenses", token)?;
        Ok(state.expenses.clone())
    }

    async fn add_expense(
        &self,
        token: &str,
        payload: &ExpensePayload,
    ) -> ClientResult<ExpenseView> {
        let mut state = self.enter("add_expense", token)?;
        state.next_id += 1;
        let id = RecordId(format!("srv-{}", state.next_id));
        let view = view_from_payload(id, payload, state.new_score);
        state.expenses.push(view.clone());
        Ok(view)
    }

    async fn update_expense(
        &self,
        token: &str,
        id: &RecordId,
        payload: &ExpensePayload,
    ) -> ClientResult<ExpenseView> {
        let mut state = self.enter("update_expense", token)?;
        let Some(slot) = state.expenses.iter_mut().find(|e| &e.id == id) else {
            return Err(ClientError::NotFound);
        };
        let view = view_from_payload(id.clone(), payload, slot.sustainability_score);
        *slot = view.clone();
        Ok(view)
    }

    async fn delete_expense(&self, token: &str, id: &RecordId) -> ClientResult<()> {
        let mut state = self.enter("delete_expense", token)?;
        let before = state.expenses.len();
        state.expenses.retain(|e| &e.id != id);
        if state.expenses.len() == before {
            return Err(ClientError::NotFound);
        }
        Ok(())
    }

    async fn get_budgets(
        &self,
        token: &str,
        _month: u32,
        _year: i32,
    ) -> ClientResult<Vec<BudgetLimitView>> {
        let state = self.enter("get_budgets", token)?;
        Ok(state.budgets.clone())
    }

    async fn update_budgets(&self, token: &str, update: &BudgetUpdate) -> ClientResult<()> {
        let mut state = self.enter("update_budgets", token)?;
        state.saved_budgets = Some(update.clone());
        Ok(())
    }

    async fn get_profile(&self, token: &str) -> ClientResult<ProfileView> {
        let state = self.enter("get_profile", token)?;
        Ok(state.profile.clone())
    }

    async fn update_profile(
        &self,
        token: &str,
        profile: &ProfileView,
    ) -> ClientResult<ProfileView> {
        let mut state = self.enter("update_profile", token)?;
        state.profile_updates.push(profile.clone());
        state.profile = profile.clone();
        Ok(profile.clone())
    }

    async fn get_rewards(&self, token: &str) -> ClientResult<Vec<RewardView>> {
        let state = self.enter("get_rewards", token)?;
        Ok(state.rewards.clone())
    }

    async fn redeem_reward(&self, token: &str, id: &RecordId) -> ClientResult<Redemption> {
        let mut state = self.enter("redeem_reward", token)?;
        let Some(cost) = state.rewards.iter().find(|r| &r.id == id).map(|r| r.points) else {
            return Err(ClientError::NotFound);
        };
        state.profile.points -= cost;
        state.redeemed_total += 1;
        Ok(Redemption {
            new_points: state.profile.points,
            code: format!("CODE-{id}"),
        })
    }

    async fn get_total_rewards(&self, token: &str) -> ClientResult<RewardTotal> {
        let state = self.enter("get_total_rewards", token)?;
        Ok(RewardTotal {
            total: state.redeemed_total,
        })
    }

    async fn send_chat(&self, token: &str, upload: &ChatUpload) -> ClientResult<ChatReply> {
        let mut state = self.enter("send_chat", token)?;
        state.chats.push(upload.clone());
        Ok(ChatReply {
            reply: state.chat_reply.clone(),
        })
    }
}
