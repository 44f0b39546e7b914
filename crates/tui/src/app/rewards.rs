use api_types::reward::RewardView;

use crate::client::FinanceApi;

pub const NOT_ENOUGH_POINTS: &str = "Not enough points to redeem this reward.";
pub const REDEEM_FAILED: &str = "Redeem failed";
pub const LOAD_FAILED: &str = "Failed to load rewards";

/// Shown after a successful redemption until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redeemed {
    pub reward: String,
    pub code: String,
}

#[derive(Debug, Default)]
pub struct RewardsState {
    pub points: i64,
    pub rewards: Vec<RewardView>,
    pub loading: bool,
    /// Load failure; replaces the whole view.
    pub load_error: Option<String>,
    pub error: Option<String>,
    pub selected: usize,
    pub redeemed: Option<Redeemed>,
}

impl RewardsState {
    pub async fn load(&mut self, api: &dyn FinanceApi, token: &str) {
        self.loading = true;
        let (profile, rewards) = tokio::join!(api.get_profile(token), api.get_rewards(token));
        match (profile, rewards) {
            (Ok(profile), Ok(rewards)) => {
                self.points = profile.points;
                self.rewards = rewards;
                self.load_error = None;
                self.selected = self.selected.min(self.rewards.len().saturating_sub(1));
                tracing::info!(count = self.rewards.len(), "rewards loaded");
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::error!(%err, "failed to load rewards");
                self.load_error = Some(
                    err.server_message()
                        .map_or_else(|| LOAD_FAILED.to_string(), str::to_string),
                );
            }
        }
        self.loading = false;
    }

    pub fn selected_reward(&self) -> Option<&RewardView> {
        self.rewards.get(self.selected)
    }

    pub fn can_afford(&self, reward: &RewardView) -> bool {
        self.points >= reward.points
    }

    /// Redeems the selected reward when the balance covers it.
    pub async fn redeem_selected(&mut self, api: &dyn FinanceApi, token: &str) {
        let Some(reward) = self.selected_reward().cloned() else {
            return;
        };
        if !self.can_afford(&reward) {
            self.error = Some(NOT_ENOUGH_POINTS.to_string());
            return;
        }
        match api.redeem_reward(token, &reward.id).await {
            Ok(redemption) => {
                tracing::info!(reward = %reward.id, "reward redeemed");
                self.points = redemption.new_points;
                self.error = None;
                self.redeemed = Some(Redeemed {
                    reward: reward.name,
                    code: redemption.code,
                });
            }
            Err(err) => {
                tracing::error!(%err, reward = %reward.id, "failed to redeem reward");
                self.error = Some(
                    err.server_message()
                        .map_or_else(|| REDEEM_FAILED.to_string(), str::to_string),
                );
            }
        }
    }

    /// Closes the redemption dialog and clears any message.
    pub fn close_dialog(&mut self) {
        self.redeemed = None;
        self.error = None;
    }

    pub fn select_next(&mut self) {
        if self.rewards.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.rewards.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use api_types::{RecordId, profile::ProfileView, reward::RewardView};

    use super::*;
    use crate::client::fake::FakeApi;

    fn catalog(points: i64) -> FakeApi {
        FakeApi::with(|s| {
            s.profile = ProfileView {
                points,
                ..ProfileView::default()
            };
            s.rewards = vec![
                RewardView {
                    id: RecordId::from("1"),
                    name: "Tote bag".to_string(),
                    description: "Organic cotton".to_string(),
                    points: 50,
                    image: None,
                },
                RewardView {
                    id: RecordId::from("2"),
                    name: "Tree planting".to_string(),
                    description: String::new(),
                    points: 500,
                    image: None,
                },
            ];
        })
    }

    #[tokio::test]
    async fn load_joins_profile_and_catalog() {
        let api = catalog(120);
        let mut state = RewardsState::default();
        state.load(&api, "tok").await;
        assert_eq!(state.points, 120);
        assert_eq!(state.rewards.len(), 2);
        assert!(state.load_error.is_none());

        api.fail("get_rewards", None);
        state.load(&api, "tok").await;
        assert_eq!(state.load_error.as_deref(), Some(LOAD_FAILED));

        api.fail("get_rewards", Some("Rewards are unavailable"));
        state.load(&api, "tok").await;
        assert_eq!(state.load_error.as_deref(), Some("Rewards are unavailable"));
    }

    #[tokio::test]
    async fn insufficient_points_skip_the_request() {
        let api = catalog(120);
        let mut state = RewardsState::default();
        state.load(&api, "tok").await;
        state.select_next();
        state.redeem_selected(&api, "tok").await;
        assert_eq!(state.error.as_deref(), Some(NOT_ENOUGH_POINTS));
        assert_eq!(api.calls("redeem_reward"), 0);
    }

    #[tokio::test]
    async fn redeem_updates_points_and_opens_dialog() {
        let api = catalog(120);
        let mut state = RewardsState::default();
        state.load(&api, "tok").await;
        state.redeem_selected(&api, "tok").await;
        assert_eq!(state.points, 70);
        assert_eq!(
            state.redeemed,
            Some(Redeemed {
                reward: "Tote bag".to_string(),
                code: "CODE-1".to_string()
            })
        );
        state.close_dialog();
        assert!(state.redeemed.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn redeem_failure_prefers_server_message() {
        let api = catalog(120);
        let mut state = RewardsState::default();
        state.load(&api, "tok").await;

        api.fail("redeem_reward", Some("Reward out of stock"));
        state.redeem_selected(&api, "tok").await;
        assert_eq!(state.error.as_deref(), Some("Reward out of stock"));

        api.fail("redeem_reward", None);
        state.redeem_selected(&api, "tok").await;
        assert_eq!(state.error.as_deref(), Some(REDEEM_FAILED));
        assert_eq!(state.points, 120);
    }
}
