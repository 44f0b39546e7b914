use api_types::profile::ProfileView;
use engine::{
    EngineError, Goal,
    goals::{with_added, with_removed, with_replaced},
};

use crate::{
    app::form::{Form, FormOutcome},
    client::{FinanceApi, goal_to_view, goals_from_views},
    ui::keymap::AppAction,
};

pub const DEFAULT_AVATAR: &str =
    "https://cdn.pixabay.com/photo/2015/10/05/22/37/blank-profile-picture-973460_960_720.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileModal {
    EditProfile(Form),
    AddGoal(Form),
    EditGoal { index: usize, form: Form },
    RemoveGoal { index: usize },
}

#[derive(Debug, Default)]
pub struct ProfileState {
    pub profile: Option<ProfileView>,
    pub loading: bool,
    pub expense_count: usize,
    pub redeemed_count: i64,
    pub selected_goal: usize,
    pub modal: Option<ProfileModal>,
    pub error: Option<String>,
}

impl ProfileState {
    pub fn goals(&self) -> Vec<Goal> {
        self.profile
            .as_ref()
            .map(|p| goals_from_views(&p.goals))
            .unwrap_or_default()
    }

    pub fn avatar(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.avatar.as_deref())
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(DEFAULT_AVATAR)
    }

    /// Fetches the profile and the two stats. Stat failures leave the stat
    /// at zero.
    pub async fn load(&mut self, api: &dyn FinanceApi, token: &str) {
        self.loading = true;
        match api.get_profile(token).await {
            Ok(profile) => {
                self.profile = Some(profile);
                self.error = None;
            }
            Err(err) => {
                tracing::error!(%err, "failed to fetch profile");
                self.error = Some("Could not load profile.".to_string());
            }
        }
        self.loading = false;

        match api.get_expenses(token).await {
            Ok(expenses) => self.expense_count = expenses.len(),
            Err(err) => tracing::warn!(%err, "failed to fetch expenses for profile stats"),
        }
        match api.get_total_rewards(token).await {
            Ok(total) => self.redeemed_count = total.total,
            Err(err) => tracing::warn!(%err, "failed to fetch redeemed rewards"),
        }
        self.clamp_selection();
    }

    pub fn open_edit_profile(&mut self) {
        let Some(profile) = &self.profile else {
            return;
        };
        let form = Form::new("Edit profile")
            .text("Name", profile.name.clone())
            .text("Email", profile.email.clone())
            .text("Location", profile.location.clone())
            .text("Bio", profile.bio.clone())
            .toggle("Remove picture", false);
        self.modal = Some(ProfileModal::EditProfile(form));
    }

    pub fn open_add_goal(&mut self) {
        if self.profile.is_none() {
            return;
        }
        let form = Form::new("Add goal").text("Title", "").text("Progress", "");
        self.modal = Some(ProfileModal::AddGoal(form));
    }

    pub fn open_edit_goal(&mut self) {
        let index = self.selected_goal;
        let Some(goal) = self.goals().get(index).cloned() else {
            return;
        };
        let form = Form::new("Edit goal")
            .text("Title", goal.title)
            .text("Progress", goal.progress)
            .toggle("Achieved", goal.achieved);
        self.modal = Some(ProfileModal::EditGoal { index, form });
    }

    pub fn open_remove_goal(&mut self) {
        if self.selected_goal < self.goals().len() {
            self.modal = Some(ProfileModal::RemoveGoal {
                index: self.selected_goal,
            });
        }
    }

    pub async fn handle_modal_key(
        &mut self,
        action: AppAction,
        api: &dyn FinanceApi,
        token: &str,
    ) {
        let outcome = match self.modal.as_mut() {
            Some(
                ProfileModal::EditProfile(form)
                | ProfileModal::AddGoal(form)
                | ProfileModal::EditGoal { form, .. },
            ) => form.handle(action),
            Some(ProfileModal::RemoveGoal { .. }) => match action {
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

    /// Applies the open modal. On failure the modal stays open with an
    /// error, except for removal which has nothing to retry.
    pub async fn submit(&mut self, api: &dyn FinanceApi, token: &str) {
        let (Some(modal), Some(profile)) = (self.modal.take(), self.profile.clone()) else {
            return;
        };
        match modal {
            ProfileModal::EditProfile(mut form) => {
                let mut payload = match profile_from_form(&profile, &form) {
                    Ok(payload) => payload,
                    Err(err) => {
                        form.error = Some(err.to_string());
                        self.modal = Some(ProfileModal::EditProfile(form));
                        return;
                    }
                };
                payload.goals = normalized(&payload);
                match api.update_profile(token, &payload).await {
                    Ok(updated) => {
                        tracing::info!("profile updated");
                        self.profile = Some(updated);
                    }
                    Err(err) => {
                        tracing::error!(%err, "failed to update profile");
                        form.error = Some("Failed to update profile.".to_string());
                        self.modal = Some(ProfileModal::EditProfile(form));
                    }
                }
            }
            ProfileModal::AddGoal(mut form) => {
                let goal = match Goal::new(form.value("Title"), form.value("Progress")) {
                    Ok(goal) => goal,
                    Err(err) => {
                        form.error = Some(err.to_string());
                        self.modal = Some(ProfileModal::AddGoal(form));
                        return;
                    }
                };
                let goals = with_added(&goals_from_views(&profile.goals), goal);
                if let Err(message) = self.add_goal(api, token, &profile, &goals).await {
                    form.error = Some(message);
                    self.modal = Some(ProfileModal::AddGoal(form));
                }
            }
            ProfileModal::EditGoal { index, mut form } => {
                let title = form.value("Title").trim().to_string();
                let progress = form.value("Progress").trim().to_string();
                if title.is_empty() || progress.is_empty() {
                    form.error = Some(
                        EngineError::MissingField(if title.is_empty() { "title" } else { "progress" })
                            .to_string(),
                    );
                    self.modal = Some(ProfileModal::EditGoal { index, form });
                    return;
                }
                let goal = Goal {
                    title,
                    progress,
                    achieved: form.checked("Achieved"),
                };
                let result = with_replaced(&goals_from_views(&profile.goals), index, goal);
                let outcome = match result {
                    Ok(goals) => self.send_goals(api, token, &profile, &goals).await,
                    Err(err) => Err(err.to_string()),
                };
                if let Err(message) = outcome {
                    form.error = Some(message);
                    self.modal = Some(ProfileModal::EditGoal { index, form });
                }
            }
            ProfileModal::RemoveGoal { index } => {
                let result = with_removed(&goals_from_views(&profile.goals), index);
                let outcome = match result {
                    Ok(goals) => self.send_goals(api, token, &profile, &goals).await,
                    Err(err) => Err(err.to_string()),
                };
                if let Err(message) = outcome {
                    self.error = Some(message);
                }
            }
        }
        self.clamp_selection();
    }

    /// Saves the new goal list, then re-reads the profile from the server.
    async fn add_goal(
        &mut self,
        api: &dyn FinanceApi,
        token: &str,
        profile: &ProfileView,
        goals: &[Goal],
    ) -> Result<(), String> {
        let payload = ProfileView {
            goals: goals.iter().map(goal_to_view).collect(),
            ..profile.clone()
        };
        let refreshed = match api.update_profile(token, &payload).await {
            Ok(_) => api.get_profile(token).await,
            Err(err) => Err(err),
        };
        match refreshed {
            Ok(fresh) => {
                tracing::info!(goals = fresh.goals.len(), "goal added");
                self.profile = Some(fresh);
                Ok(())
            }
            Err(err) => {
                tracing::error!(%err, "failed to add goal");
                Err("Failed to add goal.".to_string())
            }
        }
    }

    async fn send_goals(
        &mut self,
        api: &dyn FinanceApi,
        token: &str,
        profile: &ProfileView,
        goals: &[Goal],
    ) -> Result<(), String> {
        let payload = ProfileView {
            goals: goals.iter().map(goal_to_view).collect(),
            ..profile.clone()
        };
        match api.update_profile(token, &payload).await {
            Ok(updated) => {
                tracing::info!(goals = updated.goals.len(), "goals updated");
                self.profile = Some(updated);
                Ok(())
            }
            Err(err) => {
                tracing::error!(%err, "failed to update goals");
                Err("Failed to update goals.".to_string())
            }
        }
    }

    pub fn select_next_goal(&mut self) {
        let len = self.goals().len();
        if len > 0 {
            self.selected_goal = (self.selected_goal + 1).min(len - 1);
        }
    }

    pub fn select_prev_goal(&mut self) {
        self.selected_goal = self.selected_goal.saturating_sub(1);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn clamp_selection(&mut self) {
        let len = self.goals().len();
        self.selected_goal = self.selected_goal.min(len.saturating_sub(1));
    }
}

fn normalized(profile: &ProfileView) -> Vec<api_types::profile::GoalView> {
    goals_from_views(&profile.goals)
        .iter()
        .map(goal_to_view)
        .collect()
}

fn profile_from_form(profile: &ProfileView, form: &Form) -> Result<ProfileView, EngineError> {
    let name = form.value("Name").trim();
    let email = form.value("Email").trim();
    let location = form.value("Location").trim();
    for (field, value) in [("name", name), ("email", email), ("location", location)] {
        if value.is_empty() {
            return Err(EngineError::MissingField(field));
        }
    }
    let avatar = if form.checked("Remove picture") {
        Some(DEFAULT_AVATAR.to_string())
    } else {
        profile.avatar.clone()
    };
    Ok(ProfileView {
        name: name.to_string(),
        email: email.to_string(),
        location: location.to_string(),
        bio: form.value("Bio").trim().to_string(),
        avatar,
        ..profile.clone()
    })
}
