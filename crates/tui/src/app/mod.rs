pub mod budget;
pub mod chat;
pub mod dashboard;
pub mod expenses;
pub mod form;
pub mod profile;
pub mod rewards;

use std::{
    collections::VecDeque,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::event::{self, Event, KeyEvent};

use crate::{
    client::{Attachment, Client, ClientError, FinanceApi},
    config::AppConfig,
    error::{AppError, Result},
    session::Session,
    ui::{self, keymap::AppAction},
};

use budget::{BudgetPane, BudgetState};
use chat::{ChatInput, ChatState};
use dashboard::DashboardState;
use expenses::{ExpenseEvent, ExpensesState};
use profile::ProfileState;
use rewards::RewardsState;

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Dashboard,
    Budget,
    Rewards,
    Chatbot,
    Profile,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Dashboard,
        Section::Budget,
        Section::Rewards,
        Section::Chatbot,
        Section::Profile,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Budget => "Budget",
            Self::Rewards => "Rewards",
            Self::Chatbot => "Chatbot",
            Self::Profile => "Profile",
        }
    }

    /// `'1'` selects the first section.
    pub fn from_digit(ch: char) -> Option<Section> {
        let idx = ch.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(idx as usize).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// A short message a view wants shown as a toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub notice: Notice,
    pub expires_at: Instant,
}

/// Eco-points dialog opened after an expense is added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Celebration {
    pub points: i64,
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub token: String,
    pub message: Option<String>,
}

/// Fetches run by the event loop between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Load {
    Expenses,
    Budgets,
    Profile,
    Rewards,
    ChatReply,
}

#[derive(Debug)]
pub struct AppState {
    pub screen: Screen,
    pub section: Section,
    pub login: LoginState,
    pub session: Session,
    pub expenses: ExpensesState,
    pub budget: BudgetState,
    pub dashboard: DashboardState,
    pub profile: ProfileState,
    pub rewards: RewardsState,
    pub chat: ChatState,
    pub celebration: Option<Celebration>,
    pub toast: Option<ToastState>,
    pub base_url: String,
}

impl AppState {
    /// True when typed characters belong to a field of the current section.
    pub fn captures_input(&self) -> bool {
        match self.section {
            Section::Dashboard => false,
            Section::Budget => {
                self.expenses.modal.is_some()
                    || self.expenses.searching
                    || self.budget.editing.is_some()
            }
            Section::Rewards => self.rewards.redeemed.is_some(),
            Section::Chatbot => self.chat.composing.is_some(),
            Section::Profile => self.profile.modal.is_some(),
        }
    }
}

pub struct App {
    config: AppConfig,
    api: Arc<dyn FinanceApi>,
    pub state: AppState,
    pending: VecDeque<Load>,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, session: Session) -> Result<Self> {
        let client = Client::new(
            &config.base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self::with_api(config, session, Arc::new(client)))
    }

    pub fn with_api(config: AppConfig, session: Session, api: Arc<dyn FinanceApi>) -> Self {
        let screen = if session.is_signed_in() {
            Screen::Home
        } else {
            Screen::Login
        };
        let state = AppState {
            screen,
            section: Section::Dashboard,
            login: LoginState::default(),
            session,
            expenses: ExpensesState::default(),
            budget: BudgetState::default(),
            dashboard: DashboardState::default(),
            profile: ProfileState::default(),
            rewards: RewardsState::default(),
            chat: ChatState::default(),
            celebration: None,
            toast: None,
            base_url: config.base_url.clone(),
        };

        let mut app = Self {
            config,
            api,
            state,
            pending: VecDeque::new(),
            should_quit: false,
        };
        if app.state.session.is_signed_in() {
            app.queue_all();
        }
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);
        tracing::info!(base_url = %self.config.base_url, "event loop started");

        while !self.should_quit {
            self.expire_toast();
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if !self.pending.is_empty() {
                self.run_pending().await;
                continue;
            }

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key).await;
                }
            }
        }

        tracing::info!("event loop stopped");
        Ok(())
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn token(&self) -> Option<String> {
        self.state.session.token().map(str::to_string)
    }

    fn queue(&mut self, load: Load) {
        enqueue(&mut self.pending, load);
    }

    fn queue_all(&mut self) {
        for load in [Load::Expenses, Load::Budgets, Load::Profile, Load::Rewards] {
            self.queue(load);
        }
    }

    /// Runs the oldest queued fetch, if any.
    pub async fn run_pending(&mut self) {
        let Some(load) = self.pending.pop_front() else {
            return;
        };
        let Some(token) = self.token() else {
            self.pending.clear();
            return;
        };
        tracing::debug!(?load, "running queued load");
        let api = self.api.as_ref();
        match load {
            Load::Expenses => self.state.expenses.load(api, &token).await,
            Load::Budgets => self.state.budget.load(api, &token).await,
            Load::Profile => self.state.profile.load(api, &token).await,
            Load::Rewards => self.state.rewards.load(api, &token).await,
            Load::ChatReply => self.state.chat.finish_send(api, &token).await,
        }
        self.apply_events();
    }

    /// Runs queued fetches until none are left.
    pub async fn drain_pending(&mut self) {
        while !self.pending.is_empty() {
            self.run_pending().await;
        }
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        let action = ui::keymap::map_key(key);
        self.dispatch(action).await;
    }

    pub async fn dispatch(&mut self, action: AppAction) {
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if self.state.celebration.is_some() {
            if matches!(
                action,
                AppAction::Submit | AppAction::Cancel | AppAction::Input(' ')
            ) {
                self.state.celebration = None;
            }
            return;
        }

        match self.state.screen {
            Screen::Login => self.handle_login_key(action).await,
            Screen::Home => self.handle_home_key(action).await,
        }
        self.apply_events();
    }

    async fn handle_login_key(&mut self, action: AppAction) {
        match action {
            AppAction::Submit => self.attempt_login().await,
            AppAction::Cancel => self.state.screen = Screen::Home,
            AppAction::Backspace => {
                self.state.login.token.pop();
            }
            AppAction::Input(ch) => self.state.login.token.push(ch),
            _ => {}
        }
    }

    async fn attempt_login(&mut self) {
        let token = self.state.login.token.trim().to_string();
        if token.is_empty() {
            self.state.login.message = Some("Enter your access token.".to_string());
            return;
        }

        match self.api.get_profile(&token).await {
            Ok(profile) => {
                tracing::info!("signed in");
                self.state.session = Session::signed_in(token);
                if let Err(err) = self.state.session.save(&self.config.session_file) {
                    tracing::warn!(%err, "could not persist session");
                    self.show(Notice::error("Signed in, but the session was not saved."));
                } else {
                    self.show(Notice::success(format!("Welcome, {}!", profile.name)));
                }
                self.state.login = LoginState::default();
                self.state.screen = Screen::Home;
                self.queue_all();
            }
            Err(err) => {
                tracing::warn!(%err, "sign in rejected");
                self.state.login.message = Some(login_message_for_error(err));
            }
        }
    }

    /// Drops the session and everything loaded for it.
    pub fn sign_out(&mut self) {
        if let Err(err) = self.state.session.clear(&self.config.session_file) {
            tracing::warn!(%err, "could not delete session file");
        }
        self.pending.clear();
        self.state.expenses.reset();
        self.state.budget.reset();
        self.state.dashboard = DashboardState::default();
        self.state.profile.reset();
        self.state.rewards.reset();
        self.state.chat.reset();
        self.state.celebration = None;
        self.state.screen = Screen::Login;
        tracing::info!("signed out");
    }

    async fn handle_home_key(&mut self, action: AppAction) {
        let Some(token) = self.token() else {
            match action {
                AppAction::Submit => self.state.screen = Screen::Login,
                AppAction::Input('q') => self.should_quit = true,
                AppAction::Input(ch) => {
                    if let Some(section) = Section::from_digit(ch) {
                        self.state.section = section;
                    }
                }
                _ => {}
            }
            return;
        };

        if !self.state.captures_input() {
            match action {
                AppAction::Input('q') => {
                    self.should_quit = true;
                    return;
                }
                AppAction::Input(ch @ '1'..='5') => {
                    if let Some(section) = Section::from_digit(ch) {
                        self.state.section = section;
                    }
                    return;
                }
                _ => {}
            }
        }

        match self.state.section {
            Section::Dashboard => {
                if action == AppAction::Input('r') {
                    self.queue(Load::Expenses);
                }
            }
            Section::Budget => self.budget_key(action, &token).await,
            Section::Rewards => self.rewards_key(action, &token).await,
            Section::Chatbot => self.chat_key(action).await,
            Section::Profile => self.profile_key(action, &token).await,
        }
    }

    async fn budget_key(&mut self, action: AppAction, token: &str) {
        let api = self.api.as_ref();
        let expenses = &mut self.state.expenses;
        if expenses.modal.is_some() {
            expenses.handle_modal_key(action, api, token).await;
            return;
        }
        if expenses.searching {
            match action {
                AppAction::Submit | AppAction::Cancel => expenses.searching = false,
                AppAction::Backspace => expenses.pop_search(),
                AppAction::Input(ch) => expenses.push_search(ch),
                _ => {}
            }
            return;
        }

        let budget = &mut self.state.budget;
        if budget.editing.is_some() {
            match action {
                AppAction::Backspace => {
                    if let Some(buffer) = budget.editing.as_mut() {
                        buffer.pop();
                    }
                }
                AppAction::Input(ch) if ch.is_ascii_digit() || ch == '.' || ch == ',' => {
                    if let Some(buffer) = budget.editing.as_mut() {
                        buffer.push(ch);
                    }
                }
                AppAction::Submit => budget.commit_edit(),
                AppAction::Cancel => budget.cancel_edit(),
                _ => {}
            }
            return;
        }

        if action == AppAction::NextField {
            budget.toggle_pane();
            return;
        }

        match budget.pane {
            BudgetPane::Expenses => match action {
                AppAction::Up | AppAction::Input('k') => expenses.select_prev(),
                AppAction::Down | AppAction::Input('j') => expenses.select_next(),
                AppAction::Left | AppAction::Input('p') => expenses.prev_page(),
                AppAction::Right | AppAction::Input('n') => expenses.next_page(),
                AppAction::Input('a') => expenses.open_add(),
                AppAction::Submit | AppAction::Input('e') => expenses.open_edit(),
                AppAction::Input('d') => expenses.open_remove(),
                AppAction::Input('/') => expenses.searching = true,
                AppAction::Input('c') => expenses.cycle_category(true),
                AppAction::Input('C') => expenses.cycle_category(false),
                AppAction::Input('s') => expenses.cycle_sort_key(),
                AppAction::Input('o') => expenses.toggle_sort_order(),
                AppAction::Cancel => expenses.error = None,
                AppAction::Input('r') => {
                    enqueue(&mut self.pending, Load::Expenses);
                    enqueue(&mut self.pending, Load::Budgets);
                }
                _ => {}
            },
            BudgetPane::Limits => match action {
                AppAction::Up | AppAction::Input('k') => budget.select_prev(),
                AppAction::Down | AppAction::Input('j') => budget.select_next(),
                AppAction::Submit | AppAction::Input('e') => budget.begin_edit(),
                AppAction::Input('s') => budget.save(api, token).await,
                AppAction::Input('r') => enqueue(&mut self.pending, Load::Budgets),
                _ => {}
            },
        }
    }

    async fn rewards_key(&mut self, action: AppAction, token: &str) {
        let api = self.api.as_ref();
        let rewards = &mut self.state.rewards;
        if rewards.redeemed.is_some() {
            if matches!(action, AppAction::Submit | AppAction::Cancel) {
                rewards.close_dialog();
            }
            return;
        }
        match action {
            AppAction::Up | AppAction::Input('k') => rewards.select_prev(),
            AppAction::Down | AppAction::Input('j') => rewards.select_next(),
            AppAction::Submit => rewards.redeem_selected(api, token).await,
            AppAction::Cancel => rewards.error = None,
            AppAction::Input('r') => self.queue(Load::Rewards),
            _ => {}
        }
    }

    async fn chat_key(&mut self, action: AppAction) {
        let chat = &mut self.state.chat;
        match chat.composing {
            Some(ChatInput::Message) => match action {
                AppAction::Submit => {
                    if !chat.has_pending() && chat.begin_send() {
                        self.queue(Load::ChatReply);
                    }
                }
                AppAction::Cancel => chat.composing = None,
                AppAction::Backspace => {
                    chat.input.pop();
                }
                AppAction::Input(ch) => chat.input.push(ch),
                _ => {}
            },
            Some(kind) => match action {
                AppAction::Submit => {
                    let path = std::mem::take(&mut chat.path_input);
                    chat.composing = None;
                    match Attachment::read(&path).await {
                        Ok(attachment) => self.state.chat.attach(kind, attachment),
                        Err(err) => {
                            tracing::warn!(%err, %path, "could not read attachment");
                            self.show(Notice::error(format!("Could not read {path}")));
                        }
                    }
                }
                AppAction::Cancel => {
                    chat.path_input.clear();
                    chat.composing = None;
                }
                AppAction::Backspace => {
                    chat.path_input.pop();
                }
                AppAction::Input(ch) => chat.path_input.push(ch),
                _ => {}
            },
            None => match action {
                AppAction::Submit | AppAction::Input('i') => {
                    chat.composing = Some(ChatInput::Message);
                }
                AppAction::Input('g') => chat.composing = Some(ChatInput::ImagePath),
                AppAction::Input('f') => chat.composing = Some(ChatInput::FilePath),
                AppAction::Input('x') => chat.clear_attachments(),
                AppAction::Input('n') => chat.reset_history(),
                _ => {}
            },
        }
    }

    async fn profile_key(&mut self, action: AppAction, token: &str) {
        let api = self.api.as_ref();
        let profile = &mut self.state.profile;
        if profile.modal.is_some() {
            profile.handle_modal_key(action, api, token).await;
            return;
        }
        match action {
            AppAction::Up | AppAction::Input('k') => profile.select_prev_goal(),
            AppAction::Down | AppAction::Input('j') => profile.select_next_goal(),
            AppAction::Input('e') => profile.open_edit_profile(),
            AppAction::Input('a') => profile.open_add_goal(),
            AppAction::Submit => profile.open_edit_goal(),
            AppAction::Input('d') => profile.open_remove_goal(),
            AppAction::Cancel => profile.error = None,
            AppAction::Input('r') => self.queue(Load::Profile),
            AppAction::Input('o') => self.sign_out(),
            _ => {}
        }
    }

    /// Forwards expense events to their observers and collects view notices.
    fn apply_events(&mut self) {
        for event in self.state.expenses.drain_events() {
            match event {
                ExpenseEvent::CollectionChanged => {
                    let items = &self.state.expenses.items;
                    self.state.budget.on_collection_changed(items);
                    self.state.dashboard.on_collection_changed(items);
                }
                ExpenseEvent::PointsEarned { points } => {
                    self.state.celebration = Some(Celebration { points });
                }
            }
        }
        if let Some(notice) = self.state.budget.take_notice() {
            self.show(notice);
        }
    }

    fn show(&mut self, notice: Notice) {
        self.state.toast = Some(ToastState {
            notice,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|t| t.expires_at <= Instant::now())
        {
            self.state.toast = None;
        }
    }
}

fn enqueue(pending: &mut VecDeque<Load>, load: Load) {
    if !pending.contains(&load) {
        pending.push_back(load);
    }
}

fn login_message_for_error(err: ClientError) -> String {
    match err {
        ClientError::Unauthorized | ClientError::Forbidden => {
            "Invalid or expired token.".to_string()
        }
        ClientError::NotFound => "Profile not found.".to_string(),
        ClientError::Conflict(message)
        | ClientError::Validation(message)
        | ClientError::Server(message) => format!("Server error: {message}"),
        ClientError::Transport(err) => format!("Server unreachable: {err}"),
    }
}
