pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Screen, Section};
use components::hints::{KeyHint, common, hint_separator, hints_to_spans};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    match state.screen {
        Screen::Login => screens::login::render(frame, area, state),
        Screen::Home => render_shell(frame, area, state),
    }
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    let content = layout[2];
    if state.session.is_signed_in() {
        match state.section {
            Section::Dashboard => screens::dashboard::render(frame, content, state),
            Section::Budget => screens::budget::render(frame, content, state),
            Section::Rewards => screens::rewards::render(frame, content, state),
            Section::Chatbot => screens::chatbot::render(frame, content, state),
            Section::Profile => screens::profile::render(frame, content, state),
        }
    } else {
        components::modal::render_message(
            frame,
            content,
            "Sign in required",
            &["Please sign in", "", "Enter sign in · q quit"],
            &theme,
        );
    }

    render_bottom_bar(frame, layout[3], state, &theme);

    if let Some(celebration) = state.celebration {
        let earned = format!("You earned {} eco-points!", celebration.points);
        components::modal::render_message(
            frame,
            area,
            "Congratulations!",
            &[earned.as_str(), "", "Enter close"],
            &theme,
        );
    }
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let user = state
        .profile
        .profile
        .as_ref()
        .map(|p| p.name.as_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("-");
    let (status, status_style) = if state.session.is_signed_in() {
        ("signed in", Style::default().fg(theme.positive))
    } else {
        ("signed out", Style::default().fg(theme.warning))
    };

    let line = Line::from(vec![
        Span::styled(" SDG Finance  ", Style::default().fg(theme.accent)),
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Points", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.rewards.points)),
        Span::styled("Server", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.base_url)),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = Vec::new();
    if !state.captures_input() {
        parts.extend(components::tabs::tab_shortcuts(theme));
    }

    let hints = context_hints(state);
    if !hints.is_empty() {
        if !parts.is_empty() {
            parts.push(hint_separator(theme));
        }
        parts.extend(hints_to_spans(&hints, theme));
    }

    parts.push(hint_separator(theme));
    if state.captures_input() {
        parts.push(Span::styled("Ctrl+C", Style::default().fg(theme.accent)));
    } else {
        parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    }
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

/// Keyboard hints for the current section and mode.
fn context_hints(state: &AppState) -> Vec<KeyHint> {
    if !state.session.is_signed_in() {
        return vec![KeyHint::new("Enter", "sign in")];
    }
    match state.section {
        Section::Dashboard => vec![KeyHint::new("r", "refresh")],
        Section::Budget => screens::budget::hints(state),
        Section::Rewards => {
            if state.rewards.redeemed.is_some() {
                vec![KeyHint::new("Enter", "close")]
            } else {
                vec![
                    KeyHint::new("↑↓", "select"),
                    KeyHint::new("Enter", "redeem"),
                    KeyHint::new("r", "refresh"),
                ]
            }
        }
        Section::Chatbot => match state.chat.composing {
            Some(crate::app::chat::ChatInput::Message) => vec![
                KeyHint::new("Enter", "send"),
                KeyHint::new("Esc", "stop typing"),
            ],
            Some(_) => common::text_entry(),
            None => vec![
                KeyHint::new("i", "type"),
                KeyHint::new("g", "image"),
                KeyHint::new("f", "file"),
                KeyHint::new("x", "clear files"),
                KeyHint::new("n", "new chat"),
            ],
        },
        Section::Profile => match &state.profile.modal {
            Some(crate::app::profile::ProfileModal::RemoveGoal { .. }) => common::confirm(),
            Some(_) => common::form_editing(),
            None => vec![
                KeyHint::new("e", "edit profile"),
                KeyHint::new("a", "add goal"),
                KeyHint::new("Enter", "edit goal"),
                KeyHint::new("d", "remove goal"),
                KeyHint::new("o", "sign out"),
            ],
        },
    }
}
