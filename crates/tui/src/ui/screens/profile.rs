use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
};

use crate::{
    app::{AppState, profile::ProfileModal},
    ui::{
        components::{
            card::{Card, StatCard},
            modal::{render_confirm, render_form},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let view = &state.profile;

    let Some(profile) = &view.profile else {
        let text = if view.loading {
            "Loading profile…"
        } else {
            view.error.as_deref().unwrap_or("Profile unavailable. Press r to retry.")
        };
        Card::new("Profile", &theme).render_with(
            frame,
            area,
            Paragraph::new(text).style(Style::default().fg(theme.dim)),
        );
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9), // Details
            Constraint::Length(4), // Stats
            Constraint::Min(4),    // Goals
            Constraint::Length(1), // Error
        ])
        .split(area);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.text_muted));
    let member_since = profile
        .created_at
        .map(|at| at.format("%B %Y").to_string())
        .unwrap_or_else(|| "-".to_string());
    let details = vec![
        Line::from(Span::styled(
            profile.name.as_str(),
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![label("Email: "), Span::raw(profile.email.as_str())]),
        Line::from(vec![label("Location: "), Span::raw(profile.location.as_str())]),
        Line::from(vec![label("Member since: "), Span::raw(member_since)]),
        Line::from(vec![label("Picture: "), Span::raw(view.avatar())]),
        Line::from(vec![label("Bio: "), Span::raw(profile.bio.as_str())]),
    ];
    Card::new("Profile", &theme).render_with(
        frame,
        layout[0],
        Paragraph::new(details).wrap(Wrap { trim: true }),
    );

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(layout[1]);
    StatCard::new("Eco-Points", profile.points.to_string(), &theme)
        .color(theme.positive)
        .render(frame, cols[0]);
    StatCard::new("Expenses Logged", view.expense_count.to_string(), &theme)
        .render(frame, cols[1]);
    StatCard::new("Rewards Redeemed", view.redeemed_count.to_string(), &theme)
        .render(frame, cols[2]);

    let goals = view.goals();
    let goals_card = Card::new("Sustainability Goals", &theme).focused(view.modal.is_none());
    if goals.is_empty() {
        goals_card.render_with(
            frame,
            layout[2],
            Paragraph::new("No goals yet. Press a to add one.")
                .style(Style::default().fg(theme.dim)),
        );
    } else {
        let items: Vec<ListItem<'_>> = goals
            .iter()
            .enumerate()
            .map(|(i, goal)| {
                let selected = i == view.selected_goal;
                let mark = if goal.achieved { "[x]" } else { "[ ]" };
                let style = if selected {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{mark} "), Style::default().fg(theme.positive)),
                    Span::styled(goal.title.clone(), style),
                    Span::styled(
                        format!("  {}", goal.progress),
                        Style::default().fg(theme.text_muted),
                    ),
                ]))
            })
            .collect();
        goals_card.render_with(frame, layout[2], List::new(items));
    }

    if let Some(error) = &view.error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(theme.error))),
            layout[3],
        );
    }

    match &view.modal {
        Some(
            ProfileModal::EditProfile(form)
            | ProfileModal::AddGoal(form)
            | ProfileModal::EditGoal { form, .. },
        ) => render_form(frame, area, form, &theme),
        Some(ProfileModal::RemoveGoal { index }) => {
            let title = goals.get(*index).map_or("this goal", |g| g.title.as_str());
            render_confirm(
                frame,
                area,
                "Remove goal",
                &format!("Remove \"{title}\"?"),
                &theme,
            );
        }
        None => {}
    }
}
