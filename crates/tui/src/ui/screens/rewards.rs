use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            modal::render_message,
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let rewards = &state.rewards;

    if let Some(error) = &rewards.load_error {
        Card::new("Rewards", &theme).render_with(
            frame,
            area,
            Paragraph::new(error.as_str()).style(Style::default().fg(theme.error)),
        );
        return;
    }
    if rewards.loading {
        Card::new("Rewards", &theme).render_with(
            frame,
            area,
            Paragraph::new("Loading rewards…").style(Style::default().fg(theme.dim)),
        );
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Balance
            Constraint::Min(5),    // Catalog
            Constraint::Length(1), // Message
        ])
        .split(area);

    StatCard::new("Your Points", rewards.points.to_string(), &theme)
        .color(theme.positive)
        .subtitle("Earn more by logging sustainable expenses")
        .render(frame, layout[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(layout[1]);

    let items: Vec<ListItem<'_>> = rewards
        .rewards
        .iter()
        .enumerate()
        .map(|(i, reward)| {
            let affordable = rewards.can_afford(reward);
            let marker = if i == rewards.selected { "› " } else { "  " };
            let name_style = if i == rewards.selected {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            let cost_style = if affordable {
                Style::default().fg(theme.positive)
            } else {
                Style::default().fg(theme.dim)
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, name_style),
                Span::styled(format!("{:<28}", reward.name), name_style),
                Span::styled(format!("{:>6} pts", reward.points), cost_style),
            ]))
        })
        .collect();
    let catalog = Card::new("Catalog", &theme).focused(true);
    if items.is_empty() {
        catalog.render_with(
            frame,
            cols[0],
            Paragraph::new("No rewards available.").style(Style::default().fg(theme.dim)),
        );
    } else {
        catalog.render_with(frame, cols[0], List::new(items));
    }

    let detail = match rewards.selected_reward() {
        Some(reward) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    reward.name.as_str(),
                    Style::default()
                        .fg(theme.text)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(reward.description.as_str()),
                Line::from(""),
            ];
            if rewards.can_afford(reward) {
                lines.push(Line::from(Span::styled(
                    "Press Enter to redeem",
                    Style::default().fg(theme.accent),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    format!("{} more points needed", reward.points - rewards.points),
                    Style::default().fg(theme.dim),
                )));
            }
            Paragraph::new(lines).wrap(Wrap { trim: true })
        }
        None => Paragraph::new(""),
    };
    Card::new("Details", &theme).render_with(frame, cols[1], detail);

    if let Some(error) = &rewards.error {
        frame.render_widget(
            Paragraph::new(Span::styled(error.as_str(), Style::default().fg(theme.error))),
            layout[2],
        );
    }

    if let Some(redeemed) = &rewards.redeemed {
        let line = format!("You redeemed {}.", redeemed.reward);
        let code = format!("Your code: {}", redeemed.code);
        render_message(
            frame,
            area,
            "Reward redeemed",
            &[line.as_str(), code.as_str(), "", "Enter close"],
            &theme,
        );
    }
}
