use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
};

use engine::{Category, MoneyCents};

use crate::{
    app::{
        AppState,
        expenses::{LOAD_FAILED, LoadState},
    },
    ui::{
        components::{
            card::{Card, StatCard},
            charts::{mini_bar_chart, render_bar_chart, render_sparkline},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    match state.expenses.load {
        LoadState::Loading => {
            Card::new("Dashboard", &theme).render_with(
                frame,
                area,
                Paragraph::new("Loading expenses…").style(Style::default().fg(theme.dim)),
            );
            return;
        }
        LoadState::Failed => {
            Card::new("Dashboard", &theme).render_with(
                frame,
                area,
                Paragraph::new(LOAD_FAILED).style(Style::default().fg(theme.error)),
            );
            return;
        }
        LoadState::Loaded => {}
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),  // Quick stats
            Constraint::Length(12), // Charts
            Constraint::Min(5),     // Recent activity
        ])
        .split(area);

    render_quick_stats(frame, layout[0], state, &theme);
    render_charts(frame, layout[1], state, &theme);
    render_recent(frame, layout[2], state, &theme);
}

fn render_quick_stats(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let dashboard = &state.dashboard;
    let total: MoneyCents = dashboard.spending.iter().map(|(_, amount)| *amount).sum();

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let trend: Vec<u64> = dashboard
        .spending
        .iter()
        .map(|(_, amount)| amount.cents().max(0) as u64)
        .collect();
    let mut total_card = StatCard::new("Total Spent", total.to_string(), theme);
    let sparkline = mini_bar_chart(&trend);
    if !sparkline.is_empty() {
        total_card = total_card.subtitle(sparkline);
    }
    total_card.render(frame, cols[0]);

    StatCard::new("Eco-Points", dashboard.total_points.to_string(), theme)
        .color(theme.positive)
        .subtitle("earned from expenses")
        .render(frame, cols[1]);

    StatCard::new(
        "Transactions",
        state.expenses.items.len().to_string(),
        theme,
    )
    .render(frame, cols[2]);
}

fn render_charts(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let trend: Vec<u64> = state
        .dashboard
        .spending
        .iter()
        .map(|(_, amount)| amount.cents().max(0) as u64)
        .collect();
    render_sparkline(frame, cols[0], "Spending Over Time", &trend, theme);

    let labels: Vec<(String, u64)> = state
        .dashboard
        .breakdown
        .iter()
        .map(|(label, amount)| (short_label(label), (amount.cents().max(0) / 100) as u64))
        .collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .map(|(label, value)| (label.as_str(), *value))
        .collect();
    render_bar_chart(frame, cols[1], "Spending by Category", &data, theme);
}

/// First word of a category label, so bars stay narrow.
fn short_label(label: &str) -> String {
    label
        .split([' ', '&'])
        .find(|part| !part.is_empty())
        .unwrap_or(label)
        .to_string()
}

fn render_recent(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let card = Card::new("Recent Transactions", theme);
    if state.dashboard.recent.is_empty() {
        card.render_with(
            frame,
            cols[0],
            Paragraph::new("No expenses yet. Add one in the Budget tab.")
                .style(Style::default().fg(theme.dim)),
        );
    } else {
        let items: Vec<ListItem<'_>> = state
            .dashboard
            .recent
            .iter()
            .map(|expense| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        expense.date.format("%Y-%m-%d").to_string(),
                        Style::default().fg(theme.dim),
                    ),
                    Span::raw("  "),
                    Span::styled(
                        format!("{:<20}", expense.name),
                        Style::default().fg(theme.text),
                    ),
                    Span::styled(
                        format!("{:<20}", Category::label_or_undefined(expense.category)),
                        Style::default().fg(theme.text_muted),
                    ),
                    Span::styled(
                        format!("{:>12}", expense.cost),
                        Style::default().fg(theme.negative),
                    ),
                ]))
            })
            .collect();
        card.render_with(frame, cols[0], List::new(items));
    }

    let rewards_card = Card::new("Recent Rewards", theme);
    let items: Vec<ListItem<'_>> = state
        .dashboard
        .recent_rewards
        .iter()
        .map(|(expense, points)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("+{points:<4}"),
                    Style::default()
                        .fg(theme.positive)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {}", expense.name)),
            ]))
        })
        .collect();
    rewards_card.render_with(frame, cols[1], List::new(items));
}
