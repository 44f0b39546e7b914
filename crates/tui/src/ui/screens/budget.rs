use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Row, Table},
};

use engine::Category;

use crate::{
    app::{
        AppState,
        budget::BudgetPane,
        expenses::{ExpenseModal, LOAD_FAILED, LoadState},
    },
    ui::{
        components::{
            card::{Card, StatCard},
            charts::percentage_bar,
            hints::{KeyHint, common},
            modal::{render_confirm, render_form},
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Summary
            Constraint::Min(8),    // Limits and expenses
        ])
        .split(area);

    render_summary(frame, layout[0], state, &theme);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(layout[1]);
    render_limits(frame, cols[0], state, &theme);
    render_expenses(frame, cols[1], state, &theme);

    match &state.expenses.modal {
        Some(ExpenseModal::Add(form) | ExpenseModal::Edit { form, .. }) => {
            render_form(frame, area, form, &theme);
        }
        Some(ExpenseModal::Remove { name, .. }) => {
            render_confirm(
                frame,
                area,
                "Remove expense",
                &format!("Remove \"{name}\"?"),
                &theme,
            );
        }
        None => {}
    }
}

fn render_summary(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let summary = state.budget.summary();
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    StatCard::new("Total Budget", summary.total_budget.to_string(), theme)
        .subtitle(state.budget.period.label())
        .render(frame, cols[0]);
    StatCard::new("Total Spent", summary.total_spent.to_string(), theme)
        .render(frame, cols[1]);
    let remaining_color = if summary.overspent() {
        theme.negative
    } else {
        theme.positive
    };
    StatCard::new("Remaining", summary.remaining.to_string(), theme)
        .color(remaining_color)
        .render(frame, cols[2]);
}

fn render_limits(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let budget = &state.budget;
    let focused = budget.pane == BudgetPane::Limits;
    let card = Card::new("Limits", theme).focused(focused);

    if budget.loading {
        card.render_with(
            frame,
            area,
            Paragraph::new("Loading budget…").style(Style::default().fg(theme.dim)),
        );
        return;
    }

    let mut rows: Vec<Row<'_>> = budget
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = focused && i == budget.selected;
            let limit = match (&budget.editing, selected) {
                (Some(buffer), true) => format!("{buffer}│"),
                _ => row.limit.to_string(),
            };
            let bar_color = if row.percent > 100 {
                theme.negative
            } else if row.percent >= 80 {
                theme.warning
            } else {
                theme.positive
            };
            let style = if selected {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Row::new(vec![
                Span::styled(row.category.label(), style),
                Span::styled(limit, style),
                Span::styled(row.spent.to_string(), Style::default().fg(theme.text_muted)),
                Span::styled(percentage_bar(row.percent, 8), Style::default().fg(bar_color)),
            ])
        })
        .collect();

    let undefined = budget.undefined_spent();
    if !undefined.is_zero() {
        rows.push(Row::new(vec![
            Span::styled(
                Category::label_or_undefined(None),
                Style::default().fg(theme.dim),
            ),
            Span::styled("-", Style::default().fg(theme.dim)),
            Span::styled(undefined.to_string(), Style::default().fg(theme.dim)),
            Span::raw(""),
        ]));
    }

    let table = Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(11),
            Constraint::Length(11),
            Constraint::Length(13),
        ],
    )
    .header(
        Row::new(vec!["Category", "Limit", "Spent", "Used"])
            .style(Style::default().fg(theme.text_muted)),
    );
    card.render_with(frame, area, table);
}

fn render_expenses(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let expenses = &state.expenses;
    let focused = state.budget.pane == BudgetPane::Expenses;
    let card = Card::new("Expenses", theme).focused(focused);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Filters
            Constraint::Min(3),    // Table
            Constraint::Length(1), // Page / error
        ])
        .split(inner);

    let query = &expenses.query;
    let search = if expenses.searching {
        format!("{}│", query.search)
    } else if query.search.is_empty() {
        "-".to_string()
    } else {
        query.search.clone()
    };
    let filters = Line::from(vec![
        Span::styled("Search", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {search}  ")),
        Span::styled("Category", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", query.category.label())),
        Span::styled("Sort", Style::default().fg(theme.text_muted)),
        Span::raw(format!(
            ": {} {}",
            query.sort_key.label(),
            query.sort_order.label()
        )),
    ]);
    frame.render_widget(Paragraph::new(filters), layout[0]);

    match expenses.load {
        LoadState::Loading => {
            frame.render_widget(
                Paragraph::new("Loading expenses…").style(Style::default().fg(theme.dim)),
                layout[1],
            );
            return;
        }
        LoadState::Failed => {
            frame.render_widget(
                Paragraph::new(LOAD_FAILED).style(Style::default().fg(theme.error)),
                layout[1],
            );
            return;
        }
        LoadState::Loaded => {}
    }

    let page = expenses.visible();
    if page.items.is_empty() {
        frame.render_widget(
            Paragraph::new("No expenses found.").style(Style::default().fg(theme.dim)),
            layout[1],
        );
    } else {
        let rows: Vec<Row<'_>> = page
            .items
            .iter()
            .enumerate()
            .map(|(i, expense)| {
                let style = if focused && i == expenses.selected {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text)
                };
                Row::new(vec![
                    expense.name.clone(),
                    expense.date.format("%Y-%m-%d").to_string(),
                    expense.cost.to_string(),
                    Category::label_or_undefined(expense.category).to_string(),
                    expense.eco_points().to_string(),
                ])
                .style(style)
            })
            .collect();
        let table = Table::new(
            rows,
            [
                Constraint::Min(12),
                Constraint::Length(10),
                Constraint::Length(11),
                Constraint::Length(22),
                Constraint::Length(4),
            ],
        )
        .header(
            Row::new(vec!["Name", "Date", "Cost", "Category", "Pts"])
                .style(Style::default().fg(theme.text_muted)),
        );
        frame.render_widget(table, layout[1]);
    }

    let footer = match &expenses.error {
        Some(error) => Line::from(Span::styled(error.as_str(), Style::default().fg(theme.error))),
        None => Line::from(Span::styled(
            format!("{} · {} expenses", page.label(), page.total_items),
            Style::default().fg(theme.dim),
        )),
    };
    frame.render_widget(Paragraph::new(footer), layout[2]);
}

pub fn hints(state: &AppState) -> Vec<KeyHint> {
    match &state.expenses.modal {
        Some(ExpenseModal::Remove { .. }) => return common::confirm(),
        Some(_) => return common::form_editing(),
        None => {}
    }
    if state.expenses.searching {
        return common::text_entry();
    }
    if state.budget.editing.is_some() {
        return vec![KeyHint::new("Enter", "set"), KeyHint::new("Esc", "cancel")];
    }
    match state.budget.pane {
        BudgetPane::Expenses => vec![
            KeyHint::new("Tab", "limits"),
            KeyHint::new("a", "add"),
            KeyHint::new("e", "edit"),
            KeyHint::new("d", "delete"),
            KeyHint::new("/", "search"),
            KeyHint::new("c", "category"),
            KeyHint::new("s", "sort"),
            KeyHint::new("o", "order"),
            KeyHint::new("←→", "page"),
        ],
        BudgetPane::Limits => vec![
            KeyHint::new("Tab", "expenses"),
            KeyHint::new("Enter", "edit limit"),
            KeyHint::new("s", "save"),
            KeyHint::new("r", "reload"),
        ],
    }
}
