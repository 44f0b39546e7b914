use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    symbols,
    widgets::{BarChart, Sparkline},
};

use crate::ui::{components::card::Card, theme::Theme};

/// Renders a bar chart with one labelled bar per entry.
pub fn render_bar_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    data: &[(&str, u64)],
    theme: &Theme,
) {
    let bar_width = bar_width_for(area.width, data.len());
    let chart = BarChart::default()
        .data(data)
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.dim));

    if title.is_empty() {
        frame.render_widget(chart, area);
    } else {
        let card = Card::new(title, theme);
        let inner = card.inner(area);
        card.render_frame(frame, area);
        frame.render_widget(chart, inner);
    }
}

/// Renders a sparkline for a trend over time.
pub fn render_sparkline(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    data: &[u64],
    theme: &Theme,
) {
    let sparkline = Sparkline::default()
        .data(data)
        .style(Style::default().fg(theme.accent));

    if title.is_empty() {
        frame.render_widget(sparkline, area);
    } else {
        let card = Card::new(title, theme);
        let inner = card.inner(area);
        card.render_frame(frame, area);
        frame.render_widget(sparkline, inner);
    }
}

/// Creates a mini bar chart representation as a string.
///
/// Returns something like `▁▂▃▅▇▅▃▂▁` for a series of values.
#[must_use]
pub fn mini_bar_chart(values: &[u64]) -> String {
    if values.is_empty() {
        return String::new();
    }

    let max = *values.iter().max().unwrap_or(&1);
    if max == 0 {
        return " ".repeat(values.len());
    }

    let bars = [
        symbols::bar::ONE_EIGHTH,
        symbols::bar::ONE_QUARTER,
        symbols::bar::THREE_EIGHTHS,
        symbols::bar::HALF,
        symbols::bar::FIVE_EIGHTHS,
        symbols::bar::THREE_QUARTERS,
        symbols::bar::SEVEN_EIGHTHS,
        symbols::bar::FULL,
    ];

    values
        .iter()
        .map(|&v| {
            if v == 0 {
                " "
            } else {
                let index = ((v as f64 / max as f64) * 7.0) as usize;
                bars[index.min(7)]
            }
        })
        .collect()
}

/// Creates a percentage bar with label.
///
/// Returns something like `████████░░ 80%`
#[must_use]
pub fn percentage_bar(percentage: u16, width: usize) -> String {
    let filled = ((percentage as usize * width) / 100).min(width);
    let empty = width.saturating_sub(filled);
    format!(
        "{}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(empty),
        percentage
    )
}

/// Widest bar that still fits every entry, between 3 and 12 cells.
fn bar_width_for(width: u16, bars: usize) -> u16 {
    if bars == 0 {
        return 3;
    }
    let per_bar = (width.saturating_sub(2) as usize / bars).saturating_sub(1);
    per_bar.clamp(3, 12) as u16
}
