//! Centered overlays: forms, confirmations and message dialogs.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::{
    app::form::{FieldKind, Form},
    ui::theme::Theme,
};

/// Rect of `width` by `height` cells centered in `area`, clipped to it.
pub fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn overlay_block<'a>(title: &str, theme: &Theme) -> Block<'a> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.background))
}

pub fn render_form(frame: &mut Frame<'_>, area: Rect, form: &Form, theme: &Theme) {
    let height = form.fields.len() as u16 + 4 + u16::from(form.error.is_some());
    let rect = centered_box(56, height, area);
    frame.render_widget(Clear, rect);

    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let label_style = if focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let value = match &field.kind {
            FieldKind::Text if focused => format!("{}│", field.value),
            FieldKind::Text => field.value.clone(),
            FieldKind::Choice(_) if field.value.is_empty() => "‹ none ›".to_string(),
            FieldKind::Choice(_) => format!("‹ {} ›", field.value),
            FieldKind::Toggle if field.checked => "[x]".to_string(),
            FieldKind::Toggle => "[ ]".to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>16}: ", field.label), label_style),
            Span::styled(value, Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.as_str(),
            Style::default().fg(theme.error),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Tab next · ←→ choose · Enter save · Esc cancel",
        Style::default().fg(theme.dim),
    )));

    let paragraph = Paragraph::new(lines).block(overlay_block(&form.title, theme));
    frame.render_widget(paragraph, rect);
}

/// Yes/no dialog.
pub fn render_confirm(frame: &mut Frame<'_>, area: Rect, title: &str, message: &str, theme: &Theme) {
    render_message(frame, area, title, &[message, "", "y confirm · n cancel"], theme);
}

/// Dialog with centered lines, dismissed by the caller's key handling.
pub fn render_message(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    lines: &[&str],
    theme: &Theme,
) {
    let width = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .max(title.chars().count())
        + 6;
    let rect = centered_box(width.min(64) as u16, lines.len() as u16 + 4, area);
    frame.render_widget(Clear, rect);

    let text: Vec<Line<'_>> = lines
        .iter()
        .map(|l| Line::from(Span::styled(*l, Style::default().fg(theme.text))))
        .collect();
    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(overlay_block(title, theme));
    frame.render_widget(paragraph, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_box_clips_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        let rect = centered_box(20, 4, area);
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (10, 3, 20, 4));

        let clipped = centered_box(80, 20, area);
        assert_eq!((clipped.width, clipped.height), (40, 10));
    }
}
