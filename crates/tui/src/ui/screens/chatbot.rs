use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::{
        AppState,
        chat::{ChatInput, ChatMessage, Sender},
    },
    ui::{components::card::Card, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let chat = &state.chat;

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // History
            Constraint::Length(1), // Attachments
            Constraint::Length(3), // Input
        ])
        .split(area);

    let mut lines: Vec<Line<'_>> = Vec::new();
    for message in &chat.history {
        lines.extend(message_lines(message, &theme));
        lines.push(Line::from(""));
    }
    if chat.typing {
        lines.push(Line::from(Span::styled(
            "Bot is typing…",
            Style::default()
                .fg(theme.dim)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let history_card = Card::new("SDG Finance ChatBot", &theme);
    let inner = history_card.inner(layout[0]);
    let scroll = wrapped_height(&lines, inner.width).saturating_sub(inner.height);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    history_card.render_with(frame, layout[0], paragraph);

    let mut attached = Vec::new();
    if let Some(image) = &chat.image {
        attached.push(format!("image: {}", image.file_name));
    }
    if let Some(file) = &chat.file {
        attached.push(format!("file: {}", file.file_name));
    }
    if !attached.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" Attached: {}", attached.join(", ")),
                Style::default().fg(theme.text_muted),
            )),
            layout[1],
        );
    }

    let (title, value, active) = match chat.composing {
        Some(ChatInput::Message) => ("Message", chat.input.as_str(), true),
        Some(ChatInput::ImagePath) => ("Image path", chat.path_input.as_str(), true),
        Some(ChatInput::FilePath) => ("File path", chat.path_input.as_str(), true),
        None => ("Message", chat.input.as_str(), false),
    };
    let display = if active {
        format!("{value}│")
    } else if value.is_empty() {
        "Press i to type a message".to_string()
    } else {
        value.to_string()
    };
    let style = if active {
        Style::default().fg(theme.text)
    } else {
        Style::default().fg(theme.dim)
    };
    Card::new(title, &theme)
        .focused(active)
        .render_with(frame, layout[2], Paragraph::new(Span::styled(display, style)));
}

fn message_lines<'a>(message: &'a ChatMessage, theme: &Theme) -> Vec<Line<'a>> {
    let (who, color) = match message.sender {
        Sender::User => ("You", theme.accent),
        Sender::Bot => ("Bot", theme.positive),
    };
    let mut lines = vec![Line::from(vec![
        Span::styled(
            who,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", message.timestamp),
            Style::default().fg(theme.dim),
        ),
    ])];
    if let Some(image) = &message.image {
        lines.push(Line::from(Span::styled(
            format!("[image] {image}"),
            Style::default().fg(theme.text_muted),
        )));
    }
    if let Some(file) = &message.file {
        lines.push(Line::from(Span::styled(
            format!("[file] {file}"),
            Style::default().fg(theme.text_muted),
        )));
    }
    if let Some(text) = &message.text {
        lines.extend(
            text.lines()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text)))),
        );
    }
    lines
}

/// Rows the lines take once wrapped at `width`, so the newest stay visible.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}
