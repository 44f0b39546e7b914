use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: &'static str,
    pub action: &'static str,
}

impl KeyHint {
    pub const fn new(key: &'static str, action: &'static str) -> Self {
        Self { key, action }
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(hint.key, Style::default().fg(theme.accent)));
        spans.push(Span::raw(format!(" {}", hint.action)));
    }

    spans
}

/// Creates a separator span for dividing hint groups.
pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

/// Hint groups shared by several sections.
pub mod common {
    use super::KeyHint;

    pub fn form_editing() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Tab", "next"),
            KeyHint::new("←→", "choose"),
            KeyHint::new("Enter", "save"),
            KeyHint::new("Esc", "cancel"),
        ]
    }

    pub fn confirm() -> Vec<KeyHint> {
        vec![KeyHint::new("y", "confirm"), KeyHint::new("n", "cancel")]
    }

    pub fn text_entry() -> Vec<KeyHint> {
        vec![KeyHint::new("Enter", "done"), KeyHint::new("Esc", "cancel")]
    }
}
