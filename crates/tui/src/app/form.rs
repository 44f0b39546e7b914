//! Keyboard-driven modal forms shared by the views.

use crate::ui::keymap::AppAction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Cycles through fixed options with Left/Right or Space.
    Choice(Vec<&'static str>),
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    pub kind: FieldKind,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub title: String,
    pub fields: Vec<Field>,
    pub focus: usize,
    pub error: Option<String>,
}

/// What a key press did to a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormOutcome {
    Edited,
    Submit,
    Cancel,
}

impl Form {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            focus: 0,
            error: None,
        }
    }

    pub fn text(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            label,
            value: value.into(),
            kind: FieldKind::Text,
            checked: false,
        });
        self
    }

    /// `value` falls back to the first option when it is not one of them.
    pub fn choice(mut self, label: &'static str, options: Vec<&'static str>, value: &str) -> Self {
        let value = options
            .iter()
            .find(|o| **o == value)
            .or(options.first())
            .map(|o| (*o).to_string())
            .unwrap_or_default();
        self.fields.push(Field {
            label,
            value,
            kind: FieldKind::Choice(options),
            checked: false,
        });
        self
    }

    pub fn toggle(mut self, label: &'static str, checked: bool) -> Self {
        self.fields.push(Field {
            label,
            value: String::new(),
            kind: FieldKind::Toggle,
            checked,
        });
        self
    }

    pub fn value(&self, label: &str) -> &str {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map_or("", |f| f.value.as_str())
    }

    pub fn checked(&self, label: &str) -> bool {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .is_some_and(|f| f.checked)
    }

    pub fn handle(&mut self, action: AppAction) -> FormOutcome {
        match action {
            AppAction::Cancel => return FormOutcome::Cancel,
            AppAction::Submit => return FormOutcome::Submit,
            AppAction::NextField | AppAction::Down => self.move_focus(1),
            AppAction::PrevField | AppAction::Up => self.move_focus(-1),
            AppAction::Left => self.cycle(false),
            AppAction::Right => self.cycle(true),
            AppAction::Backspace => {
                if let Some(field) = self.focused_text_mut() {
                    field.value.pop();
                }
            }
            AppAction::Input(ch) => self.input(ch),
            _ => {}
        }
        FormOutcome::Edited
    }

    fn move_focus(&mut self, delta: isize) {
        if self.fields.is_empty() {
            return;
        }
        let len = self.fields.len() as isize;
        self.focus = (self.focus as isize + delta).rem_euclid(len) as usize;
    }

    fn input(&mut self, ch: char) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        if field.kind == FieldKind::Text {
            field.value.push(ch);
        } else if ch == ' ' {
            self.cycle(true);
        }
    }

    fn cycle(&mut self, forward: bool) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        match &field.kind {
            FieldKind::Choice(options) if !options.is_empty() => {
                let idx = options.iter().position(|o| *o == field.value).unwrap_or(0);
                let next = if forward {
                    (idx + 1) % options.len()
                } else {
                    (idx + options.len() - 1) % options.len()
                };
                field.value = options[next].to_string();
            }
            FieldKind::Toggle => field.checked = !field.checked,
            _ => {}
        }
    }

    fn focused_text_mut(&mut self) -> Option<&mut Field> {
        self.fields
            .get_mut(self.focus)
            .filter(|f| f.kind == FieldKind::Text)
    }
}
