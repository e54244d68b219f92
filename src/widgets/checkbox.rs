use super::field::{is_activation_key, Effect, Field, FieldResult, FieldValue};
use super::theme::Theme;
use crossterm::event::KeyEvent;
use ratatui::text::{Line, Span};

#[derive(Debug, Clone)]
pub struct Checkbox {
    id: String,
    label: String,
    checked: bool,
    focused: bool,
}

impl Checkbox {
    pub fn new(id: &str, label: &str, checked: bool) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            checked,
            focused: false,
        }
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }
}

impl Field for Checkbox {
    fn id(&self) -> &str {
        &self.id
    }

    fn focus(&mut self) -> Option<Effect> {
        self.focused = true;
        None
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn handle_key(&mut self, key: KeyEvent) -> FieldResult {
        if !self.focused || !is_activation_key(&key) {
            return FieldResult::Unchanged;
        }
        self.checked = !self.checked;
        FieldResult::ValueChanged
    }

    fn value(&self) -> FieldValue {
        FieldValue::Bool(self.checked)
    }

    fn set_value(&mut self, value: FieldValue) {
        if let FieldValue::Bool(checked) = value {
            self.checked = checked;
        }
    }

    fn render(&self, theme: &Theme) -> Line<'static> {
        let mark = if self.checked { "[x]" } else { "[ ]" };
        let style = if self.focused { theme.focused } else { theme.text };
        Line::from(vec![
            Span::styled(mark.to_string(), style),
            Span::raw(" "),
            Span::styled(self.label.clone(), style),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    #[test]
    fn toggles_on_enter_and_space_only_when_focused() {
        let mut checkbox = Checkbox::new("build", "Build ready", false);
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        let enter = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(checkbox.handle_key(space), FieldResult::Unchanged);
        assert!(!checkbox.checked());

        checkbox.focus();
        assert_eq!(checkbox.handle_key(space), FieldResult::ValueChanged);
        assert!(checkbox.checked());
        assert_eq!(checkbox.handle_key(enter), FieldResult::ValueChanged);
        assert!(!checkbox.checked());
        assert_eq!(
            checkbox.handle_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)),
            FieldResult::Unchanged
        );
    }
}
