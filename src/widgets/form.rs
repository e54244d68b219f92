use super::field::{is_actionable, ActivationKind, Effect, Field, FieldResult, FieldValue};
use super::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::Line;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Submitted { form_id: String, button_id: String },
    Canceled { form_id: String },
    Changed { form_id: String, field_id: String },
}

/// Ordered fields with a single focus ring. Field order is the tab order and is
/// fixed once the form is built.
pub struct Form {
    id: String,
    fields: Vec<Box<dyn Field>>,
    focus_index: Option<usize>,
    submitted: bool,
    canceled: bool,
    pending_effect: Option<Effect>,
}

impl std::fmt::Debug for Form {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Form")
            .field("id", &self.id)
            .field(
                "fields",
                &self.fields.iter().map(|field| field.id()).collect::<Vec<_>>(),
            )
            .field("focus_index", &self.focus_index)
            .field("submitted", &self.submitted)
            .field("canceled", &self.canceled)
            .finish()
    }
}

impl Form {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            fields: Vec::new(),
            focus_index: None,
            submitted: false,
            canceled: false,
            pending_effect: None,
        }
    }

    pub fn with_field(mut self, field: impl Field + 'static) -> Self {
        self.fields.push(Box::new(field));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn focus_index(&self) -> Option<usize> {
        self.focus_index
    }

    pub fn is_focused(&self) -> bool {
        self.focus_index.is_some()
    }

    pub fn submitted(&self) -> bool {
        self.submitted
    }

    pub fn canceled(&self) -> bool {
        self.canceled
    }

    /// Effect requested by the most recently focused field, if not yet consumed.
    pub fn take_effect(&mut self) -> Option<Effect> {
        self.pending_effect.take()
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        if let Some(field) = self.focus_index.and_then(|idx| self.fields.get_mut(idx)) {
            field.set_cursor_visible(visible);
        }
    }

    pub fn focus(&mut self) {
        self.focus_field(0);
    }

    pub fn blur(&mut self) {
        if let Some(field) = self.focus_index.take().and_then(|idx| self.fields.get_mut(idx)) {
            field.blur();
        }
    }

    pub fn next_field(&mut self) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        let next = match self.focus_index {
            Some(idx) => (idx + 1) % len,
            None => 0,
        };
        self.focus_field(next);
    }

    pub fn prev_field(&mut self) {
        let len = self.fields.len();
        if len == 0 {
            return;
        }
        let prev = match self.focus_index {
            Some(idx) => (idx + len - 1) % len,
            None => len - 1,
        };
        self.focus_field(prev);
    }

    pub fn focus_field(&mut self, index: usize) {
        if index >= self.fields.len() {
            return;
        }
        self.blur();
        self.pending_effect = self.fields[index].focus();
        self.focus_index = Some(index);
    }

    /// Clears the terminal flags and refocuses the first field. Field values are kept.
    pub fn reset(&mut self) {
        self.submitted = false;
        self.canceled = false;
        self.focus_field(0);
    }

    pub fn focused_field(&self) -> Option<&dyn Field> {
        self.focus_index
            .and_then(|idx| self.fields.get(idx))
            .map(|field| field.as_ref())
    }

    pub fn focused_captures_text(&self) -> bool {
        self.focused_field()
            .map(|field| field.captures_text())
            .unwrap_or(false)
    }

    pub fn field(&self, id: &str) -> Option<&dyn Field> {
        self.fields
            .iter()
            .find(|field| field.id() == id)
            .map(|field| field.as_ref())
    }

    pub fn value(&self, id: &str) -> FieldValue {
        self.field(id)
            .map(|field| field.value())
            .unwrap_or(FieldValue::None)
    }

    pub fn text(&self, id: &str) -> Option<String> {
        match self.value(id) {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn checked(&self, id: &str) -> Option<bool> {
        match self.value(id) {
            FieldValue::Bool(checked) => Some(checked),
            _ => None,
        }
    }

    pub fn set_value(&mut self, id: &str, value: FieldValue) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.id() == id) {
            field.set_value(value);
        }
    }

    /// Routes one key: focus navigation and cancel take precedence, everything else
    /// goes to the focused field. Once submitted or canceled the form ignores input
    /// until `reset`.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<FormEvent> {
        if !is_actionable(&key) || self.submitted || self.canceled {
            return None;
        }
        let index = self.focus_index?;
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.next_field();
                return None;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev_field();
                return None;
            }
            KeyCode::Esc => return Some(self.cancel()),
            _ => {}
        }
        let field = self.fields.get_mut(index)?;
        match field.handle_key(key) {
            FieldResult::Unchanged => None,
            FieldResult::ValueChanged => Some(FormEvent::Changed {
                form_id: self.id.clone(),
                field_id: field.id().to_string(),
            }),
            FieldResult::Activated(ActivationKind::Submit) => {
                let button_id = field.id().to_string();
                self.submitted = true;
                Some(FormEvent::Submitted {
                    form_id: self.id.clone(),
                    button_id,
                })
            }
            FieldResult::Activated(ActivationKind::Cancel) => Some(self.cancel()),
        }
    }

    fn cancel(&mut self) -> FormEvent {
        self.canceled = true;
        FormEvent::Canceled {
            form_id: self.id.clone(),
        }
    }

    pub fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        self.fields.iter().map(|field| field.render(theme)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Button, Checkbox, TextField};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample_form() -> Form {
        Form::new("analysis")
            .with_field(TextField::new("build_cmd", "Build command"))
            .with_field(Checkbox::new("build_ready", "Build ready", false))
            .with_field(Button::submit("continue", "Continue"))
    }

    fn focused_flags(form: &Form) -> Vec<bool> {
        ["build_cmd", "build_ready", "continue"]
            .iter()
            .map(|id| form.field(id).map(|f| f.is_focused()).unwrap_or(false))
            .collect()
    }

    #[test]
    fn focus_moves_with_blur_discipline() {
        let mut form = sample_form();
        assert_eq!(focused_flags(&form), vec![false, false, false]);

        form.focus();
        assert_eq!(form.focus_index(), Some(0));
        assert_eq!(form.take_effect(), Some(Effect::BlinkCursor));
        assert_eq!(focused_flags(&form), vec![true, false, false]);

        form.next_field();
        assert_eq!(focused_flags(&form), vec![false, true, false]);

        form.prev_field();
        form.prev_field();
        assert_eq!(form.focus_index(), Some(2));
        assert_eq!(focused_flags(&form), vec![false, false, true]);

        form.focus_field(7);
        assert_eq!(form.focus_index(), Some(2));

        form.blur();
        assert_eq!(form.focus_index(), None);
        assert_eq!(focused_flags(&form), vec![false, false, false]);
    }

    #[test]
    fn keys_are_ignored_while_the_form_is_unfocused() {
        let mut form = sample_form();
        assert_eq!(form.handle_key(key(KeyCode::Esc)), None);
        assert!(!form.canceled());
        assert_eq!(form.handle_key(key(KeyCode::Tab)), None);
        assert_eq!(form.focus_index(), None);
    }

    #[test]
    fn routes_text_to_focused_field_and_reports_changes() {
        let mut form = sample_form();
        form.focus();
        assert_eq!(
            form.handle_key(key(KeyCode::Char('m'))),
            Some(FormEvent::Changed {
                form_id: "analysis".to_string(),
                field_id: "build_cmd".to_string(),
            })
        );
        form.handle_key(key(KeyCode::Tab));
        form.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(form.text("build_cmd").as_deref(), Some("m"));
        assert_eq!(form.checked("build_ready"), Some(true));
        assert_eq!(form.checked("build_cmd"), None);
    }

    #[test]
    fn escape_cancels_at_form_precedence() {
        let mut form = sample_form();
        form.focus();
        assert_eq!(
            form.handle_key(key(KeyCode::Esc)),
            Some(FormEvent::Canceled {
                form_id: "analysis".to_string()
            })
        );
        assert!(form.canceled());
        assert_eq!(form.handle_key(key(KeyCode::Esc)), None);
    }

    #[test]
    fn cancel_button_cancels_instead_of_submitting() {
        let mut form = Form::new("edit")
            .with_field(Button::submit("save", "Save"))
            .with_field(Button::cancel("cancel", "Cancel"));
        form.focus_field(1);
        assert_eq!(
            form.handle_key(key(KeyCode::Enter)),
            Some(FormEvent::Canceled {
                form_id: "edit".to_string()
            })
        );
        assert!(form.canceled());
        assert!(!form.submitted());
    }

    #[test]
    fn reset_keeps_values_and_returns_focus_to_first_field() {
        let mut form = sample_form();
        form.focus();
        form.handle_key(key(KeyCode::Char('x')));
        form.focus_field(2);
        form.handle_key(key(KeyCode::Enter));
        assert!(form.submitted());

        form.reset();
        assert!(!form.submitted());
        assert_eq!(form.focus_index(), Some(0));
        assert_eq!(form.text("build_cmd").as_deref(), Some("x"));
    }

    #[test]
    fn set_value_ignores_mismatched_kinds() {
        let mut form = sample_form();
        form.set_value("build_ready", FieldValue::Text("yes".to_string()));
        assert_eq!(form.checked("build_ready"), Some(false));
        form.set_value("build_cmd", FieldValue::Text("make".to_string()));
        assert_eq!(form.text("build_cmd").as_deref(), Some("make"));
        form.set_value("missing", FieldValue::Bool(true));
        assert_eq!(form.value("missing"), FieldValue::None);
    }
}
