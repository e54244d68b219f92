use super::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::text::Line;

/// Side effect a field may request when it gains focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    BlinkCursor,
}

/// What a button activation means to the owning form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationKind {
    Submit,
    Cancel,
}

/// Outcome of dispatching one key to a field. The form reacts to this value only,
/// never to the concrete field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldResult {
    Unchanged,
    ValueChanged,
    Activated(ActivationKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    None,
}

pub trait Field {
    fn id(&self) -> &str;

    fn focus(&mut self) -> Option<Effect>;

    fn blur(&mut self);

    fn is_focused(&self) -> bool;

    /// Keys reaching an unfocused field must be ignored.
    fn handle_key(&mut self, key: KeyEvent) -> FieldResult;

    fn value(&self) -> FieldValue {
        FieldValue::None
    }

    /// Replaces the value when the kinds agree; mismatched kinds are ignored.
    fn set_value(&mut self, _value: FieldValue) {}

    /// True when printable keys are consumed as text, so screens must not treat
    /// them as mnemonics.
    fn captures_text(&self) -> bool {
        false
    }

    /// Blink phase of the text cursor. Fields without a cursor ignore it.
    fn set_cursor_visible(&mut self, _visible: bool) {}

    fn render(&self, theme: &Theme) -> Line<'static>;
}

pub fn is_activation_key(key: &KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('\n') | KeyCode::Char('\r')
    ) && !key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn is_actionable(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
}
