use super::field::{Effect, Field, FieldResult, FieldValue};
use super::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::text::{Line, Span};

pub const DEFAULT_MAX_LEN: usize = 256;
const CURSOR_GLYPH: &str = "█";

#[derive(Debug, Clone)]
pub struct TextField {
    id: String,
    label: String,
    value: String,
    placeholder: String,
    cursor: usize,
    max_len: usize,
    focused: bool,
    cursor_visible: bool,
}

impl TextField {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            cursor: 0,
            max_len: DEFAULT_MAX_LEN,
            focused: false,
            cursor_visible: true,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    /// A zero limit is treated as one character.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len.max(1);
        self.truncate_to_limit();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.set_text(value);
        self
    }

    pub fn text(&self) -> &str {
        &self.value
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_text(&mut self, value: &str) {
        self.value = value.to_string();
        self.truncate_to_limit();
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn cursor_glyph(&self) -> &'static str {
        if self.cursor_visible {
            CURSOR_GLYPH
        } else {
            " "
        }
    }

    fn char_len(&self) -> usize {
        self.value.chars().count()
    }

    fn truncate_to_limit(&mut self) {
        if self.char_len() > self.max_len {
            let end = self.byte_index(self.max_len);
            self.value.truncate(end);
        }
        self.cursor = self.cursor.min(self.char_len());
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }

    fn insert(&mut self, ch: char) -> FieldResult {
        if self.char_len() >= self.max_len {
            return FieldResult::Unchanged;
        }
        let at = self.byte_index(self.cursor);
        self.value.insert(at, ch);
        self.cursor += 1;
        FieldResult::ValueChanged
    }

    fn delete_before_cursor(&mut self) -> FieldResult {
        if self.cursor == 0 {
            return FieldResult::Unchanged;
        }
        let at = self.byte_index(self.cursor - 1);
        self.value.remove(at);
        self.cursor -= 1;
        FieldResult::ValueChanged
    }

    fn delete_at_cursor(&mut self) -> FieldResult {
        if self.cursor >= self.char_len() {
            return FieldResult::Unchanged;
        }
        let at = self.byte_index(self.cursor);
        self.value.remove(at);
        FieldResult::ValueChanged
    }

    fn delete_to_start(&mut self) -> FieldResult {
        if self.cursor == 0 {
            return FieldResult::Unchanged;
        }
        let end = self.byte_index(self.cursor);
        self.value.replace_range(..end, "");
        self.cursor = 0;
        FieldResult::ValueChanged
    }
}

impl Field for TextField {
    fn id(&self) -> &str {
        &self.id
    }

    fn focus(&mut self) -> Option<Effect> {
        self.focused = true;
        self.cursor_visible = true;
        Some(Effect::BlinkCursor)
    }

    fn blur(&mut self) {
        self.focused = false;
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn handle_key(&mut self, key: KeyEvent) -> FieldResult {
        if !self.focused {
            return FieldResult::Unchanged;
        }
        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('u') if control => self.delete_to_start(),
            KeyCode::Char(ch) if !control && !key.modifiers.contains(KeyModifiers::ALT) => {
                self.insert(ch)
            }
            KeyCode::Backspace => self.delete_before_cursor(),
            KeyCode::Delete => self.delete_at_cursor(),
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                FieldResult::Unchanged
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                FieldResult::Unchanged
            }
            KeyCode::Home => {
                self.cursor = 0;
                FieldResult::Unchanged
            }
            KeyCode::End => {
                self.cursor = self.char_len();
                FieldResult::Unchanged
            }
            _ => FieldResult::Unchanged,
        }
    }

    fn value(&self) -> FieldValue {
        FieldValue::Text(self.value.clone())
    }

    fn set_value(&mut self, value: FieldValue) {
        if let FieldValue::Text(text) = value {
            self.set_text(&text);
        }
    }

    fn captures_text(&self) -> bool {
        true
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn render(&self, theme: &Theme) -> Line<'static> {
        let label_style = if self.focused { theme.focused } else { theme.text };
        let mut spans = vec![Span::styled(format!("{}: ", self.label), label_style)];
        if self.value.is_empty() {
            if self.focused {
                spans.push(Span::raw(self.cursor_glyph()));
            }
            if !self.placeholder.is_empty() {
                spans.push(Span::styled(self.placeholder.clone(), theme.muted));
            }
            return Line::from(spans);
        }
        if !self.focused {
            spans.push(Span::styled(self.value.clone(), theme.text));
            return Line::from(spans);
        }
        let split = self.byte_index(self.cursor);
        spans.push(Span::styled(self.value[..split].to_string(), theme.text));
        spans.push(Span::raw(self.cursor_glyph()));
        spans.push(Span::styled(self.value[split..].to_string(), theme.text));
        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::line_text;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(field: &mut TextField, text: &str) {
        for ch in text.chars() {
            field.handle_key(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn ignores_keys_while_unfocused() {
        let mut field = TextField::new("name", "Name");
        assert_eq!(
            field.handle_key(key(KeyCode::Char('a'))),
            FieldResult::Unchanged
        );
        assert_eq!(field.text(), "");
    }

    #[test]
    fn edits_at_cursor_position() {
        let mut field = TextField::new("name", "Name");
        field.focus();
        type_str(&mut field, "helo");
        field.handle_key(key(KeyCode::Left));
        field.handle_key(key(KeyCode::Char('l')));
        assert_eq!(field.text(), "hello");
        field.handle_key(key(KeyCode::Home));
        assert_eq!(
            field.handle_key(key(KeyCode::Delete)),
            FieldResult::ValueChanged
        );
        assert_eq!(field.text(), "ello");
        field.handle_key(key(KeyCode::End));
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.text(), "ell");
    }

    #[test]
    fn enforces_max_len_in_chars() {
        let mut field = TextField::new("name", "Name").with_max_len(3);
        field.focus();
        type_str(&mut field, "äbcd");
        assert_eq!(field.text(), "äbc");
        assert_eq!(
            field.handle_key(key(KeyCode::Char('x'))),
            FieldResult::Unchanged
        );
    }

    #[test]
    fn ctrl_u_clears_to_line_start() {
        let mut field = TextField::new("cmd", "Command").with_value("cargo test");
        field.focus();
        field.handle_key(key(KeyCode::Left));
        field.handle_key(key(KeyCode::Left));
        field.handle_key(KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(field.text(), "st");
        assert_eq!(field.cursor(), 0);
    }

    #[test]
    fn renders_placeholder_when_empty() {
        let field = TextField::new("cmd", "Command").with_placeholder("e.g. make");
        assert_eq!(line_text(&field.render(&Theme::plain())), "Command: e.g. make");

        let mut filled = TextField::new("cmd", "Command").with_value("make");
        assert_eq!(line_text(&filled.render(&Theme::plain())), "Command: make");
        filled.focus();
        assert_eq!(line_text(&filled.render(&Theme::plain())), "Command: make█");
    }

    #[test]
    fn blink_phase_hides_cursor_until_refocused() {
        let mut field = TextField::new("name", "Name").with_value("ab");
        field.focus();
        field.set_cursor_visible(false);
        assert_eq!(line_text(&field.render(&Theme::plain())), "Name: ab ");
        field.blur();
        assert_eq!(field.focus(), Some(Effect::BlinkCursor));
        assert_eq!(line_text(&field.render(&Theme::plain())), "Name: ab█");
    }
}
