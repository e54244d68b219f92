use super::field::{is_activation_key, ActivationKind, Effect, Field, FieldResult};
use super::theme::Theme;
use crossterm::event::KeyEvent;
use ratatui::text::{Line, Span};

#[derive(Debug, Clone)]
pub struct Button {
    id: String,
    label: String,
    kind: ActivationKind,
    focused: bool,
}

impl Button {
    pub fn submit(id: &str, label: &str) -> Self {
        Self::new(id, label, ActivationKind::Submit)
    }

    pub fn cancel(id: &str, label: &str) -> Self {
        Self::new(id, label, ActivationKind::Cancel)
    }

    fn new(id: &str, label: &str, kind: ActivationKind) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            focused: false,
        }
    }
}

impl Field for Button {
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
        if self.focused && is_activation_key(&key) {
            FieldResult::Activated(self.kind)
        } else {
            FieldResult::Unchanged
        }
    }

    fn render(&self, theme: &Theme) -> Line<'static> {
        let style = if self.focused { theme.focused } else { theme.muted };
        Line::from(Span::styled(format!("[ {} ]", self.label), style))
    }
}
