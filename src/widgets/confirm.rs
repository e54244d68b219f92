use super::overlay::{Overlay, OverlayEvent, Visibility};
use super::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};

/// Yes/No confirmation carrying the pending action as its payload.
#[derive(Debug, Clone)]
pub struct ConfirmDialog<A> {
    visibility: Visibility,
    title: String,
    message: String,
    action: Option<A>,
    yes_selected: bool,
}

impl<A> Default for ConfirmDialog<A> {
    fn default() -> Self {
        Self {
            visibility: Visibility::default(),
            title: String::new(),
            message: String::new(),
            action: None,
            yes_selected: false,
        }
    }
}

impl<A> ConfirmDialog<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any previous title, message and pending action. Selection starts on "No".
    pub fn show(&mut self, title: &str, message: &str, action: A) {
        self.title = title.to_string();
        self.message = message.to_string();
        self.action = Some(action);
        self.yes_selected = false;
        self.visibility.show();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn pending_action(&self) -> Option<&A> {
        self.action.as_ref()
    }

    pub fn yes_selected(&self) -> bool {
        self.yes_selected
    }

    fn confirm(&mut self) -> OverlayEvent<A> {
        match self.action.take() {
            Some(action) => self.visibility.confirm(action),
            None => self.visibility.dismiss(),
        }
    }

    fn dismiss(&mut self) -> OverlayEvent<A> {
        self.action = None;
        self.visibility.dismiss()
    }
}

impl<A> Overlay for ConfirmDialog<A> {
    type Output = A;

    fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    fn hide(&mut self) {
        self.action = None;
        self.visibility.hide();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<OverlayEvent<A>> {
        if !self.visibility.accepts(&key) {
            return None;
        }
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => Some(self.confirm()),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Some(self.dismiss()),
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Char('h')
            | KeyCode::Char('l') => {
                self.yes_selected = !self.yes_selected;
                None
            }
            KeyCode::Enter => {
                if self.yes_selected {
                    Some(self.confirm())
                } else {
                    Some(self.dismiss())
                }
            }
            _ => None,
        }
    }

    fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        if !self.is_visible() {
            return Vec::new();
        }
        let (yes_style, no_style) = if self.yes_selected {
            (theme.selected, theme.muted)
        } else {
            (theme.muted, theme.selected)
        };
        vec![
            Line::from(Span::styled(self.title.clone(), theme.title)),
            Line::raw(""),
            Line::raw(self.message.clone()),
            Line::raw(""),
            Line::from(vec![
                Span::styled("[ Yes ]", yes_style),
                Span::raw("  "),
                Span::styled("[ No ]", no_style),
            ]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn invisible_dialog_consumes_nothing() {
        let mut dialog: ConfirmDialog<usize> = ConfirmDialog::new();
        assert_eq!(dialog.handle_key(key(KeyCode::Char('y'))), None);
        assert!(dialog.render(&Theme::plain()).is_empty());
    }

    #[test]
    fn enter_respects_selection() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("Delete task", "Delete `write docs`?", 3usize);
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), Some(OverlayEvent::Closed));
        assert!(!dialog.is_visible());

        dialog.show("Delete task", "Delete `write docs`?", 3usize);
        dialog.handle_key(key(KeyCode::Left));
        assert!(dialog.yes_selected());
        assert_eq!(
            dialog.handle_key(key(KeyCode::Enter)),
            Some(OverlayEvent::Confirmed(3))
        );
        assert!(!dialog.is_visible());
    }

    #[test]
    fn show_replaces_previous_title_and_message() {
        let mut dialog = ConfirmDialog::new();
        dialog.show("First", "first message", 'a');
        dialog.handle_key(key(KeyCode::Esc));
        dialog.show("Second", "second message", 'b');
        assert_eq!(dialog.title(), "Second");
        assert_eq!(dialog.message(), "second message");
        assert_eq!(dialog.pending_action(), Some(&'b'));
        assert_eq!(
            dialog.handle_key(key(KeyCode::Char('y'))),
            Some(OverlayEvent::Confirmed('b'))
        );
    }
}
