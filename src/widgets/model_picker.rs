use super::overlay::{Overlay, OverlayEvent, Visibility};
use super::selection::Selection;
use super::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};

#[derive(Debug, Clone, Default)]
pub struct ModelPicker {
    visibility: Visibility,
    models: Vec<String>,
    selection: Selection,
}

impl ModelPicker {
    /// Opens the list with `current` preselected when it is present.
    pub fn show(&mut self, models: Vec<String>, current: Option<&str>) {
        let index = current
            .and_then(|current| models.iter().position(|model| model == current))
            .unwrap_or(0);
        self.models = models;
        self.selection.select(index, self.models.len());
        self.visibility.show();
    }

    pub fn selected(&self) -> Option<&str> {
        self.models.get(self.selection.index()).map(String::as_str)
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }
}

impl Overlay for ModelPicker {
    type Output = String;

    fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    fn hide(&mut self) {
        self.visibility.hide();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<OverlayEvent<String>> {
        if !self.visibility.accepts(&key) {
            return None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selection.move_prev();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selection.move_next(self.models.len());
                None
            }
            KeyCode::Enter => match self.selected().map(str::to_string) {
                Some(model) => Some(self.visibility.confirm(model)),
                None => Some(self.visibility.dismiss()),
            },
            KeyCode::Esc => Some(self.visibility.dismiss()),
            _ => None,
        }
    }

    fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        if !self.is_visible() {
            return Vec::new();
        }
        let mut lines = vec![
            Line::from(Span::styled("Select a model", theme.title)),
            Line::raw(""),
        ];
        if self.models.is_empty() {
            lines.push(Line::from(Span::styled("no models configured", theme.muted)));
            return lines;
        }
        lines.extend(self.models.iter().enumerate().map(|(idx, model)| {
            if idx == self.selection.index() {
                Line::from(Span::styled(format!("> {model}"), theme.selected))
            } else {
                Line::from(Span::styled(format!("  {model}"), theme.text))
            }
        }));
        lines
    }
}
