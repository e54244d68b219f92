use super::{draw_chrome, draw_panel, draw_popup, Chrome};
use crate::widgets::{hint_line, HelpTopic, ModelPicker, Overlay, OverlayEvent, Theme};
use crossterm::event::KeyEvent;
use ratatui::text::{Line, Span};
use ratatui::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    Selected(String),
    Back,
}

#[derive(Debug, Default)]
pub struct ModelScreen {
    picker: ModelPicker,
    summary: Vec<String>,
}

impl ModelScreen {
    pub fn enter(&mut self, models: Vec<String>, current: Option<&str>, summary: Vec<String>) {
        self.summary = summary;
        self.picker.show(models, current);
    }

    pub fn picker(&self) -> &ModelPicker {
        &self.picker
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<ModelEvent> {
        match self.picker.handle_key(key)? {
            OverlayEvent::Confirmed(model) => Some(ModelEvent::Selected(model)),
            OverlayEvent::Closed => Some(ModelEvent::Back),
        }
    }

    pub fn draw(&self, frame: &mut Frame<'_>, theme: &Theme) {
        let hint = hint_line(HelpTopic::Model);
        let area = draw_chrome(
            frame,
            &Chrome {
                title: "loopwright",
                step: "Step 4/5 - Model",
                hint: &hint,
                status: "Pick the model that drives the loop.",
            },
            theme,
        );
        let lines = self
            .summary
            .iter()
            .map(|line| Line::from(Span::styled(line.clone(), theme.text)))
            .collect();
        draw_panel(frame, area, lines);
        draw_popup(frame, self.picker.render(theme), 50, 50);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn models() -> Vec<String> {
        vec!["sonnet".to_string(), "opus".to_string()]
    }

    #[test]
    fn enter_preselects_current_and_confirms() {
        let mut screen = ModelScreen::default();
        screen.enter(models(), Some("opus"), Vec::new());
        assert_eq!(screen.picker().selected(), Some("opus"));
        screen.handle_key(key(KeyCode::Char('k')));
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)),
            Some(ModelEvent::Selected("sonnet".to_string()))
        );
        assert!(!screen.picker().is_visible());
    }

    #[test]
    fn esc_goes_back() {
        let mut screen = ModelScreen::default();
        screen.enter(models(), None, Vec::new());
        assert_eq!(screen.handle_key(key(KeyCode::Esc)), Some(ModelEvent::Back));
    }
}
