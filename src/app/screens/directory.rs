use super::{draw_chrome, draw_panel, draw_popup, Chrome};
use crate::project::{ProjectDetector, RecentProject};
use crate::widgets::{
    hint_line, DirPicker, DirPickerMode, Effect, HelpOverlay, HelpTopic, Overlay, OverlayEvent,
    SelectedDirectory, Theme,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEvent {
    Selected(SelectedDirectory),
    Canceled,
}

pub struct DirectoryScreen {
    picker: DirPicker,
    help: HelpOverlay,
}

impl DirectoryScreen {
    pub fn new(detector: Box<dyn ProjectDetector>) -> Self {
        Self {
            picker: DirPicker::new(detector),
            help: HelpOverlay::default(),
        }
    }

    pub fn enter(&mut self, recents: Vec<RecentProject>) {
        self.help.hide();
        self.picker.show(recents);
    }

    pub fn picker(&self) -> &DirPicker {
        &self.picker
    }

    pub fn take_effect(&mut self) -> Option<Effect> {
        self.picker.take_effect()
    }

    pub fn set_cursor_visible(&mut self, visible: bool) {
        self.picker.set_cursor_visible(visible);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<DirectoryEvent> {
        if self.help.is_visible() {
            self.help.handle_key(key);
            return None;
        }
        if key.code == KeyCode::Char('?') && self.picker.mode() == DirPickerMode::List {
            self.help.show(HelpTopic::Directory);
            return None;
        }
        match self.picker.handle_key(key)? {
            OverlayEvent::Confirmed(selected) => Some(DirectoryEvent::Selected(selected)),
            OverlayEvent::Closed => Some(DirectoryEvent::Canceled),
        }
    }

    pub fn draw(&self, frame: &mut Frame<'_>, theme: &Theme) {
        let hint = hint_line(HelpTopic::Directory);
        let status = self.picker.error().unwrap_or("Choose where the loop should run.");
        let area = draw_chrome(
            frame,
            &Chrome {
                title: "loopwright",
                step: "Step 1/5 - Project directory",
                hint: &hint,
                status,
            },
            theme,
        );
        draw_panel(frame, area, self.picker.render(theme));
        draw_popup(frame, self.help.render(theme), 60, 60);
    }
}
