use super::field::is_actionable;
use super::theme::Theme;
use crossterm::event::KeyEvent;
use ratatui::text::Line;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEvent<T> {
    Confirmed(T),
    Closed,
}

/// Visibility gate shared by every overlay. Both terminal actions hide the overlay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility {
    visible: bool,
}

impl Visibility {
    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn accepts(&self, key: &KeyEvent) -> bool {
        self.visible && is_actionable(key)
    }

    pub fn confirm<T>(&mut self, payload: T) -> OverlayEvent<T> {
        self.visible = false;
        OverlayEvent::Confirmed(payload)
    }

    pub fn dismiss<T>(&mut self) -> OverlayEvent<T> {
        self.visible = false;
        OverlayEvent::Closed
    }
}

/// A modal panel. While invisible it consumes no keys and renders nothing.
pub trait Overlay {
    type Output;

    fn is_visible(&self) -> bool;

    /// External dismissal; emits nothing.
    fn hide(&mut self);

    fn handle_key(&mut self, key: KeyEvent) -> Option<OverlayEvent<Self::Output>>;

    fn render(&self, theme: &Theme) -> Vec<Line<'static>>;
}
