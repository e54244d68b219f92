use ratatui::style::{Color, Modifier, Style};

/// Styles handed to every `render` call. Widgets never hold style state of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub title: Style,
    pub text: Style,
    pub focused: Style,
    pub selected: Style,
    pub muted: Style,
    pub error: Style,
    pub accent: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            text: Style::default(),
            focused: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            selected: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            muted: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::Red),
            accent: Style::default().fg(Color::Green),
        }
    }
}

impl Theme {
    /// Unstyled theme, used by scripted runs and tests.
    pub fn plain() -> Self {
        Self {
            title: Style::default(),
            text: Style::default(),
            focused: Style::default(),
            selected: Style::default(),
            muted: Style::default(),
            error: Style::default(),
            accent: Style::default(),
        }
    }
}
