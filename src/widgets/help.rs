use super::overlay::{Overlay, OverlayEvent, Visibility};
use super::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::text::{Line, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub keys: &'static str,
    pub action: &'static str,
}

const fn shortcut(keys: &'static str, action: &'static str) -> Shortcut {
    Shortcut { keys, action }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Directory,
    Tasks,
    Analysis,
    Model,
    Monitor,
}

impl HelpTopic {
    pub fn title(self) -> &'static str {
        match self {
            HelpTopic::Directory => "Project directory",
            HelpTopic::Tasks => "Tasks",
            HelpTopic::Analysis => "Build & test analysis",
            HelpTopic::Model => "Model",
            HelpTopic::Monitor => "Loop monitor",
        }
    }
}

const DIRECTORY_SHORTCUTS: [Shortcut; 4] = [
    shortcut("Up/Down, k/j", "move selection"),
    shortcut("Enter", "select directory"),
    shortcut("Esc", "leave manual entry / cancel"),
    shortcut("Ctrl+C", "quit"),
];

const TASK_SHORTCUTS: [Shortcut; 8] = [
    shortcut("Up/Down, k/j", "move selection"),
    shortcut("a", "add task"),
    shortcut("e", "edit task"),
    shortcut("d", "delete task"),
    shortcut("i", "import task list"),
    shortcut("Enter", "continue"),
    shortcut("Esc", "back"),
    shortcut("?", "toggle help"),
];

const ANALYSIS_SHORTCUTS: [Shortcut; 6] = [
    shortcut("Tab/Shift+Tab", "next/previous field"),
    shortcut("Enter, Space", "toggle checkbox / press button"),
    shortcut("r", "re-analyze project"),
    shortcut("Ctrl+R", "re-analyze from any field"),
    shortcut("Esc", "back"),
    shortcut("?", "toggle help"),
];

const MODEL_SHORTCUTS: [Shortcut; 3] = [
    shortcut("Up/Down, k/j", "move selection"),
    shortcut("Enter", "select model"),
    shortcut("Esc", "back"),
];

const MONITOR_SHORTCUTS: [Shortcut; 9] = [
    shortcut("Up/Down, k/j", "scroll one line"),
    shortcut("PgUp/PgDn", "scroll one page"),
    shortcut("g/Home", "go to top"),
    shortcut("G/End", "go to bottom and follow"),
    shortcut("f", "toggle follow"),
    shortcut("c", "clear log"),
    shortcut("o", "open log in editor"),
    shortcut("?", "toggle help"),
    shortcut("q", "quit"),
];

pub fn shortcuts_for(topic: HelpTopic) -> &'static [Shortcut] {
    match topic {
        HelpTopic::Directory => &DIRECTORY_SHORTCUTS,
        HelpTopic::Tasks => &TASK_SHORTCUTS,
        HelpTopic::Analysis => &ANALYSIS_SHORTCUTS,
        HelpTopic::Model => &MODEL_SHORTCUTS,
        HelpTopic::Monitor => &MONITOR_SHORTCUTS,
    }
}

/// One-line hint for the footer of a screen.
pub fn hint_line(topic: HelpTopic) -> String {
    shortcuts_for(topic)
        .iter()
        .map(|entry| format!("{} {}", entry.keys, entry.action))
        .collect::<Vec<_>>()
        .join(" | ")
}

#[derive(Debug, Clone)]
pub struct HelpOverlay {
    visibility: Visibility,
    topic: HelpTopic,
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self {
            visibility: Visibility::default(),
            topic: HelpTopic::Directory,
        }
    }
}

impl HelpOverlay {
    pub fn show(&mut self, topic: HelpTopic) {
        self.topic = topic;
        self.visibility.show();
    }

    pub fn topic(&self) -> HelpTopic {
        self.topic
    }
}

impl Overlay for HelpOverlay {
    type Output = ();

    fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    fn hide(&mut self) {
        self.visibility.hide();
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<OverlayEvent<()>> {
        if !self.visibility.accepts(&key) {
            return None;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => {
                Some(self.visibility.dismiss())
            }
            _ => None,
        }
    }

    fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        if !self.is_visible() {
            return Vec::new();
        }
        let entries = shortcuts_for(self.topic);
        let width = entries
            .iter()
            .map(|entry| entry.keys.chars().count())
            .max()
            .unwrap_or(0);
        let mut lines = vec![
            Line::from(Span::styled(
                format!("Help: {}", self.topic.title()),
                theme.title,
            )),
            Line::raw(""),
        ];
        lines.extend(entries.iter().map(|entry| {
            Line::from(vec![
                Span::styled(format!("{:<width$}", entry.keys), theme.accent),
                Span::raw("  "),
                Span::raw(entry.action),
            ])
        }));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::line_text;
    use crossterm::event::KeyModifiers;

    #[test]
    fn every_topic_has_shortcuts() {
        for topic in [
            HelpTopic::Directory,
            HelpTopic::Tasks,
            HelpTopic::Analysis,
            HelpTopic::Model,
            HelpTopic::Monitor,
        ] {
            assert!(!shortcuts_for(topic).is_empty());
        }
        assert!(hint_line(HelpTopic::Monitor).contains("f toggle follow"));
    }

    #[test]
    fn renders_aligned_rows_and_closes_on_question_mark() {
        let mut help = HelpOverlay::default();
        help.show(HelpTopic::Model);
        let lines = help.render(&Theme::plain());
        assert_eq!(line_text(&lines[0]), "Help: Model");
        assert_eq!(line_text(&lines[3]), "Enter         select model");

        let close = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::NONE);
        assert_eq!(help.handle_key(close), Some(OverlayEvent::Closed));
        assert!(help.render(&Theme::plain()).is_empty());
    }
}
