//! Wizard screens. Each screen owns its form, overlays and buffers exclusively and
//! reports what happened through its own event type.

pub mod analysis;
pub mod directory;
pub mod model;
pub mod monitor;
pub mod tasks;

pub use analysis::{AnalysisEvent, AnalysisScreen};
pub use directory::{DirectoryEvent, DirectoryScreen};
pub use model::{ModelEvent, ModelScreen};
pub use monitor::{LoopState, MonitorEvent, MonitorScreen};
pub use tasks::{TaskListEvent, TaskListScreen};

use crate::widgets::Theme;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};
use ratatui::Frame;

pub struct Chrome<'a> {
    pub title: &'a str,
    pub step: &'a str,
    pub hint: &'a str,
    pub status: &'a str,
}

/// Draws header and footer and returns the main panel area.
pub fn draw_chrome(frame: &mut Frame<'_>, chrome: &Chrome<'_>, theme: &Theme) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(4),
        ])
        .split(frame.area());
    let header = Paragraph::new(vec![
        Line::from(Span::styled(chrome.title.to_string(), theme.title)),
        Line::from(Span::styled(chrome.step.to_string(), theme.muted)),
    ])
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    let footer = Paragraph::new(vec![
        Line::from(Span::styled(chrome.hint.to_string(), theme.muted)),
        Line::from(format!("Status: {}", chrome.status)),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, chunks[2]);
    chunks[1]
}

pub fn draw_panel(frame: &mut Frame<'_>, area: Rect, lines: Vec<Line<'static>>) {
    let panel = Paragraph::new(lines).block(main_panel_block());
    frame.render_widget(panel, area);
}

/// Renders an overlay's lines in a centered popup. Invisible overlays render no
/// lines and draw nothing.
pub fn draw_popup(frame: &mut Frame<'_>, lines: Vec<Line<'static>>, percent_x: u16, percent_y: u16) {
    if lines.is_empty() {
        return;
    }
    let area = centered_rect(percent_x, percent_y, frame.area());
    frame.render_widget(Clear, area);
    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .padding(Padding::new(2, 2, 1, 1)),
        );
    frame.render_widget(popup, area);
}

pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub(crate) fn main_panel_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .padding(Padding::new(2, 2, 1, 1))
}
