use super::{draw_chrome, draw_popup, main_panel_block, Chrome};
use crate::widgets::{
    hint_line, HelpOverlay, HelpTopic, Overlay, Progress, StreamBuffer, Theme,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

/// Lines of this form in the loop output update the progress gauge.
pub const PROGRESS_MARKER: &str = "loopwright:progress ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    OpenInEditor(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
    Exited(Option<i32>),
}

#[derive(Debug)]
pub struct MonitorScreen {
    buffer: StreamBuffer,
    progress: Progress,
    help: HelpOverlay,
    state: LoopState,
    status: String,
}

impl Default for MonitorScreen {
    fn default() -> Self {
        Self {
            buffer: StreamBuffer::new(),
            progress: Progress::default(),
            help: HelpOverlay::default(),
            state: LoopState::Idle,
            status: String::new(),
        }
    }
}

fn parse_progress(line: &str) -> Option<(u64, u64)> {
    let rest = line.trim().strip_prefix(PROGRESS_MARKER.trim_end())?;
    let (done, total) = rest.trim().split_once('/')?;
    Some((done.trim().parse().ok()?, total.trim().parse().ok()?))
}

impl MonitorScreen {
    pub fn start(&mut self, command: &str) {
        self.buffer.clear();
        self.progress.set_progress(0, 0);
        self.state = LoopState::Running;
        self.status = format!("running `{command}`");
    }

    /// Shows the finished plan when no loop command is configured.
    pub fn show_plan(&mut self, summary: &[String]) {
        self.buffer.clear();
        self.progress.set_progress(0, 0);
        self.state = LoopState::Idle;
        for line in summary {
            self.buffer.append_line(line);
        }
        self.status = "no loop_command configured; plan shown only".to_string();
    }

    pub fn buffer(&self) -> &StreamBuffer {
        &self.buffer
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Feeds raw process output into the log and picks up progress markers from
    /// the lines this chunk closed.
    pub fn append_chunk(&mut self, chunk: &str) {
        let before = self.buffer.line_count();
        let start = if self.buffer.last_line_open() && before > 0 {
            before - 1
        } else {
            before
        };
        self.buffer.append_text(chunk);
        let after = self.buffer.line_count();
        let end = if self.buffer.last_line_open() {
            after.saturating_sub(1)
        } else {
            after
        };
        let closed = self.buffer.lines().get(start..end).unwrap_or_default();
        if let Some((done, total)) = closed.iter().rev().find_map(|line| parse_progress(line)) {
            self.progress.set_progress(done, total);
        }
    }

    pub fn loop_exited(&mut self, code: Option<i32>) {
        self.state = LoopState::Exited(code);
        self.status = match code {
            Some(0) => "loop finished".to_string(),
            Some(code) => format!("loop exited with status {code}"),
            None => "loop terminated by signal".to_string(),
        };
        self.buffer.append_line(&format!("[loopwright] {}", self.status));
    }

    pub fn loop_failed(&mut self, err: &str) {
        self.state = LoopState::Exited(None);
        self.status = format!("failed to start loop: {err}");
    }

    pub fn editor_closed(&mut self, result: Result<(), String>) {
        self.status = match result {
            Ok(()) => "editor closed".to_string(),
            Err(err) => format!("editor failed: {err}"),
        };
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<MonitorEvent> {
        if self.help.is_visible() {
            self.help.handle_key(key);
            return None;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.buffer.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => self.buffer.scroll_down(1),
            KeyCode::PageUp => self.buffer.page_up(),
            KeyCode::PageDown => self.buffer.page_down(),
            KeyCode::Home | KeyCode::Char('g') => self.buffer.goto_top(),
            KeyCode::End | KeyCode::Char('G') => self.buffer.goto_bottom(),
            KeyCode::Char('f') => self.buffer.toggle_follow(),
            KeyCode::Char('c') => {
                self.buffer.clear();
                    }
            KeyCode::Char('o') => {
                let content = self.buffer.materialize().to_string();
                return Some(MonitorEvent::OpenInEditor(content));
            }
            KeyCode::Char('?') => self.help.show(HelpTopic::Monitor),
            KeyCode::Char('q') => return Some(MonitorEvent::Quit),
            _ => {}
        }
        None
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>, theme: &Theme) {
        let hint = hint_line(HelpTopic::Monitor);
        let follow = if self.buffer.auto_follow() {
            "follow"
        } else {
            "paused"
        };
        let status = format!(
            "{} | {follow} | {}%",
            self.status,
            self.buffer.scroll_percent()
        );
        let area = draw_chrome(
            frame,
            &Chrome {
                title: "loopwright",
                step: "Step 5/5 - Loop monitor",
                hint: &hint,
                status: &status,
            },
            theme,
        );
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title("Progress"))
            .gauge_style(theme.accent)
            .ratio(self.progress.fraction())
            .label(self.progress.label());
        frame.render_widget(gauge, chunks[0]);

        let block = main_panel_block().title("Output");
        let inner = block.inner(chunks[1]);
        self.buffer.set_height(usize::from(inner.height));
        self.buffer.materialize();
        let log = Paragraph::new(self.buffer.render(theme)).block(block);
        frame.render_widget(log, chunks[1]);
        draw_popup(frame, self.help.render(theme), 60, 60);
    }
}
