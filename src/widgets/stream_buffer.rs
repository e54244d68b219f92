//! Append-only text buffer for streamed process output.
//!
//! Appends only touch the tail of the line list; the joined text is rebuilt at
//! most once per render through [`StreamBuffer::materialize`]. The buffer also
//! owns the viewport window (offset + height) and the auto-follow flag.

use super::theme::Theme;
use ratatui::text::{Line, Span};

const LINE_TERMINATOR: char = '\n';

#[derive(Debug, Clone)]
pub struct StreamBuffer {
    lines: Vec<String>,
    last_line_open: bool,
    dirty: bool,
    materialized: String,
    auto_follow: bool,
    offset: usize,
    height: usize,
}

impl Default for StreamBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamBuffer {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            last_line_open: true,
            dirty: false,
            materialized: String::new(),
            auto_follow: true,
            offset: 0,
            height: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn last_line_open(&self) -> bool {
        self.last_line_open
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn auto_follow(&self) -> bool {
        self.auto_follow
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Appends a chunk of raw output. When the last line is still open the first
    /// segment of `chunk` extends it. `\r\n` terminators are stored without `\r`.
    pub fn append_text(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        let terminated = chunk.ends_with(LINE_TERMINATOR);
        let body = if terminated {
            &chunk[..chunk.len() - LINE_TERMINATOR.len_utf8()]
        } else {
            chunk
        };
        let mut segments = body.split(LINE_TERMINATOR);
        let first = segments.next().unwrap_or_default();
        match self.lines.last_mut() {
            Some(last) if self.last_line_open => last.push_str(first),
            _ => self.lines.push(first.to_string()),
        }
        for segment in segments {
            self.close_last_line();
            self.lines.push(segment.to_string());
        }
        if terminated {
            self.close_last_line();
        }
        self.last_line_open = !terminated;
        self.dirty = true;
    }

    /// Appends one already-split line. The new line is closed even if the previous
    /// line was left open.
    pub fn append_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
        self.last_line_open = false;
        self.dirty = true;
    }

    /// Replaces the whole buffer in one step.
    pub fn set_content(&mut self, full: &str) {
        self.lines.clear();
        self.last_line_open = true;
        self.append_text(full);
        self.offset = self.offset.min(self.max_offset());
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.last_line_open = true;
        self.dirty = false;
        self.materialized.clear();
        self.auto_follow = true;
        self.offset = 0;
    }

    /// Rebuilds the cached joined text if anything changed, then pins the viewport
    /// to the last line when following.
    pub fn materialize(&mut self) -> &str {
        if self.dirty {
            self.materialized = self.lines.join("\n");
            self.dirty = false;
        }
        if self.auto_follow {
            self.offset = self.max_offset();
        }
        &self.materialized
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        if self.auto_follow {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height.max(1))
    }

    fn close_last_line(&mut self) {
        if let Some(last) = self.lines.last_mut() {
            if last.ends_with('\r') {
                last.pop();
            }
        }
    }

    pub fn scroll_up(&mut self, amount: usize) {
        self.offset = self.offset.saturating_sub(amount);
        self.auto_follow = false;
    }

    /// Re-enables following when the scroll lands on the last line.
    pub fn scroll_down(&mut self, amount: usize) {
        let max = self.max_offset();
        self.offset = self.offset.saturating_add(amount).min(max);
        if self.offset == max {
            self.auto_follow = true;
        }
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.height.max(1));
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height.max(1));
    }

    pub fn goto_top(&mut self) {
        self.offset = 0;
        self.auto_follow = false;
    }

    pub fn goto_bottom(&mut self) {
        self.offset = self.max_offset();
        self.auto_follow = true;
    }

    pub fn toggle_follow(&mut self) {
        if self.auto_follow {
            self.auto_follow = false;
        } else {
            self.goto_bottom();
        }
    }

    /// Lines inside the viewport window. Cost is bounded by the window height.
    pub fn visible_lines(&self) -> &[String] {
        let start = self.offset.min(self.lines.len());
        let end = start.saturating_add(self.height.max(1)).min(self.lines.len());
        &self.lines[start..end]
    }

    pub fn render(&self, theme: &Theme) -> Vec<Line<'static>> {
        self.visible_lines()
            .iter()
            .map(|line| Line::from(Span::styled(line.clone(), theme.text)))
            .collect()
    }

    /// Scroll position as a percentage, for the status line.
    pub fn scroll_percent(&self) -> u16 {
        let max = self.max_offset();
        if max == 0 {
            return 100;
        }
        ((self.offset.min(max) * 100) / max) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(count: usize, height: usize) -> StreamBuffer {
        let mut buffer = StreamBuffer::new();
        buffer.set_height(height);
        for idx in 0..count {
            buffer.append_line(&format!("line {idx}"));
        }
        buffer.materialize();
        buffer
    }

    #[test]
    fn streaming_chunks_continue_open_lines() {
        let mut buffer = StreamBuffer::new();
        buffer.append_text("hello ");
        buffer.append_text("world\n");
        buffer.append_text("next");
        assert_eq!(buffer.lines(), ["hello world", "next"]);
        assert!(buffer.last_line_open());
        assert_eq!(buffer.materialize(), "hello world\nnext");
    }

    #[test]
    fn crlf_split_across_chunks_is_stripped() {
        let mut buffer = StreamBuffer::new();
        buffer.append_text("build ok\r");
        buffer.append_text("\nnext\r\n");
        assert_eq!(buffer.lines(), ["build ok", "next"]);
        assert!(!buffer.last_line_open());
    }

    #[test]
    fn append_line_closes_after_open_text() {
        let mut buffer = StreamBuffer::new();
        buffer.append_text("partial");
        buffer.append_line("whole");
        buffer.append_text("tail");
        assert_eq!(buffer.lines(), ["partial", "whole", "tail"]);
    }

    #[test]
    fn empty_chunk_is_a_no_op() {
        let mut buffer = StreamBuffer::new();
        buffer.append_text("");
        assert!(buffer.lines().is_empty());
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn materialize_is_idempotent() {
        let mut buffer = StreamBuffer::new();
        buffer.append_text("a\nb");
        assert!(buffer.is_dirty());
        let first = buffer.materialize().to_string();
        assert!(!buffer.is_dirty());
        let second = buffer.materialize().to_string();
        assert_eq!(first, second);
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn set_content_derives_open_state() {
        let mut buffer = StreamBuffer::new();
        buffer.set_content("a\nb\n");
        assert_eq!(buffer.lines(), ["a", "b"]);
        assert!(!buffer.last_line_open());
        buffer.set_content("");
        assert!(buffer.lines().is_empty());
        assert!(buffer.last_line_open());
        assert_eq!(buffer.materialize(), "");
    }

    #[test]
    fn clear_returns_to_empty_following_state() {
        let mut buffer = filled(10, 3);
        buffer.goto_top();
        buffer.append_text("open");
        buffer.clear();
        assert!(buffer.lines().is_empty());
        assert!(buffer.last_line_open());
        assert!(!buffer.is_dirty());
        assert!(buffer.auto_follow());
        assert_eq!(buffer.offset(), 0);
        assert_eq!(buffer.materialize(), "");
    }

    #[test]
    fn upward_scroll_disables_follow_and_reaching_bottom_restores_it() {
        let mut buffer = filled(10, 3);
        assert_eq!(buffer.offset(), 7);
        buffer.scroll_up(2);
        assert!(!buffer.auto_follow());
        assert_eq!(buffer.offset(), 5);
        buffer.scroll_down(1);
        assert!(!buffer.auto_follow());
        buffer.scroll_down(1);
        assert!(buffer.auto_follow());
        assert_eq!(buffer.visible_lines(), ["line 7", "line 8", "line 9"]);
    }

    #[test]
    fn goto_top_and_bottom_set_follow() {
        let mut buffer = filled(10, 3);
        buffer.goto_top();
        assert!(!buffer.auto_follow());
        assert_eq!(buffer.offset(), 0);
        buffer.append_line("line 10");
        buffer.materialize();
        assert_eq!(buffer.offset(), 0);

        buffer.goto_bottom();
        assert!(buffer.auto_follow());
        assert_eq!(buffer.offset(), 8);
    }

    #[test]
    fn following_tracks_new_output_at_materialize_time() {
        let mut buffer = filled(5, 3);
        buffer.append_line("line 5");
        assert_eq!(buffer.offset(), 2);
        buffer.materialize();
        assert_eq!(buffer.offset(), 3);
        assert_eq!(buffer.visible_lines().last().map(String::as_str), Some("line 5"));
    }

    #[test]
    fn toggle_follow_jumps_to_bottom_when_enabling() {
        let mut buffer = filled(10, 4);
        buffer.goto_top();
        buffer.toggle_follow();
        assert!(buffer.auto_follow());
        assert_eq!(buffer.offset(), 6);
        buffer.toggle_follow();
        assert!(!buffer.auto_follow());
        assert_eq!(buffer.offset(), 6);
    }

    #[test]
    fn page_movement_uses_viewport_height() {
        let mut buffer = filled(20, 5);
        buffer.page_up();
        assert_eq!(buffer.offset(), 10);
        buffer.goto_top();
        buffer.page_down();
        assert_eq!(buffer.offset(), 5);
        assert_eq!(buffer.scroll_percent(), 33);
    }
}
