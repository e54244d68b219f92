pub fn clamp_selection(selected: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    selected.min(len - 1)
}

/// Cursor into a list with bounds-clamped movement (no wraparound).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn select(&mut self, index: usize, len: usize) {
        self.index = clamp_selection(index, len);
    }

    pub fn move_prev(&mut self) {
        self.index = self.index.saturating_sub(1);
    }

    pub fn move_next(&mut self, len: usize) {
        self.index = clamp_selection(self.index + 1, len);
    }

    pub fn clamp(&mut self, len: usize) {
        self.index = clamp_selection(self.index, len);
    }
}
