/// Iteration progress of the running loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    done: u64,
    total: u64,
}

impl Progress {
    pub fn set_progress(&mut self, done: u64, total: u64) {
        self.done = done;
        self.total = total;
    }

    pub fn done(&self) -> u64 {
        self.done
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// Completion in `[0, 1]`; an unknown total reads as zero.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.done as f64 / self.total as f64).clamp(0.0, 1.0)
    }

    pub fn label(&self) -> String {
        if self.total == 0 {
            return "waiting".to_string();
        }
        format!("{}/{}", self.done.min(self.total), self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_handles_zero_total_and_overflow() {
        let mut progress = Progress::default();
        progress.set_progress(5, 10);
        assert_eq!(progress.fraction(), 0.5);
        assert_eq!(progress.label(), "5/10");

        progress.set_progress(0, 0);
        assert_eq!(progress.fraction(), 0.0);
        assert_eq!(progress.label(), "waiting");

        progress.set_progress(12, 10);
        assert_eq!(progress.fraction(), 1.0);
        assert_eq!(progress.label(), "10/10");
    }
}
