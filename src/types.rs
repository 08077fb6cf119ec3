//! Application-level types for the root crate

/// A simulated print job feeding line progress in fixed steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackJob {
    total_lines: usize,
    steps: usize,
}

impl PlaybackJob {
    pub fn new(total_lines: usize, steps: usize) -> Self {
        Self {
            total_lines,
            steps: steps.max(1),
        }
    }

    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Lines sent once `step` (zero based) has completed; the last step
    /// reports the final line
    pub fn line_for_step(&self, step: usize) -> usize {
        let step = step.min(self.steps - 1) + 1;
        self.total_lines * step / self.steps
    }
}
