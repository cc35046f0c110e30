//! Phase progress tracking for generation and rendering

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PHASE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] {{prefix:>10}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Coordinates progress display for the generation and rendering phases
///
/// Each phase gets its own bar, finished with a failure tally when the
/// phase ends.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    current: Option<ProgressBar>,
    failures: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            current: None,
            failures: 0,
        }
    }

    /// Start a new phase of `len` steps, finishing any phase in progress
    pub fn start_phase(&mut self, label: &str, len: usize) {
        self.finish_phase();
        let bar = ProgressBar::new(len as u64);
        bar.set_style(PHASE_STYLE.clone());
        bar.set_prefix(label.to_string());
        self.current = Some(self.multi_progress.add(bar));
        self.failures = 0;
    }

    /// Advance the current phase by one step
    pub fn advance(&self, message: &str) {
        if let Some(ref bar) = self.current {
            bar.set_message(message.to_string());
            bar.inc(1);
        }
    }

    /// Advance the current phase by one failed step
    pub fn advance_failed(&mut self, message: &str) {
        self.failures += 1;
        let note = format!("{message} ({} failed)", self.failures);
        self.advance(&note);
    }

    /// Steps completed in the current phase
    pub fn position(&self) -> u64 {
        self.current.as_ref().map_or(0, ProgressBar::position)
    }

    /// Failed steps in the current phase
    pub const fn failures(&self) -> usize {
        self.failures
    }

    /// Mark the current phase as done
    pub fn finish_phase(&mut self) {
        if let Some(bar) = self.current.take() {
            let message = if self.failures == 0 {
                "done".to_string()
            } else {
                format!("done, {} failed", self.failures)
            };
            bar.finish_with_message(message);
        }
    }

    /// Clean up all progress displays
    pub fn finish(&mut self) {
        self.finish_phase();
        let _ = self.multi_progress.clear();
    }
}
