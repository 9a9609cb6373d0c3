// file: src/pipeline/progress.rs
// description: stage-level progress reporting for a pipeline run
// reference: uses indicatif for progress bars

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub stages_completed: usize,
    pub stages_skipped: usize,
    pub duration_secs: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of stages that ran, over those that ran or were skipped.
    pub fn completion_rate(&self) -> f64 {
        let total = self.stages_completed + self.stages_skipped;
        if total == 0 {
            return 0.0;
        }
        (self.stages_completed as f64 / total as f64) * 100.0
    }
}

/// One bar across the fixed pipeline stages. Skipped stages still advance
/// the bar so a degraded run reaches the end.
pub struct StageProgress {
    bar: ProgressBar,
    completed: Arc<AtomicUsize>,
    skipped: Arc<AtomicUsize>,
    start_time: Instant,
}

impl StageProgress {
    pub fn new(total_stages: usize) -> Self {
        let bar = ProgressBar::new(total_stages as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
                )
                .expect("Failed to create progress bar template")
                .progress_chars("█▓▒░"),
        );
        Self::with_bar(bar)
    }

    /// No terminal output; counters still track.
    pub fn hidden(total_stages: usize) -> Self {
        let bar = ProgressBar::with_draw_target(
            Some(total_stages as u64),
            ProgressDrawTarget::hidden(),
        );
        Self::with_bar(bar)
    }

    fn with_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            completed: Arc::new(AtomicUsize::new(0)),
            skipped: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn begin_stage(&self, name: &str) {
        self.bar.set_message(format!("{}...", name));
    }

    pub fn complete_stage(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
    }

    pub fn skip_stage(&self, name: &str) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
        self.bar.inc(1);
        self.bar.set_message(format!("{} skipped", name));
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Pipeline complete");
    }

    pub fn get_stats(&self) -> RunStats {
        RunStats {
            stages_completed: self.completed.load(Ordering::SeqCst),
            stages_skipped: self.skipped.load(Ordering::SeqCst),
            duration_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Drop for StageProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_stats_completion_rate() {
        let stats = RunStats {
            stages_completed: 4,
            stages_skipped: 2,
            duration_secs: 1,
        };
        assert!((stats.completion_rate() - 66.666).abs() < 0.01);
    }

    #[test]
    fn test_run_stats_empty() {
        assert_eq!(RunStats::new().completion_rate(), 0.0);
    }

    #[test]
    fn test_stage_progress_counters() {
        let progress = StageProgress::hidden(6);

        progress.begin_stage("extracting");
        progress.complete_stage();
        progress.skip_stage("visualizing");
        progress.complete_stage();

        let stats = progress.get_stats();
        assert_eq!(stats.stages_completed, 2);
        assert_eq!(stats.stages_skipped, 1);
    }
}
