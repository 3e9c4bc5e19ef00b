use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Receives batch progress as a 0–100 percentage.
pub trait ProgressSink {
    fn progress(&mut self, percent: f64, file_name: &str);

    fn finish(&mut self) {}
}

/// Terminal progress bar, hidden when disabled.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        bar.set_message("Processing files...");
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }
}

impl ProgressSink for BarProgress {
    fn progress(&mut self, percent: f64, file_name: &str) {
        self.bar.set_position(percent.round().clamp(0.0, 100.0) as u64);
        self.bar.set_message(file_name.to_string());
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}
