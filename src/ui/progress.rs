use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use crate::validation::ProgressSink;

const URL_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.yellow/red}] {pos}/{len} URLs checked ({eta})";

/// indicatif progress bar fed by the dispatcher's `(completed, total)` updates
pub struct ProgressReporter {
    multi_progress: Arc<MultiProgress>,
    url_progress: Option<ProgressBar>,
    enabled: bool,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: Arc::new(MultiProgress::new()),
            url_progress: None,
            enabled,
        }
    }

    /// Reporter that draws nowhere, for tests and piped output
    pub fn hidden() -> Self {
        Self {
            multi_progress: Arc::new(MultiProgress::with_draw_target(
                ProgressDrawTarget::hidden(),
            )),
            url_progress: None,
            enabled: true,
        }
    }

    pub fn start_url_checks(&mut self, total_urls: usize) {
        if !self.enabled {
            return;
        }

        let pb = self.multi_progress.add(ProgressBar::new(total_urls as u64));
        let style = ProgressStyle::default_bar()
            .template(URL_BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message("Checking URLs");
        pb.enable_steady_tick(Duration::from_millis(120));
        self.url_progress = Some(pb);
    }

    /// Move the bar forward; updates from racing workers may arrive out of order
    pub fn update_url_progress(&self, current: usize) {
        if let Some(ref pb) = self.url_progress {
            pb.set_position(pb.position().max(current as u64));
        }
    }

    pub fn position(&self) -> Option<u64> {
        self.url_progress.as_ref().map(ProgressBar::position)
    }

    pub fn finish_url_checks(&self, working: usize, total: usize) {
        if let Some(ref pb) = self.url_progress {
            let message = if working == total {
                "✓ All URLs working".to_string()
            } else {
                format!("✓ Check complete ({working}/{total} working)")
            };
            pb.finish_with_message(message);
        }
    }

    pub fn finish_and_clear(&self) {
        if self.enabled {
            self.multi_progress.clear().unwrap_or(());
        }
    }

    pub fn log_warning(&self, message: &str) {
        if self.enabled {
            self.multi_progress
                .println(format!("⚠ {message}"))
                .unwrap_or(());
        }
    }
}

impl ProgressSink for ProgressReporter {
    fn report(&self, completed: usize, _total: usize) {
        self.update_url_progress(completed);
    }
}
