use futures::FutureExt;
use log::{debug, info, warn};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::RunSettings;
use crate::core::UrlTarget;
use crate::core::error::Result;
use crate::reporting::logging;
use crate::validation::aggregator::Aggregator;
use crate::validation::checker::{CheckUrl, Checker};
use crate::validation::outcome::{CheckKind, CheckOutcome};
use crate::validation::report::BatchReport;

/// Receives `(completed, total)` after every recorded outcome.
///
/// Called from worker tasks, so implementations must return promptly.
pub trait ProgressSink: Send + Sync {
    fn report(&self, completed: usize, total: usize);
}

impl ProgressSink for mpsc::UnboundedSender<(usize, usize)> {
    fn report(&self, completed: usize, total: usize) {
        // A dropped receiver only means nobody is watching
        let _ = self.send((completed, total));
    }
}

/// Runs checks over a batch of targets with a bounded number in flight.
#[derive(Debug)]
pub struct Dispatcher<C = Checker> {
    checker: Arc<C>,
}

impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            checker: Arc::clone(&self.checker),
        }
    }
}

impl<C: CheckUrl + 'static> Dispatcher<C> {
    pub fn new(checker: C) -> Self {
        Self::from_arc(Arc::new(checker))
    }

    pub fn from_arc(checker: Arc<C>) -> Self {
        Self { checker }
    }

    /// Check every target and wait for all of them.
    pub async fn run(&self, targets: &[UrlTarget], settings: RunSettings) -> Result<BatchReport> {
        self.run_with(targets, settings, None, CancellationToken::new())
            .await
    }

    /// Check every target, reporting progress and stopping early on `cancel`.
    ///
    /// Settings are validated before anything is started. Once `cancel`
    /// fires no new check is started; checks already in flight run to
    /// completion and the returned report holds every recorded outcome,
    /// flagged as cancelled.
    pub async fn run_with(
        &self,
        targets: &[UrlTarget],
        settings: RunSettings,
        progress: Option<Arc<dyn ProgressSink>>,
        cancel: CancellationToken,
    ) -> Result<BatchReport> {
        settings.validate()?;

        let total = targets.len();
        if total == 0 {
            debug!("No targets to check");
            return Ok(BatchReport::default());
        }

        info!(
            "Checking {total} URLs with {} workers (timeout {:?}, verify TLS: {})",
            settings.max_concurrency, settings.timeout, settings.verify_tls
        );

        // More permits than targets would never be used
        let semaphore = Arc::new(Semaphore::new(settings.max_concurrency.min(total)));
        let aggregator = Arc::new(Aggregator::with_capacity(total));
        let completed = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();
        let mut submitted = 0;

        for target in targets {
            let permit = tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    warn!("Cancelled after starting {submitted} of {total} checks");
                    break;
                }
                permit = Arc::clone(&semaphore).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => {
                        warn!("Worker pool closed, skipping remaining URLs");
                        break;
                    }
                },
            };
            submitted += 1;

            let checker = Arc::clone(&self.checker);
            let aggregator = Arc::clone(&aggregator);
            let completed = Arc::clone(&completed);
            let progress = progress.clone();
            let target = target.clone();

            tasks.spawn(async move {
                let _permit = permit;

                let outcome = match AssertUnwindSafe(checker.check(
                    &target,
                    settings.timeout,
                    settings.verify_tls,
                ))
                .catch_unwind()
                .await
                {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!("Check of {} panicked", target.url());
                        CheckOutcome::error(
                            target.url(),
                            CheckKind::Other("check panicked".to_string()),
                            "check panicked",
                            0,
                        )
                    }
                };

                logging::log_outcome(&outcome);
                aggregator.record(outcome);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                if let Some(sink) = progress {
                    sink.report(done, total);
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("Check task failed: {e}");
            }
        }

        let mut report = aggregator.finalize();
        if cancel.is_cancelled() || submitted < total {
            report.mark_cancelled();
        }

        info!(
            "Checked {} URLs: {} working, {} broken, {} errors",
            report.total(),
            report.working(),
            report.broken(),
            report.errors()
        );
        Ok(report)
    }
}
