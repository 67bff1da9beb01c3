use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use lexcrawl_core::{update, BatchReport, BatchState, Effect, Msg};
use lexcrawl_logging::{crawl_debug, crawl_info};
use tokio_util::sync::CancellationToken;

use crate::pipeline::DocumentPipeline;

/// Drives the core batch state machine: one URL at a time, in input order,
/// with `delay` between consecutive items.
pub struct BatchOrchestrator<P> {
    pipeline: P,
    delay: Duration,
}

impl<P: DocumentPipeline> BatchOrchestrator<P> {
    pub fn new(pipeline: P, delay: Duration) -> Self {
        Self { pipeline, delay }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Process every URL exactly once. Per-item failures are part of the
    /// report; this never fails.
    pub async fn run(&self, urls: &[String], output_dir: &Path) -> BatchReport {
        self.run_until_cancelled(urls, output_dir, &CancellationToken::new())
            .await
    }

    /// Like [`run`](Self::run), but stops starting new items once `cancel`
    /// fires. An in-flight item always completes; the rest are `Skipped`.
    pub async fn run_until_cancelled(
        &self,
        urls: &[String],
        output_dir: &Path,
        cancel: &CancellationToken,
    ) -> BatchReport {
        let total = urls.len();
        let mut state = BatchState::new(urls.iter().cloned());
        let mut inbox = VecDeque::new();
        if cancel.is_cancelled() {
            inbox.push_back(Msg::CancelRequested);
        }
        inbox.push_back(Msg::Start);

        crawl_info!("Batch of {} URL(s) into {:?}", total, output_dir);
        while let Some(msg) = inbox.pop_front() {
            let (next, effects) = update(state, msg);
            state = next;
            for effect in effects {
                match effect {
                    Effect::Process { index, url } => {
                        crawl_info!("[{}/{}] {}", index + 1, total, url);
                        let outcome = self.pipeline.process(&url, output_dir).await;
                        if cancel.is_cancelled() {
                            inbox.push_back(Msg::CancelRequested);
                        }
                        inbox.push_back(Msg::ItemCompleted {
                            index,
                            status: outcome.status,
                        });
                    }
                    Effect::Wait => {
                        crawl_debug!("Waiting {:?} before next item", self.delay);
                        tokio::select! {
                            _ = tokio::time::sleep(self.delay) => inbox.push_back(Msg::DelayElapsed),
                            _ = cancel.cancelled() => inbox.push_back(Msg::CancelRequested),
                        }
                    }
                    Effect::Finished => {}
                }
            }
        }

        let report = state.report();
        crawl_info!("Batch finished: {}", report);
        report
    }
}
