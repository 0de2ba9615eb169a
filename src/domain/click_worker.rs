//! Background worker that persists click telemetry.
//!
//! Redirect handlers enqueue [`ClickEvent`]s on a bounded channel; this worker
//! drains the channel and writes each event through a [`ClickRepository`].
//! Writes run concurrently up to a configured limit and are retried with
//! exponential backoff before being counted as failed.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::ClickRepository;

const RETRY_BASE_MS: u64 = 20;
const RETRY_MAX_DELAY: Duration = Duration::from_secs(1);
const RETRY_ATTEMPTS: usize = 3;

/// Runs until every sender of `rx` has been dropped and all in-flight writes
/// have completed.
///
/// # Arguments
///
/// * `rx` - Receiving half of the click queue
/// * `clicks` - Repository used to persist clicks
/// * `concurrency` - Maximum number of writes in flight at once
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    clicks: Arc<dyn ClickRepository>,
    concurrency: usize,
) {
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    tracing::info!(concurrency, "click worker started");

    while let Some(event) = rx.recv().await {
        let Ok(permit) = permits.clone().acquire_owned().await else {
            break;
        };
        let clicks = clicks.clone();

        tokio::spawn(async move {
            let _permit = permit;
            persist(clicks.as_ref(), event).await;
        });
    }

    // Wait for in-flight writes by taking every permit back.
    let _ = permits.acquire_many(concurrency.max(1) as u32).await;
    tracing::info!("click worker stopped");
}

async fn persist(clicks: &dyn ClickRepository, event: ClickEvent) {
    let strategy = ExponentialBackoff::from_millis(RETRY_BASE_MS)
        .max_delay(RETRY_MAX_DELAY)
        .map(jitter)
        .take(RETRY_ATTEMPTS);

    let code = event.code.clone();
    let new_click = event.into_new_click();

    let result = Retry::spawn(strategy, || clicks.record_click(new_click.clone())).await;

    match result {
        Ok(click) => {
            tracing::debug!(code = %code, click_id = click.id, "click recorded");
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            tracing::warn!(code = %code, error = %e, "failed to record click");
        }
    }
}
