use std::future::Future;
use std::time::{Duration, Instant};

use tracing::Instrument;

/// Runs `future` until it completes or `timeout` elapses, and logs how long it took.
/// When the timeout elapses, the future is dropped, which cancels whatever request it was
/// waiting for, and `None` is returned.
pub async fn run_bounded<T, Fut>(operation: &str, timeout: Duration, future: Fut) -> Option<T>
where
    Fut: Future<Output = T>,
{
    let start = Instant::now();

    let span = tracing::debug_span!("Bounded", operation = operation);
    span.in_scope(|| {
        tracing::trace!("Starting");
    });

    let result = tokio::time::timeout(timeout, future.instrument(span.clone())).await;
    let duration = start.elapsed();

    span.in_scope(|| match result {
        Ok(_) => tracing::debug!(
            duration = format!("{:.2}ms", duration.as_secs_f64() * 1000.0),
            "Completed"
        ),
        Err(_) => tracing::warn!("Timed out after {}s", timeout.as_secs()),
    });

    result.ok()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::utils::timing::run_bounded;

    #[tokio::test]
    async fn completes_within_timeout() {
        assert_eq!(
            run_bounded("answer", Duration::from_secs(1), async { 42 }).await,
            Some(42)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancels_after_timeout() {
        let result = run_bounded(
            "sleep",
            Duration::from_secs(180),
            tokio::time::sleep(Duration::from_secs(3600)),
        )
        .await;
        assert_eq!(result, None);
    }
}
