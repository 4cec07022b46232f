//! Bounded, cancellable fan-out of independent sub-aggregations.

use std::future::Future;

use futures::stream::{self, StreamExt, TryStreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::error::ReportError;

/// Runs `tasks` with at most `limit` in flight.
///
/// Results come back in input order regardless of completion order. The
/// first error aborts the remaining tasks, and so does cancelling `cancel`,
/// which yields `ReportError::Cancelled`.
pub async fn run_bounded<I, F, T>(
    tasks: I,
    limit: usize,
    cancel: &CancellationToken,
) -> Result<Vec<T>, ReportError>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, ReportError>>,
{
    let tasks: Vec<F> = tasks.into_iter().collect();
    debug!(tasks = tasks.len(), limit, "Fanning out sub-aggregations");

    let all = stream::iter(tasks).buffered(limit.max(1)).try_collect::<Vec<T>>();

    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ReportError::Cancelled),
        result = all => result,
    }
}

/// Runs a single future under the cancellation token.
pub async fn cancellable<F, T>(future: F, cancel: &CancellationToken) -> Result<T, ReportError>
where
    F: Future<Output = Result<T, ReportError>>,
{
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ReportError::Cancelled),
        result = future => result,
    }
}
