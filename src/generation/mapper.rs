// src/generation/mapper.rs
//! Bounded concurrent mapping over an ordered input sequence.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Runs `op` over `items` with at most `limit` invocations in flight at once.
///
/// The output has exactly one slot per input, in input order, regardless of
/// completion order. The mapper itself is policy-free: it never short-circuits,
/// so callers wanting fail-soft behavior make `O` a `Result` and decide per
/// slot. A `limit` of zero is treated as one.
pub async fn map_concurrent<I, O, F, Fut>(items: Vec<I>, limit: usize, op: F) -> Vec<O>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = O>,
{
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let tasks = items.into_iter().map(|item| {
        let semaphore = Arc::clone(&semaphore);
        let fut = op(item);
        async move {
            // The semaphore lives for the whole call and is never closed.
            let _permit = semaphore
                .acquire()
                .await
                .expect("mapper semaphore is never closed");
            fut.await
        }
    });
    futures::future::join_all(tasks).await
}
