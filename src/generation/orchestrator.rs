// src/generation/orchestrator.rs
//! The batch generation run: partitions pending rows into fixed-size batches,
//! maps each batch with a bounded concurrency cap, snapshots progress after
//! every batch, and reports progress over a channel. Runs entirely on the
//! background worker; it never touches UI-owned state.

use bevy::log::warn;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use super::client::GenerationError;
use super::mapper::map_concurrent;
use crate::rows::definitions::{AdRow, PendingRow};

/// Batching knobs. Production uses the defaults; tests shrink them.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub batch_size: usize,
    pub concurrency: usize,
    /// Pacing guard between batches so runs do not burst the remote service.
    pub inter_batch_delay: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            concurrency: 3,
            inter_batch_delay: Duration::from_secs(1),
        }
    }
}

/// The text written into a row's ad cell: generated copy on success, an
/// `Error: ...` marker on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub row_index: usize,
    pub ad: String,
}

/// Progress reported to the caller while a run is in flight.
#[derive(Debug, Clone)]
pub enum RunEvent {
    BatchApplied {
        outcomes: Vec<RowOutcome>,
        processed: usize,
        total: usize,
    },
    Finished {
        aborted: bool,
    },
}

/// Drives one generation run to completion.
///
/// Fail-soft: every per-row failure is captured into that row's outcome slot
/// and the run continues with the next batch. `working` is the detached copy
/// of the full working set used for snapshots; outcomes are written into it
/// before each `persist` call. Cancellation is honored at batch boundaries
/// only. Channel sends are best-effort: a dropped receiver ends reporting,
/// not the run's snapshot writes.
pub async fn run_generation<F, Fut, P>(
    pending: Vec<PendingRow>,
    mut working: Vec<AdRow>,
    config: &BatchConfig,
    op: F,
    mut persist: P,
    cancel: Arc<AtomicBool>,
    events: UnboundedSender<RunEvent>,
) where
    F: Fn(PendingRow) -> Fut,
    Fut: std::future::Future<Output = Result<String, GenerationError>>,
    P: FnMut(&[AdRow]) -> Result<(), crate::rows::systems::io::CsvIoError>,
{
    let total = pending.len();
    let mut processed = 0usize;
    let mut batches = pending.chunks(config.batch_size.max(1)).peekable();

    while let Some(batch) = batches.next() {
        if cancel.load(Ordering::Relaxed) {
            let _ = events.send(RunEvent::Finished { aborted: true });
            return;
        }

        let results = map_concurrent(batch.to_vec(), config.concurrency, &op).await;

        let mut outcomes = Vec::with_capacity(batch.len());
        for (row, result) in batch.iter().zip(results) {
            let ad = match result {
                Ok(text) => text,
                Err(err) => format!("Error: {err}"),
            };
            if let Some(slot) = working.get_mut(row.row_index) {
                slot.ad = ad.clone();
            }
            outcomes.push(RowOutcome {
                row_index: row.row_index,
                ad,
            });
        }
        processed += batch.len();

        // Best-effort snapshot; a failed write must not kill the run.
        if let Err(err) = persist(&working) {
            warn!("Autosave snapshot failed: {err}");
        }

        let _ = events.send(RunEvent::BatchApplied {
            outcomes,
            processed,
            total,
        });

        if batches.peek().is_some() {
            tokio::time::sleep(config.inter_batch_delay).await;
        }
    }

    let _ = events.send(RunEvent::Finished { aborted: false });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::mpsc::unbounded_channel;

    fn pending(n: usize) -> Vec<PendingRow> {
        (0..n)
            .map(|i| PendingRow {
                row_index: i,
                name: format!("Product {i}"),
                description: format!("Description {i}"),
            })
            .collect()
    }

    fn working(n: usize) -> Vec<AdRow> {
        (0..n)
            .map(|i| AdRow::new(format!("Product {i}"), format!("Description {i}")))
            .collect()
    }

    fn test_config() -> BatchConfig {
        BatchConfig {
            batch_size: 5,
            concurrency: 3,
            inter_batch_delay: Duration::from_millis(1),
        }
    }

    async fn collect(mut rx: tokio::sync::mpsc::UnboundedReceiver<RunEvent>) -> Vec<RunEvent> {
        let mut events = Vec::new();
        while let Some(ev) = rx.recv().await {
            events.push(ev);
        }
        events
    }

    #[tokio::test]
    async fn twelve_rows_make_three_batches_and_three_snapshots() {
        let (tx, rx) = unbounded_channel();
        let snapshots = AtomicUsize::new(0);
        run_generation(
            pending(12),
            working(12),
            &test_config(),
            |row| async move { Ok(format!("ad for {}", row.name)) },
            |_rows| {
                snapshots.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
            Arc::new(AtomicBool::new(false)),
            tx,
        )
        .await;

        assert_eq!(snapshots.load(Ordering::SeqCst), 3);

        let events = collect(rx).await;
        let progress: Vec<(usize, usize)> = events
            .iter()
            .filter_map(|ev| match ev {
                RunEvent::BatchApplied {
                    processed, total, ..
                } => Some((*processed, *total)),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![(5, 12), (10, 12), (12, 12)]);
        assert!(matches!(
            events.last(),
            Some(RunEvent::Finished { aborted: false })
        ));
    }

    #[tokio::test]
    async fn one_failing_row_does_not_stop_the_run() {
        let (tx, rx) = unbounded_channel();
        run_generation(
            pending(7),
            working(7),
            &test_config(),
            |row| async move {
                if row.row_index == 2 {
                    Err(GenerationError::Service {
                        status: 429,
                        message: "rate limited".to_string(),
                    })
                } else {
                    Ok(format!("ad {}", row.row_index))
                }
            },
            |_rows| Ok(()),
            Arc::new(AtomicBool::new(false)),
            tx,
        )
        .await;

        let events = collect(rx).await;
        let outcomes: Vec<RowOutcome> = events
            .iter()
            .filter_map(|ev| match ev {
                RunEvent::BatchApplied { outcomes, .. } => Some(outcomes.clone()),
                _ => None,
            })
            .flatten()
            .collect();

        assert_eq!(outcomes.len(), 7);
        for outcome in &outcomes {
            if outcome.row_index == 2 {
                assert!(outcome.ad.starts_with("Error: "));
                assert!(outcome.ad.contains("rate limited"));
            } else {
                assert_eq!(outcome.ad, format!("ad {}", outcome.row_index));
            }
        }
        // Both batches ran despite the failure in the first one.
        assert!(matches!(
            events.last(),
            Some(RunEvent::Finished { aborted: false })
        ));
    }

    #[tokio::test]
    async fn outcomes_land_in_the_snapshot_copy() {
        let (tx, _rx) = unbounded_channel();
        let last_snapshot = std::sync::Mutex::new(Vec::new());
        run_generation(
            pending(3),
            working(3),
            &test_config(),
            |row| async move { Ok(format!("ad {}", row.row_index)) },
            |rows| {
                *last_snapshot.lock().unwrap() = rows.to_vec();
                Ok(())
            },
            Arc::new(AtomicBool::new(false)),
            tx,
        )
        .await;

        let snapshot = last_snapshot.lock().unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[1].ad, "ad 1");
        assert_eq!(snapshot[1].name, "Product 1");
    }

    #[tokio::test]
    async fn cancellation_is_honored_between_batches() {
        let (tx, rx) = unbounded_channel();
        let cancel = Arc::new(AtomicBool::new(false));
        let cancel_for_op = Arc::clone(&cancel);
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_for_op = Arc::clone(&calls);

        run_generation(
            pending(12),
            working(12),
            &test_config(),
            move |row| {
                let cancel = Arc::clone(&cancel_for_op);
                let calls = Arc::clone(&calls_for_op);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    // Request cancellation during the first batch.
                    cancel.store(true, Ordering::Relaxed);
                    Ok(format!("ad {}", row.row_index))
                }
            },
            |_rows| Ok(()),
            Arc::clone(&cancel),
            tx,
        )
        .await;

        let events = collect(rx).await;
        assert!(matches!(
            events.last(),
            Some(RunEvent::Finished { aborted: true })
        ));
        // First batch completes in full; nothing beyond it starts.
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn snapshot_failure_is_tolerated() {
        let (tx, rx) = unbounded_channel();
        run_generation(
            pending(2),
            working(2),
            &test_config(),
            |row| async move { Ok(format!("ad {}", row.row_index)) },
            |_rows| {
                Err(crate::rows::systems::io::CsvIoError::Io(
                    std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                ))
            },
            Arc::new(AtomicBool::new(false)),
            tx,
        )
        .await;

        let events = collect(rx).await;
        assert!(matches!(
            events.last(),
            Some(RunEvent::Finished { aborted: false })
        ));
    }
}
