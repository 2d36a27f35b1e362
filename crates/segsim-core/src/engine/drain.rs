//! Background task that applies segment updates to the job store and sends progress snapshots.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::time::Instant;

use crate::job::{JobProgress, JobStore, UpdateOutcome};
use crate::scheduler::SegmentUpdate;

/// Counts of what happened to the updates of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DrainSummary {
    pub applied: usize,
    pub stale: usize,
    pub rejected: usize,
}

/// Receives updates until every sender is dropped, applying each one by id.
/// After each applied update, optionally sends a progress snapshot (lossy,
/// `try_send`). Spawn this with tokio::spawn.
pub(crate) async fn run_update_loop(
    mut updates_rx: mpsc::UnboundedReceiver<SegmentUpdate>,
    store: Arc<Mutex<JobStore>>,
    progress_tx: Option<mpsc::Sender<JobProgress>>,
    run_start: Instant,
) -> DrainSummary {
    let mut summary = DrainSummary::default();
    while let Some(update) = updates_rx.recv().await {
        let snapshot = {
            let mut store = store.lock().await;
            match store.apply(&update) {
                UpdateOutcome::Applied => {
                    summary.applied += 1;
                    progress_tx.as_ref().and_then(|_| store.progress())
                }
                UpdateOutcome::Stale => {
                    summary.stale += 1;
                    None
                }
                UpdateOutcome::UnknownSegment | UpdateOutcome::Ignored => {
                    summary.rejected += 1;
                    None
                }
            }
        };
        if let (Some(tx), Some(snapshot)) = (progress_tx.as_ref(), snapshot) {
            let _ = tx.try_send(JobProgress {
                elapsed_secs: run_start.elapsed().as_secs_f64(),
                ..snapshot
            });
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmenter::plan_segments;
    use crate::simulator::FilterKind;

    #[tokio::test]
    async fn applies_until_senders_drop() {
        let store = Arc::new(Mutex::new(JobStore::new()));
        let id = store.lock().await.create(
            "a.mp4",
            20.0,
            None,
            FilterKind::None,
            plan_segments(20.0, 10.0),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        let (progress_tx, mut progress_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run_update_loop(
            rx,
            Arc::clone(&store),
            Some(progress_tx),
            Instant::now(),
        ));

        tx.send(SegmentUpdate::processing(id, 1, 0.0)).unwrap();
        tx.send(SegmentUpdate::completed(id, 1, 700.0)).unwrap();
        tx.send(SegmentUpdate::processing(id + 1, 0, 10.0)).unwrap();
        tx.send(SegmentUpdate::processing(id, 1, 50.0)).unwrap();
        drop(tx);

        let summary = handle.await.unwrap();
        assert_eq!(
            summary,
            DrainSummary {
                applied: 2,
                stale: 1,
                rejected: 1
            }
        );

        let first = progress_rx.recv().await.unwrap();
        assert_eq!(first.segments_active, 1);
        let second = progress_rx.recv().await.unwrap();
        assert_eq!(second.segments_done, 1);
        assert_eq!(second.percent, 50.0);
    }
}
