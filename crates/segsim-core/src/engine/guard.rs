//! Drop guard that fails a run which never reached a terminal state.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::Mutex;
use tokio::task::AbortHandle;

use crate::job::{JobId, JobStatus, JobStore};

pub(super) const CANCELLED_MESSAGE: &str = "run cancelled";

/// Marks the job as failed if the `run` future is dropped mid-flight.
pub(super) struct RunGuard {
    store: Arc<Mutex<JobStore>>,
    job_id: JobId,
    drain: Option<AbortHandle>,
    armed: bool,
}

impl RunGuard {
    pub(super) fn new(store: Arc<Mutex<JobStore>>, job_id: JobId) -> Self {
        Self {
            store,
            job_id,
            drain: None,
            armed: true,
        }
    }

    /// The update loop is stopped on cancel so queued updates of the
    /// abandoned run never land on a rerun of the same job.
    pub(super) fn watch_drain(&mut self, drain: AbortHandle) {
        self.drain = Some(drain);
    }

    pub(super) fn disarm(&mut self) {
        self.armed = false;
    }
}

fn fail_if_in_flight(store: &mut JobStore, job_id: JobId) {
    let in_flight = store
        .current()
        .filter(|job| job.id == job_id)
        .map(|job| !job.status.is_terminal() && job.status != JobStatus::Idle)
        .unwrap_or(false);
    if in_flight && store.fail(job_id, CANCELLED_MESSAGE) {
        tracing::warn!(job_id, "run dropped before completion; job marked as error");
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Some(drain) = self.drain.take() {
            drain.abort();
        }
        let job_id = self.job_id;
        match self.store.try_lock() {
            Ok(mut store) => fail_if_in_flight(&mut store, job_id),
            Err(_) => match Handle::try_current() {
                Ok(handle) => {
                    let store = Arc::clone(&self.store);
                    handle.spawn(async move {
                        fail_if_in_flight(&mut *store.lock().await, job_id);
                    });
                }
                Err(_) => tracing::warn!(job_id, "run dropped outside a runtime; job left as is"),
            },
        }
    }
}
