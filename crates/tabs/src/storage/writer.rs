//! Disk Writer - the single-worker disk context
//!
//! Every write and delete of the session record is queued here and
//! executed one at a time, in submission order. Callers get a
//! `PendingWrite` they can await, or simply drop.

use futures_util::FutureExt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::{mpsc, oneshot};

use super::{BundleStorage, SessionRecord};
use crate::error::{Result, TabsError};

enum DiskJob {
    Write {
        name: String,
        record: SessionRecord,
        done: oneshot::Sender<Result<()>>,
    },
    Delete {
        name: String,
        done: oneshot::Sender<Result<()>>,
    },
}

impl DiskJob {
    fn fail(self, error: TabsError) {
        let done = match self {
            DiskJob::Write { done, .. } | DiskJob::Delete { done, .. } => done,
        };
        let _ = done.send(Err(error));
    }
}

/// Handle to the disk worker. Cheap to clone; all clones feed the same
/// queue.
#[derive(Clone)]
pub struct DiskWriter {
    tx: mpsc::UnboundedSender<DiskJob>,
}

impl DiskWriter {
    /// Spawn the worker. Must be called inside a tokio runtime.
    pub fn spawn(storage: Arc<dyn BundleStorage>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<DiskJob>();

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                match job {
                    DiskJob::Write { name, record, done } => {
                        let result = storage.write(&name, &record).await;
                        if let Err(e) = &result {
                            tracing::error!("[DiskWriter] Failed to write {}: {}", name, e);
                        }
                        let _ = done.send(result); // Caller may have dropped the handle
                    }
                    DiskJob::Delete { name, done } => {
                        let result = storage.delete(&name).await;
                        if let Err(e) = &result {
                            tracing::error!("[DiskWriter] Failed to delete {}: {}", name, e);
                        }
                        let _ = done.send(result);
                    }
                }
            }
            tracing::debug!("[DiskWriter] Queue closed, worker exiting");
        });

        Self { tx }
    }

    /// Queue a full replacement of the record `name`
    pub fn write(&self, name: impl Into<String>, record: SessionRecord) -> PendingWrite {
        let (done, rx) = oneshot::channel();
        self.submit(DiskJob::Write {
            name: name.into(),
            record,
            done,
        });
        PendingWrite { rx }
    }

    /// Queue removal of the record `name`
    pub fn delete(&self, name: impl Into<String>) -> PendingWrite {
        let (done, rx) = oneshot::channel();
        self.submit(DiskJob::Delete {
            name: name.into(),
            done,
        });
        PendingWrite { rx }
    }

    fn submit(&self, job: DiskJob) {
        if let Err(mpsc::error::SendError(job)) = self.tx.send(job) {
            tracing::error!("[DiskWriter] Worker is gone, dropping job");
            job.fail(TabsError::DiskWriterClosed);
        }
    }
}

/// Completion of one queued disk job
#[must_use = "dropping a PendingWrite is fine, but then nobody sees the result"]
pub struct PendingWrite {
    rx: oneshot::Receiver<Result<()>>,
}

impl Future for PendingWrite {
    type Output = Result<()>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.rx.poll_unpin(cx).map(|received| match received {
            Ok(result) => result,
            Err(_) => Err(TabsError::DiskWriterClosed),
        })
    }
}
