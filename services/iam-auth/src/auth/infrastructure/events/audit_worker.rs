//! Background audit workers

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use super::AuditProcessor;
use crate::auth::domain::events::LoginInfoEvent;

type SharedReceiver = Arc<tokio::sync::Mutex<mpsc::Receiver<LoginInfoEvent>>>;

/// Fixed pool of tasks sharing one audit queue.
///
/// Workers stop when the queue closes or on [`AuditWorkerPool::shutdown`];
/// on shutdown whatever is still queued is processed before the tasks exit.
pub struct AuditWorkerPool {
    shutdown: CancellationToken,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl AuditWorkerPool {
    pub fn start(
        receiver: mpsc::Receiver<LoginInfoEvent>,
        processor: Arc<AuditProcessor>,
        workers: usize,
    ) -> Self {
        let shutdown = CancellationToken::new();
        let receiver: SharedReceiver = Arc::new(tokio::sync::Mutex::new(receiver));

        let handles = (0..workers.max(1))
            .map(|worker_id| {
                tokio::spawn(run_worker(
                    worker_id,
                    receiver.clone(),
                    processor.clone(),
                    shutdown.clone(),
                ))
            })
            .collect();

        info!(workers = workers.max(1), "Audit workers started");
        Self {
            shutdown,
            handles: Mutex::new(handles),
        }
    }

    /// Stop accepting new work, drain the queue and wait for every worker.
    pub async fn shutdown(&self) {
        self.shutdown.cancel();
        let handles = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Audit worker panicked");
            }
        }
        info!("Audit workers stopped");
    }
}

impl Drop for AuditWorkerPool {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn run_worker(
    worker_id: usize,
    receiver: SharedReceiver,
    processor: Arc<AuditProcessor>,
    shutdown: CancellationToken,
) {
    loop {
        let next = {
            let mut queue = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                queue = receiver.lock() => queue,
            };
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                event = queue.recv() => event,
            }
        };

        match next {
            Some(event) => handle(worker_id, &processor, event).await,
            None => {
                debug!(worker_id, "Audit queue closed");
                return;
            }
        }
    }

    // Drain what was queued before shutdown.
    loop {
        let next = receiver.lock().await.try_recv();
        match next {
            Ok(event) => handle(worker_id, &processor, event).await,
            Err(_) => break,
        }
    }
    debug!(worker_id, "Audit worker drained");
}

async fn handle(worker_id: usize, processor: &AuditProcessor, event: LoginInfoEvent) {
    let username = event.username.clone();
    if let Err(e) = processor.process(event).await {
        error!(worker_id, username = %username, error = %e, "Failed to persist audit record");
    }
}
