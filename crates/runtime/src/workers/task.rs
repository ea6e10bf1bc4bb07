use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Handle to a spawned polling worker.
///
/// `cancel` asks the worker to stop at its next await point and waits for it;
/// dropping the handle aborts the task outright.
pub struct PollTask {
    name: &'static str,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl PollTask {
    /// Spawn `worker`, handing it the receiving half of the shutdown signal.
    pub fn spawn<F, Fut>(name: &'static str, worker: F) -> Self
    where
        F: FnOnce(oneshot::Receiver<()>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(worker(shutdown_rx));
        Self {
            name,
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Signal shutdown and wait for the worker to exit.
    pub async fn cancel(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // The worker may already have exited on its own.
            let _ = shutdown.send(());
        }
        let Some(handle) = self.handle.take() else {
            return;
        };
        if let Err(e) = handle.await {
            if !e.is_cancelled() {
                tracing::error!("{} worker panicked: {}", self.name, e);
            }
        }
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        if let Some(handle) = &self.handle {
            handle.abort();
        }
    }
}
