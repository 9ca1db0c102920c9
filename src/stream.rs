//! Stream of progress events from a session running in the background.

use crate::config::SessionConfig;
use crate::error::Result;
use crate::session::{SessionEvent, TailSession};
use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// Yields [`SessionEvent`]s while a tail session runs on its own task.
///
/// The stream ends after `Finished`, or after a single `Err` item if the
/// session fails. Dropping it stops the session at its next wait.
pub struct SessionStream {
    receiver: mpsc::UnboundedReceiver<Result<SessionEvent>>,
    _shutdown_tx: broadcast::Sender<()>,
    _task_handle: JoinHandle<()>,
}

impl SessionStream {
    /// Validates `config` and starts the session in the background.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

        let session = TailSession::new(config)?.with_events(tx);

        let task_handle = tokio::spawn(async move {
            session_task(session, async move {
                let _ = shutdown_rx.recv().await;
            })
            .await;
        });

        Ok(SessionStream {
            receiver: rx,
            _shutdown_tx: shutdown_tx,
            _task_handle: task_handle,
        })
    }

    /// Check if the stream has been closed/dropped
    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.receiver.is_closed()
    }
}

impl Drop for SessionStream {
    fn drop(&mut self) {
        let _ = self._shutdown_tx.send(());
    }
}

/// Background task that drives the session and reports a fatal error as the last item
async fn session_task<F>(session: TailSession, shutdown: F)
where
    F: std::future::Future<Output = ()>,
{
    let reporter = session.reporter();
    if let Err(e) = session.run_until(shutdown).await {
        if let Some(tx) = reporter {
            let _ = tx.send(Err(e));
        }
    }
}

impl Stream for SessionStream {
    type Item = Result<SessionEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_recv(cx)
    }
}
