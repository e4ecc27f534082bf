use std::sync::Arc;

use tokio::sync::{broadcast, oneshot};

struct Shared {
    // Dropped when the last Context clone goes away, which closes the
    // drained channel the Handler waits on.
    _alive: oneshot::Sender<()>,
    cancel: broadcast::Receiver<()>,
}

/// Cancellation signal shared by every task the process spawns. Server
/// loops select on [`done`](Context::done); the owning [`Handler`] cancels
/// and then waits for every clone to drop.
#[derive(Clone)]
pub struct Context(Arc<Shared>);

pub struct Handler {
    drained: oneshot::Receiver<()>,
    cancel: broadcast::Sender<()>,
}

impl Context {
    pub fn new() -> (Self, Handler) {
        let (alive, drained) = oneshot::channel();
        let (cancel_tx, cancel_rx) = broadcast::channel(1);

        (
            Self(Arc::new(Shared {
                _alive: alive,
                cancel: cancel_rx,
            })),
            Handler {
                drained,
                cancel: cancel_tx,
            },
        )
    }

    /// Resolves once the owning [`Handler`] starts a cancellation.
    pub async fn done(&self) {
        let mut cancel = self.0.cancel.resubscribe();
        let _ = cancel.recv().await;
    }
}

impl Handler {
    /// Cancels the context and waits until every [`Context`] clone has been
    /// dropped.
    pub async fn cancel(self) {
        drop(self.cancel);

        let _ = self.drained.await;
    }
}
