use std::future::poll_fn;
use std::task::Poll;

use tokio::signal::unix::{Signal, SignalKind};

/// Fans any number of unix signals into a single awaitable receiver.
#[derive(Default)]
pub struct SignalHandler {
    signals: Vec<(SignalKind, Signal)>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signal(mut self, kind: SignalKind) -> Self {
        let signal = tokio::signal::unix::signal(kind).expect("failed to create signal");
        self.signals.push((kind, signal));
        self
    }

    /// Completes with the kind of the next signal delivered to the process.
    /// Pends forever when no signals are registered.
    pub async fn recv(&mut self) -> SignalKind {
        poll_fn(|cx| {
            for (kind, signal) in self.signals.iter_mut() {
                if signal.poll_recv(cx).is_ready() {
                    return Poll::Ready(*kind);
                }
            }

            Poll::Pending
        })
        .await
    }
}
