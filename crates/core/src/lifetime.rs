//! Page lifetime handle.
//!
//! A page hands a clone of its [`Lifetime`] to every editor it mounts. Closing the lifetime
//! abandons in-flight loads and saves so their responses are never applied to torn-down state.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Clone, Debug)]
pub struct Lifetime {
    closed: Arc<watch::Sender<bool>>,
}

impl Lifetime {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            closed: Arc::new(tx),
        }
    }

    /// Close the lifetime. Idempotent.
    pub fn close(&self) {
        self.closed.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Resolves once the lifetime has been closed.
    pub async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        // The sender lives in `self`, so the channel cannot disconnect while we wait.
        let _ = rx.wait_for(|closed| *closed).await;
    }

    /// Run `fut` unless the lifetime closes first.
    ///
    /// Returns `None` if the lifetime was already closed or closed while `fut` was pending; in
    /// that case `fut` is dropped without being polled further.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_closed() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.closed() => None,
            out = fut => Some(out),
        }
    }
}

impl Default for Lifetime {
    fn default() -> Self {
        Self::new()
    }
}
