//! View lifecycle and in-flight request tracking.
//!
//! # Design
//! A view is mounted while it holds a live `CancellationToken`. Every request
//! it issues runs on a spawned task under a child of that token, so
//! unmounting (or superseding a single request) stops the task and its
//! result is never delivered.
//!
//! Each spawned task sends exactly one envelope back: `Some(message)` when it
//! completed while still wanted, `None` when it was cancelled. That keeps the
//! outstanding count exact and lets `Requests::next` return instead of
//! waiting on a channel nobody will write to.

use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Mounted/unmounted state of a single view.
#[derive(Debug, Default)]
pub struct Lifecycle {
    token: Option<CancellationToken>,
}

impl Lifecycle {
    /// Mount the view. Idempotent; a view remounted after `unmount`, or after
    /// its handle was cancelled, gets a fresh token.
    pub fn mount(&mut self) {
        if !self.is_mounted() {
            self.token = Some(CancellationToken::new());
        }
    }

    /// Unmount the view, cancelling every request issued while mounted.
    pub fn unmount(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    /// Mounted while the token is live. Cancelling a `handle()` unmounts the
    /// view just like `unmount` does.
    pub fn is_mounted(&self) -> bool {
        self.token.as_ref().is_some_and(|token| !token.is_cancelled())
    }

    /// A token that is cancelled when the view unmounts. Handing it to
    /// another task lets that task tear the view's requests down.
    pub fn handle(&self) -> Option<CancellationToken> {
        self.token.clone()
    }

    /// A token for one request; cancelled on unmount or individually.
    pub fn request_token(&self) -> Option<CancellationToken> {
        self.token
            .as_ref()
            .filter(|token| !token.is_cancelled())
            .map(CancellationToken::child_token)
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Channel of request results addressed to one view.
#[derive(Debug)]
pub struct Requests<M> {
    tx: mpsc::UnboundedSender<Option<M>>,
    rx: mpsc::UnboundedReceiver<Option<M>>,
    outstanding: usize,
}

impl<M> Default for Requests<M> {
    fn default() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            outstanding: 0,
        }
    }
}

impl<M: Send + 'static> Requests<M> {
    /// Run `request` on its own task under `token`.
    pub fn spawn<F>(&mut self, token: CancellationToken, request: F)
    where
        F: Future<Output = M> + Send + 'static,
    {
        self.outstanding += 1;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let envelope = tokio::select! {
                _ = token.cancelled() => None,
                message = request => (!token.is_cancelled()).then_some(message),
            };
            if envelope.is_none() {
                debug!("request cancelled; result discarded");
            }
            // The receiver lives as long as the view; a closed channel means
            // the view is gone and the result has nowhere to go.
            let _ = tx.send(envelope);
        });
    }

    /// Number of spawned requests whose envelope has not been received yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    /// Number of envelopes waiting to be taken, cancelled ones included.
    pub fn delivered(&self) -> usize {
        self.rx.len()
    }

    /// Wait for the next delivered result. Returns `None` once nothing is
    /// outstanding.
    pub async fn next(&mut self) -> Option<M> {
        while self.outstanding > 0 {
            let envelope = self.rx.recv().await?;
            self.outstanding -= 1;
            if envelope.is_some() {
                return envelope;
            }
        }
        None
    }

    /// Discard every result already delivered; returns how many were dropped.
    /// Requests still running keep counting as outstanding.
    pub fn drain(&mut self) -> usize {
        let mut dropped = 0;
        while self.try_next().is_some() {
            dropped += 1;
        }
        dropped
    }

    /// Take the next already-delivered result without waiting.
    pub fn try_next(&mut self) -> Option<M> {
        while let Ok(envelope) = self.rx.try_recv() {
            self.outstanding -= 1;
            if envelope.is_some() {
                return envelope;
            }
        }
        None
    }
}
