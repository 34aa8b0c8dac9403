//! Request context handed to every provider, resource and data source call
//!
//! A context can be cancelled by the plugin host or by an optional deadline.
//! Long running work such as API requests should go through [`Context::run`]
//! so it stops as soon as the context is done.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Returned by [`Context::run`] when the context finished before the work
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("context cancelled")]
pub struct Cancelled;

#[derive(Clone)]
pub struct Context {
    cancel: Arc<watch::Sender<bool>>,
    deadline: Option<Instant>,
}

impl Context {
    pub fn new() -> Self {
        let (cancel, _) = watch::channel(false);
        Self {
            cancel: Arc::new(cancel),
            deadline: None,
        }
    }

    /// Derive a context that is cancelled once `timeout` has elapsed.
    /// Cancelling the derived context does not cancel the parent.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        let deadline = match self.deadline {
            Some(parent) if parent < deadline => parent,
            _ => deadline,
        };

        let (cancel, _) = watch::channel(*self.cancel.borrow());
        let cancel = Arc::new(cancel);

        let child = Arc::downgrade(&cancel);
        let mut parent = self.cancel.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep_until(deadline.into()) => {}
                _ = parent.wait_for(|done| *done) => {}
            }
            if let Some(child) = child.upgrade() {
                child.send_replace(true);
            }
        });

        Self {
            cancel,
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `work` to completion unless the context is cancelled first
    pub async fn run<F>(&self, work: F) -> Result<F::Output, Cancelled>
    where
        F: Future,
    {
        let mut done = self.cancel.subscribe();
        if *done.borrow_and_update() {
            return Err(Cancelled);
        }
        tokio::select! {
            output = work => Ok(output),
            _ = done.wait_for(|cancelled| *cancelled) => Err(Cancelled),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
