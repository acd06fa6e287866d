//! One-shot load-completion signals.
//!
//! A [`LoadSignal`] resolves exactly once with the outcome of a mesh fetch
//! stage. Any number of waiters may await it, before or after resolution.
//! Resolving an already-resolved signal is a no-op.

use std::cell::RefCell;
use std::fmt;

use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};

use crate::error::UrchinError;

/// Outcome of a fetch stage.
pub type LoadResult = Result<(), UrchinError>;

/// A shared, one-shot completion signal.
pub struct LoadSignal {
    sender: RefCell<Option<oneshot::Sender<LoadResult>>>,
    receiver: Shared<oneshot::Receiver<LoadResult>>,
    outcome: RefCell<Option<LoadResult>>,
}

impl LoadSignal {
    /// Unresolved signal.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = oneshot::channel();
        Self {
            sender: RefCell::new(Some(sender)),
            receiver: receiver.shared(),
            outcome: RefCell::new(None),
        }
    }

    /// Resolve with `result`. Returns `false` if already resolved, in which
    /// case the first outcome stands.
    pub fn resolve(&self, result: LoadResult) -> bool {
        let Some(sender) = self.sender.borrow_mut().take() else {
            return false;
        };
        *self.outcome.borrow_mut() = Some(result.clone());
        // Waiters hold clones of the shared receiver, so the channel stays
        // open even when nobody is currently waiting.
        let _ = sender.send(result);
        true
    }

    /// Whether the signal has resolved (successfully or not).
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.outcome.borrow().is_some()
    }

    /// Whether the signal resolved successfully.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(*self.outcome.borrow(), Some(Ok(())))
    }

    /// The resolved outcome, if any.
    #[must_use]
    pub fn outcome(&self) -> Option<LoadResult> {
        self.outcome.borrow().clone()
    }

    /// Future that completes with the signal's outcome.
    pub fn wait(&self) -> impl std::future::Future<Output = LoadResult> {
        self.receiver.clone().map(|received| {
            received.unwrap_or_else(|_| {
                Err(UrchinError::Load("load signal abandoned".to_owned()))
            })
        })
    }
}

impl fmt::Debug for LoadSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadSignal")
            .field("outcome", &*self.outcome.borrow())
            .finish_non_exhaustive()
    }
}

impl Default for LoadSignal {
    fn default() -> Self {
        Self::new()
    }
}
