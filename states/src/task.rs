//! Generation-tagged task handles.
//!
//! Every fetch spawned for a key gets a [`TaskId`] made of that key plus a generation number
//! drawn from a monotonically increasing counter. The owner remembers the id of the task it
//! is waiting for, so when a result arrives it can tell whether it is still wanted:
//!
//! - a result whose id matches the pending task for its key is applied
//! - anything else (superseded, invalidated, torn down) is discarded
//!
//! [`TaskHandle`] pairs the id with a `CancellationToken` so the owner can also stop the work
//! cooperatively instead of only ignoring it.

use tokio_util::sync::CancellationToken;

/// Identifies one spawned task for a key.
///
/// Two ids for the same key differ by generation, so a result can be matched against the
/// task its owner is still waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId<K> {
    key: K,
    generation: u64,
}

impl<K> TaskId<K> {
    pub fn new(key: K, generation: u64) -> Self {
        Self { key, generation }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    /// Higher generations were spawned later.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle to a spawned task with cooperative cancellation.
///
/// The task is expected to race its work against `cancellation_token().cancelled()`; cancelling
/// does not abort it forcibly.
#[derive(Debug, Clone)]
pub struct TaskHandle<K> {
    id: TaskId<K>,
    cancel_token: CancellationToken,
}

impl<K> TaskHandle<K> {
    pub fn new(id: TaskId<K>, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> &TaskId<K> {
        &self.id
    }

    /// Returns a clone of the token to move into the async work.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }
}
