use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use sw_core::ChangeBatch;

use crate::{StoreError, StoreResult};

/// Receiving end of a collection's change stream.
///
/// Batches arrive in commit order. The stream closes when the store that
/// produced it is dropped.
pub struct Subscription {
    collection: String,
    rx: Receiver<ChangeBatch>,
}

impl Subscription {
    pub(crate) fn new(collection: String, rx: Receiver<ChangeBatch>) -> Self {
        Self { collection, rx }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Next pending batch without blocking.
    pub fn try_next(&self) -> StoreResult<Option<ChangeBatch>> {
        match self.rx.try_recv() {
            Ok(batch) => Ok(Some(batch)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(self.closed()),
        }
    }

    /// Wait up to `timeout` for the next batch.
    pub fn next_timeout(&self, timeout: Duration) -> StoreResult<Option<ChangeBatch>> {
        match self.rx.recv_timeout(timeout) {
            Ok(batch) => Ok(Some(batch)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(self.closed()),
        }
    }

    /// Collect every batch already delivered, in order.
    ///
    /// Batches received before the stream closed are still returned; the
    /// closure is reported through the flag.
    pub fn drain(&self) -> (Vec<ChangeBatch>, bool) {
        let mut batches = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(batch) => batches.push(batch),
                Err(TryRecvError::Empty) => return (batches, false),
                Err(TryRecvError::Disconnected) => return (batches, true),
            }
        }
    }

    fn closed(&self) -> StoreError {
        StoreError::SubscriptionClosed {
            collection: self.collection.clone(),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("collection", &self.collection)
            .finish_non_exhaustive()
    }
}
