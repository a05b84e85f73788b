//! The store contract both frontends talk to.

use sw_core::{ExpenseRecord, NewExpense, RecordId};

use crate::{StoreError, StoreResult, Subscription};

/// One write inside a commit.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Add(NewExpense),
    Set { id: RecordId, expense: NewExpense },
    Delete(RecordId),
}

/// A collection-oriented document store with change subscriptions.
///
/// A commit is atomic: either every write applies and subscribers receive
/// one batch holding all resulting deltas, or nothing changes.
pub trait DocumentStore: Send + Sync {
    /// Subscribe to a collection. The first batch lists every existing
    /// document as `added` and is delivered even when the collection is empty.
    fn subscribe(&self, collection: &str) -> StoreResult<Subscription>;

    /// Apply writes in order. Returns one id per write (assigned ids for adds).
    fn commit(&self, collection: &str, writes: Vec<Write>) -> StoreResult<Vec<RecordId>>;

    /// Current documents in store order.
    fn list(&self, collection: &str) -> StoreResult<Vec<ExpenseRecord>>;

    /// Pull in changes made outside this process and broadcast them.
    /// Returns the number of deltas delivered.
    fn refresh(&self) -> StoreResult<usize> {
        Ok(0)
    }

    fn add(&self, collection: &str, expense: NewExpense) -> StoreResult<RecordId> {
        self.commit(collection, vec![Write::Add(expense)])?
            .pop()
            .ok_or(StoreError::Invariant {
                what: "commit returned no id for add",
            })
    }

    /// Replace an existing document. Errors with `DocumentNotFound` if absent.
    fn set(&self, collection: &str, id: &RecordId, expense: NewExpense) -> StoreResult<()> {
        self.commit(
            collection,
            vec![Write::Set {
                id: id.clone(),
                expense,
            }],
        )?;
        Ok(())
    }

    /// Delete a document; deleting a missing document is a no-op.
    fn delete(&self, collection: &str, id: &RecordId) -> StoreResult<()> {
        self.commit(collection, vec![Write::Delete(id.clone())])?;
        Ok(())
    }
}

pub fn validate_collection_name(name: &str) -> StoreResult<()> {
    let reason = if name.is_empty() {
        Some("empty")
    } else if name.contains(['/', '\\']) {
        Some("contains a path separator")
    } else if name.starts_with('.') {
        Some("starts with '.'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StoreError::CollectionName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
