//! In-process document store.

use std::collections::{BTreeMap, HashMap};
use std::sync::mpsc::{Sender, channel};
use std::sync::{Arc, Mutex, MutexGuard};

use sw_core::{ChangeBatch, Delta, ExpenseRecord, RecordId};
use tracing::{debug, info};
use uuid::Uuid;

use crate::store::{DocumentStore, Write, validate_collection_name};
use crate::{StoreError, StoreResult, Subscription};

#[derive(Default)]
struct Collection {
    docs: Vec<ExpenseRecord>,
    subscribers: Vec<Sender<ChangeBatch>>,
}

impl Collection {
    fn broadcast(&mut self, batch: &ChangeBatch) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(batch.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            debug!(collection = %batch.collection, dropped, "pruned closed subscribers");
        }
    }
}

/// Store held entirely in memory. Clones share the same collections.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<BTreeMap<String, Collection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with documents; nothing is broadcast.
    pub fn with_documents(collection: &str, docs: Vec<ExpenseRecord>) -> StoreResult<Self> {
        let store = Self::new();
        store.load_collection(collection, docs)?;
        Ok(store)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, BTreeMap<String, Collection>>> {
        self.inner.lock().map_err(|_| StoreError::Poisoned)
    }

    pub fn collection_names(&self) -> StoreResult<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    /// Number of live subscribers on a collection.
    pub fn subscriber_count(&self, collection: &str) -> StoreResult<usize> {
        Ok(self
            .lock()?
            .get(collection)
            .map(|c| c.subscribers.len())
            .unwrap_or(0))
    }

    /// Replace a collection's documents silently (initial load).
    pub(crate) fn load_collection(
        &self,
        collection: &str,
        docs: Vec<ExpenseRecord>,
    ) -> StoreResult<()> {
        validate_collection_name(collection)?;
        let mut collections = self.lock()?;
        collections.entry(collection.to_string()).or_default().docs = docs;
        Ok(())
    }

    /// Replace a collection's documents and broadcast the difference.
    /// Returns the number of deltas delivered.
    pub(crate) fn replace_collection(
        &self,
        collection: &str,
        docs: Vec<ExpenseRecord>,
    ) -> StoreResult<usize> {
        validate_collection_name(collection)?;
        let mut collections = self.lock()?;
        let entry = collections.entry(collection.to_string()).or_default();

        let deltas = diff_documents(&entry.docs, &docs);
        entry.docs = docs;
        if deltas.is_empty() {
            return Ok(0);
        }

        let count = deltas.len();
        entry.broadcast(&ChangeBatch::new(collection, deltas));
        Ok(count)
    }

    /// Commit `writes`, running `before_apply` on the resulting documents
    /// while the collection is still locked. If it fails, nothing changes
    /// and nothing is broadcast.
    pub(crate) fn commit_with<F>(
        &self,
        collection: &str,
        writes: Vec<Write>,
        before_apply: F,
    ) -> StoreResult<Vec<RecordId>>
    where
        F: FnOnce(&[ExpenseRecord]) -> StoreResult<()>,
    {
        validate_collection_name(collection)?;
        let mut collections = self.lock()?;
        let entry = collections.entry(collection.to_string()).or_default();

        // Work on a copy so a failing write leaves the collection untouched.
        let mut docs = entry.docs.clone();
        let mut deltas = Vec::with_capacity(writes.len());
        let mut ids = Vec::with_capacity(writes.len());

        for write in writes {
            match write {
                Write::Add(expense) => {
                    let id = RecordId::new(Uuid::new_v4().simple().to_string());
                    let record = expense.with_id(id.clone());
                    docs.push(record.clone());
                    deltas.push(Delta::added(record));
                    ids.push(id);
                }
                Write::Set { id, expense } => {
                    let slot = docs.iter_mut().find(|d| d.id == id).ok_or_else(|| {
                        StoreError::DocumentNotFound {
                            collection: collection.to_string(),
                            id: id.to_string(),
                        }
                    })?;
                    *slot = expense.with_id(id.clone());
                    deltas.push(Delta::modified(slot.clone()));
                    ids.push(id);
                }
                Write::Delete(id) => {
                    if let Some(pos) = docs.iter().position(|d| d.id == id) {
                        let record = docs.remove(pos);
                        deltas.push(Delta::removed(record));
                    }
                    ids.push(id);
                }
            }
        }

        before_apply(&docs)?;
        entry.docs = docs;
        if !deltas.is_empty() {
            info!(collection, deltas = deltas.len(), "committed writes");
            entry.broadcast(&ChangeBatch::new(collection, deltas));
        }
        Ok(ids)
    }
}

impl DocumentStore for MemoryStore {
    fn subscribe(&self, collection: &str) -> StoreResult<Subscription> {
        validate_collection_name(collection)?;
        let mut collections = self.lock()?;
        let entry = collections.entry(collection.to_string()).or_default();

        let (tx, rx) = channel();
        let initial = ChangeBatch::new(
            collection,
            entry.docs.iter().cloned().map(Delta::added).collect(),
        );
        // The receiver is alive: it is returned below.
        let _ = tx.send(initial);
        entry.subscribers.push(tx);

        info!(collection, existing = entry.docs.len(), "subscribed");
        Ok(Subscription::new(collection.to_string(), rx))
    }

    fn commit(&self, collection: &str, writes: Vec<Write>) -> StoreResult<Vec<RecordId>> {
        self.commit_with(collection, writes, |_| Ok(()))
    }

    fn list(&self, collection: &str) -> StoreResult<Vec<ExpenseRecord>> {
        validate_collection_name(collection)?;
        Ok(self
            .lock()?
            .get(collection)
            .map(|c| c.docs.clone())
            .unwrap_or_default())
    }
}

/// Deltas that turn `old` into `new`: removals first (in old order), then
/// additions and modifications in new order.
pub fn diff_documents(old: &[ExpenseRecord], new: &[ExpenseRecord]) -> Vec<Delta> {
    let old_by_id: HashMap<&RecordId, &ExpenseRecord> = old.iter().map(|d| (&d.id, d)).collect();
    let new_by_id: HashMap<&RecordId, &ExpenseRecord> = new.iter().map(|d| (&d.id, d)).collect();

    let mut deltas: Vec<Delta> = old
        .iter()
        .filter(|d| !new_by_id.contains_key(&d.id))
        .cloned()
        .map(Delta::removed)
        .collect();

    for doc in new {
        match old_by_id.get(&doc.id) {
            None => deltas.push(Delta::added(doc.clone())),
            Some(prev) if !same_document(prev, doc) => deltas.push(Delta::modified(doc.clone())),
            Some(_) => {}
        }
    }
    deltas
}

fn same_document(a: &ExpenseRecord, b: &ExpenseRecord) -> bool {
    a.name == b.name && (a.cost == b.cost || (a.cost.is_nan() && b.cost.is_nan()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::{ChangeKind, NewExpense};

    #[test]
    fn subscribe_delivers_existing_documents_first() {
        let store = MemoryStore::with_documents(
            "expenses",
            vec![
                ExpenseRecord::new("a", "Food", 10.0),
                ExpenseRecord::new("b", "Rent", 90.0),
            ],
        )
        .unwrap();

        let sub = store.subscribe("expenses").unwrap();
        let batch = sub.try_next().unwrap().unwrap();
        assert_eq!(batch.len(), 2);
        assert!(batch.deltas.iter().all(|d| d.kind == ChangeKind::Added));
        assert!(sub.try_next().unwrap().is_none());
    }

    #[test]
    fn empty_collection_still_gets_initial_batch() {
        let store = MemoryStore::new();
        let sub = store.subscribe("expenses").unwrap();
        let batch = sub.try_next().unwrap().unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn commit_is_one_batch() {
        let store = MemoryStore::new();
        let sub = store.subscribe("expenses").unwrap();
        let _ = sub.try_next().unwrap();

        let ids = store
            .commit(
                "expenses",
                vec![
                    Write::Add(NewExpense::new("Food", 10.0)),
                    Write::Add(NewExpense::new("Rent", 90.0)),
                ],
            )
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);

        let batch = sub.try_next().unwrap().unwrap();
        assert_eq!(batch.len(), 2);
        assert!(sub.try_next().unwrap().is_none());
    }

    #[test]
    fn failed_commit_changes_nothing() {
        let store = MemoryStore::new();
        let sub = store.subscribe("expenses").unwrap();
        let _ = sub.try_next().unwrap();

        let err = store
            .commit(
                "expenses",
                vec![
                    Write::Add(NewExpense::new("Food", 10.0)),
                    Write::Set {
                        id: RecordId::new("missing"),
                        expense: NewExpense::new("Rent", 1.0),
                    },
                ],
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DocumentNotFound { .. }));
        assert!(store.list("expenses").unwrap().is_empty());
        assert!(sub.try_next().unwrap().is_none());
    }

    #[test]
    fn delete_missing_is_silent() {
        let store = MemoryStore::new();
        let sub = store.subscribe("expenses").unwrap();
        let _ = sub.try_next().unwrap();

        store.delete("expenses", &RecordId::new("nope")).unwrap();
        assert!(sub.try_next().unwrap().is_none());
    }

    #[test]
    fn closed_subscribers_are_pruned_on_broadcast() {
        let store = MemoryStore::new();
        let kept = store.subscribe("expenses").unwrap();
        let gone = store.subscribe("expenses").unwrap();
        assert_eq!(store.subscriber_count("expenses").unwrap(), 2);

        drop(gone);
        store.add("expenses", NewExpense::new("Food", 10.0)).unwrap();
        assert_eq!(store.subscriber_count("expenses").unwrap(), 1);

        let (batches, closed) = kept.drain();
        assert_eq!(batches.len(), 2);
        assert!(!closed);
    }

    #[test]
    fn rejected_before_apply_changes_nothing() {
        let store = MemoryStore::new();
        let sub = store.subscribe("expenses").unwrap();
        let _ = sub.try_next().unwrap();

        let err = store
            .commit_with(
                "expenses",
                vec![Write::Add(NewExpense::new("Food", 10.0))],
                |docs| {
                    assert_eq!(docs.len(), 1);
                    Err(StoreError::Invariant { what: "rejected" })
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Invariant { .. }));
        assert!(store.list("expenses").unwrap().is_empty());
        assert!(sub.try_next().unwrap().is_none());
    }

    #[test]
    fn dropping_store_closes_subscription() {
        let store = MemoryStore::new();
        let sub = store.subscribe("expenses").unwrap();
        drop(store);

        // Initial batch is still buffered.
        assert!(sub.try_next().unwrap().is_some());
        assert!(matches!(
            sub.try_next(),
            Err(StoreError::SubscriptionClosed { .. })
        ));
    }

    #[test]
    fn diff_orders_removals_first() {
        let old = vec![
            ExpenseRecord::new("a", "Food", 10.0),
            ExpenseRecord::new("b", "Rent", 90.0),
        ];
        let new = vec![
            ExpenseRecord::new("b", "Rent", 95.0),
            ExpenseRecord::new("c", "Fun", 5.0),
        ];

        let deltas = diff_documents(&old, &new);
        let kinds: Vec<(ChangeKind, &str)> =
            deltas.iter().map(|d| (d.kind, d.record.id.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (ChangeKind::Removed, "a"),
                (ChangeKind::Modified, "b"),
                (ChangeKind::Added, "c"),
            ]
        );
    }

    #[test]
    fn diff_treats_nan_costs_as_equal() {
        let docs = vec![ExpenseRecord::new("a", "Food", f64::NAN)];
        assert!(diff_documents(&docs, &docs).is_empty());
    }
}
