//! Local mirror of a remote collection, kept current from change batches.

use sw_core::{ChangeBatch, ChangeKind, Delta, ExpenseRecord};
use tracing::debug;

/// Receives the snapshot once per applied batch.
pub trait SnapshotSink {
    fn redraw(&mut self, snapshot: &[ExpenseRecord]);
}

impl<F> SnapshotSink for F
where
    F: FnMut(&[ExpenseRecord]),
{
    fn redraw(&mut self, snapshot: &[ExpenseRecord]) {
        self(snapshot)
    }
}

/// What a single delta did to the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaOutcome {
    Appended,
    Replaced { index: usize },
    Removed { count: usize },
    /// `modified` or `removed` for an identifier not in the snapshot.
    Unmatched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchReport {
    pub appended: usize,
    pub replaced: usize,
    pub removed: usize,
    pub unmatched: usize,
}

impl BatchReport {
    pub fn merge(&mut self, other: BatchReport) {
        self.appended += other.appended;
        self.replaced += other.replaced;
        self.removed += other.removed;
        self.unmatched += other.unmatched;
    }

    fn record(&mut self, outcome: DeltaOutcome) {
        match outcome {
            DeltaOutcome::Appended => self.appended += 1,
            DeltaOutcome::Replaced { .. } => self.replaced += 1,
            DeltaOutcome::Removed { count } => self.removed += count,
            DeltaOutcome::Unmatched => self.unmatched += 1,
        }
    }
}

/// Ordered snapshot of a collection.
///
/// Deltas are applied exactly as delivered: `added` appends without a
/// duplicate check, `modified` replaces in place, `removed` drops every
/// record with the identifier. Unmatched `modified`/`removed` are no-ops.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    snapshot: Vec<ExpenseRecord>,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Vec<ExpenseRecord>) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &[ExpenseRecord] {
        &self.snapshot
    }

    pub fn apply(&mut self, delta: &Delta) -> DeltaOutcome {
        match delta.kind {
            ChangeKind::Added => {
                self.snapshot.push(delta.record.clone());
                DeltaOutcome::Appended
            }
            ChangeKind::Modified => {
                match self.snapshot.iter().position(|r| r.id == delta.record.id) {
                    Some(index) => {
                        self.snapshot[index] = delta.record.clone();
                        DeltaOutcome::Replaced { index }
                    }
                    None => {
                        debug!(id = %delta.record.id, "modified delta for unknown record ignored");
                        DeltaOutcome::Unmatched
                    }
                }
            }
            ChangeKind::Removed => {
                let before = self.snapshot.len();
                self.snapshot.retain(|r| r.id != delta.record.id);
                let count = before - self.snapshot.len();
                if count == 0 {
                    debug!(id = %delta.record.id, "removed delta for unknown record ignored");
                    DeltaOutcome::Unmatched
                } else {
                    DeltaOutcome::Removed { count }
                }
            }
        }
    }

    /// Apply every delta in order, then redraw once.
    pub fn apply_batch<S: SnapshotSink + ?Sized>(
        &mut self,
        batch: &ChangeBatch,
        sink: &mut S,
    ) -> BatchReport {
        let mut report = BatchReport::default();
        for delta in &batch.deltas {
            report.record(self.apply(delta));
        }
        debug!(
            collection = %batch.collection,
            deltas = batch.len(),
            snapshot = self.snapshot.len(),
            "applied batch"
        );
        sink.redraw(&self.snapshot);
        report
    }
}
