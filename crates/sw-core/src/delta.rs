//! Change notifications for a collection.

use serde::{Deserialize, Serialize};

use crate::{ExpenseRecord, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Removed => "removed",
        }
    }
}

/// A single reported change. The record is always the full payload,
/// including for removals (the document as it was last seen).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub kind: ChangeKind,
    pub record: ExpenseRecord,
}

impl Delta {
    pub fn added(record: ExpenseRecord) -> Self {
        Self {
            kind: ChangeKind::Added,
            record,
        }
    }

    pub fn modified(record: ExpenseRecord) -> Self {
        Self {
            kind: ChangeKind::Modified,
            record,
        }
    }

    pub fn removed(record: ExpenseRecord) -> Self {
        Self {
            kind: ChangeKind::Removed,
            record,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.record.id
    }
}

/// Everything one notification delivered, in delivery order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChangeBatch {
    pub collection: String,
    pub deltas: Vec<Delta>,
}

impl ChangeBatch {
    pub fn new(collection: impl Into<String>, deltas: Vec<Delta>) -> Self {
        Self {
            collection: collection.into(),
            deltas,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn len(&self) -> usize {
        self.deltas.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serializes_lowercase() {
        let delta = Delta::removed(ExpenseRecord::new("1", "Food", 10.0));
        let json = serde_json::to_string(&delta).unwrap();
        assert!(json.contains("\"kind\":\"removed\""));
        assert_eq!(delta.id().as_str(), "1");
    }
}
