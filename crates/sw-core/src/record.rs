//! Expense records as stored in a collection.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Real, RecordId};

/// One expense as the store reports it.
///
/// `name` and `cost` are free user input; several records may share a name.
/// Documents missing a field still deserialize (empty name, `NaN` cost) and
/// flow to the chart unchanged. JSON has no NaN, so a non-finite cost is
/// written as `null` and read back as `NaN`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "missing_cost", deserialize_with = "cost_or_nan")]
    pub cost: Real,
}

fn missing_cost() -> Real {
    Real::NAN
}

fn cost_or_nan<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Real, D::Error> {
    Ok(Option::<Real>::deserialize(deserializer)?.unwrap_or(Real::NAN))
}

impl ExpenseRecord {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>, cost: Real) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
        }
    }
}

/// Payload of a write, before the store assigns an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub name: String,
    #[serde(default = "missing_cost", deserialize_with = "cost_or_nan")]
    pub cost: Real,
}

impl NewExpense {
    pub fn new(name: impl Into<String>, cost: Real) -> Self {
        Self {
            name: name.into(),
            cost,
        }
    }

    pub fn with_id(self, id: RecordId) -> ExpenseRecord {
        ExpenseRecord {
            id,
            name: self.name,
            cost: self.cost,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_leniently() {
        let rec: ExpenseRecord = serde_json::from_str(r#"{"id":"a1"}"#).unwrap();
        assert_eq!(rec.id.as_str(), "a1");
        assert_eq!(rec.name, "");
        assert!(rec.cost.is_nan());
    }

    #[test]
    fn null_cost_reads_as_nan() {
        let rec: ExpenseRecord =
            serde_json::from_str(r#"{"id":"a1","name":"Food","cost":null}"#).unwrap();
        assert_eq!(rec.name, "Food");
        assert!(rec.cost.is_nan());
    }

    #[test]
    fn nan_cost_survives_json() {
        let json = serde_json::to_string(&ExpenseRecord::new("a1", "Food", Real::NAN)).unwrap();
        assert!(json.contains("\"cost\":null"));
        let back: ExpenseRecord = serde_json::from_str(&json).unwrap();
        assert!(back.cost.is_nan());

        let json = serde_json::to_string(&NewExpense::new("Rent", Real::NAN)).unwrap();
        let back: NewExpense = serde_json::from_str(&json).unwrap();
        assert!(back.cost.is_nan());
    }

    #[test]
    fn with_id_keeps_fields() {
        let rec = NewExpense::new("Food", 10.0).with_id(RecordId::new("x"));
        assert_eq!(rec, ExpenseRecord::new("x", "Food", 10.0));
    }
}
