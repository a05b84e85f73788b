//! Two-field expense form with a presence check.

use sw_core::{NewExpense, RecordId, Real};
use sw_store::DocumentStore;
use tracing::info;

use crate::error::AppResult;

pub const EMPTY_FIELDS_MESSAGE: &str = "Please enter values before submitting";

/// Parse the leading integer of `text`.
///
/// Leading whitespace and one sign are accepted, then as many decimal digits
/// as follow. Anything after the digits is ignored. Returns `NaN` when no
/// digit is found.
pub fn parse_cost(text: &str) -> Real {
    let s = text.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits: &str = {
        let end = rest
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return Real::NAN;
    }

    let magnitude = digits
        .bytes()
        .fold(0.0, |acc: Real, b| acc * 10.0 + Real::from(b - b'0'));
    if negative { -magnitude } else { magnitude }
}

/// Form state as the user sees it.
///
/// The error line is only cleared by [`ExpenseForm::complete`], so a failed
/// presence check stays visible until a write succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseForm {
    pub name: String,
    pub cost: String,
    pub error: String,
}

impl ExpenseForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and build the payload. On an empty field, sets the error
    /// message and returns `None`; the inputs are left as typed.
    pub fn submit(&mut self) -> Option<NewExpense> {
        if self.name.is_empty() || self.cost.is_empty() {
            self.error = EMPTY_FIELDS_MESSAGE.to_string();
            return None;
        }
        Some(NewExpense::new(self.name.clone(), parse_cost(&self.cost)))
    }

    /// The write succeeded: clear the error and both inputs.
    pub fn complete(&mut self) {
        self.error.clear();
        self.name.clear();
        self.cost.clear();
    }

    /// Submit and write synchronously. Returns the new id, or `None` when
    /// the presence check blocked the write.
    pub fn submit_to(
        &mut self,
        store: &dyn DocumentStore,
        collection: &str,
    ) -> AppResult<Option<RecordId>> {
        let Some(expense) = self.submit() else {
            return Ok(None);
        };
        let id = store.add(collection, expense)?;
        info!(%id, collection, "expense added");
        self.complete();
        Ok(Some(id))
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }
}
