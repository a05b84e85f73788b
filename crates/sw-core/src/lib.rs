//! sw-core: stable foundation for spendwheel.
//!
//! Contains:
//! - record (expense records and write payloads)
//! - ids (store-assigned record identifiers)
//! - delta (change notifications delivered by a subscription)
//! - numeric (Real + angle constants + float helpers)
//! - error (shared error types)

pub mod delta;
pub mod error;
pub mod ids;
pub mod numeric;
pub mod record;

// Re-exports: nice ergonomics for downstream crates
pub use delta::{ChangeBatch, ChangeKind, Delta};
pub use error::{SwError, SwResult};
pub use ids::RecordId;
pub use numeric::*;
pub use record::{ExpenseRecord, NewExpense};
