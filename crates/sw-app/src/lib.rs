//! Shared application service layer for spendwheel.
//!
//! This crate provides a unified interface for both CLI and GUI frontends:
//! the change reconciler that mirrors a collection locally, the expense form,
//! the tracker that wires a subscription to the chart, and configuration.

pub mod config;
pub mod error;
pub mod form;
pub mod reconciler;
pub mod tracker;

// Re-export key types for convenience
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use form::{EMPTY_FIELDS_MESSAGE, ExpenseForm, parse_cost};
pub use reconciler::{BatchReport, DeltaOutcome, Reconciler, SnapshotSink};
pub use tracker::{ExpenseTracker, PumpReport};
