//! sw-store: document store collaborator and change subscriptions.

pub mod file;
pub mod memory;
pub mod store;
pub mod subscription;

pub use file::JsonFileStore;
pub use memory::{MemoryStore, diff_documents};
pub use store::{DocumentStore, Write, validate_collection_name};
pub use subscription::Subscription;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Document not found: {collection}/{id}")]
    DocumentNotFound { collection: String, id: String },

    #[error("Invalid collection name {name:?}: {reason}")]
    CollectionName { name: String, reason: &'static str },

    #[error("Subscription to {collection} closed")]
    SubscriptionClosed { collection: String },

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
