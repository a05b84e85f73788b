//! Store persisted as one JSON file per collection.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sw_core::{ExpenseRecord, RecordId};
use tracing::{debug, info, warn};

use crate::memory::MemoryStore;
use crate::store::{DocumentStore, Write, validate_collection_name};
use crate::{StoreResult, Subscription};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionFile {
    pub collection: String,
    pub updated_at: String,
    pub documents: Vec<ExpenseRecord>,
}

/// File-backed store. Subscriptions and writes go through an in-memory
/// mirror; every commit rewrites the collection file before the mirror
/// changes, and [`refresh`]
/// picks up edits made by other processes.
///
/// [`refresh`]: DocumentStore::refresh
#[derive(Clone)]
pub struct JsonFileStore {
    root_dir: PathBuf,
    memory: MemoryStore,
}

impl JsonFileStore {
    pub fn open(root_dir: PathBuf) -> StoreResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }

        let store = Self {
            root_dir,
            memory: MemoryStore::new(),
        };
        for name in store.collection_files()? {
            let docs = store.read_collection(&name)?;
            debug!(collection = %name, documents = docs.len(), "loaded collection");
            store.memory.load_collection(&name, docs)?;
        }
        info!(root = %store.root_dir.display(), "opened json store");
        Ok(store)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root_dir.join(format!("{collection}.json"))
    }

    fn collection_files(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
                && validate_collection_name(stem).is_ok()
            {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_collection(&self, collection: &str) -> StoreResult<Vec<ExpenseRecord>> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        let file: CollectionFile = serde_json::from_str(&content)?;
        Ok(file.documents)
    }

    fn persist(&self, collection: &str, documents: &[ExpenseRecord]) -> StoreResult<()> {
        let file = CollectionFile {
            collection: collection.to_string(),
            updated_at: chrono::Utc::now().to_rfc3339(),
            documents: documents.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        // Write-then-rename keeps readers from seeing a half-written file.
        let path = self.collection_path(collection);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn subscribe(&self, collection: &str) -> StoreResult<Subscription> {
        self.memory.subscribe(collection)
    }

    fn commit(&self, collection: &str, writes: Vec<Write>) -> StoreResult<Vec<RecordId>> {
        // The file is written before the mirror changes, so a failed write
        // leaves memory and subscribers untouched.
        self.memory.commit_with(collection, writes, |docs| {
            self.persist(collection, docs).inspect_err(|err| {
                warn!(collection, error = %err, "failed to persist collection");
            })
        })
    }

    fn list(&self, collection: &str) -> StoreResult<Vec<ExpenseRecord>> {
        self.memory.list(collection)
    }

    fn refresh(&self) -> StoreResult<usize> {
        let mut names = self.collection_files()?;
        for known in self.memory.collection_names()? {
            if !names.contains(&known) {
                names.push(known);
            }
        }

        let mut delivered = 0;
        for name in names {
            // A collection whose file vanished is treated as emptied.
            let docs = self.read_collection(&name)?;
            let count = self.memory.replace_collection(&name, docs)?;
            if count > 0 {
                info!(collection = %name, deltas = count, "picked up external changes");
            }
            delivered += count;
        }
        Ok(delivered)
    }
}
