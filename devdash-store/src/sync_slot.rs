//! Opaque key-value sync slot — the mirror backend.
//!
//! A single JSON document mapping string keys to arbitrary values, persisted
//! at a path the host's settings-sync machinery replicates across machines.
//! The store uses exactly one fixed key; there is no schema negotiation.
//! Writes use the same atomic `.tmp` + rename pattern as the file backend.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{io_err, StoreError};

/// Keyed JSON document at a fixed path.
#[derive(Debug)]
pub struct SyncSlot {
    path: PathBuf,
}

impl SyncSlot {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch the value stored under `key`, or `None` if the document or key
    /// is absent. A malformed document reads as empty — the caller's load
    /// protocol treats that as "no valid state".
    pub fn get(&self, key: &str) -> Option<Value> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let mut doc: BTreeMap<String, Value> = serde_json::from_str(&contents).ok()?;
        doc.remove(key)
    }

    /// Store `value` under `key`, preserving any other keys in the document.
    pub fn put(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let mut doc: BTreeMap<String, Value> = match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => BTreeMap::new(),
        };
        doc.insert(key.to_string(), value.clone());

        let Some(dir) = self.path.parent() else {
            return Err(io_err(
                &self.path,
                std::io::Error::other("invalid sync slot path"),
            ));
        };
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

        let json = serde_json::to_string(&doc)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| io_err(&self.path, e))?;
        Ok(())
    }
}
