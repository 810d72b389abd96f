//! Progress persistence behind a pluggable key-value backend.
//!
//! The engine only requires last-write-wins semantics and reads that observe
//! the latest write; cookie, local-storage or remote backends all qualify.
//! Mission records serialize as plain JSON so any backend can hold them.

use std::collections::{BTreeMap, HashMap};

use crate::foundation::error::{WaypostError, WaypostResult};
use crate::tour::step::Sequence;

/// Store key holding all sites' mission records.
pub const SITES_KEY: &str = "waypost.sites";

/// Injected key-value accessor scoped per host application.
pub trait ProgressStore {
    /// Read a value.
    fn get(&self, key: &str) -> Option<serde_json::Value>;

    /// Write a value (last write wins).
    fn set(&mut self, key: &str, value: serde_json::Value);

    /// Delete a value.
    fn remove(&mut self, key: &str);
}

/// In-memory [`ProgressStore`] for tests and hosts without a browser backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: HashMap<String, serde_json::Value>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.map.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: serde_json::Value) {
        self.map.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.map.remove(key);
    }
}

/// One resumable tour instance scoped to a site.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MissionRecord {
    /// Mission name ("default" when unnamed).
    pub mission: String,
    /// The authored step sequence.
    pub sequence: Sequence,
    /// Count of consumed steps at last save.
    pub progress: usize,
}

/// All sites' missions, keyed by site/page identifier.
pub type SiteMissions = BTreeMap<String, Vec<MissionRecord>>;

/// Read the full site→missions map.
pub fn read_sites(store: &dyn ProgressStore) -> WaypostResult<SiteMissions> {
    match store.get(SITES_KEY) {
        None => Ok(SiteMissions::new()),
        Some(value) => serde_json::from_value(value)
            .map_err(|e| WaypostError::serde(format!("corrupt mission store: {e}"))),
    }
}

/// Write the full site→missions map.
pub fn write_sites(store: &mut dyn ProgressStore, sites: &SiteMissions) -> WaypostResult<()> {
    let value =
        serde_json::to_value(sites).map_err(|e| WaypostError::serde(e.to_string()))?;
    store.set(SITES_KEY, value);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/mission/store.rs"]
mod tests;
