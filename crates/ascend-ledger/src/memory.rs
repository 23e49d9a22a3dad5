//! In-memory ledger.
//!
//! Backs tests and single-process embeddings. `BTreeMap` storage keeps
//! range scans in key order, identical on every run.

use std::collections::BTreeMap;

use ascend_types::{ContentHash, Result};

use crate::facade::{EventRecord, Ledger};

/// Global state, per-organization partitions and the committed event log.
#[derive(Debug, Default, Clone)]
pub struct MemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
    collections: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    events: Vec<EventRecord>,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Number of keys in global state.
    #[must_use]
    pub fn state_len(&self) -> usize {
        self.state.len()
    }

    /// Number of keys held in one partition.
    #[must_use]
    pub fn collection_len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, BTreeMap::len)
    }
}

fn scan(map: &BTreeMap<String, Vec<u8>>, prefix: &str) -> Vec<(String, Vec<u8>)> {
    map.range(prefix.to_string()..)
        .take_while(|(key, _)| key.starts_with(prefix))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

impl Ledger for MemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.state.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.state.insert(key.to_string(), value);
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<()> {
        self.state.remove(key);
        Ok(())
    }

    fn state_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        Ok(scan(&self.state, prefix))
    }

    fn get_private(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.get(key))
            .cloned())
    }

    fn get_private_hash(&self, collection: &str, key: &str) -> Result<Option<ContentHash>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.get(key))
            .map(|value| ContentHash::of(value)))
    }

    fn put_private(&mut self, collection: &str, key: &str, value: Vec<u8>) -> Result<()> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    fn del_private(&mut self, collection: &str, key: &str) -> Result<()> {
        if let Some(c) = self.collections.get_mut(collection) {
            c.remove(key);
        }
        Ok(())
    }

    fn private_by_prefix(&self, collection: &str, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        Ok(self
            .collections
            .get(collection)
            .map(|c| scan(c, prefix))
            .unwrap_or_default())
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<()> {
        self.events.push(EventRecord {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }
}
