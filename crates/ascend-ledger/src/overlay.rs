//! Atomic transaction overlay.
//!
//! Every contract operation runs against a [`TxOverlay`]. Writes, deletes and
//! the notification are buffered; reads see the buffer first, then the
//! underlying ledger. `commit` applies everything at once. Dropping the
//! overlay (e.g. after an error) discards the whole transaction, so a
//! multi-step operation never lands half-applied.

use std::collections::BTreeMap;

use ascend_types::{ContentHash, Result};

use crate::facade::Ledger;

type Buffered = BTreeMap<String, Option<Vec<u8>>>;

/// Write-buffering view over a ledger for the duration of one transaction.
pub struct TxOverlay<'a, L: Ledger + ?Sized> {
    inner: &'a mut L,
    state: Buffered,
    private: BTreeMap<String, Buffered>,
    event: Option<(String, Vec<u8>)>,
}

impl<'a, L: Ledger + ?Sized> TxOverlay<'a, L> {
    pub fn new(inner: &'a mut L) -> Self {
        Self {
            inner,
            state: BTreeMap::new(),
            private: BTreeMap::new(),
            event: None,
        }
    }

    /// Number of buffered state and private writes/deletes.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.state.len() + self.private.values().map(BTreeMap::len).sum::<usize>()
    }

    /// Apply the buffered write set to the underlying ledger.
    pub fn commit(self) -> Result<()> {
        let writes = self.pending_writes();
        for (key, value) in self.state {
            match value {
                Some(bytes) => self.inner.put_state(&key, bytes)?,
                None => self.inner.del_state(&key)?,
            }
        }
        for (collection, entries) in self.private {
            for (key, value) in entries {
                match value {
                    Some(bytes) => self.inner.put_private(&collection, &key, bytes)?,
                    None => self.inner.del_private(&collection, &key)?,
                }
            }
        }
        let event = self.event.as_ref().map(|(name, _)| name.clone());
        if let Some((name, payload)) = self.event {
            self.inner.set_event(&name, payload)?;
        }
        tracing::debug!(writes, event = ?event, "Transaction committed");
        Ok(())
    }
}

fn merge_scan(
    committed: Vec<(String, Vec<u8>)>,
    buffered: Option<&Buffered>,
    prefix: &str,
) -> Vec<(String, Vec<u8>)> {
    let mut merged: BTreeMap<String, Vec<u8>> = committed.into_iter().collect();
    if let Some(buffered) = buffered {
        for (key, value) in buffered.range(prefix.to_string()..) {
            if !key.starts_with(prefix) {
                break;
            }
            match value {
                Some(bytes) => {
                    merged.insert(key.clone(), bytes.clone());
                }
                None => {
                    merged.remove(key);
                }
            }
        }
    }
    merged.into_iter().collect()
}

impl<L: Ledger + ?Sized> Ledger for TxOverlay<'_, L> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.state.get(key) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.inner.get_state(key),
        }
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()> {
        self.state.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn del_state(&mut self, key: &str) -> Result<()> {
        self.state.insert(key.to_string(), None);
        Ok(())
    }

    fn state_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let committed = self.inner.state_by_prefix(prefix)?;
        Ok(merge_scan(committed, Some(&self.state), prefix))
    }

    fn get_private(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>> {
        match self.private.get(collection).and_then(|c| c.get(key)) {
            Some(buffered) => Ok(buffered.clone()),
            None => self.inner.get_private(collection, key),
        }
    }

    fn get_private_hash(&self, collection: &str, key: &str) -> Result<Option<ContentHash>> {
        match self.private.get(collection).and_then(|c| c.get(key)) {
            Some(buffered) => Ok(buffered.as_deref().map(ContentHash::of)),
            None => self.inner.get_private_hash(collection, key),
        }
    }

    fn put_private(&mut self, collection: &str, key: &str, value: Vec<u8>) -> Result<()> {
        self.private
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), Some(value));
        Ok(())
    }

    fn del_private(&mut self, collection: &str, key: &str) -> Result<()> {
        self.private
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), None);
        Ok(())
    }

    fn private_by_prefix(&self, collection: &str, prefix: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let committed = self.inner.private_by_prefix(collection, prefix)?;
        Ok(merge_scan(committed, self.private.get(collection), prefix))
    }

    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<()> {
        self.event = Some((name.to_string(), payload));
        Ok(())
    }
}
