//! The narrow interface the auction calls into the host ledger through.
//!
//! Global state is visible to every organization. Private partitions
//! ("collections") hold data of a single organization; everyone may read the
//! SHA-256 hash of a private value, but only the owning organization's peers
//! read the value itself. The contract honours that rule: it only reads
//! private values of the executing peer's organization.

use ascend_types::{ContentHash, Result};

/// A notification recorded by a committed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub name: String,
    pub payload: Vec<u8>,
}

/// Key/value ledger facade.
///
/// Range scans take an encoded partial composite key and return matching
/// `(key, value)` pairs in ascending key order.
pub trait Ledger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<()>;

    fn del_state(&mut self, key: &str) -> Result<()>;

    fn state_by_prefix(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>>;

    fn get_private(&self, collection: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Hash of a private value; readable by every organization.
    fn get_private_hash(&self, collection: &str, key: &str) -> Result<Option<ContentHash>>;

    fn put_private(&mut self, collection: &str, key: &str, value: Vec<u8>) -> Result<()>;

    fn del_private(&mut self, collection: &str, key: &str) -> Result<()>;

    fn private_by_prefix(&self, collection: &str, prefix: &str)
        -> Result<Vec<(String, Vec<u8>)>>;

    /// Record the transaction's notification. A later call replaces it.
    fn set_event(&mut self, name: &str, payload: Vec<u8>) -> Result<()>;
}
