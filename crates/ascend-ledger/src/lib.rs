//! # ascend-ledger
//!
//! **Ledger Access Facade** for the Ascend auction.
//!
//! The auction never owns storage. Durable key/value state, per-organization
//! private partitions, content hashes of private values, range scans by
//! partial composite key, and event delivery are supplied by the host ledger
//! through the [`Ledger`] trait.
//!
//! - [`CompositeKey`]: namespace + attributes key layout
//! - [`MemoryLedger`]: deterministic in-memory implementation
//! - [`TxOverlay`]: buffers one transaction's writes and commits them atomically

pub mod facade;
pub mod key;
pub mod memory;
pub mod overlay;

pub use facade::{EventRecord, Ledger};
pub use key::CompositeKey;
pub use memory::MemoryLedger;
pub use overlay::TxOverlay;
