//! # ascend-rationing
//!
//! **Pure deterministic rationing engine for Ascend.**
//!
//! Given a round with a freshly revealed entry merged in, computes the
//! quantity each seller has sold and each bidder has won. It has:
//!
//! - **Zero side effects**: no ledger access, no authorization, no hashing of terms
//! - **Deterministic output**: same round + same reveal order -> same allocation on every peer
//! - **Monotonic sales**: a seller's sold quantity never decreases within an auction
//! - **Invariant checks**: [`verify_round`] and [`verify_price_progression`]
//! - **Round digest**: [`round_digest`] for cross-peer comparison

pub mod digest;
pub mod invariants;
pub mod rationing;

pub use digest::{round_digest, round_digest_hex, verify_round_digest};
pub use invariants::{verify_price_progression, verify_round};
pub use rationing::{Admission, RationOutcome, RationRule, admit_ask, admit_bid, ration};
