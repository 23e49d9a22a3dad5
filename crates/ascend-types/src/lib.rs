//! # ascend-types
//!
//! Shared types, errors, and configuration for the **Ascend** sealed-term
//! ascending double auction.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AuctionId`], [`ItemId`], [`TxId`], [`OrgId`], [`ClientId`], [`CommitmentKey`], [`ContentHash`]
//! - **Term model**: [`Side`], [`SealedTerm`], [`RevealedTerm`], [`PublicCommitment`], [`TermRecord`]
//! - **Round model**: [`AuctionRound`], [`RoundStatus`], [`SellerEntry`], [`BidderEntry`], [`Registry`]
//! - **Transaction context**: [`TxContext`], [`ClientIdentity`]
//! - **Events**: [`AuctionEvent`]
//! - **Configuration**: [`AuctionConfig`]
//! - **Errors**: [`AuctionError`] with `AU_ERR_` prefix codes and an [`ErrorKind`] taxonomy
//! - **Constants**: key namespaces, transient keys and defaults

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod event;
pub mod ids;
pub mod round;
pub mod term;

// Re-export all primary types at crate root for ergonomic imports:
//   use ascend_types::{AuctionRound, SealedTerm, TxContext, ...};

pub use config::*;
pub use context::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use round::*;
pub use term::*;

// Constants are accessed via `ascend_types::constants::FOO`
// (not re-exported to avoid name collisions).
