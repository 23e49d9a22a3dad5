//! # ascend-contract
//!
//! **The Ascend auction contract.**
//!
//! A round-based ascending double auction over sealed terms. Participants
//! seal a bid or ask in their organization's private partition, publish a
//! hash commitment to it, and later reveal it into an open round, where the
//! rationing engine allocates supply and demand. The round lifecycle closes
//! a round only once no organization still hides an offer that would improve
//! on its price.
//!
//! ## Components
//!
//! - [`CommitmentStore`]: seal / publish / delete sealed terms
//! - [`RevealVerifier`]: hash check of a revealed term, as a [`RevealOutcome`]
//! - [`RoundLifecycle`]: create, advance, close and finalize rounds; apply reveals
//! - [`OutstandingOfferCheck`]: pre-close scan for unrevealed improving offers
//! - [`QueryGuard`]: owner/administrator read access to sealed terms
//! - [`AuctionContract`]: the operations a client invokes, each atomic
//!
//! ## Example
//!
//! ```
//! use ascend_contract::AuctionContract;
//! use ascend_ledger::MemoryLedger;
//! use ascend_types::{AuctionId, ClientId, ClientIdentity, ItemId, OrgId, TxContext, TxId};
//! use rust_decimal::Decimal;
//!
//! let contract = AuctionContract::default();
//! let mut ledger = MemoryLedger::new();
//! let admin = ClientIdentity::new(ClientId::from("admin"), OrgId::from("Org1MSP"));
//! let ctx = TxContext::new(TxId::generate(), chrono::Utc::now(), admin, OrgId::from("Org1MSP"));
//!
//! let round = contract
//!     .create_auction(&mut ledger, &ctx, &AuctionId::from("a1"), &ItemId::from("widget"), Decimal::new(100, 0))
//!     .unwrap();
//! assert_eq!(round.round, 0);
//! ```

pub mod close_check;
pub mod commitment;
pub mod contract;
pub mod guard;
pub mod lifecycle;
pub mod registry;
pub mod reveal;

pub use ascend_rationing::Admission;
pub use close_check::OutstandingOfferCheck;
pub use commitment::CommitmentStore;
pub use contract::AuctionContract;
pub use guard::QueryGuard;
pub use lifecycle::RoundLifecycle;
pub use reveal::{RevealOutcome, RevealRequest, RevealVerifier, Revealed};
