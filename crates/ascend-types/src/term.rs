//! Sealed terms, reveal payloads and public commitments.
//!
//! A participant submits two payloads in the transient input of `Bid`/`Ask`:
//! the full [`SealedTerm`], kept in the submitter's private partition, and the
//! [`RevealedTerm`] whose SHA-256 digest becomes the [`PublicCommitment`].
//! At reveal time the same reveal payload bytes are supplied again and must
//! hash to the committed digest.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{constants, AuctionError, ClientId, ContentHash, ItemId, OrgId, Result, TxId};

/// Which side of the auction a term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// Namespace of the sealed term in the private partition.
    #[must_use]
    pub fn private_namespace(self) -> &'static str {
        match self {
            Self::Bid => constants::PRIVATE_BID_NAMESPACE,
            Self::Ask => constants::PRIVATE_ASK_NAMESPACE,
        }
    }

    /// Namespace of the reveal payload (private) and commitment (global).
    #[must_use]
    pub fn public_namespace(self) -> &'static str {
        match self {
            Self::Bid => constants::PUBLIC_BID_NAMESPACE,
            Self::Ask => constants::PUBLIC_ASK_NAMESPACE,
        }
    }

    #[must_use]
    pub fn transient_private_key(self) -> &'static str {
        match self {
            Self::Bid => constants::TRANSIENT_PRIVATE_BID,
            Self::Ask => constants::TRANSIENT_PRIVATE_ASK,
        }
    }

    #[must_use]
    pub fn transient_public_key(self) -> &'static str {
        match self {
            Self::Bid => constants::TRANSIENT_PUBLIC_BID,
            Self::Ask => constants::TRANSIENT_PUBLIC_ASK,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bid => write!(f, "BID"),
            Self::Ask => write!(f, "ASK"),
        }
    }
}

/// Full-detail bid or ask, visible only inside the submitter's partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedTerm {
    #[serde(rename = "objectType")]
    pub side: Side,
    pub price: Decimal,
    pub quantity: u64,
    pub org: OrgId,
    pub owner: ClientId,
}

impl SealedTerm {
    /// Decode a sealed term from the bytes stored in a partition.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|err| AuctionError::MalformedInput {
            reason: format!("sealed term: {err}"),
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// The payload that is hashed into the public commitment and later
/// revealed to be applied to a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedTerm {
    #[serde(rename = "objectType")]
    pub side: Side,
    pub price: Decimal,
    pub quantity: u64,
    pub org: OrgId,
    pub owner: ClientId,
}

impl RevealedTerm {
    /// Parse reveal payload bytes exactly as they were committed.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|err| AuctionError::MalformedInput {
            reason: format!("reveal payload: {err}"),
        })
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl From<&SealedTerm> for RevealedTerm {
    fn from(term: &SealedTerm) -> Self {
        Self {
            side: term.side,
            price: term.price,
            quantity: term.quantity,
            org: term.org.clone(),
            owner: term.owner.clone(),
        }
    }
}

/// Globally visible commitment to a sealed term. Written once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicCommitment {
    pub org: OrgId,
    pub hash: ContentHash,
}

/// A sealed term together with the transaction that created it, as returned
/// to administrators listing a partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRecord {
    pub tx_id: TxId,
    pub item: ItemId,
    pub term: SealedTerm,
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl SealedTerm {
    pub fn dummy(side: Side, price: i64, quantity: u64, org: &str, owner: &str) -> Self {
        Self {
            side,
            price: Decimal::new(price, 0),
            quantity,
            org: OrgId::from(org),
            owner: ClientId::from(owner),
        }
    }
}
