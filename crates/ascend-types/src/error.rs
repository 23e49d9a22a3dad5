//! Error types for the Ascend auction.
//!
//! All errors use the `AU_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by taxonomy kind:
//! - 1xx: Input errors (never retried)
//! - 2xx: Authorization errors
//! - 3xx: Integrity errors (tampering, immutable commitments)
//! - 4xx: State-precondition errors (re-check state, retry later)
//! - 5xx: Business-rule errors (expected in normal operation)
//! - 6xx: Invariant violations
//! - 9xx: Ledger / configuration errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AuctionId, ClientId, CommitmentKey, ContentHash, ItemId, OrgId, RoundStatus};

/// Taxonomy kind of an [`AuctionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Input,
    Authorization,
    Integrity,
    StatePrecondition,
    BusinessRule,
    Invariant,
    Ledger,
}

/// Central error enum for all Ascend operations.
#[derive(Debug, Error)]
pub enum AuctionError {
    // =================================================================
    // Input Errors (1xx)
    // =================================================================
    /// The expected payload was not supplied in the transient input.
    #[error("AU_ERR_100: Missing transient input: {key}")]
    MissingInput { key: String },

    /// A payload or identifier could not be understood.
    #[error("AU_ERR_101: Malformed input: {reason}")]
    MalformedInput { reason: String },

    /// Encoding or decoding of a stored record failed.
    #[error("AU_ERR_102: Serialization error: {0}")]
    Serialization(String),

    // =================================================================
    // Authorization Errors (2xx)
    // =================================================================
    /// The client is not a member of the organization owning this peer.
    #[error(
        "AU_ERR_200: Client from org {client_org} is not authorized to access private data of an org {peer_org} peer"
    )]
    OrgMismatch { client_org: OrgId, peer_org: OrgId },

    /// The client is neither the owner of the term nor an administrator.
    #[error("AU_ERR_201: Permission denied: client {client} does not own {key}")]
    PermissionDenied { client: ClientId, key: CommitmentKey },

    /// The operation is reserved to auction administrators.
    #[error("AU_ERR_202: Client {client} must be an auction administrator")]
    AdminRequired { client: ClientId },

    // =================================================================
    // Integrity Errors (3xx)
    // =================================================================
    /// The revealed term does not hash to the published commitment.
    #[error("AU_ERR_300: Term {key} was tampered: committed {committed}, revealed {revealed}")]
    TermTampered {
        key: CommitmentKey,
        committed: ContentHash,
        revealed: ContentHash,
    },

    /// A different commitment was already published under this key.
    #[error("AU_ERR_301: Commitment {key} is already published and cannot change")]
    CommitmentImmutable { key: CommitmentKey },

    /// The publishing organization's partition no longer holds the term.
    #[error("AU_ERR_302: Commitment {key} of org {org} is no longer retrievable")]
    CommitmentUnreachable { key: CommitmentKey, org: OrgId },

    // =================================================================
    // State-Precondition Errors (4xx)
    // =================================================================
    /// An auction with this id already has rounds.
    #[error("AU_ERR_400: Auction {auction_id} already exists")]
    AlreadyExists { auction_id: AuctionId },

    /// No round of this auction exists.
    #[error("AU_ERR_401: Auction {auction_id} does not exist")]
    AuctionNotFound { auction_id: AuctionId },

    /// The requested round was never created (or was discarded).
    #[error("AU_ERR_402: Round {round} of auction {auction_id} does not exist")]
    RoundNotFound { auction_id: AuctionId, round: u32 },

    /// The round to create is already stored.
    #[error("AU_ERR_403: Round {round} of auction {auction_id} already exists")]
    RoundExists { auction_id: AuctionId, round: u32 },

    /// The round before the one to create is missing.
    #[error("AU_ERR_404: Cannot create round {round} of auction {auction_id}: previous round missing")]
    PriorRoundMissing { auction_id: AuctionId, round: u32 },

    /// The round is not accepting reveals or closing.
    #[error("AU_ERR_405: Round {round} of auction {auction_id} is {status}, expected open")]
    RoundNotOpen {
        auction_id: AuctionId,
        round: u32,
        status: RoundStatus,
    },

    /// A new round is only warranted while demand exceeds the fill.
    #[error(
        "AU_ERR_406: Round {round} of auction {auction_id} has filled {filled} of demand {demand}; demand does not exceed supply"
    )]
    DemandNotExceedingSupply {
        auction_id: AuctionId,
        round: u32,
        filled: u64,
        demand: u64,
    },

    /// Demand is unmet and the next round has not been created yet.
    #[error("AU_ERR_407: Round {round} of auction {auction_id} needs its next round before it can close")]
    NextRoundRequired { auction_id: AuctionId, round: u32 },

    /// `EndAuction` found no closed round to finalize.
    #[error("AU_ERR_408: Auction {auction_id} has no closed round")]
    NoClosedRound { auction_id: AuctionId },

    /// No sealed term (or reveal payload) is stored under this key.
    #[error("AU_ERR_409: Sealed term {key} not found")]
    NotFound { key: CommitmentKey },

    /// No public commitment was published under this key.
    #[error("AU_ERR_410: Public commitment {key} not found")]
    CommitmentNotFound { key: CommitmentKey },

    /// A bidder must have stood in every earlier round.
    #[error("AU_ERR_411: Bid {key} did not join round {previous} of auction {auction_id}")]
    PreviousRoundNotJoined {
        auction_id: AuctionId,
        previous: u32,
        key: CommitmentKey,
    },

    /// Round `round` is final; the auction takes no further rounds.
    #[error("AU_ERR_412: Auction {auction_id} ended with final round {round}")]
    AuctionEnded { auction_id: AuctionId, round: u32 },

    // =================================================================
    // Business-Rule Errors (5xx)
    // =================================================================
    /// The creating organization holds an ask at or below the reserve.
    #[error("AU_ERR_500: Ask {key} for {item} is at or below reserve price {reserve_price}")]
    LowerAskExists {
        item: ItemId,
        key: CommitmentKey,
        reserve_price: Decimal,
    },

    /// An unrevealed bid would improve on the round price.
    #[error("AU_ERR_501: Bid {key} at or above price of round {round} of auction {auction_id} is not revealed")]
    HigherBidPending {
        auction_id: AuctionId,
        round: u32,
        key: CommitmentKey,
    },

    /// An unrevealed ask would improve on the round price.
    #[error("AU_ERR_502: Ask {key} at or below price of round {round} of auction {auction_id} is not revealed")]
    LowerAskPending {
        auction_id: AuctionId,
        round: u32,
        key: CommitmentKey,
    },

    /// The outstanding-offer check found a reason the round is still active.
    #[error("AU_ERR_503: Round {round} of auction {auction_id} is still active: {source}")]
    ActiveOffersRemain {
        auction_id: AuctionId,
        round: u32,
        #[source]
        source: Box<AuctionError>,
    },

    // =================================================================
    // Invariant Violations (6xx)
    // =================================================================
    /// A round invariant would break; the transaction is aborted.
    #[error("AU_ERR_600: Invariant violation: {reason}")]
    InvariantViolation { reason: String },

    // =================================================================
    // Ledger / Configuration (9xx)
    // =================================================================
    /// The ledger facade failed.
    #[error("AU_ERR_900: Ledger error: {0}")]
    Ledger(String),

    /// Configuration error (invalid document, bad values).
    #[error("AU_ERR_901: Configuration error: {0}")]
    Configuration(String),
}

impl AuctionError {
    /// Taxonomy kind, used by callers to decide whether to re-check state.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingInput { .. } | Self::MalformedInput { .. } | Self::Serialization(_) => {
                ErrorKind::Input
            }
            Self::OrgMismatch { .. } | Self::PermissionDenied { .. } | Self::AdminRequired { .. } => {
                ErrorKind::Authorization
            }
            Self::TermTampered { .. }
            | Self::CommitmentImmutable { .. }
            | Self::CommitmentUnreachable { .. } => ErrorKind::Integrity,
            Self::AlreadyExists { .. }
            | Self::AuctionNotFound { .. }
            | Self::RoundNotFound { .. }
            | Self::RoundExists { .. }
            | Self::PriorRoundMissing { .. }
            | Self::RoundNotOpen { .. }
            | Self::DemandNotExceedingSupply { .. }
            | Self::NextRoundRequired { .. }
            | Self::NoClosedRound { .. }
            | Self::NotFound { .. }
            | Self::CommitmentNotFound { .. }
            | Self::PreviousRoundNotJoined { .. }
            | Self::AuctionEnded { .. } => ErrorKind::StatePrecondition,
            Self::LowerAskExists { .. }
            | Self::HigherBidPending { .. }
            | Self::LowerAskPending { .. }
            | Self::ActiveOffersRemain { .. } => ErrorKind::BusinessRule,
            Self::InvariantViolation { .. } => ErrorKind::Invariant,
            Self::Ledger(_) | Self::Configuration(_) => ErrorKind::Ledger,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, AuctionError>;

impl From<serde_json::Error> for AuctionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TxId;

    fn key() -> CommitmentKey {
        CommitmentKey::new(ItemId::from("widget"), TxId::from("tx1"))
    }

    #[test]
    fn error_display_contains_prefix() {
        let err = AuctionError::NotFound { key: key() };
        let msg = format!("{err}");
        assert!(msg.starts_with("AU_ERR_409"), "Got: {msg}");
        assert!(msg.contains("widget/tx1"));
    }

    #[test]
    fn round_not_open_display() {
        let err = AuctionError::RoundNotOpen {
            auction_id: AuctionId::from("a1"),
            round: 2,
            status: RoundStatus::Closed,
        };
        let msg = format!("{err}");
        assert!(msg.contains("AU_ERR_405"));
        assert!(msg.contains("a1"));
        assert!(msg.contains("closed"));
    }

    #[test]
    fn active_offers_wraps_cause() {
        let cause = AuctionError::LowerAskPending {
            auction_id: AuctionId::from("a1"),
            round: 0,
            key: key(),
        };
        let err = AuctionError::ActiveOffersRemain {
            auction_id: AuctionId::from("a1"),
            round: 0,
            source: Box::new(cause),
        };
        let msg = format!("{err}");
        assert!(msg.contains("AU_ERR_503"));
        assert!(msg.contains("AU_ERR_502"));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.kind(), ErrorKind::BusinessRule);
    }

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(
            AuctionError::MissingInput { key: "privateBid".into() }.kind(),
            ErrorKind::Input
        );
        assert_eq!(
            AuctionError::AdminRequired { client: ClientId::from("c") }.kind(),
            ErrorKind::Authorization
        );
        assert_eq!(
            AuctionError::TermTampered {
                key: key(),
                committed: ContentHash::of(b"a"),
                revealed: ContentHash::of(b"b"),
            }
            .kind(),
            ErrorKind::Integrity
        );
        assert_eq!(
            AuctionError::NoClosedRound { auction_id: AuctionId::from("a") }.kind(),
            ErrorKind::StatePrecondition
        );
    }

    #[test]
    fn all_errors_have_au_err_prefix() {
        let errors: Vec<Box<dyn std::error::Error>> = vec![
            Box::new(AuctionError::Ledger("disk".into())),
            Box::new(AuctionError::CommitmentImmutable { key: key() }),
            Box::new(AuctionError::InvariantViolation { reason: "x".into() }),
            Box::new(AuctionError::OrgMismatch {
                client_org: OrgId::from("Org1MSP"),
                peer_org: OrgId::from("Org2MSP"),
            }),
            Box::new(AuctionError::AuctionEnded {
                auction_id: AuctionId::from("a"),
                round: 0,
            }),
        ];
        for err in errors {
            let msg = format!("{err}");
            assert!(msg.starts_with("AU_ERR_"), "Error missing AU_ERR_ prefix: {msg}");
        }
    }
}
