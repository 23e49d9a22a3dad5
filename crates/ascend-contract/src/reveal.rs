//! Reveal Verifier.
//!
//! Checks, in order:
//! 1. the round exists and is open;
//! 2. a bid revealed after round 0 stood in the previous round;
//! 3. a public commitment exists for the key;
//! 4. the publishing organization's partition still holds the payload hash;
//! 5. the revealed bytes hash to both the partition hash and the commitment.
//!
//! The result is a [`RevealOutcome`], so "nothing committed" and "committed
//! something else" stay distinct until the caller turns them into errors.

use ascend_ledger::Ledger;
use ascend_types::{
    AuctionConfig, AuctionError, AuctionId, AuctionRound, CommitmentKey, ContentHash, OrgId,
    Result, RevealedTerm, RoundStatus, Side, TxId,
};

use crate::commitment::CommitmentStore;
use crate::registry;

/// What a reveal attempt established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The payload matches its commitment.
    Verified(RevealedTerm),
    /// The payload hashes to something other than what was committed.
    Tampered {
        committed: ContentHash,
        revealed: ContentHash,
    },
    /// No public commitment exists for the key.
    NotFound,
    /// The round is closed or final.
    NotOpen(RoundStatus),
    /// The publishing organization's partition no longer holds the payload.
    OrgUnreachable(OrgId),
}

/// A reveal of one term into one round.
#[derive(Debug, Clone)]
pub struct RevealRequest<'a> {
    pub auction_id: &'a AuctionId,
    pub round: u32,
    pub side: Side,
    pub tx_id: &'a TxId,
    pub payload: &'a [u8],
}

/// The round a reveal targets, the key it resolved to, and the outcome.
#[derive(Debug, Clone)]
pub struct Revealed {
    pub round: AuctionRound,
    pub key: CommitmentKey,
    pub outcome: RevealOutcome,
}

impl RevealOutcome {
    /// Turn anything but `Verified` into its error.
    pub fn into_term(
        self,
        auction_id: &AuctionId,
        round: u32,
        key: &CommitmentKey,
    ) -> Result<RevealedTerm> {
        match self {
            Self::Verified(term) => Ok(term),
            Self::Tampered {
                committed,
                revealed,
            } => Err(AuctionError::TermTampered {
                key: key.clone(),
                committed,
                revealed,
            }),
            Self::NotFound => Err(AuctionError::CommitmentNotFound { key: key.clone() }),
            Self::NotOpen(status) => Err(AuctionError::RoundNotOpen {
                auction_id: auction_id.clone(),
                round,
                status,
            }),
            Self::OrgUnreachable(org) => Err(AuctionError::CommitmentUnreachable {
                key: key.clone(),
                org,
            }),
        }
    }
}

pub struct RevealVerifier<'c> {
    config: &'c AuctionConfig,
}

impl<'c> RevealVerifier<'c> {
    #[must_use]
    pub fn new(config: &'c AuctionConfig) -> Self {
        Self { config }
    }

    /// Run the checks against the round the request names.
    pub fn verify<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        request: &RevealRequest<'_>,
    ) -> Result<Revealed> {
        let round = registry::require(ledger, request.auction_id, request.round)?;
        let key = CommitmentKey::new(round.item.clone(), request.tx_id.clone());
        let outcome = self.check(ledger, request, &round, &key)?;
        Ok(Revealed {
            round,
            key,
            outcome,
        })
    }

    fn check<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        request: &RevealRequest<'_>,
        round: &AuctionRound,
        key: &CommitmentKey,
    ) -> Result<RevealOutcome> {
        if !round.is_open() {
            return Ok(RevealOutcome::NotOpen(round.status));
        }

        if request.side == Side::Bid && request.round > 0 {
            let previous = request.round - 1;
            let earlier = registry::require(ledger, request.auction_id, previous)?;
            if !earlier.bidders.contains(key) {
                return Err(AuctionError::PreviousRoundNotJoined {
                    auction_id: request.auction_id.clone(),
                    previous,
                    key: key.clone(),
                });
            }
        }

        let store = CommitmentStore::new(self.config);
        let Some(commitment) = store.public_commitment(ledger, request.side, key)? else {
            return Ok(RevealOutcome::NotFound);
        };
        let Some(partition_hash) = store.reveal_hash(ledger, &commitment.org, request.side, key)?
        else {
            return Ok(RevealOutcome::OrgUnreachable(commitment.org));
        };

        let revealed = ContentHash::of(request.payload);
        if revealed != partition_hash {
            return Ok(RevealOutcome::Tampered {
                committed: partition_hash,
                revealed,
            });
        }
        if revealed != commitment.hash {
            return Ok(RevealOutcome::Tampered {
                committed: commitment.hash,
                revealed,
            });
        }

        let term = RevealedTerm::decode(request.payload)?;
        if term.side != request.side {
            return Err(AuctionError::MalformedInput {
                reason: format!("{key} revealed as a {} term", term.side),
            });
        }
        if term.org != commitment.org {
            return Err(AuctionError::MalformedInput {
                reason: format!("{key} names org {}, committed by {}", term.org, commitment.org),
            });
        }
        Ok(RevealOutcome::Verified(term))
    }
}
