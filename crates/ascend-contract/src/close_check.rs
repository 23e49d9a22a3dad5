//! Outstanding-offer check run before a round may close.
//!
//! For each published commitment on the round's item that the round has not
//! absorbed yet:
//! - when the executing peer's organization published it, the sealed term is
//!   read and compared with the round price (`HigherBidPending` for a bid at or
//!   above it, `LowerAskPending` for an ask at or below it);
//! - otherwise the peer cannot see the price and only confirms the sealed
//!   term is still held by its organization (`CommitmentUnreachable` if not).
//!
//! While a round's fill is below its demand the check continues into the
//! next round, which must exist (`NextRoundRequired`). The walk is a loop
//! bounded by the number of stored rounds.

use ascend_ledger::Ledger;
use ascend_types::{AuctionConfig, AuctionError, AuctionRound, OrgId, Result, Side};

use crate::commitment::CommitmentStore;
use crate::registry;

pub struct OutstandingOfferCheck<'c> {
    store: CommitmentStore<'c>,
    peer_org: &'c OrgId,
}

impl<'c> OutstandingOfferCheck<'c> {
    #[must_use]
    pub fn new(config: &'c AuctionConfig, peer_org: &'c OrgId) -> Self {
        Self {
            store: CommitmentStore::new(config),
            peer_org,
        }
    }

    /// Check `round` and every round that must follow it.
    pub fn run<L: Ledger + ?Sized>(&self, ledger: &L, round: &AuctionRound) -> Result<()> {
        let mut successor: Option<AuctionRound> = None;
        loop {
            let current = successor.as_ref().unwrap_or(round);
            self.check_side(ledger, current, Side::Bid)?;
            self.check_side(ledger, current, Side::Ask)?;
            if !current.has_unmet_demand() {
                return Ok(());
            }

            let next = registry::load(ledger, &current.auction_id, current.round + 1)?
                .ok_or_else(|| AuctionError::NextRoundRequired {
                    auction_id: current.auction_id.clone(),
                    round: current.round,
                })?;
            tracing::debug!(
                auction = %next.auction_id,
                round = next.round,
                "Demand unmet, checking next round"
            );
            successor = Some(next);
        }
    }

    fn check_side<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        round: &AuctionRound,
        side: Side,
    ) -> Result<()> {
        for (key, commitment) in self.store.public_commitments(ledger, side, &round.item)? {
            let absorbed = match side {
                Side::Bid => round.bidders.contains(&key),
                Side::Ask => round.sellers.contains(&key),
            };
            if absorbed {
                continue;
            }

            if &commitment.org != self.peer_org {
                if !self
                    .store
                    .sealed_term_live(ledger, &commitment.org, side, &key)?
                {
                    return Err(AuctionError::CommitmentUnreachable {
                        key,
                        org: commitment.org,
                    });
                }
                continue;
            }

            let term = self
                .store
                .sealed_term(ledger, &commitment.org, side, &key)?
                .ok_or_else(|| AuctionError::CommitmentUnreachable {
                    key: key.clone(),
                    org: commitment.org.clone(),
                })?;
            match side {
                Side::Bid if term.price >= round.price => {
                    return Err(AuctionError::HigherBidPending {
                        auction_id: round.auction_id.clone(),
                        round: round.round,
                        key,
                    });
                }
                Side::Ask if term.price <= round.price => {
                    return Err(AuctionError::LowerAskPending {
                        auction_id: round.auction_id.clone(),
                        round: round.round,
                        key,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}
