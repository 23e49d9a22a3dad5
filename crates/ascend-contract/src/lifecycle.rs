//! Round Lifecycle Controller.
//!
//! ```text
//! open --close--> closed --finalize--> final
//! ```
//!
//! Every accepted transition emits its [`AuctionEvent`] with the auction id.

use ascend_ledger::Ledger;
use ascend_rationing::{Admission, admit_ask, admit_bid};
use ascend_types::{
    AuctionConfig, AuctionError, AuctionEvent, AuctionId, AuctionRound, BidderEntry,
    CommitmentKey, ItemId, Result, RoundStatus, SellerEntry, Side, TxContext, TxId,
};
use rust_decimal::Decimal;

use crate::close_check::OutstandingOfferCheck;
use crate::commitment::CommitmentStore;
use crate::registry;
use crate::reveal::{RevealOutcome, RevealRequest, RevealVerifier, Revealed};

pub struct RoundLifecycle<'c> {
    config: &'c AuctionConfig,
}

fn emit<L: Ledger + ?Sized>(ledger: &mut L, event: AuctionEvent, auction_id: &AuctionId) -> Result<()> {
    ledger.set_event(event.name(), AuctionEvent::payload(auction_id))
}

impl<'c> RoundLifecycle<'c> {
    #[must_use]
    pub fn new(config: &'c AuctionConfig) -> Self {
        Self { config }
    }

    /// Open round 0 of a new auction at `reserve_price`.
    pub fn create_auction<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        auction_id: &AuctionId,
        item: &ItemId,
        reserve_price: Decimal,
    ) -> Result<AuctionRound> {
        if reserve_price < Decimal::ZERO {
            return Err(AuctionError::MalformedInput {
                reason: format!("reserve price {reserve_price} is negative"),
            });
        }
        if !registry::rounds(ledger, auction_id)?.is_empty() {
            return Err(AuctionError::AlreadyExists {
                auction_id: auction_id.clone(),
            });
        }

        let store = CommitmentStore::new(self.config);
        for record in store.sealed_terms(ledger, &ctx.peer_org, Side::Ask, item)? {
            if record.term.price <= reserve_price {
                return Err(AuctionError::LowerAskExists {
                    item: item.clone(),
                    key: CommitmentKey::new(record.item, record.tx_id),
                    reserve_price,
                });
            }
        }

        let round = AuctionRound::opening(auction_id.clone(), item.clone(), reserve_price);
        registry::store(ledger, &round)?;
        emit(ledger, AuctionEvent::CreateAuction, auction_id)?;
        tracing::info!(
            auction = %auction_id,
            item = %item,
            reserve = %reserve_price,
            "Auction created"
        );
        Ok(round)
    }

    /// Open round `n` at the previous round's price plus the increment.
    pub fn create_new_round<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        auction_id: &AuctionId,
        round: u32,
    ) -> Result<AuctionRound> {
        if registry::load(ledger, auction_id, round)?.is_some() {
            return Err(AuctionError::RoundExists {
                auction_id: auction_id.clone(),
                round,
            });
        }
        if let Some(last) = registry::rounds(ledger, auction_id)?
            .into_iter()
            .find(|stored| stored.status == RoundStatus::Final)
        {
            return Err(AuctionError::AuctionEnded {
                auction_id: auction_id.clone(),
                round: last.round,
            });
        }
        let missing = || AuctionError::PriorRoundMissing {
            auction_id: auction_id.clone(),
            round,
        };
        let previous_number = round.checked_sub(1).ok_or_else(missing)?;
        let previous = registry::load(ledger, auction_id, previous_number)?.ok_or_else(missing)?;
        if !previous.has_unmet_demand() {
            return Err(AuctionError::DemandNotExceedingSupply {
                auction_id: auction_id.clone(),
                round: previous.round,
                filled: previous.filled,
                demand: previous.demand,
            });
        }

        let next = previous.successor(self.config.increment);
        registry::store(ledger, &next)?;
        emit(ledger, AuctionEvent::CreateNewRound, auction_id)?;
        tracing::info!(
            auction = %auction_id,
            round,
            price = %next.price,
            carried_sellers = next.sellers.len(),
            "Round created"
        );
        Ok(next)
    }

    /// Close an open round once no hidden improving offer remains.
    pub fn close_round<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        auction_id: &AuctionId,
        round: u32,
    ) -> Result<AuctionRound> {
        let mut target = registry::require(ledger, auction_id, round)?;
        if !target.is_open() {
            return Err(AuctionError::RoundNotOpen {
                auction_id: auction_id.clone(),
                round,
                status: target.status,
            });
        }

        if let Err(source) =
            OutstandingOfferCheck::new(self.config, &ctx.peer_org).run(ledger, &target)
        {
            tracing::warn!(
                auction = %auction_id,
                round,
                reason = %source,
                "Round close blocked"
            );
            return Err(AuctionError::ActiveOffersRemain {
                auction_id: auction_id.clone(),
                round,
                source: Box::new(source),
            });
        }

        target.status = RoundStatus::Closed;
        registry::store(ledger, &target)?;
        emit(ledger, AuctionEvent::CloseRound, auction_id)?;
        tracing::info!(
            auction = %auction_id,
            round,
            filled = target.filled,
            demand = target.demand,
            "Round closed"
        );
        Ok(target)
    }

    /// Finalize the highest closed round and discard every other round.
    pub fn end_auction<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        auction_id: &AuctionId,
    ) -> Result<AuctionRound> {
        let rounds = registry::rounds(ledger, auction_id)?;
        if rounds.is_empty() {
            return Err(AuctionError::AuctionNotFound {
                auction_id: auction_id.clone(),
            });
        }
        let mut winner = rounds
            .iter()
            .rev()
            .find(|round| round.status == RoundStatus::Closed)
            .cloned()
            .ok_or_else(|| AuctionError::NoClosedRound {
                auction_id: auction_id.clone(),
            })?;

        for round in rounds.iter().filter(|round| round.round != winner.round) {
            registry::remove(ledger, auction_id, round.round)?;
        }
        winner.status = RoundStatus::Final;
        registry::store(ledger, &winner)?;
        emit(ledger, AuctionEvent::EndAuction, auction_id)?;
        tracing::info!(
            auction = %auction_id,
            round = winner.round,
            price = %winner.price,
            filled = winner.filled,
            discarded = rounds.len() - 1,
            "Auction ended"
        );
        Ok(winner)
    }

    /// Reveal a term into a round and re-ration it.
    pub fn submit<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        side: Side,
        auction_id: &AuctionId,
        round: u32,
        tx_id: &TxId,
    ) -> Result<Admission> {
        let payload = ctx.require_transient(side.transient_public_key())?;
        let request = RevealRequest {
            auction_id,
            round,
            side,
            tx_id,
            payload,
        };
        let Revealed {
            round: mut target,
            key,
            outcome,
        } = RevealVerifier::new(self.config).verify(ledger, &request)?;

        if let RevealOutcome::Tampered {
            committed,
            revealed,
        } = &outcome
        {
            tracing::warn!(
                auction = %auction_id,
                round,
                key = %key,
                committed = %committed,
                revealed = %revealed,
                "Reveal rejected: term tampered"
            );
        }
        let term = outcome.into_term(auction_id, round, &key)?;

        let admission = match side {
            Side::Bid => admit_bid(
                &mut target,
                key.clone(),
                BidderEntry::new(term.owner, term.org, term.quantity),
            )?,
            Side::Ask => admit_ask(
                &mut target,
                key.clone(),
                SellerEntry::new(term.owner, term.org, term.quantity),
            )?,
        };

        match admission {
            Admission::AlreadyPresent => {
                tracing::debug!(
                    auction = %auction_id,
                    round,
                    key = %key,
                    "Term already in round"
                );
            }
            Admission::Applied(outcome) => {
                registry::store(ledger, &target)?;
                tracing::info!(
                    auction = %auction_id,
                    round,
                    side = %side,
                    key = %key,
                    quantity = term.quantity,
                    supply = target.quantity,
                    demand = target.demand,
                    filled = outcome.filled,
                    "Term revealed"
                );
            }
        }
        Ok(admission)
    }
}
