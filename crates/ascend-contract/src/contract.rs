//! `AuctionContract`: the externally invoked operations.
//!
//! Each mutating operation runs inside a [`TxOverlay`]: its writes and
//! notification reach the ledger only if the whole operation succeeds.
//! Read operations take the ledger by shared reference.

use ascend_ledger::{Ledger, TxOverlay};
use ascend_rationing::Admission;
use ascend_types::{
    AuctionConfig, AuctionError, AuctionId, AuctionRound, CommitmentKey, ItemId,
    PublicCommitment, Result, SealedTerm, Side, TermRecord, TxContext, TxId,
};
use rust_decimal::Decimal;

use crate::commitment::CommitmentStore;
use crate::guard::QueryGuard;
use crate::lifecycle::RoundLifecycle;
use crate::registry;

/// The auction contract, parameterized by its deployment configuration.
#[derive(Debug, Clone, Default)]
pub struct AuctionContract {
    config: AuctionConfig,
}

impl AuctionContract {
    /// Build a contract after validating `config`.
    pub fn new(config: AuctionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &AuctionConfig {
        &self.config
    }

    fn transact<L, T, F>(&self, ledger: &mut L, operation: &'static str, body: F) -> Result<T>
    where
        L: Ledger + ?Sized,
        F: FnOnce(&mut TxOverlay<'_, L>) -> Result<T>,
    {
        let mut tx = TxOverlay::new(ledger);
        match body(&mut tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(operation, error = %err, kind = ?err.kind(), "Transaction rejected");
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Commitments
    // -----------------------------------------------------------------------

    /// Seal a bid for `item`; returns the transaction id that keys it.
    pub fn bid<L: Ledger + ?Sized>(&self, ledger: &mut L, ctx: &TxContext, item: &ItemId) -> Result<TxId> {
        self.transact(ledger, "Bid", |tx| {
            CommitmentStore::new(&self.config).seal(tx, ctx, Side::Bid, item)
        })
    }

    /// Seal an ask for `item`; returns the transaction id that keys it.
    pub fn ask<L: Ledger + ?Sized>(&self, ledger: &mut L, ctx: &TxContext, item: &ItemId) -> Result<TxId> {
        self.transact(ledger, "Ask", |tx| {
            CommitmentStore::new(&self.config).seal(tx, ctx, Side::Ask, item)
        })
    }

    pub fn new_public_bid<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        item: &ItemId,
        tx_id: &TxId,
    ) -> Result<PublicCommitment> {
        let key = CommitmentKey::new(item.clone(), tx_id.clone());
        self.transact(ledger, "NewPublicBid", |tx| {
            CommitmentStore::new(&self.config).publish(tx, ctx, Side::Bid, &key)
        })
    }

    pub fn new_public_ask<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        item: &ItemId,
        tx_id: &TxId,
    ) -> Result<PublicCommitment> {
        let key = CommitmentKey::new(item.clone(), tx_id.clone());
        self.transact(ledger, "NewPublicAsk", |tx| {
            CommitmentStore::new(&self.config).publish(tx, ctx, Side::Ask, &key)
        })
    }

    pub fn delete_bid<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        item: &ItemId,
        tx_id: &TxId,
    ) -> Result<()> {
        let key = CommitmentKey::new(item.clone(), tx_id.clone());
        self.transact(ledger, "DeleteBid", |tx| {
            CommitmentStore::new(&self.config).delete(tx, ctx, Side::Bid, &key)
        })
    }

    pub fn delete_ask<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        item: &ItemId,
        tx_id: &TxId,
    ) -> Result<()> {
        let key = CommitmentKey::new(item.clone(), tx_id.clone());
        self.transact(ledger, "DeleteAsk", |tx| {
            CommitmentStore::new(&self.config).delete(tx, ctx, Side::Ask, &key)
        })
    }

    // -----------------------------------------------------------------------
    // Reveals
    // -----------------------------------------------------------------------

    /// Reveal a bid (transient `publicBid`) into a round.
    pub fn submit_bid<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        auction_id: &AuctionId,
        round: u32,
        tx_id: &TxId,
    ) -> Result<Admission> {
        self.transact(ledger, "SubmitBid", |tx| {
            RoundLifecycle::new(&self.config).submit(tx, ctx, Side::Bid, auction_id, round, tx_id)
        })
    }

    /// Reveal an ask (transient `publicAsk`) into a round.
    pub fn submit_ask<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        auction_id: &AuctionId,
        round: u32,
        tx_id: &TxId,
    ) -> Result<Admission> {
        self.transact(ledger, "SubmitAsk", |tx| {
            RoundLifecycle::new(&self.config).submit(tx, ctx, Side::Ask, auction_id, round, tx_id)
        })
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    pub fn create_auction<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        auction_id: &AuctionId,
        item: &ItemId,
        reserve_price: Decimal,
    ) -> Result<AuctionRound> {
        self.transact(ledger, "CreateAuction", |tx| {
            RoundLifecycle::new(&self.config).create_auction(tx, ctx, auction_id, item, reserve_price)
        })
    }

    pub fn create_new_round<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        auction_id: &AuctionId,
        round: u32,
    ) -> Result<AuctionRound> {
        self.transact(ledger, "CreateNewRound", |tx| {
            RoundLifecycle::new(&self.config).create_new_round(tx, auction_id, round)
        })
    }

    pub fn close_auction_round<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        auction_id: &AuctionId,
        round: u32,
    ) -> Result<AuctionRound> {
        self.transact(ledger, "CloseAuctionRound", |tx| {
            RoundLifecycle::new(&self.config).close_round(tx, ctx, auction_id, round)
        })
    }

    pub fn end_auction<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        auction_id: &AuctionId,
    ) -> Result<AuctionRound> {
        self.transact(ledger, "EndAuction", |tx| {
            RoundLifecycle::new(&self.config).end_auction(tx, auction_id)
        })
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Every stored round of the auction, by round number.
    pub fn query_auction<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        auction_id: &AuctionId,
    ) -> Result<Vec<AuctionRound>> {
        registry::rounds(ledger, auction_id)
    }

    pub fn query_auction_round<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        auction_id: &AuctionId,
        round: u32,
    ) -> Result<AuctionRound> {
        registry::require(ledger, auction_id, round)
    }

    pub fn query_bid<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        ctx: &TxContext,
        item: &ItemId,
        tx_id: &TxId,
    ) -> Result<SealedTerm> {
        let key = CommitmentKey::new(item.clone(), tx_id.clone());
        QueryGuard::new(&self.config).term(ledger, ctx, Side::Bid, &key)
    }

    pub fn query_ask<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        ctx: &TxContext,
        item: &ItemId,
        tx_id: &TxId,
    ) -> Result<SealedTerm> {
        let key = CommitmentKey::new(item.clone(), tx_id.clone());
        QueryGuard::new(&self.config).term(ledger, ctx, Side::Ask, &key)
    }

    /// Administrator listing of the caller's partition.
    pub fn query_bids<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        ctx: &TxContext,
        item: &ItemId,
    ) -> Result<Vec<TermRecord>> {
        QueryGuard::new(&self.config).terms(ledger, ctx, Side::Bid, item)
    }

    /// Administrator listing of the caller's partition.
    pub fn query_asks<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        ctx: &TxContext,
        item: &ItemId,
    ) -> Result<Vec<TermRecord>> {
        QueryGuard::new(&self.config).terms(ledger, ctx, Side::Ask, item)
    }

    pub fn query_public_bid<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        item: &ItemId,
        tx_id: &TxId,
    ) -> Result<PublicCommitment> {
        self.query_public(ledger, Side::Bid, item, tx_id)
    }

    pub fn query_public_ask<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        item: &ItemId,
        tx_id: &TxId,
    ) -> Result<PublicCommitment> {
        self.query_public(ledger, Side::Ask, item, tx_id)
    }

    fn query_public<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        side: Side,
        item: &ItemId,
        tx_id: &TxId,
    ) -> Result<PublicCommitment> {
        let key = CommitmentKey::new(item.clone(), tx_id.clone());
        CommitmentStore::new(&self.config)
            .public_commitment(ledger, side, &key)?
            .ok_or(AuctionError::CommitmentNotFound { key })
    }
}

#[cfg(test)]
mod tests {
    use ascend_ledger::MemoryLedger;
    use ascend_types::*;

    use super::*;

    #[test]
    fn new_rejects_invalid_config() {
        let config = AuctionConfig {
            increment: Decimal::ZERO,
            ..AuctionConfig::default()
        };
        assert!(matches!(
            AuctionContract::new(config),
            Err(AuctionError::Configuration(_))
        ));
    }

    #[test]
    fn failed_operation_leaves_no_trace() {
        let contract = AuctionContract::default();
        let mut ledger = MemoryLedger::new();
        let admin = ClientIdentity::dummy("admin", "Org1MSP");
        contract
            .create_auction(
                &mut ledger,
                &TxContext::for_client(&admin),
                &AuctionId::from("a1"),
                &ItemId::from("widget"),
                Decimal::new(100, 0),
            )
            .unwrap();
        let before = ledger.clone();

        // Round 1 cannot be created (no unmet demand): nothing is written.
        assert!(contract.create_new_round(&mut ledger, &AuctionId::from("a1"), 1).is_err());
        assert_eq!(ledger.state_len(), before.state_len());
        assert_eq!(ledger.events(), before.events());
    }

    #[test]
    fn query_public_reports_missing_commitment() {
        let contract = AuctionContract::default();
        let ledger = MemoryLedger::new();
        let err = contract
            .query_public_bid(&ledger, &ItemId::from("widget"), &TxId::from("none"))
            .unwrap_err();
        assert!(matches!(err, AuctionError::CommitmentNotFound { .. }));
    }

    #[test]
    fn query_auction_round_reports_missing_round() {
        let contract = AuctionContract::default();
        let ledger = MemoryLedger::new();
        assert!(contract.query_auction(&ledger, &AuctionId::from("a1")).unwrap().is_empty());
        assert!(matches!(
            contract.query_auction_round(&ledger, &AuctionId::from("a1"), 0),
            Err(AuctionError::RoundNotFound { .. })
        ));
    }
}
