//! Ownership/Query Guard.
//!
//! Sealed terms are readable by their owner, or by a client carrying the
//! administrator role attribute. Listing every term of an item is reserved
//! to administrators. Both only ever read the executing peer's own
//! partition, and only for a client of that organization.

use ascend_ledger::Ledger;
use ascend_types::{
    AuctionConfig, AuctionError, ClientIdentity, CommitmentKey, ItemId, Result, SealedTerm, Side,
    TermRecord, TxContext,
};

use crate::commitment::CommitmentStore;

pub struct QueryGuard<'c> {
    config: &'c AuctionConfig,
}

impl<'c> QueryGuard<'c> {
    #[must_use]
    pub fn new(config: &'c AuctionConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn is_admin(&self, client: &ClientIdentity) -> bool {
        client.has_attribute(&self.config.role_attribute, &self.config.admin_role)
    }

    /// One sealed term, for its owner or an administrator.
    pub fn term<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        ctx: &TxContext,
        side: Side,
        key: &CommitmentKey,
    ) -> Result<SealedTerm> {
        ctx.verify_client_org_matches_peer()?;
        let term = CommitmentStore::new(self.config)
            .sealed_term(ledger, &ctx.client.org, side, key)?
            .ok_or_else(|| AuctionError::NotFound { key: key.clone() })?;
        if term.owner != ctx.client.id && !self.is_admin(&ctx.client) {
            return Err(AuctionError::PermissionDenied {
                client: ctx.client.id.clone(),
                key: key.clone(),
            });
        }
        Ok(term)
    }

    /// Every sealed term of `item` in the caller's partition.
    pub fn terms<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        ctx: &TxContext,
        side: Side,
        item: &ItemId,
    ) -> Result<Vec<TermRecord>> {
        if !self.is_admin(&ctx.client) {
            return Err(AuctionError::AdminRequired {
                client: ctx.client.id.clone(),
            });
        }
        ctx.verify_client_org_matches_peer()?;
        CommitmentStore::new(self.config).sealed_terms(ledger, &ctx.client.org, side, item)
    }
}
