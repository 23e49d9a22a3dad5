//! Commitment Store.
//!
//! A participant's term lives in three places:
//!
//! | Record | Where | Key |
//! |---|---|---|
//! | Sealed term (price, quantity, org, owner) | submitter's private partition | `(privateBid\|privateAsk, item, tx)` |
//! | Reveal payload | submitter's private partition | `(publicBid\|publicAsk, item, tx)` |
//! | Public commitment `{org, hash}` | global state | `(publicBid\|publicAsk, item, tx)` |
//!
//! The commitment hash is the SHA-256 of the reveal payload as the host
//! reports it through [`Ledger::get_private_hash`]. Once published it never
//! changes.

use ascend_ledger::{CompositeKey, Ledger};
use ascend_types::{
    AuctionConfig, AuctionError, CommitmentKey, ContentHash, ItemId, OrgId, PublicCommitment,
    Result, RevealedTerm, SealedTerm, Side, TermRecord, TxContext, TxId,
};

/// Seal, publish, read and delete sealed terms.
pub struct CommitmentStore<'c> {
    config: &'c AuctionConfig,
}

impl<'c> CommitmentStore<'c> {
    #[must_use]
    pub fn new(config: &'c AuctionConfig) -> Self {
        Self { config }
    }

    /// Store the transaction's sealed term and reveal payload in the
    /// client's partition. Returns the transaction id that keys them.
    pub fn seal<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        side: Side,
        item: &ItemId,
    ) -> Result<TxId> {
        let sealed_bytes = ctx.require_transient(side.transient_private_key())?;
        let reveal_bytes = ctx.require_transient(side.transient_public_key())?;
        ctx.verify_client_org_matches_peer()?;

        let sealed = SealedTerm::decode(sealed_bytes)?;
        let reveal = RevealedTerm::decode(reveal_bytes)?;
        check_term_identity(ctx, side, &sealed)?;
        if RevealedTerm::from(&sealed) != reveal {
            return Err(AuctionError::MalformedInput {
                reason: "reveal payload does not describe the sealed term".to_string(),
            });
        }

        let key = CommitmentKey::new(item.clone(), ctx.tx_id.clone());
        let collection = self.config.collection_for(&ctx.client.org);
        let sealed_key = CompositeKey::commitment(side.private_namespace(), &key)?;
        let reveal_key = CompositeKey::commitment(side.public_namespace(), &key)?;
        ledger.put_private(&collection, &sealed_key.encode(), sealed_bytes.to_vec())?;
        ledger.put_private(&collection, &reveal_key.encode(), reveal_bytes.to_vec())?;

        tracing::info!(
            side = %side,
            key = %key,
            org = %ctx.client.org,
            "Term sealed"
        );
        Ok(ctx.tx_id.clone())
    }

    /// Publish `{org, hash}` of a sealed term to global state.
    ///
    /// Publishing the same commitment again is a no-op; publishing a
    /// different one over it fails with `CommitmentImmutable`.
    pub fn publish<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        side: Side,
        key: &CommitmentKey,
    ) -> Result<PublicCommitment> {
        ctx.verify_client_org_matches_peer()?;
        let collection = self.config.collection_for(&ctx.client.org);
        let reveal_key = CompositeKey::commitment(side.public_namespace(), key)?;
        let hash = ledger
            .get_private_hash(&collection, &reveal_key.encode())?
            .ok_or_else(|| AuctionError::NotFound { key: key.clone() })?;

        let commitment = PublicCommitment {
            org: ctx.client.org.clone(),
            hash,
        };
        match self.public_commitment(ledger, side, key)? {
            Some(existing) if existing == commitment => {
                tracing::debug!(side = %side, key = %key, "Commitment already published");
                return Ok(existing);
            }
            Some(_) => return Err(AuctionError::CommitmentImmutable { key: key.clone() }),
            None => {}
        }

        ledger.put_state(&reveal_key.encode(), serde_json::to_vec(&commitment)?)?;
        tracing::info!(
            side = %side,
            key = %key,
            org = %commitment.org,
            hash = %commitment.hash,
            "Commitment published"
        );
        Ok(commitment)
    }

    /// Owner-only removal of a sealed term and its reveal payload. The
    /// public commitment stays in global state.
    pub fn delete<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        ctx: &TxContext,
        side: Side,
        key: &CommitmentKey,
    ) -> Result<()> {
        ctx.verify_client_org_matches_peer()?;
        let term = self
            .sealed_term(ledger, &ctx.client.org, side, key)?
            .ok_or_else(|| AuctionError::NotFound { key: key.clone() })?;
        if term.owner != ctx.client.id {
            return Err(AuctionError::PermissionDenied {
                client: ctx.client.id.clone(),
                key: key.clone(),
            });
        }

        let collection = self.config.collection_for(&ctx.client.org);
        let sealed_key = CompositeKey::commitment(side.private_namespace(), key)?;
        let reveal_key = CompositeKey::commitment(side.public_namespace(), key)?;
        ledger.del_private(&collection, &sealed_key.encode())?;
        ledger.del_private(&collection, &reveal_key.encode())?;

        tracing::info!(side = %side, key = %key, "Term deleted");
        Ok(())
    }

    /// Read a sealed term from `org`'s partition.
    pub fn sealed_term<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        org: &OrgId,
        side: Side,
        key: &CommitmentKey,
    ) -> Result<Option<SealedTerm>> {
        let collection = self.config.collection_for(org);
        let sealed_key = CompositeKey::commitment(side.private_namespace(), key)?;
        ledger
            .get_private(&collection, &sealed_key.encode())?
            .map(|bytes| SealedTerm::decode(&bytes))
            .transpose()
    }

    /// Every sealed term for `item` in `org`'s partition, in key order.
    pub fn sealed_terms<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        org: &OrgId,
        side: Side,
        item: &ItemId,
    ) -> Result<Vec<TermRecord>> {
        let collection = self.config.collection_for(org);
        let prefix = CompositeKey::item_terms(side.private_namespace(), item)?;
        ledger
            .private_by_prefix(&collection, &prefix.encode())?
            .into_iter()
            .map(|(encoded, bytes)| -> Result<TermRecord> {
                let key = CompositeKey::decode(&encoded)?.to_commitment_key()?;
                Ok(TermRecord {
                    tx_id: key.tx_id,
                    item: key.item,
                    term: SealedTerm::decode(&bytes)?,
                })
            })
            .collect()
    }

    /// SHA-256 of the reveal payload held in `org`'s partition, if any.
    pub fn reveal_hash<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        org: &OrgId,
        side: Side,
        key: &CommitmentKey,
    ) -> Result<Option<ContentHash>> {
        let collection = self.config.collection_for(org);
        let reveal_key = CompositeKey::commitment(side.public_namespace(), key)?;
        ledger.get_private_hash(&collection, &reveal_key.encode())
    }

    /// Whether `org`'s partition still holds the sealed term.
    pub fn sealed_term_live<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        org: &OrgId,
        side: Side,
        key: &CommitmentKey,
    ) -> Result<bool> {
        let collection = self.config.collection_for(org);
        let sealed_key = CompositeKey::commitment(side.private_namespace(), key)?;
        Ok(ledger
            .get_private_hash(&collection, &sealed_key.encode())?
            .is_some())
    }

    /// The published commitment for a key.
    pub fn public_commitment<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        side: Side,
        key: &CommitmentKey,
    ) -> Result<Option<PublicCommitment>> {
        let public_key = CompositeKey::commitment(side.public_namespace(), key)?;
        ledger
            .get_state(&public_key.encode())?
            .map(|bytes| serde_json::from_slice(&bytes).map_err(AuctionError::from))
            .transpose()
    }

    /// Every published commitment for `item`, in key order.
    pub fn public_commitments<L: Ledger + ?Sized>(
        &self,
        ledger: &L,
        side: Side,
        item: &ItemId,
    ) -> Result<Vec<(CommitmentKey, PublicCommitment)>> {
        let prefix = CompositeKey::item_terms(side.public_namespace(), item)?;
        ledger
            .state_by_prefix(&prefix.encode())?
            .into_iter()
            .map(|(encoded, bytes)| -> Result<(CommitmentKey, PublicCommitment)> {
                let key = CompositeKey::decode(&encoded)?.to_commitment_key()?;
                Ok((key, serde_json::from_slice(&bytes)?))
            })
            .collect()
    }
}

fn check_term_identity(ctx: &TxContext, side: Side, term: &SealedTerm) -> Result<()> {
    if term.side != side {
        return Err(AuctionError::MalformedInput {
            reason: format!("expected a {side} term, got {}", term.side),
        });
    }
    if term.org != ctx.client.org {
        return Err(AuctionError::MalformedInput {
            reason: format!("term names org {}, client is in {}", term.org, ctx.client.org),
        });
    }
    if term.owner != ctx.client.id {
        return Err(AuctionError::MalformedInput {
            reason: format!("term names owner {}, client is {}", term.owner, ctx.client.id),
        });
    }
    Ok(())
}
