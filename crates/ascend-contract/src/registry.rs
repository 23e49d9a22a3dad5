//! Round Registry: keyed store of [`AuctionRound`] snapshots.
//!
//! One record per `(auction id, round number)`, stored as JSON under the
//! composite key `(auction, id, "Round", n)` in global state. Every write
//! passes [`verify_round`] first, so a round that breaks an invariant never
//! reaches the ledger.

use ascend_ledger::{CompositeKey, Ledger};
use ascend_rationing::{round_digest_hex, verify_round};
use ascend_types::{AuctionError, AuctionId, AuctionRound, Result};

/// Load one round, `None` when it was never created or has been discarded.
pub fn load<L: Ledger + ?Sized>(
    ledger: &L,
    auction_id: &AuctionId,
    round: u32,
) -> Result<Option<AuctionRound>> {
    let key = CompositeKey::round(auction_id, round)?;
    match ledger.get_state(&key.encode())? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Load one round, failing with `RoundNotFound` when absent.
pub fn require<L: Ledger + ?Sized>(
    ledger: &L,
    auction_id: &AuctionId,
    round: u32,
) -> Result<AuctionRound> {
    load(ledger, auction_id, round)?.ok_or_else(|| AuctionError::RoundNotFound {
        auction_id: auction_id.clone(),
        round,
    })
}

/// Every stored round of an auction, ordered by round number.
pub fn rounds<L: Ledger + ?Sized>(ledger: &L, auction_id: &AuctionId) -> Result<Vec<AuctionRound>> {
    let prefix = CompositeKey::auction_rounds(auction_id)?;
    let mut rounds = ledger
        .state_by_prefix(&prefix.encode())?
        .into_iter()
        .map(|(_, bytes)| serde_json::from_slice::<AuctionRound>(&bytes).map_err(AuctionError::from))
        .collect::<Result<Vec<_>>>()?;
    rounds.sort_by_key(|round| round.round);
    Ok(rounds)
}

/// Check invariants and write the round.
pub fn store<L: Ledger + ?Sized>(ledger: &mut L, round: &AuctionRound) -> Result<()> {
    verify_round(round)?;
    let key = CompositeKey::round(&round.auction_id, round.round)?;
    ledger.put_state(&key.encode(), serde_json::to_vec(round)?)?;
    tracing::debug!(
        auction = %round.auction_id,
        round = round.round,
        status = %round.status,
        digest = %round_digest_hex(round),
        "Round stored"
    );
    Ok(())
}

pub fn remove<L: Ledger + ?Sized>(ledger: &mut L, auction_id: &AuctionId, round: u32) -> Result<()> {
    let key = CompositeKey::round(auction_id, round)?;
    ledger.del_state(&key.encode())
}

#[cfg(test)]
mod tests {
    use ascend_ledger::MemoryLedger;
    use ascend_types::*;
    use rust_decimal::Decimal;

    use super::*;

    fn opening(id: &str) -> AuctionRound {
        AuctionRound::opening(AuctionId::from(id), ItemId::from("widget"), Decimal::new(100, 0))
    }

    #[test]
    fn store_then_load() {
        let mut ledger = MemoryLedger::new();
        let round = opening("a1");
        store(&mut ledger, &round).unwrap();
        assert_eq!(load(&ledger, &round.auction_id, 0).unwrap(), Some(round));
        assert_eq!(load(&ledger, &AuctionId::from("a1"), 1).unwrap(), None);
    }

    #[test]
    fn require_reports_missing_round() {
        let ledger = MemoryLedger::new();
        let err = require(&ledger, &AuctionId::from("a1"), 2).unwrap_err();
        assert!(matches!(err, AuctionError::RoundNotFound { round: 2, .. }));
    }

    #[test]
    fn rounds_sorted_numerically_and_scoped_to_auction() {
        let mut ledger = MemoryLedger::new();
        let mut round = opening("a1");
        for _ in 0..11 {
            store(&mut ledger, &round).unwrap();
            round = round.successor(Decimal::new(5, 0));
        }
        store(&mut ledger, &opening("a10")).unwrap();

        let numbers: Vec<u32> = rounds(&ledger, &AuctionId::from("a1"))
            .unwrap()
            .iter()
            .map(|r| r.round)
            .collect();
        assert_eq!(numbers, (0..11).collect::<Vec<_>>());
        assert_eq!(rounds(&ledger, &AuctionId::from("a10")).unwrap().len(), 1);
        assert!(rounds(&ledger, &AuctionId::from("a2")).unwrap().is_empty());
    }

    #[test]
    fn store_refuses_broken_round() {
        let mut ledger = MemoryLedger::new();
        let mut round = opening("a1");
        round.filled = 3;
        let err = store(&mut ledger, &round).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invariant);
        assert_eq!(ledger.state_len(), 0);
    }

    #[test]
    fn remove_deletes_round() {
        let mut ledger = MemoryLedger::new();
        store(&mut ledger, &opening("a1")).unwrap();
        remove(&mut ledger, &AuctionId::from("a1"), 0).unwrap();
        assert_eq!(ledger.state_len(), 0);
    }
}
