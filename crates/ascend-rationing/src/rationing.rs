//! Proportional rationing of a round.
//!
//! Runs after every accepted reveal, with the new entry already merged in.
//! With `S` = total offered, `D` = total demanded and `F` = quantity filled
//! before this reveal:
//!
//! | Condition | Rule |
//! |---|---|
//! | `F == S`, `F != 0` | [`RationRule::FixedFill`]: bidders win in full if `S ≥ D`, else `bid * F / D` |
//! | `F == 0` and `S == 0` or `D == 0` | [`RationRule::NoCrossing`]: nothing allocated |
//! | `S ≥ D` | [`RationRule::Expanding`]: bidders win in full; `min(D − F, S − F)` newly filled units are spread over sellers by unsold share |
//! | `S < D` | [`RationRule::Scarce`]: bidders win `bid * S / D`; every seller sold out |
//!
//! Quantity already sold by a seller is never taken back. Proportional shares
//! are floored; the units lost to flooring go one each, in registry order, to
//! the sellers whose exact share had a fractional part, so `F == Σ sold`.

use ascend_types::{AuctionError, AuctionRound, BidderEntry, CommitmentKey, Result, SellerEntry};

/// Which rationing rule a call applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RationRule {
    NoCrossing,
    FixedFill,
    Expanding,
    Scarce,
}

/// Result of one rationing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RationOutcome {
    pub rule: RationRule,
    pub previous_filled: u64,
    pub filled: u64,
}

impl RationOutcome {
    /// Units filled by this pass.
    #[must_use]
    pub fn newly_filled(&self) -> u64 {
        self.filled - self.previous_filled
    }
}

/// Outcome of merging a revealed entry into a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The entry was added and the round re-rationed.
    Applied(RationOutcome),
    /// The key already stands in the round; nothing changed.
    AlreadyPresent,
}

/// `quantity * numerator / denominator`, floored. Callers guarantee
/// `numerator <= denominator`, so the result never exceeds `quantity`.
fn scale(quantity: u64, numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    let exact = u128::from(quantity) * u128::from(numerator) / u128::from(denominator);
    u64::try_from(exact).unwrap_or(quantity)
}

/// Spread `incremental` newly filled units over sellers in proportion to
/// their unsold quantity.
fn distribute(round: &mut AuctionRound, incremental: u64) {
    let total_unsold = round.total_unsold();
    if incremental == 0 || total_unsold == 0 {
        return;
    }

    let mut handed = 0u64;
    let mut fractional = Vec::with_capacity(round.sellers.len());
    for seller in round.sellers.values_mut() {
        let share = scale(seller.unsold, incremental, total_unsold);
        let exact = u128::from(seller.unsold) * u128::from(incremental);
        fractional.push(exact % u128::from(total_unsold) != 0);
        seller.sold += share;
        handed += share;
    }

    let mut remainder = incremental.saturating_sub(handed);
    for (seller, has_fraction) in round.sellers.values_mut().zip(fractional) {
        if remainder == 0 {
            break;
        }
        if has_fraction && seller.sold < seller.quantity {
            seller.sold += 1;
            remainder -= 1;
        }
    }

    for seller in round.sellers.values_mut() {
        seller.unsold = seller.quantity - seller.sold;
    }
}

/// Re-ration a round in place.
pub fn ration(round: &mut AuctionRound) -> RationOutcome {
    let supply = round.quantity;
    let demand = round.demand;
    let previous_filled = round.filled;

    let rule = if previous_filled == supply && previous_filled != 0 {
        for bidder in round.bidders.values_mut() {
            bidder.won = if supply >= demand {
                bidder.quantity
            } else {
                scale(bidder.quantity, previous_filled, demand)
            };
        }
        RationRule::FixedFill
    } else if previous_filled == 0 && (supply == 0 || demand == 0) {
        for bidder in round.bidders.values_mut() {
            bidder.won = 0;
        }
        RationRule::NoCrossing
    } else if supply >= demand {
        for bidder in round.bidders.values_mut() {
            bidder.won = bidder.quantity;
        }
        let incremental = demand
            .saturating_sub(previous_filled)
            .min(supply.saturating_sub(previous_filled));
        distribute(round, incremental);
        round.filled = previous_filled + incremental;
        RationRule::Expanding
    } else {
        for bidder in round.bidders.values_mut() {
            bidder.won = scale(bidder.quantity, supply, demand);
        }
        for seller in round.sellers.values_mut() {
            seller.sold = seller.quantity;
            seller.unsold = 0;
        }
        round.filled = supply;
        RationRule::Scarce
    };

    let outcome = RationOutcome {
        rule,
        previous_filled,
        filled: round.filled,
    };
    tracing::debug!(
        auction = %round.auction_id,
        round = round.round,
        rule = ?outcome.rule,
        supply,
        demand,
        previous_filled,
        filled = outcome.filled,
        "Round rationed"
    );
    outcome
}

fn total_overflow(key: &CommitmentKey, what: &str) -> AuctionError {
    AuctionError::MalformedInput {
        reason: format!("{key}: round {what} would exceed {}", u64::MAX),
    }
}

/// Merge a revealed bid into the round and re-ration.
///
/// # Errors
/// `MalformedInput` when the round's demand would no longer fit in `u64`;
/// the round is left untouched.
pub fn admit_bid(round: &mut AuctionRound, key: CommitmentKey, entry: BidderEntry) -> Result<Admission> {
    if round.bidders.contains(&key) {
        return Ok(Admission::AlreadyPresent);
    }
    let demand = round
        .total_demanded()
        .and_then(|total| total.checked_add(entry.quantity))
        .ok_or_else(|| total_overflow(&key, "demand"))?;
    round.bidders.insert(key, entry);
    round.demand = demand;
    Ok(Admission::Applied(ration(round)))
}

/// Merge a revealed ask into the round and re-ration.
///
/// # Errors
/// `MalformedInput` when the round's supply would no longer fit in `u64`;
/// the round is left untouched.
pub fn admit_ask(round: &mut AuctionRound, key: CommitmentKey, entry: SellerEntry) -> Result<Admission> {
    if round.sellers.contains(&key) {
        return Ok(Admission::AlreadyPresent);
    }
    let supply = round
        .total_offered()
        .and_then(|total| total.checked_add(entry.quantity))
        .ok_or_else(|| total_overflow(&key, "supply"))?;
    round.sellers.insert(key, entry);
    round.quantity = supply;
    Ok(Admission::Applied(ration(round)))
}

#[cfg(test)]
mod tests {
    use ascend_types::*;
    use rust_decimal::Decimal;

    use super::*;

    fn key(tx: &str) -> CommitmentKey {
        CommitmentKey::new(ItemId::from("widget"), TxId::from(tx))
    }

    fn round() -> AuctionRound {
        AuctionRound::opening(
            AuctionId::from("auction1"),
            ItemId::from("widget"),
            Decimal::new(100, 0),
        )
    }

    fn ask(round: &mut AuctionRound, tx: &str, qty: u64) -> Admission {
        admit_ask(
            round,
            key(tx),
            SellerEntry::new(ClientId::from(tx), OrgId::from("Org1MSP"), qty),
        )
        .unwrap()
    }

    fn bid(round: &mut AuctionRound, tx: &str, qty: u64) -> Admission {
        admit_bid(
            round,
            key(tx),
            BidderEntry::new(ClientId::from(tx), OrgId::from("Org2MSP"), qty),
        )
        .unwrap()
    }

    #[test]
    fn supply_alone_fills_nothing() {
        let mut r = round();
        let admission = ask(&mut r, "s1", 10);
        assert!(matches!(
            admission,
            Admission::Applied(RationOutcome { rule: RationRule::NoCrossing, .. })
        ));
        assert_eq!(r.quantity, 10);
        assert_eq!(r.filled, 0);
        let seller = r.sellers.get(&key("s1")).unwrap();
        assert_eq!((seller.sold, seller.unsold), (0, 10));
    }

    #[test]
    fn exact_clear_sells_everything() {
        let mut r = round();
        ask(&mut r, "s1", 10);
        bid(&mut r, "b1", 10);
        assert_eq!(r.filled, 10);
        assert_eq!(r.sellers.get(&key("s1")).unwrap().sold, 10);
        assert_eq!(r.bidders.get(&key("b1")).unwrap().won, 10);
    }

    #[test]
    fn scarce_supply_rations_bidders() {
        let mut r = round();
        ask(&mut r, "s1", 10);
        bid(&mut r, "b1", 5);
        bid(&mut r, "b2", 10);
        assert_eq!(r.demand, 15);
        assert_eq!(r.filled, 10);
        assert_eq!(r.bidders.get(&key("b1")).unwrap().won, 5 * 10 / 15);
        assert_eq!(r.bidders.get(&key("b2")).unwrap().won, 10 * 10 / 15);
        let seller = r.sellers.get(&key("s1")).unwrap();
        assert_eq!((seller.sold, seller.unsold), (10, 0));
    }

    #[test]
    fn fixed_fill_rations_late_demand() {
        let mut r = round();
        ask(&mut r, "s1", 10);
        bid(&mut r, "b1", 10);
        let admission = bid(&mut r, "b2", 10);
        assert!(matches!(
            admission,
            Admission::Applied(RationOutcome { rule: RationRule::FixedFill, .. })
        ));
        assert_eq!(r.bidders.get(&key("b1")).unwrap().won, 5);
        assert_eq!(r.bidders.get(&key("b2")).unwrap().won, 5);
        assert_eq!(r.filled, 10);
    }

    #[test]
    fn incremental_fill_splits_by_unsold_share() {
        let mut r = round();
        ask(&mut r, "s1", 30);
        ask(&mut r, "s2", 10);
        bid(&mut r, "b1", 20);
        // 20 units over unsold 30:10 → 15 and 5.
        assert_eq!(r.sellers.get(&key("s1")).unwrap().sold, 15);
        assert_eq!(r.sellers.get(&key("s2")).unwrap().sold, 5);
        assert_eq!(r.filled, 20);
    }

    #[test]
    fn earlier_allocation_is_never_revoked() {
        let mut r = round();
        ask(&mut r, "s1", 10);
        bid(&mut r, "b1", 6);
        assert_eq!(r.sellers.get(&key("s1")).unwrap().sold, 6);

        // A second seller arrives: s1 keeps its 6 units.
        ask(&mut r, "s2", 10);
        assert_eq!(r.sellers.get(&key("s1")).unwrap().sold, 6);
        assert_eq!(r.sellers.get(&key("s2")).unwrap().sold, 0);

        // More demand: 4 new units spread over unsold 4:10.
        bid(&mut r, "b2", 4);
        let s1 = r.sellers.get(&key("s1")).unwrap().sold;
        let s2 = r.sellers.get(&key("s2")).unwrap().sold;
        assert!(s1 >= 6);
        assert_eq!(s1 + s2, 10);
        assert_eq!(r.filled, 10);
    }

    #[test]
    fn flooring_remainder_is_not_lost() {
        let mut r = round();
        ask(&mut r, "s1", 3);
        ask(&mut r, "s2", 3);
        ask(&mut r, "s3", 3);
        bid(&mut r, "b1", 7);
        let sold: u64 = r.sellers.values().map(|s| s.sold).sum();
        assert_eq!(sold, 7);
        assert_eq!(r.filled, 7);
        for seller in r.sellers.values() {
            assert_eq!(seller.sold + seller.unsold, seller.quantity);
        }
    }

    #[test]
    fn duplicate_reveal_is_a_noop() {
        let mut r = round();
        ask(&mut r, "s1", 10);
        bid(&mut r, "b1", 4);
        let before = r.clone();
        assert_eq!(ask(&mut r, "s1", 99), Admission::AlreadyPresent);
        assert_eq!(bid(&mut r, "b1", 99), Admission::AlreadyPresent);
        assert_eq!(r, before);
    }

    #[test]
    fn new_round_bidders_ration_against_carried_fill() {
        let mut r = round();
        ask(&mut r, "s1", 10);
        bid(&mut r, "b1", 8);
        bid(&mut r, "b2", 8);
        assert_eq!(r.filled, 10);

        let mut next = r.successor(Decimal::new(5, 0));
        bid(&mut next, "b1", 8);
        // F == S == 10 carried forward; demand 8 fits.
        assert_eq!(next.bidders.get(&key("b1")).unwrap().won, 8);
        assert_eq!(next.filled, 10);
        assert_eq!(next.sellers.get(&key("s1")).unwrap().sold, 10);
    }

    #[test]
    fn demand_without_supply_wins_nothing() {
        let mut r = round();
        bid(&mut r, "b1", 5);
        assert_eq!(r.bidders.get(&key("b1")).unwrap().won, 0);
        assert_eq!(r.filled, 0);
    }

    #[test]
    fn overflowing_totals_are_rejected_without_change() {
        let mut r = round();
        ask(&mut r, "s1", 10);
        bid(&mut r, "b1", u64::MAX);
        let before = r.clone();

        let err = admit_bid(
            &mut r,
            key("b2"),
            BidderEntry::new(ClientId::from("b2"), OrgId::from("Org2MSP"), 1),
        )
        .unwrap_err();
        assert!(matches!(err, AuctionError::MalformedInput { ref reason } if reason.contains("widget/b2")));
        assert_eq!(r, before);

        ask(&mut r, "s2", u64::MAX - 10);
        assert!(admit_ask(
            &mut r,
            key("s3"),
            SellerEntry::new(ClientId::from("s3"), OrgId::from("Org1MSP"), 1),
        )
        .is_err());
        assert_eq!(r.quantity, u64::MAX);
    }

    #[test]
    fn newly_filled_reports_delta() {
        let outcome = RationOutcome {
            rule: RationRule::Expanding,
            previous_filled: 4,
            filled: 9,
        };
        assert_eq!(outcome.newly_filled(), 5);
    }
}
