//! Round invariant checker.
//!
//! Invariants that must hold on every stored round:
//! ```text
//! ∀ seller: sold + unsold == quantity
//! ∀ bidder: won ≤ quantity
//! Σ won ≤ min(D, F)
//! F == Σ sold,  S == Σ offered,  D == Σ bid
//! ```
//!
//! And across the rounds of one auction, each round's price is the previous
//! round's price plus the increment.

use ascend_types::{AuctionError, AuctionRound, Result};
use rust_decimal::Decimal;

fn violation(round: &AuctionRound, detail: String) -> AuctionError {
    AuctionError::InvariantViolation {
        reason: format!("auction {} round {}: {detail}", round.auction_id, round.round),
    }
}

/// Check every quantity invariant of one round.
///
/// # Errors
/// Returns [`AuctionError::InvariantViolation`] naming the first broken rule.
pub fn verify_round(round: &AuctionRound) -> Result<()> {
    let mut sold_total: u128 = 0;
    let mut offered_total: u128 = 0;
    for (key, seller) in round.sellers.iter() {
        if u128::from(seller.sold) + u128::from(seller.unsold) != u128::from(seller.quantity) {
            return Err(violation(
                round,
                format!(
                    "seller {key}: sold {} + unsold {} != quantity {}",
                    seller.sold, seller.unsold, seller.quantity
                ),
            ));
        }
        sold_total += u128::from(seller.sold);
        offered_total += u128::from(seller.quantity);
    }

    let mut won_total: u128 = 0;
    let mut bid_total: u128 = 0;
    for (key, bidder) in round.bidders.iter() {
        if bidder.won > bidder.quantity {
            return Err(violation(
                round,
                format!("bidder {key}: won {} > bid {}", bidder.won, bidder.quantity),
            ));
        }
        won_total += u128::from(bidder.won);
        bid_total += u128::from(bidder.quantity);
    }

    if offered_total != u128::from(round.quantity) {
        return Err(violation(
            round,
            format!("supply {} != offered {offered_total}", round.quantity),
        ));
    }
    if bid_total != u128::from(round.demand) {
        return Err(violation(
            round,
            format!("demand {} != bid {bid_total}", round.demand),
        ));
    }
    if sold_total != u128::from(round.filled) {
        return Err(violation(
            round,
            format!("filled {} != sold {sold_total}", round.filled),
        ));
    }
    let cap = u128::from(round.demand.min(round.filled));
    if won_total > cap {
        return Err(violation(
            round,
            format!("won {won_total} exceeds min(demand, filled) {cap}"),
        ));
    }
    Ok(())
}

/// Check that consecutive rounds step the price by exactly `increment`.
///
/// `rounds` must be sorted by round number; gaps are reported.
///
/// # Errors
/// Returns [`AuctionError::InvariantViolation`] on a gap or a wrong step.
pub fn verify_price_progression(rounds: &[AuctionRound], increment: Decimal) -> Result<()> {
    for pair in rounds.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        if next.round != prev.round + 1 {
            return Err(violation(
                next,
                format!("follows round {}", prev.round),
            ));
        }
        if next.price != prev.price + increment {
            return Err(violation(
                next,
                format!(
                    "price {} != previous {} + increment {increment}",
                    next.price, prev.price
                ),
            ));
        }
    }
    Ok(())
}
