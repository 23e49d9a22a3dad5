//! Round digest for cross-peer consistency.
//!
//! Every endorsing peer that applies the same transactions to the same round
//! must produce the same round. The digest is a SHA-256 over the round's
//! header and its registries in insertion order, so two peers can compare a
//! 32-byte value instead of full payloads.

use ascend_types::{constants, AuctionRound};
use sha2::{Digest, Sha256};

fn update_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}

/// Compute the digest of a round.
#[must_use]
pub fn round_digest(round: &AuctionRound) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(constants::ROUND_DIGEST_DOMAIN);
    update_str(&mut hasher, round.auction_id.as_str());
    hasher.update(round.round.to_le_bytes());
    update_str(&mut hasher, &round.status.to_string());
    update_str(&mut hasher, round.item.as_str());
    update_str(&mut hasher, &round.price.normalize().to_string());
    hasher.update(round.quantity.to_le_bytes());
    hasher.update(round.demand.to_le_bytes());
    hasher.update(round.filled.to_le_bytes());

    hasher.update((round.sellers.len() as u64).to_le_bytes());
    for (key, seller) in round.sellers.iter() {
        update_str(&mut hasher, &key.to_string());
        update_str(&mut hasher, seller.seller.as_str());
        update_str(&mut hasher, seller.org.as_str());
        hasher.update(seller.quantity.to_le_bytes());
        hasher.update(seller.sold.to_le_bytes());
        hasher.update(seller.unsold.to_le_bytes());
    }

    hasher.update((round.bidders.len() as u64).to_le_bytes());
    for (key, bidder) in round.bidders.iter() {
        update_str(&mut hasher, &key.to_string());
        update_str(&mut hasher, bidder.buyer.as_str());
        update_str(&mut hasher, bidder.org.as_str());
        hasher.update(bidder.quantity.to_le_bytes());
        hasher.update(bidder.won.to_le_bytes());
    }

    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}

/// Hex rendering of [`round_digest`], as logged by the contract.
#[must_use]
pub fn round_digest_hex(round: &AuctionRound) -> String {
    hex::encode(round_digest(round))
}

/// Recompute the digest and compare with `expected`.
#[must_use]
pub fn verify_round_digest(round: &AuctionRound, expected: &[u8; 32]) -> bool {
    round_digest(round) == *expected
}
