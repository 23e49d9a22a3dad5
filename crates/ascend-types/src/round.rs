//! Auction round model.
//!
//! One [`AuctionRound`] exists per `(auction id, round number)`. Each round
//! moves **open → closed → final**; at most one round of an auction is ever
//! final, and once it is, every other round of that auction is gone.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{AuctionId, ClientId, CommitmentKey, ItemId, OrgId};

/// Lifecycle status of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Open,
    Closed,
    Final,
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Final => write!(f, "final"),
        }
    }
}

/// A revealed ask standing in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerEntry {
    pub seller: ClientId,
    pub org: OrgId,
    /// Quantity offered.
    pub quantity: u64,
    pub sold: u64,
    pub unsold: u64,
}

impl SellerEntry {
    /// A freshly revealed ask: nothing sold yet.
    #[must_use]
    pub fn new(seller: ClientId, org: OrgId, quantity: u64) -> Self {
        Self {
            seller,
            org,
            quantity,
            sold: 0,
            unsold: quantity,
        }
    }
}

/// A revealed bid standing in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidderEntry {
    pub buyer: ClientId,
    pub org: OrgId,
    /// Quantity bid.
    pub quantity: u64,
    pub won: u64,
}

impl BidderEntry {
    #[must_use]
    pub fn new(buyer: ClientId, org: OrgId, quantity: u64) -> Self {
        Self {
            buyer,
            org,
            quantity,
            won: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry: arena + stable key
// ---------------------------------------------------------------------------

/// Participant registry of a round.
///
/// Entries live in an append-only arena; the index maps each
/// [`CommitmentKey`] to its slot. Iteration follows insertion order, which is
/// identical on every peer that applied the same transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry<T> {
    slots: Vec<(CommitmentKey, T)>,
    index: BTreeMap<CommitmentKey, usize>,
}

impl<T> Registry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    /// Insert a new entry. Returns `false` (and leaves the registry
    /// untouched) when the key is already present.
    pub fn insert(&mut self, key: CommitmentKey, entry: T) -> bool {
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key.clone(), self.slots.len());
        self.slots.push((key, entry));
        true
    }

    #[must_use]
    pub fn contains(&self, key: &CommitmentKey) -> bool {
        self.index.contains_key(key)
    }

    #[must_use]
    pub fn get(&self, key: &CommitmentKey) -> Option<&T> {
        self.index.get(key).map(|&slot| &self.slots[slot].1)
    }

    pub fn get_mut(&mut self, key: &CommitmentKey) -> Option<&mut T> {
        let slot = *self.index.get(key)?;
        Some(&mut self.slots[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CommitmentKey, &T)> {
        self.slots.iter().map(|(key, entry)| (key, entry))
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().map(|(_, entry)| entry)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().map(|(_, entry)| entry)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
    }
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct SlotRef<'a, T> {
    key: &'a CommitmentKey,
    entry: &'a T,
}

#[derive(Deserialize)]
struct Slot<T> {
    key: CommitmentKey,
    entry: T,
}

impl<T: Serialize> Serialize for Registry<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.slots.iter().map(|(key, entry)| SlotRef { key, entry }))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Registry<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let slots = Vec::<Slot<T>>::deserialize(deserializer)?;
        let mut registry = Self::new();
        for slot in slots {
            if !registry.insert(slot.key, slot.entry) {
                return Err(serde::de::Error::custom("duplicate registry key"));
            }
        }
        Ok(registry)
    }
}

// ---------------------------------------------------------------------------
// AuctionRound
// ---------------------------------------------------------------------------

/// Snapshot of one priced round of an auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionRound {
    pub auction_id: AuctionId,
    pub round: u32,
    pub status: RoundStatus,
    pub item: ItemId,
    /// Clearing price of this round.
    pub price: Decimal,
    /// Aggregate quantity offered by sellers (S).
    pub quantity: u64,
    /// Aggregate quantity demanded by bidders (D).
    pub demand: u64,
    /// Aggregate quantity filled (F).
    pub filled: u64,
    pub sellers: Registry<SellerEntry>,
    pub bidders: Registry<BidderEntry>,
}

impl AuctionRound {
    /// Round 0 of a fresh auction.
    #[must_use]
    pub fn opening(auction_id: AuctionId, item: ItemId, reserve_price: Decimal) -> Self {
        Self {
            auction_id,
            round: 0,
            status: RoundStatus::Open,
            item,
            price: reserve_price,
            quantity: 0,
            demand: 0,
            filled: 0,
            sellers: Registry::new(),
            bidders: Registry::new(),
        }
    }

    /// The round that follows this one: price raised by `increment`,
    /// bidders and demand reset, sellers and fill state carried forward.
    #[must_use]
    pub fn successor(&self, increment: Decimal) -> Self {
        Self {
            auction_id: self.auction_id.clone(),
            round: self.round + 1,
            status: RoundStatus::Open,
            item: self.item.clone(),
            price: self.price + increment,
            quantity: self.quantity,
            demand: 0,
            filled: self.filled,
            sellers: self.sellers.clone(),
            bidders: Registry::new(),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == RoundStatus::Open
    }

    /// Demand left unmet by this round's fill.
    #[must_use]
    pub fn has_unmet_demand(&self) -> bool {
        self.filled < self.demand
    }

    /// Sum of seller quantities, `None` if it does not fit in `u64`.
    #[must_use]
    pub fn total_offered(&self) -> Option<u64> {
        self.sellers
            .values()
            .try_fold(0u64, |total, s| total.checked_add(s.quantity))
    }

    /// Sum of bid quantities, `None` if it does not fit in `u64`.
    #[must_use]
    pub fn total_demanded(&self) -> Option<u64> {
        self.bidders
            .values()
            .try_fold(0u64, |total, b| total.checked_add(b.quantity))
    }

    /// Never exceeds [`total_offered`](Self::total_offered).
    #[must_use]
    pub fn total_unsold(&self) -> u64 {
        self.sellers.values().map(|s| s.unsold).sum()
    }
}
