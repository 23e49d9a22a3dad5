//! Identifiers used throughout Ascend.
//!
//! Auction, item, organization and client identifiers are opaque strings
//! chosen by callers. Transaction ids are assigned by the host; the in-memory
//! host mints UUIDv7 ids so they sort by creation time.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of an auction; every round of the auction shares it.
    AuctionId
);

string_id!(
    /// Identifier of the single good traded in an auction.
    ItemId
);

string_id!(
    /// Host-assigned transaction identifier. Indexes sealed terms.
    TxId
);

string_id!(
    /// Organization (membership service) identifier.
    OrgId
);

string_id!(
    /// Identity of an individual submitting client.
    ClientId
);

impl TxId {
    /// Mint a fresh, time-ordered transaction id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7().simple().to_string())
    }
}

// ---------------------------------------------------------------------------
// CommitmentKey
// ---------------------------------------------------------------------------

/// Structured key of a sealed term, its public commitment, and the round
/// registry entry it becomes once revealed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CommitmentKey {
    pub item: ItemId,
    pub tx_id: TxId,
}

impl CommitmentKey {
    #[must_use]
    pub fn new(item: ItemId, tx_id: TxId) -> Self {
        Self { item, tx_id }
    }
}

impl fmt::Display for CommitmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.item, self.tx_id)
    }
}

// ---------------------------------------------------------------------------
// ContentHash
// ---------------------------------------------------------------------------

/// SHA-256 digest of a reveal payload. Hex-encoded when serialized.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Hash raw payload bytes exactly as submitted.
    #[must_use]
    pub fn of(bytes: &[u8]) -> Self {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(bytes));
        Self(digest)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        let bytes = hex::decode(&text).map_err(serde::de::Error::custom)?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("content hash must be 32 bytes"))?;
        Ok(Self(digest))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_id_uniqueness() {
        let a = TxId::generate();
        let b = TxId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn commitment_key_display() {
        let key = CommitmentKey::new(ItemId::from("widget"), TxId::from("tx1"));
        assert_eq!(key.to_string(), "widget/tx1");
    }

    #[test]
    fn commitment_key_ordering_is_item_first() {
        let a = CommitmentKey::new(ItemId::from("a"), TxId::from("z"));
        let b = CommitmentKey::new(ItemId::from("b"), TxId::from("a"));
        assert!(a < b);
    }

    #[test]
    fn content_hash_matches_sha256() {
        let hash = ContentHash::of(b"abc");
        assert_eq!(
            hash.to_hex(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn content_hash_serializes_as_hex() {
        let hash = ContentHash::of(b"payload");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(hash, back);
    }

    #[test]
    fn content_hash_rejects_short_hex() {
        let err = serde_json::from_str::<ContentHash>("\"abcd\"");
        assert!(err.is_err());
    }

    #[test]
    fn string_ids_are_transparent_in_json() {
        let id = AuctionId::from("auction1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"auction1\"");
    }
}
