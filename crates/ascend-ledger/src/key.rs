//! Composite ledger keys.
//!
//! A composite key is a namespace followed by attributes, each terminated by
//! a NUL byte and the whole key led by one:
//!
//! ```text
//! \0auction\0auction1\0Round\03\0
//! ```
//!
//! Because every attribute is terminated, a partial key is a strict prefix of
//! exactly the keys that share its leading attributes (`a1` never matches
//! `a10`).

use ascend_types::{constants, AuctionError, AuctionId, CommitmentKey, ItemId, Result, TxId};

const DELIMITER: char = '\u{0}';

/// Namespace plus ordered attributes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct CompositeKey {
    namespace: String,
    attributes: Vec<String>,
}

impl CompositeKey {
    /// Build a key, rejecting parts that contain the delimiter.
    pub fn new<I, S>(namespace: &str, attributes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();
        if namespace.is_empty() || namespace.contains(DELIMITER) {
            return Err(AuctionError::MalformedInput {
                reason: format!("invalid key namespace {namespace:?}"),
            });
        }
        if let Some(bad) = attributes.iter().find(|a| a.contains(DELIMITER)) {
            return Err(AuctionError::MalformedInput {
                reason: format!("key attribute {bad:?} contains a NUL byte"),
            });
        }
        Ok(Self {
            namespace: namespace.to_string(),
            attributes,
        })
    }

    /// Key of a round record: `(auction, id, "Round", n)`.
    pub fn round(auction_id: &AuctionId, round: u32) -> Result<Self> {
        Self::new(
            constants::AUCTION_NAMESPACE,
            [
                auction_id.to_string(),
                constants::ROUND_ATTRIBUTE.to_string(),
                round.to_string(),
            ],
        )
    }

    /// Partial key covering every round of an auction.
    pub fn auction_rounds(auction_id: &AuctionId) -> Result<Self> {
        Self::new(constants::AUCTION_NAMESPACE, [auction_id.to_string()])
    }

    /// Key of a sealed term, reveal payload or commitment: `(namespace, item, tx)`.
    pub fn commitment(namespace: &str, key: &CommitmentKey) -> Result<Self> {
        Self::new(namespace, [key.item.to_string(), key.tx_id.to_string()])
    }

    /// Partial key covering every term of an item in a namespace.
    pub fn item_terms(namespace: &str, item: &ItemId) -> Result<Self> {
        Self::new(namespace, [item.to_string()])
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Render the key (or partial key prefix) for the ledger.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push(DELIMITER);
        out.push_str(&self.namespace);
        out.push(DELIMITER);
        for attribute in &self.attributes {
            out.push_str(attribute);
            out.push(DELIMITER);
        }
        out
    }

    /// Parse a rendered key.
    pub fn decode(encoded: &str) -> Result<Self> {
        let malformed = || AuctionError::MalformedInput {
            reason: format!("not a composite key: {encoded:?}"),
        };
        let body = encoded
            .strip_prefix(DELIMITER)
            .and_then(|rest| rest.strip_suffix(DELIMITER))
            .ok_or_else(malformed)?;
        let mut parts = body.split(DELIMITER);
        let namespace = parts.next().filter(|ns| !ns.is_empty()).ok_or_else(malformed)?;
        Self::new(namespace, parts)
    }

    /// Interpret a `(namespace, item, tx)` key as a [`CommitmentKey`].
    pub fn to_commitment_key(&self) -> Result<CommitmentKey> {
        match self.attributes.as_slice() {
            [item, tx_id] => Ok(CommitmentKey::new(
                ItemId::new(item.clone()),
                TxId::new(tx_id.clone()),
            )),
            _ => Err(AuctionError::MalformedInput {
                reason: format!(
                    "{} key has {} attributes, expected item and transaction id",
                    self.namespace,
                    self.attributes.len()
                ),
            }),
        }
    }
}
