//! Transaction context handed to every contract operation.
//!
//! The host platform supplies the transaction id, timestamp, the submitting
//! client's identity and the organization of the executing peer. Nothing in
//! the contract looks these up on its own.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AuctionError, ClientId, OrgId, Result, TxId};

/// Identity of the submitting client, as certified by its organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub id: ClientId,
    pub org: OrgId,
    /// Certificate attributes (e.g. `role = auctionAdmin`).
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ClientIdentity {
    #[must_use]
    pub fn new(id: ClientId, org: OrgId) -> Self {
        Self {
            id,
            org,
            attributes: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str, value: &str) -> bool {
        self.attributes.get(name).is_some_and(|v| v == value)
    }
}

/// Everything a single transaction knows about its own execution.
#[derive(Debug, Clone)]
pub struct TxContext {
    pub tx_id: TxId,
    pub timestamp: DateTime<Utc>,
    pub client: ClientIdentity,
    /// Organization of the peer executing the transaction.
    pub peer_org: OrgId,
    /// Transient input: never written to the ledger by the host.
    pub transient: BTreeMap<String, Vec<u8>>,
}

impl TxContext {
    #[must_use]
    pub fn new(
        tx_id: TxId,
        timestamp: DateTime<Utc>,
        client: ClientIdentity,
        peer_org: OrgId,
    ) -> Self {
        Self {
            tx_id,
            timestamp,
            client,
            peer_org,
            transient: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_transient(mut self, key: impl Into<String>, value: Vec<u8>) -> Self {
        self.transient.insert(key.into(), value);
        self
    }

    /// Fetch a transient payload, failing with `MissingInput` when absent.
    pub fn require_transient(&self, key: &str) -> Result<&[u8]> {
        self.transient
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| AuctionError::MissingInput {
                key: key.to_string(),
            })
    }

    /// Private data may only be touched by a client whose organization owns
    /// the peer executing the transaction.
    pub fn verify_client_org_matches_peer(&self) -> Result<()> {
        if self.client.org != self.peer_org {
            return Err(AuctionError::OrgMismatch {
                client_org: self.client.org.clone(),
                peer_org: self.peer_org.clone(),
            });
        }
        Ok(())
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl ClientIdentity {
    pub fn dummy(id: &str, org: &str) -> Self {
        Self::new(ClientId::from(id), OrgId::from(org))
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl TxContext {
    /// A context for `client` executing on a peer of its own organization.
    pub fn for_client(client: &ClientIdentity) -> Self {
        Self::new(TxId::generate(), Utc::now(), client.clone(), client.org.clone())
    }

    /// A context for `client` executing on a peer of `peer_org`.
    pub fn on_peer(client: &ClientIdentity, peer_org: &str) -> Self {
        Self::new(TxId::generate(), Utc::now(), client.clone(), OrgId::from(peer_org))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_transient_names_the_key() {
        let ctx = TxContext::for_client(&ClientIdentity::dummy("alice", "Org1MSP"));
        let err = ctx.require_transient("privateBid").unwrap_err();
        assert!(matches!(err, AuctionError::MissingInput { ref key } if key == "privateBid"));
    }

    #[test]
    fn transient_lookup() {
        let ctx = TxContext::for_client(&ClientIdentity::dummy("alice", "Org1MSP"))
            .with_transient("publicBid", b"{}".to_vec());
        assert_eq!(ctx.require_transient("publicBid").unwrap(), b"{}");
    }

    #[test]
    fn org_mismatch_detected() {
        let client = ClientIdentity::dummy("alice", "Org1MSP");
        assert!(TxContext::for_client(&client).verify_client_org_matches_peer().is_ok());
        let err = TxContext::on_peer(&client, "Org2MSP")
            .verify_client_org_matches_peer()
            .unwrap_err();
        assert!(matches!(err, AuctionError::OrgMismatch { .. }));
    }

    #[test]
    fn attribute_check() {
        let admin = ClientIdentity::dummy("root", "Org1MSP").with_attribute("role", "auctionAdmin");
        assert!(admin.has_attribute("role", "auctionAdmin"));
        assert!(!admin.has_attribute("role", "bidder"));
        assert!(!ClientIdentity::dummy("x", "Org1MSP").has_attribute("role", "auctionAdmin"));
    }
}
