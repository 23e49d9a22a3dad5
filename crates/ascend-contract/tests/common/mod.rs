//! Shared harness for the contract integration tests.

#![allow(dead_code)]

use ascend_contract::{Admission, AuctionContract};
use ascend_ledger::MemoryLedger;
use ascend_types::*;
use rust_decimal::Decimal;

/// Install a test subscriber once; `RUST_LOG` selects the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A sealed and published term, with what its owner needs to reveal it.
#[derive(Debug, Clone)]
pub struct Offer {
    pub client: ClientIdentity,
    pub side: Side,
    pub tx_id: TxId,
    pub payload: Vec<u8>,
}

/// Contract + ledger, driven the way clients on different peers would.
pub struct Market {
    pub contract: AuctionContract,
    pub ledger: MemoryLedger,
}

pub fn trader(id: &str, org: &str) -> ClientIdentity {
    ClientIdentity::dummy(id, org)
}

pub fn admin(org: &str) -> ClientIdentity {
    ClientIdentity::dummy("admin", org).with_attribute("role", "auctionAdmin")
}

pub fn widget() -> ItemId {
    ItemId::from("widget")
}

pub fn auction() -> AuctionId {
    AuctionId::from("auction1")
}

impl Market {
    pub fn new() -> Self {
        init_tracing();
        Self {
            contract: AuctionContract::default(),
            ledger: MemoryLedger::new(),
        }
    }

    /// Seal a term without publishing it.
    pub fn seal(&mut self, client: &ClientIdentity, side: Side, price: i64, quantity: u64) -> Offer {
        let term = SealedTerm::dummy(side, price, quantity, client.org.as_str(), client.id.as_str());
        let payload = RevealedTerm::from(&term).encode().unwrap();
        let ctx = TxContext::for_client(client)
            .with_transient(side.transient_private_key(), term.encode().unwrap())
            .with_transient(side.transient_public_key(), payload.clone());
        let tx_id = match side {
            Side::Bid => self.contract.bid(&mut self.ledger, &ctx, &widget()),
            Side::Ask => self.contract.ask(&mut self.ledger, &ctx, &widget()),
        }
        .unwrap();
        Offer {
            client: client.clone(),
            side,
            tx_id,
            payload,
        }
    }

    pub fn publish(&mut self, offer: &Offer) -> Result<PublicCommitment> {
        let ctx = TxContext::for_client(&offer.client);
        match offer.side {
            Side::Bid => self
                .contract
                .new_public_bid(&mut self.ledger, &ctx, &widget(), &offer.tx_id),
            Side::Ask => self
                .contract
                .new_public_ask(&mut self.ledger, &ctx, &widget(), &offer.tx_id),
        }
    }

    /// Seal and publish.
    pub fn offer(&mut self, client: &ClientIdentity, side: Side, price: i64, quantity: u64) -> Offer {
        let offer = self.seal(client, side, price, quantity);
        self.publish(&offer).unwrap();
        offer
    }

    pub fn reveal_payload(&mut self, offer: &Offer, round: u32, payload: Vec<u8>) -> Result<Admission> {
        let ctx = TxContext::for_client(&offer.client)
            .with_transient(offer.side.transient_public_key(), payload);
        match offer.side {
            Side::Bid => self
                .contract
                .submit_bid(&mut self.ledger, &ctx, &auction(), round, &offer.tx_id),
            Side::Ask => self
                .contract
                .submit_ask(&mut self.ledger, &ctx, &auction(), round, &offer.tx_id),
        }
    }

    pub fn reveal(&mut self, offer: &Offer, round: u32) -> Result<Admission> {
        self.reveal_payload(offer, round, offer.payload.clone())
    }

    pub fn create(&mut self, reserve: i64) -> Result<AuctionRound> {
        let ctx = TxContext::for_client(&admin("Org1MSP"));
        self.contract.create_auction(
            &mut self.ledger,
            &ctx,
            &auction(),
            &widget(),
            Decimal::new(reserve, 0),
        )
    }

    pub fn new_round(&mut self, round: u32) -> Result<AuctionRound> {
        self.contract
            .create_new_round(&mut self.ledger, &auction(), round)
    }

    /// Close a round as seen from a peer of `peer_org`.
    pub fn close(&mut self, peer_org: &str, round: u32) -> Result<AuctionRound> {
        let ctx = TxContext::for_client(&admin(peer_org));
        self.contract
            .close_auction_round(&mut self.ledger, &ctx, &auction(), round)
    }

    pub fn end(&mut self) -> Result<AuctionRound> {
        self.contract.end_auction(&mut self.ledger, &auction())
    }

    pub fn round(&self, round: u32) -> AuctionRound {
        self.contract
            .query_auction_round(&self.ledger, &auction(), round)
            .unwrap()
    }

    pub fn key(offer: &Offer) -> CommitmentKey {
        CommitmentKey::new(widget(), offer.tx_id.clone())
    }
}
