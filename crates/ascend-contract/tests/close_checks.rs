//! Round closing against unrevealed commitments, seen from each
//! organization's peer.

mod common;

use ascend_types::*;
use common::{Market, trader, widget};

fn blocked_by(err: &AuctionError) -> &AuctionError {
    match err {
        AuctionError::ActiveOffersRemain { source, .. } => &**source,
        other => panic!("expected ActiveOffersRemain, got {other}"),
    }
}

#[test]
fn own_org_hidden_ask_blocks_until_revealed() {
    let mut market = Market::new();
    market.create(100).unwrap();
    let ask = market.offer(&trader("seller-a", "Org1MSP"), Side::Ask, 95, 4);

    let err = market.close("Org1MSP", 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BusinessRule);
    assert!(matches!(
        blocked_by(&err),
        AuctionError::LowerAskPending { round: 0, .. }
    ));
    assert_eq!(market.round(0).status, RoundStatus::Open);
    assert!(market.ledger.events().iter().all(|e| e.name != "CloseRound"));

    market.reveal(&ask, 0).unwrap();
    assert_eq!(market.close("Org1MSP", 0).unwrap().status, RoundStatus::Closed);
}

#[test]
fn deleted_hidden_ask_still_blocks_close() {
    let mut market = Market::new();
    market.create(100).unwrap();
    let seller = trader("seller-a", "Org1MSP");
    let ask = market.offer(&seller, Side::Ask, 100, 4);
    assert!(market.close("Org1MSP", 0).is_err());

    market
        .contract
        .delete_ask(&mut market.ledger, &TxContext::for_client(&seller), &widget(), &ask.tx_id)
        .unwrap();

    let err = market.close("Org1MSP", 0).unwrap_err();
    assert!(matches!(
        blocked_by(&err),
        AuctionError::CommitmentUnreachable { .. }
    ));
    // Org2's peer sees the commitment but no live sealed term behind it.
    let mut org2_view = market.ledger.clone();
    let err = market
        .contract
        .close_auction_round(
            &mut org2_view,
            &TxContext::for_client(&common::admin("Org2MSP")),
            &common::auction(),
            0,
        )
        .unwrap_err();
    assert!(matches!(
        blocked_by(&err),
        AuctionError::CommitmentUnreachable { .. }
    ));
    assert_eq!(market.round(0).status, RoundStatus::Open);
}

#[test]
fn ask_above_round_price_does_not_block() {
    let mut market = Market::new();
    market.create(100).unwrap();
    market.offer(&trader("seller-a", "Org1MSP"), Side::Ask, 101, 4);
    market.close("Org1MSP", 0).unwrap();
}

#[test]
fn own_org_hidden_bid_at_price_blocks() {
    let mut market = Market::new();
    market.create(100).unwrap();
    market.offer(&trader("buyer-b", "Org2MSP"), Side::Bid, 100, 2);

    let err = market.close("Org2MSP", 0).unwrap_err();
    assert!(matches!(
        blocked_by(&err),
        AuctionError::HigherBidPending { round: 0, .. }
    ));
}

#[test]
fn bid_below_round_price_does_not_block() {
    let mut market = Market::new();
    market.create(100).unwrap();
    market.offer(&trader("buyer-b", "Org2MSP"), Side::Bid, 99, 2);
    market.close("Org2MSP", 0).unwrap();
}

#[test]
fn other_org_commitment_only_needs_to_be_live() {
    let mut market = Market::new();
    market.create(100).unwrap();
    // A price Org1 cannot see; its peer only confirms the term is still held.
    market.offer(&trader("buyer-b", "Org2MSP"), Side::Bid, 150, 2);

    let mut org2_view = market.ledger.clone();
    assert!(
        market
            .contract
            .close_auction_round(
                &mut org2_view,
                &TxContext::for_client(&common::admin("Org2MSP")),
                &common::auction(),
                0,
            )
            .is_err()
    );
    market.close("Org1MSP", 0).unwrap();
}

#[test]
fn unmet_demand_needs_next_round() {
    let mut market = Market::new();
    market.create(100).unwrap();
    let ask = market.offer(&trader("seller-a", "Org1MSP"), Side::Ask, 90, 5);
    let bid = market.offer(&trader("buyer-b", "Org2MSP"), Side::Bid, 120, 8);
    market.reveal(&ask, 0).unwrap();
    market.reveal(&bid, 0).unwrap();
    assert!(market.round(0).has_unmet_demand());

    let err = market.close("Org1MSP", 0).unwrap_err();
    assert!(matches!(
        blocked_by(&err),
        AuctionError::NextRoundRequired { round: 0, .. }
    ));

    market.new_round(1).unwrap();
    market.reveal(&bid, 1).unwrap();
    // Round 1 is still short of supply, so it too needs a successor.
    let err = market.close("Org1MSP", 0).unwrap_err();
    assert!(matches!(
        blocked_by(&err),
        AuctionError::NextRoundRequired { round: 1, .. }
    ));
}

#[test]
fn pending_offer_in_later_round_blocks_earlier_close() {
    let mut market = Market::new();
    market.create(100).unwrap();
    let ask = market.offer(&trader("seller-a", "Org1MSP"), Side::Ask, 90, 5);
    let bid = market.offer(&trader("buyer-b", "Org2MSP"), Side::Bid, 120, 8);
    market.reveal(&ask, 0).unwrap();
    market.reveal(&bid, 0).unwrap();
    market.new_round(1).unwrap();
    market.reveal(&bid, 1).unwrap();

    let late = market.offer(&trader("seller-c", "Org1MSP"), Side::Ask, 104, 3);
    market.reveal(&late, 1).unwrap();
    // Round 1 now meets its demand; round 0 walks into it and passes.
    assert!(!market.round(1).has_unmet_demand());

    let hidden = market.offer(&trader("seller-d", "Org1MSP"), Side::Ask, 105, 1);
    let err = market.close("Org1MSP", 0).unwrap_err();
    assert!(matches!(
        blocked_by(&err),
        AuctionError::LowerAskPending { round: 1, .. }
    ));

    market.reveal(&hidden, 1).unwrap();
    market.close("Org1MSP", 0).unwrap();
    market.close("Org1MSP", 1).unwrap();
}

#[test]
fn closing_twice_fails() {
    let mut market = Market::new();
    market.create(100).unwrap();
    market.close("Org1MSP", 0).unwrap();
    assert!(matches!(
        market.close("Org1MSP", 0),
        Err(AuctionError::RoundNotOpen { status: RoundStatus::Closed, .. })
    ));
}
