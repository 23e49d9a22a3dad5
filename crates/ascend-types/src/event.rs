//! Lifecycle notifications.
//!
//! Fire-and-forget signals for external subscribers. They carry only the
//! auction id and are not part of the consistency contract.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::AuctionId;

/// Named lifecycle transitions that emit a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuctionEvent {
    CreateAuction,
    CreateNewRound,
    CloseRound,
    EndAuction,
}

impl AuctionEvent {
    /// Event name as published to subscribers.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateAuction => "CreateAuction",
            Self::CreateNewRound => "CreateNewRound",
            Self::CloseRound => "CloseRound",
            Self::EndAuction => "EndAuction",
        }
    }

    /// Event payload: the raw auction id bytes.
    #[must_use]
    pub fn payload(auction_id: &AuctionId) -> Vec<u8> {
        auction_id.as_str().as_bytes().to_vec()
    }
}

impl fmt::Display for AuctionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
