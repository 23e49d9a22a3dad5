//! System-wide constants for the Ascend auction.

/// Ledger namespace of auction round records: `(auction, id, "Round", n)`.
pub const AUCTION_NAMESPACE: &str = "auction";

/// Fixed attribute separating the auction id from the round number.
pub const ROUND_ATTRIBUTE: &str = "Round";

/// Private-partition namespace of sealed bids.
pub const PRIVATE_BID_NAMESPACE: &str = "privateBid";

/// Private-partition namespace of sealed asks.
pub const PRIVATE_ASK_NAMESPACE: &str = "privateAsk";

/// Namespace of bid reveal payloads (private) and bid commitments (global).
pub const PUBLIC_BID_NAMESPACE: &str = "publicBid";

/// Namespace of ask reveal payloads (private) and ask commitments (global).
pub const PUBLIC_ASK_NAMESPACE: &str = "publicAsk";

/// Transient key carrying a sealed bid.
pub const TRANSIENT_PRIVATE_BID: &str = "privateBid";

/// Transient key carrying a bid reveal payload.
pub const TRANSIENT_PUBLIC_BID: &str = "publicBid";

/// Transient key carrying a sealed ask.
pub const TRANSIENT_PRIVATE_ASK: &str = "privateAsk";

/// Transient key carrying an ask reveal payload.
pub const TRANSIENT_PUBLIC_ASK: &str = "publicAsk";

/// Default price increase between consecutive rounds.
pub const DEFAULT_INCREMENT: i64 = 5;

/// Default value of the role attribute that grants administrator reads.
pub const DEFAULT_ADMIN_ROLE: &str = "auctionAdmin";

/// Default name of the client attribute holding the role.
pub const DEFAULT_ROLE_ATTRIBUTE: &str = "role";

/// Default prefix of an organization's private partition name.
pub const DEFAULT_COLLECTION_PREFIX: &str = "_implicit_org_";

/// Domain separator for round digests.
pub const ROUND_DIGEST_DOMAIN: &[u8] = b"ascend:round_digest:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Ascend";
