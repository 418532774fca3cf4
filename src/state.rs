//! Core records tracked across the mint pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::selector::Breed;

/// Opaque identity of an account or consumer contract.
///
/// Stands in for an on-chain address; the engine and simulator only ever
/// compare and log these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Request lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Request recorded, awaiting oracle fulfillment.
    Pending,
    /// Fulfillment delivered and the mint completed.
    Fulfilled,
}

/// One randomness request correlated with its requester.
///
/// Lifecycle: inserted exactly once at request time, transitions
/// Pending -> Fulfilled exactly once, then retained for audit. A failed
/// completion rolls the status back to Pending so the fulfillment may be
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    /// Unique identifier assigned by the randomness provider.
    pub request_id: u64,
    /// The account that initiated the request and will own the minted token.
    pub requester: AccountId,
    /// Current lifecycle status.
    pub status: RequestStatus,
}

/// A simulator-side subscription holding an advisory fee balance.
///
/// The in-memory analogue of the coordinator's subscription account plus
/// its consumer registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique subscription identifier.
    pub id: u64,
    /// Advisory balance available for randomness fees.
    pub balance: u64,
    /// Total number of requests made through this subscription.
    pub req_count: u64,
    /// Consumers authorized to draw on this subscription.
    pub consumers: Vec<AccountId>,
}

/// A completed mint. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintRecord {
    /// Monotonic token index, starting at 0, advanced once per completed mint.
    pub token_index: u64,
    /// The requester that paid for and now owns the token.
    pub owner: AccountId,
    /// Breed selected from the fulfilled random word.
    pub breed: Breed,
    /// Metadata URI returned by the publisher.
    pub uri: String,
}
