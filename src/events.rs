//! Observable events emitted by the mint engine.
//!
//! Tests and UIs read these from [`MintEngine::events`]; the engine also
//! logs each one via `tracing` as it is recorded. An already-fulfilled
//! request can never re-emit `MintCompleted` (the ledger's
//! `AlreadyFulfilled` check fires first).
//!
//! [`MintEngine::events`]: crate::engine::MintEngine::events

use serde::{Deserialize, Serialize};

use crate::selector::Breed;
use crate::state::AccountId;

/// Events recorded in order of occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MintEvent {
    /// A paid request was accepted and handed to the randomness provider.
    RequestAccepted {
        request_id: u64,
        requester: AccountId,
    },
    /// A fulfillment completed: breed selected, metadata published, token
    /// index assigned.
    MintCompleted {
        requester: AccountId,
        token_index: u64,
        breed: Breed,
        uri: String,
    },
}
