//! Error taxonomy for the mint pipeline.
//!
//! Three families share one enum so callers can match on a single type:
//!
//! - **Payment gating** (`NotEnoughPaid`, `BelowMintFee`) — recoverable by
//!   resubmitting with a sufficient payment.
//! - **Ledger invariants** (`DuplicateRequest`, `UnknownRequest`,
//!   `AlreadyFulfilled`, `MissingRandomWords`, `RangeExceeded`) — a caller
//!   or provider bug; fatal to the call, never retried automatically.
//! - **Simulator authorization** (`UnknownSubscription`,
//!   `UnsubscribedConsumer`, `ConsumerMismatch`) — fixable test setup.

use thiserror::Error;

use crate::state::AccountId;

/// Errors surfaced by the mint engine, request ledger, breed selector,
/// and oracle simulator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MintError {
    /// No payment was sent with the mint request.
    #[error("no payment sent with the mint request")]
    NotEnoughPaid,
    /// A nonzero payment was sent but it is below the configured mint fee.
    #[error("payment of {paid} is below the mint fee of {fee}")]
    BelowMintFee { paid: u64, fee: u64 },
    /// A request id was recorded twice in the ledger.
    #[error("request {0} is already recorded")]
    DuplicateRequest(u64),
    /// The request id was never recorded (fabricated or replayed id).
    #[error("unknown request id {0}")]
    UnknownRequest(u64),
    /// The request was already fulfilled; a second fulfillment must not mint.
    #[error("request {0} was already fulfilled")]
    AlreadyFulfilled(u64),
    /// The provider delivered an empty random-word slice.
    #[error("fulfillment for request {0} carried no random words")]
    MissingRandomWords(u64),
    /// A reduced random value fell outside the declared bucket partition.
    #[error("modded random value {value} is outside the bucket partition [0, {bound})")]
    RangeExceeded { value: u64, bound: u64 },
    /// The subscription id was never created on this simulator.
    #[error("unknown subscription id {0}")]
    UnknownSubscription(u64),
    /// The consumer is not registered on the subscription it tried to draw from.
    #[error("consumer {consumer} is not registered on subscription {subscription_id}")]
    UnsubscribedConsumer {
        subscription_id: u64,
        consumer: AccountId,
    },
    /// The fulfillment target is not the consumer that issued the request.
    #[error("request {request_id} was issued by consumer {expected}, not {got}")]
    ConsumerMismatch {
        request_id: u64,
        expected: AccountId,
        got: AccountId,
    },
    /// Metadata publishing failed; the mint is not completed.
    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Failures of the external metadata publisher collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// No metadata URI is configured for the selected breed index.
    #[error("no metadata URI configured for breed index {0}")]
    MissingUri(usize),
    /// The publisher backend was unreachable or rejected the upload.
    #[error("metadata publisher unavailable: {0}")]
    Unavailable(String),
}
