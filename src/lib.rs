//! Randomness-gated mint engine.
//!
//! Correlates asynchronous randomness requests with their requesters and,
//! on fulfillment, deterministically derives a breed from the returned
//! random word, publishes metadata, and records the mint. Ships with an
//! in-process oracle simulator so the whole request -> fulfill -> mint
//! pipeline runs end-to-end without a live randomness network.
//!
//! - [`engine::MintEngine`] — payment gate, request/fulfill orchestration,
//!   token counter, observable events.
//! - [`ledger::RequestLedger`] — requestId -> requester correlation.
//! - [`selector::BreedTable`] — weighted bucket selection over `[0, 100)`.
//! - [`simulator::OracleSimulator`] — subscriptions, consumer
//!   registration, deterministic synchronous fulfillment.
//! - [`publisher::MetadataPublisher`] — metadata URI collaborator seam.

pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod metrics;
pub mod publisher;
pub mod selector;
pub mod simulator;
pub mod state;
pub mod vrf;

pub use engine::{MintEngine, RandomnessConsumer, RandomnessProvider};
pub use errors::{MintError, PublishError};
pub use events::MintEvent;
pub use ledger::RequestLedger;
pub use publisher::{MetadataPublisher, StaticUriPublisher};
pub use selector::{Breed, BreedTable};
pub use simulator::OracleSimulator;
pub use state::{AccountId, MintRecord, RequestRecord, RequestStatus, Subscription};
