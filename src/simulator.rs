//! In-process oracle simulator.
//!
//! Plays the role of the live randomness coordinator for tests and local
//! development: it owns subscriptions and consumer registrations, issues
//! request ids, and on demand derives deterministic pseudo-random words
//! and delivers them **synchronously** into the consumer's callback. That
//! collapses the asynchronous request/fulfill contract into two explicit,
//! separately invokable calls, so tests can assert on intermediate state
//! (a Pending request) before triggering resolution.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::engine::{RandomnessConsumer, RandomnessProvider};
use crate::errors::MintError;
use crate::state::{AccountId, Subscription};
use crate::vrf::{compute_base_randomness, expand_randomness};

/// A request issued by the simulator, awaiting fulfillment delivery.
#[derive(Debug, Clone)]
struct PendingRequest {
    /// The consumer that issued the request and must receive the callback.
    consumer: AccountId,
    subscription_id: u64,
    num_words: u32,
    /// Nonce snapshotted at request time; part of the word derivation seed.
    nonce: u64,
}

#[derive(Debug, Default)]
struct SimulatorState {
    subscription_counter: u64,
    request_counter: u64,
    nonce: u64,
    subscriptions: HashMap<u64, Subscription>,
    pending: HashMap<u64, PendingRequest>,
}

/// Local stand-in for the randomness coordinator.
///
/// Bookkeeping here is deliberately distinct from the engine's request
/// ledger: the simulator tracks which consumer should receive each
/// fulfillment callback, the ledger tracks which requester paid for it.
pub struct OracleSimulator {
    /// Secret keying the HMAC word derivation.
    hmac_secret: Vec<u8>,
    /// Advisory fee deducted per requested word.
    base_fee: u64,
    inner: Mutex<SimulatorState>,
}

impl OracleSimulator {
    pub fn new(hmac_secret: impl Into<Vec<u8>>, base_fee: u64) -> Self {
        Self {
            hmac_secret: hmac_secret.into(),
            base_fee,
            inner: Mutex::new(SimulatorState::default()),
        }
    }

    /// Allocate a fresh subscription with zero balance and no consumers.
    pub fn create_subscription(&self) -> u64 {
        let mut state = self.lock_state();
        let id = state.subscription_counter;
        state.subscription_counter += 1;
        state.subscriptions.insert(
            id,
            Subscription {
                id,
                balance: 0,
                req_count: 0,
                consumers: Vec::new(),
            },
        );
        info!(subscription_id = id, "Subscription created");
        id
    }

    /// Add funds to a subscription's advisory balance.
    pub fn fund_subscription(&self, subscription_id: u64, amount: u64) -> Result<(), MintError> {
        let mut state = self.lock_state();
        let subscription = state
            .subscriptions
            .get_mut(&subscription_id)
            .ok_or(MintError::UnknownSubscription(subscription_id))?;
        subscription.balance = subscription.balance.saturating_add(amount);
        info!(subscription_id, balance = subscription.balance, "Subscription funded");
        Ok(())
    }

    /// Authorize a consumer to draw randomness from a subscription.
    pub fn add_consumer(&self, subscription_id: u64, consumer: AccountId) -> Result<(), MintError> {
        let mut state = self.lock_state();
        let subscription = state
            .subscriptions
            .get_mut(&subscription_id)
            .ok_or(MintError::UnknownSubscription(subscription_id))?;
        if !subscription.consumers.contains(&consumer) {
            info!(subscription_id, consumer = %consumer, "Consumer registered");
            subscription.consumers.push(consumer);
        }
        Ok(())
    }

    /// Snapshot of a subscription's current record.
    pub fn subscription(&self, subscription_id: u64) -> Option<Subscription> {
        self.lock_state().subscriptions.get(&subscription_id).cloned()
    }

    /// Derive the words for a request and deliver them synchronously into
    /// the target consumer's callback, within this call stack.
    ///
    /// Fails `UnknownRequest` for ids this simulator never issued and
    /// `ConsumerMismatch` when `consumer` is not the one that issued the
    /// request. If the callback itself fails, the pending entry is
    /// retained so the fulfillment can be retried once the fault is fixed.
    pub fn fulfill_random_words(
        &self,
        request_id: u64,
        consumer: &dyn RandomnessConsumer,
    ) -> Result<(), MintError> {
        let (words, subscription_id) = {
            let state = self.lock_state();
            let pending = state
                .pending
                .get(&request_id)
                .ok_or(MintError::UnknownRequest(request_id))?;
            if pending.consumer != *consumer.consumer_id() {
                return Err(MintError::ConsumerMismatch {
                    request_id,
                    expected: pending.consumer.clone(),
                    got: consumer.consumer_id().clone(),
                });
            }
            let base = compute_base_randomness(&self.hmac_secret, request_id, pending.nonce);
            (
                expand_randomness(&base, pending.num_words),
                pending.subscription_id,
            )
            // Lock released before re-entering the consumer, so a callback
            // that calls back into the provider cannot deadlock.
        };

        debug!(
            request_id,
            subscription_id,
            num_words = words.len(),
            "Delivering random words"
        );
        consumer.fulfill_random_words(request_id, &words)?;

        self.lock_state().pending.remove(&request_id);
        info!(request_id, consumer = %consumer.consumer_id(), "Request fulfilled");
        Ok(())
    }

    fn lock_state(&self) -> MutexGuard<'_, SimulatorState> {
        self.inner.lock().expect("simulator state lock poisoned")
    }
}

impl RandomnessProvider for OracleSimulator {
    /// Issue a fresh request id charged to `subscription_id`.
    ///
    /// The consumer must be registered on the subscription. Funding is
    /// advisory: an under-funded subscription gets a warning and a
    /// saturated deduction rather than a rejection.
    fn request_random_words(
        &self,
        subscription_id: u64,
        consumer: &AccountId,
        num_words: u32,
    ) -> Result<u64, MintError> {
        let mut state = self.lock_state();
        let subscription = state
            .subscriptions
            .get_mut(&subscription_id)
            .ok_or(MintError::UnknownSubscription(subscription_id))?;
        if !subscription.consumers.contains(consumer) {
            return Err(MintError::UnsubscribedConsumer {
                subscription_id,
                consumer: consumer.clone(),
            });
        }

        let fee = self.base_fee.saturating_mul(num_words as u64);
        if subscription.balance < fee {
            warn!(
                subscription_id,
                balance = subscription.balance,
                fee,
                "Subscription under-funded; charging what is available"
            );
        }
        subscription.balance = subscription.balance.saturating_sub(fee);
        subscription.req_count += 1;

        let request_id = state.request_counter;
        state.request_counter += 1;
        let nonce = state.nonce;
        state.nonce += 1;

        state.pending.insert(
            request_id,
            PendingRequest {
                consumer: consumer.clone(),
                subscription_id,
                num_words,
                nonce,
            },
        );

        info!(
            request_id,
            subscription_id,
            consumer = %consumer,
            num_words,
            "Randomness requested"
        );
        Ok(request_id)
    }
}
