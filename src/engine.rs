//! Mint correlation engine.
//!
//! Orchestrates the randomness-gated mint pipeline:
//!
//! 1. **Request** — [`MintEngine::request_mint`] validates the payment,
//!    obtains a request id from the randomness provider, records the
//!    requester in the ledger, and emits `RequestAccepted`. Nothing is
//!    minted synchronously.
//! 2. **Fulfill** — the provider later delivers random words through
//!    [`MintEngine::fulfill_random_words`]; the engine resolves the
//!    requester, selects a breed, publishes metadata, advances the token
//!    counter, and emits `MintCompleted`.
//!
//! The ledger transition, token counter, mint log, and event log all live
//! under one mutex, so two concurrent fulfillments can never claim the
//! same token index and a request can never mint twice.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

use crate::errors::MintError;
use crate::events::MintEvent;
use crate::ledger::RequestLedger;
use crate::publisher::MetadataPublisher;
use crate::selector::BreedTable;
use crate::state::{AccountId, MintRecord, RequestStatus};
use crate::vrf::word_to_u64;

/// Capability for obtaining randomness request ids.
///
/// The engine is written once against this seam; the oracle simulator is
/// the in-process implementation, a live network client would be the
/// other.
pub trait RandomnessProvider {
    /// Ask the provider for randomness, charged to `subscription_id` on
    /// behalf of `consumer`. Returns the provider-assigned request id.
    fn request_random_words(
        &self,
        subscription_id: u64,
        consumer: &AccountId,
        num_words: u32,
    ) -> Result<u64, MintError>;
}

/// Callback half of the provider protocol: whoever requested randomness
/// receives the words here, correlated by request id.
pub trait RandomnessConsumer {
    /// Identity the consumer registered with on its subscription.
    fn consumer_id(&self) -> &AccountId;

    /// Deliver fulfilled random words for a previously issued request.
    fn fulfill_random_words(
        &self,
        request_id: u64,
        random_words: &[[u8; 32]],
    ) -> Result<(), MintError>;
}

/// Mutable state guarded by the engine's single mutex.
#[derive(Debug, Default)]
struct MintState {
    ledger: RequestLedger,
    /// Next token index; advanced exactly once per completed mint.
    token_counter: u64,
    mints: Vec<MintRecord>,
    events: Vec<MintEvent>,
}

/// The randomness request/fulfillment correlation engine.
///
/// Generic over the randomness provider and the metadata publisher so
/// tests can swap either collaborator; `Send + Sync` as long as both are,
/// so it can be shared across threads behind an `Arc`.
pub struct MintEngine<P, U> {
    /// Identity this engine registers as a consumer under.
    consumer: AccountId,
    /// Subscription charged for randomness requests.
    subscription_id: u64,
    /// Minimum payment required to accept a mint request.
    mint_fee: u64,
    table: BreedTable,
    provider: Arc<P>,
    publisher: U,
    state: Mutex<MintState>,
}

impl<P, U> MintEngine<P, U>
where
    P: RandomnessProvider,
    U: MetadataPublisher,
{
    pub fn new(
        consumer: AccountId,
        subscription_id: u64,
        mint_fee: u64,
        table: BreedTable,
        provider: Arc<P>,
        publisher: U,
    ) -> Self {
        Self {
            consumer,
            subscription_id,
            mint_fee,
            table,
            provider,
            publisher,
            state: Mutex::new(MintState::default()),
        }
    }

    /// The configured minimum payment.
    pub fn mint_fee(&self) -> u64 {
        self.mint_fee
    }

    /// Accept a paid mint request and obtain a randomness request id.
    ///
    /// Distinguishes "nothing sent" (`NotEnoughPaid`) from "sent but not
    /// enough" (`BelowMintFee`). On success the returned id is Pending in
    /// the ledger and a `RequestAccepted` event has been recorded.
    pub fn request_mint(&self, payment: u64, requester: AccountId) -> Result<u64, MintError> {
        if payment == 0 {
            return Err(MintError::NotEnoughPaid);
        }
        if payment < self.mint_fee {
            return Err(MintError::BelowMintFee {
                paid: payment,
                fee: self.mint_fee,
            });
        }

        let request_id =
            self.provider
                .request_random_words(self.subscription_id, &self.consumer, 1)?;

        let mut state = self.lock_state();
        state.ledger.record(request_id, requester.clone())?;
        state.events.push(MintEvent::RequestAccepted {
            request_id,
            requester: requester.clone(),
        });

        info!(request_id, requester = %requester, payment, "Mint request accepted");
        Ok(request_id)
    }

    /// Complete a mint from fulfilled random words.
    ///
    /// Invoked by the randomness provider, never by a requester directly.
    /// `UnknownRequest` and `AlreadyFulfilled` indicate a provider or
    /// caller bug and must not be retried; a second fulfillment for the
    /// same id can therefore never mint twice. If breed selection or
    /// metadata publishing fails, the ledger entry is rolled back to
    /// Pending and the token counter is untouched, so the paid-for request
    /// stays eligible for a retried fulfillment.
    pub fn fulfill(
        &self,
        request_id: u64,
        random_words: &[[u8; 32]],
    ) -> Result<MintRecord, MintError> {
        let word = random_words
            .first()
            .ok_or(MintError::MissingRandomWords(request_id))?;

        let mut state = self.lock_state();
        let requester = state.ledger.resolve(request_id)?;

        match self.complete_mint(&mut state, &requester, word_to_u64(word)) {
            Ok(record) => {
                info!(
                    request_id,
                    requester = %record.owner,
                    token_index = record.token_index,
                    breed = %record.breed,
                    uri = %record.uri,
                    "Mint completed"
                );
                Ok(record)
            }
            Err(err) => {
                // The entry was resolved just above, so the rollback cannot miss.
                let _ = state.ledger.rollback(request_id);
                warn!(request_id, error = %err, "Mint not completed, request rolled back to pending");
                Err(err)
            }
        }
    }

    /// Select the breed, publish metadata, and only then advance the
    /// counter and record the mint.
    fn complete_mint(
        &self,
        state: &mut MintState,
        requester: &AccountId,
        word: u64,
    ) -> Result<MintRecord, MintError> {
        let breed = self.table.select_word(word)?;
        let uri = self.publisher.publish(breed)?;

        let token_index = state.token_counter;
        state.token_counter += 1;

        let record = MintRecord {
            token_index,
            owner: requester.clone(),
            breed,
            uri: uri.clone(),
        };
        state.mints.push(record.clone());
        state.events.push(MintEvent::MintCompleted {
            requester: requester.clone(),
            token_index,
            breed,
            uri,
        });
        Ok(record)
    }

    /// Snapshot of all events recorded so far, in order of occurrence.
    pub fn events(&self) -> Vec<MintEvent> {
        self.lock_state().events.clone()
    }

    /// Snapshot of all completed mints.
    pub fn mints(&self) -> Vec<MintRecord> {
        self.lock_state().mints.clone()
    }

    /// Number of completed mints, i.e. the next token index.
    pub fn token_counter(&self) -> u64 {
        self.lock_state().token_counter
    }

    /// Ledger status of a request id, if it was ever recorded.
    pub fn request_status(&self, request_id: u64) -> Option<RequestStatus> {
        self.lock_state().ledger.status(request_id)
    }

    /// Number of requests still awaiting fulfillment.
    pub fn pending_requests(&self) -> usize {
        self.lock_state().ledger.pending_count()
    }

    fn lock_state(&self) -> MutexGuard<'_, MintState> {
        self.state.lock().expect("engine state lock poisoned")
    }
}

impl<P, U> RandomnessConsumer for MintEngine<P, U>
where
    P: RandomnessProvider,
    U: MetadataPublisher,
{
    fn consumer_id(&self) -> &AccountId {
        &self.consumer
    }

    fn fulfill_random_words(
        &self,
        request_id: u64,
        random_words: &[[u8; 32]],
    ) -> Result<(), MintError> {
        self.fulfill(request_id, random_words).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PublishError;
    use crate::publisher::StaticUriPublisher;
    use crate::selector::Breed;
    use std::sync::atomic::{AtomicU64, Ordering};

    const FEE: u64 = 100;

    /// Provider stub issuing sequential request ids, no authorization.
    #[derive(Default)]
    struct SeqProvider {
        next_id: AtomicU64,
    }

    impl RandomnessProvider for SeqProvider {
        fn request_random_words(
            &self,
            _subscription_id: u64,
            _consumer: &AccountId,
            _num_words: u32,
        ) -> Result<u64, MintError> {
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
        }
    }

    /// Publisher that always fails, for rollback tests.
    struct BrokenPublisher;

    impl MetadataPublisher for BrokenPublisher {
        fn publish(&self, _breed: Breed) -> Result<String, PublishError> {
            Err(PublishError::Unavailable("pinning service down".into()))
        }
    }

    fn engine_with<U: MetadataPublisher>(publisher: U) -> MintEngine<SeqProvider, U> {
        MintEngine::new(
            AccountId::from("mint-engine"),
            0,
            FEE,
            BreedTable::default(),
            Arc::new(SeqProvider::default()),
            publisher,
        )
    }

    fn engine() -> MintEngine<SeqProvider, StaticUriPublisher> {
        engine_with(StaticUriPublisher::default())
    }

    /// A word whose u64 fold equals `value`.
    fn word(value: u64) -> [u8; 32] {
        let mut w = [0u8; 32];
        w[0..8].copy_from_slice(&value.to_le_bytes());
        w
    }

    #[test]
    fn rejects_zero_payment() {
        let engine = engine();
        assert_eq!(
            engine.request_mint(0, AccountId::from("alice")),
            Err(MintError::NotEnoughPaid)
        );
    }

    #[test]
    fn rejects_payment_below_fee() {
        let engine = engine();
        assert_eq!(
            engine.request_mint(FEE - 1, AccountId::from("alice")),
            Err(MintError::BelowMintFee {
                paid: FEE - 1,
                fee: FEE
            })
        );
    }

    #[test]
    fn accepts_exact_fee_and_emits_request_accepted() {
        let engine = engine();
        let request_id = engine.request_mint(FEE, AccountId::from("alice")).unwrap();

        assert_eq!(engine.request_status(request_id), Some(RequestStatus::Pending));
        assert_eq!(
            engine.events(),
            vec![MintEvent::RequestAccepted {
                request_id,
                requester: AccountId::from("alice"),
            }]
        );
    }

    #[test]
    fn rejects_fabricated_request_id() {
        let engine = engine();
        engine.request_mint(FEE, AccountId::from("alice")).unwrap();

        assert_eq!(
            engine.fulfill(999, &[word(7)]),
            Err(MintError::UnknownRequest(999))
        );
    }

    #[test]
    fn rejects_empty_word_slice() {
        let engine = engine();
        let request_id = engine.request_mint(FEE, AccountId::from("alice")).unwrap();

        assert_eq!(
            engine.fulfill(request_id, &[]),
            Err(MintError::MissingRandomWords(request_id))
        );
        // The request is still pending; nothing was resolved.
        assert_eq!(engine.request_status(request_id), Some(RequestStatus::Pending));
    }

    #[test]
    fn mints_on_fulfillment() {
        let engine = engine();
        let request_id = engine.request_mint(FEE, AccountId::from("alice")).unwrap();

        // 7 -> pug, token 0
        let record = engine.fulfill(request_id, &[word(7)]).unwrap();
        assert_eq!(record.token_index, 0);
        assert_eq!(record.owner, AccountId::from("alice"));
        assert_eq!(record.breed, Breed::Pug);
        assert!(record.uri.starts_with("ipfs://"));

        assert_eq!(engine.request_status(request_id), Some(RequestStatus::Fulfilled));
        assert_eq!(engine.token_counter(), 1);
    }

    #[test]
    fn second_fulfillment_does_not_mint_twice() {
        let engine = engine();
        let request_id = engine.request_mint(FEE, AccountId::from("alice")).unwrap();

        engine.fulfill(request_id, &[word(21)]).unwrap();
        assert_eq!(
            engine.fulfill(request_id, &[word(21)]),
            Err(MintError::AlreadyFulfilled(request_id))
        );

        let completed: Vec<_> = engine
            .events()
            .into_iter()
            .filter(|e| matches!(e, MintEvent::MintCompleted { .. }))
            .collect();
        assert_eq!(completed.len(), 1);
        assert_eq!(engine.token_counter(), 1);
    }

    #[test]
    fn out_of_order_fulfillment_yields_distinct_token_indices() {
        let engine = engine();
        let first = engine.request_mint(FEE, AccountId::from("alice")).unwrap();
        let second = engine.request_mint(FEE, AccountId::from("bob")).unwrap();

        // Fulfill in reverse order of the requests.
        let bob = engine.fulfill(second, &[word(77)]).unwrap();
        let alice = engine.fulfill(first, &[word(7)]).unwrap();

        assert_eq!(bob.token_index, 0);
        assert_eq!(alice.token_index, 1);
        assert_eq!(bob.owner, AccountId::from("bob"));
        assert_eq!(alice.owner, AccountId::from("alice"));
    }

    #[test]
    fn publish_failure_rolls_back_and_stays_retryable() {
        let engine = engine_with(BrokenPublisher);
        let request_id = engine.request_mint(FEE, AccountId::from("alice")).unwrap();

        let err = engine.fulfill(request_id, &[word(7)]).unwrap_err();
        assert!(matches!(err, MintError::Publish(_)));

        // No token consumed, no event emitted, request pending again.
        assert_eq!(engine.token_counter(), 0);
        assert_eq!(engine.mints().len(), 0);
        assert_eq!(engine.request_status(request_id), Some(RequestStatus::Pending));
        assert_eq!(engine.events().len(), 1); // only RequestAccepted

        // A retried fulfillment may still resolve the same request.
        let requester_still_pending = engine.pending_requests();
        assert_eq!(requester_still_pending, 1);
    }

    #[test]
    fn concurrent_requests_get_distinct_pending_entries() {
        let engine = Arc::new(engine());
        let mut handles = Vec::new();

        for i in 0..8 {
            let engine = engine.clone();
            handles.push(std::thread::spawn(move || {
                engine
                    .request_mint(FEE, AccountId::new(format!("minter-{i}")))
                    .unwrap()
            }));
        }

        let mut ids: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(engine.pending_requests(), 8);

        // Fulfill them all; every token index is claimed exactly once.
        for id in ids {
            engine.fulfill(id, &[word(id * 13 % 100)]).unwrap();
        }
        assert_eq!(engine.token_counter(), 8);
        let mut indices: Vec<u64> = engine.mints().iter().map(|m| m.token_index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..8).collect::<Vec<u64>>());
    }
}
