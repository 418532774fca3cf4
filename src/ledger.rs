//! Request correlation ledger.
//!
//! Maps each provider-assigned request id to the requester that paid for
//! it and tracks its Pending -> Fulfilled transition. The ledger holds no
//! locks of its own; the engine owns it inside the same mutex as the token
//! counter so the transition and the counter advance stay atomic.

use std::collections::HashMap;

use crate::errors::MintError;
use crate::state::{AccountId, RequestRecord, RequestStatus};

/// In-memory requestId -> requester bookkeeping.
///
/// Records are never deleted: a fulfilled entry is retained for audit, and
/// a pending entry stays pending until a fulfillment arrives.
#[derive(Debug, Default)]
pub struct RequestLedger {
    entries: HashMap<u64, RequestRecord>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new Pending entry for `request_id`.
    ///
    /// A request id is assigned exactly once by the provider, so a second
    /// insert for the same id is a caller bug.
    pub fn record(&mut self, request_id: u64, requester: AccountId) -> Result<(), MintError> {
        if self.entries.contains_key(&request_id) {
            return Err(MintError::DuplicateRequest(request_id));
        }
        self.entries.insert(
            request_id,
            RequestRecord {
                request_id,
                requester,
                status: RequestStatus::Pending,
            },
        );
        Ok(())
    }

    /// Transition a Pending entry to Fulfilled and return its requester.
    ///
    /// Exactly one resolve per id can ever succeed: a fabricated or
    /// replayed id fails `UnknownRequest`, a second resolve fails
    /// `AlreadyFulfilled`.
    pub fn resolve(&mut self, request_id: u64) -> Result<AccountId, MintError> {
        let record = self
            .entries
            .get_mut(&request_id)
            .ok_or(MintError::UnknownRequest(request_id))?;
        match record.status {
            RequestStatus::Pending => {
                record.status = RequestStatus::Fulfilled;
                Ok(record.requester.clone())
            }
            RequestStatus::Fulfilled => Err(MintError::AlreadyFulfilled(request_id)),
        }
    }

    /// Revert a Fulfilled entry to Pending after a failed completion.
    ///
    /// Used when breed selection or metadata publishing fails after the
    /// resolve succeeded, so the provider may retry the fulfillment.
    pub fn rollback(&mut self, request_id: u64) -> Result<(), MintError> {
        let record = self
            .entries
            .get_mut(&request_id)
            .ok_or(MintError::UnknownRequest(request_id))?;
        record.status = RequestStatus::Pending;
        Ok(())
    }

    /// Current status of a request, if it was ever recorded.
    pub fn status(&self, request_id: u64) -> Option<RequestStatus> {
        self.entries.get(&request_id).map(|r| r.status)
    }

    /// Number of entries still awaiting fulfillment.
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|r| r.status == RequestStatus::Pending)
            .count()
    }
}
