// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    require_account, require_cooldown_elapsed, require_not_paused, require_oracle, require_owner,
    require_provider, state_hash, Batch, BatchStatus, BatchSummary, Caller,
    ConfidentialAccumulator, DecryptionContext, DecryptionOracle, DecryptionProof, LedgerError,
    ProofVerifier, RateLimited, Roles, SafetyState,
};
use alloy::primitives::Address;
use hush_events::{
    BatchClosed, BatchId, BatchOpened, CooldownChanged, DecryptionCompleted,
    DecryptionRequested, DonationSubmitted, LedgerEvent, OwnershipTransferred, PauseChanged,
    ProviderAdded, ProviderRemoved, RequestId,
};
use hush_fhe::{CiphertextRef, EncryptedHandle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Roles, safety controls and the batch counter. Persisted as a single record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMeta {
    pub roles: Roles,
    pub safety: SafetyState,
    pub current_batch_id: BatchId,
}

impl LedgerMeta {
    pub fn genesis(
        owner: Address,
        providers: impl IntoIterator<Item = Address>,
        cooldown_seconds: u64,
        paused: bool,
    ) -> Self {
        Self {
            roles: Roles::new(owner, providers),
            safety: SafetyState::new(paused, cooldown_seconds),
            current_batch_id: BatchId::NONE,
        }
    }
}

/// What a successful operation changed: the events to publish and the records to persist.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Effects {
    pub events: Vec<LedgerEvent>,
    pub meta: bool,
    pub batches: Vec<BatchId>,
    pub contexts: Vec<RequestId>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && !self.meta && self.batches.is_empty() && self.contexts.is_empty()
    }

    fn event(mut self, event: impl Into<LedgerEvent>) -> Self {
        self.events.push(event.into());
        self
    }

    fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    fn batch(mut self, batch_id: BatchId) -> Self {
        self.batches.push(batch_id);
        self
    }

    fn context(mut self, request_id: RequestId) -> Self {
        self.contexts.push(request_id);
        self
    }
}

/// The whole ledger as a plain state machine. Each operation validates everything first and
/// only then applies, so an `Err` always leaves the state untouched.
#[derive(Clone)]
pub struct LedgerState {
    ledger: Address,
    meta: LedgerMeta,
    batches: BTreeMap<BatchId, Batch>,
    contexts: BTreeMap<RequestId, DecryptionContext>,
    accumulator: ConfidentialAccumulator,
}

impl LedgerState {
    pub fn new(ledger: Address, meta: LedgerMeta, accumulator: ConfidentialAccumulator) -> Self {
        Self {
            ledger,
            meta,
            batches: BTreeMap::new(),
            contexts: BTreeMap::new(),
            accumulator,
        }
    }

    /// Rebuild from persisted records
    pub fn from_parts(
        ledger: Address,
        meta: LedgerMeta,
        batches: Vec<Batch>,
        contexts: Vec<DecryptionContext>,
        accumulator: ConfidentialAccumulator,
    ) -> Result<Self, LedgerError> {
        let mut state = Self::new(ledger, meta, accumulator);
        for batch in batches {
            if batch.id == BatchId::NONE || batch.id > state.meta.current_batch_id {
                return Err(LedgerError::internal(format!(
                    "persisted batch {} is beyond the batch counter {}",
                    batch.id, state.meta.current_batch_id
                )));
            }
            state.batches.insert(batch.id, batch);
        }
        for context in contexts {
            if !state.batches.contains_key(&context.batch_id) {
                return Err(LedgerError::internal(format!(
                    "{} refers to unknown batch {}",
                    context.request_id, context.batch_id
                )));
            }
            state.contexts.insert(context.request_id, context);
        }
        Ok(state)
    }

    pub fn ledger(&self) -> Address {
        self.ledger
    }

    pub fn meta(&self) -> &LedgerMeta {
        &self.meta
    }

    pub fn batch(&self, batch_id: &BatchId) -> Option<&Batch> {
        self.batches.get(batch_id)
    }

    pub fn decryption_context(&self, request_id: &RequestId) -> Option<&DecryptionContext> {
        self.contexts.get(request_id)
    }

    fn existing_batch(&self, batch_id: BatchId) -> Result<&Batch, LedgerError> {
        if batch_id == BatchId::NONE || batch_id > self.meta.current_batch_id {
            return Err(LedgerError::invalid_batch(batch_id, "does not exist"));
        }
        self.batches
            .get(&batch_id)
            .ok_or_else(|| LedgerError::invalid_batch(batch_id, "does not exist"))
    }

    fn batch_in(&self, batch_id: BatchId, status: BatchStatus) -> Result<&Batch, LedgerError> {
        let batch = self.existing_batch(batch_id)?;
        if batch.status != status {
            let reason = match status {
                BatchStatus::Open => "not open",
                BatchStatus::Closed => "not closed",
            };
            return Err(LedgerError::invalid_batch(batch_id, reason));
        }
        Ok(batch)
    }

    fn batch_mut(&mut self, batch_id: BatchId) -> Result<&mut Batch, LedgerError> {
        self.batches
            .get_mut(&batch_id)
            .ok_or_else(|| LedgerError::invalid_batch(batch_id, "does not exist"))
    }

    /// Total first, count second. Callbacks decode cleartexts in the same order.
    fn export_refs(&self, batch: &Batch) -> Result<Vec<CiphertextRef>, LedgerError> {
        Ok(vec![
            self.accumulator
                .export_for_decryption(&batch.encrypted_total)?,
            self.accumulator
                .export_for_decryption(&batch.encrypted_count)?,
        ])
    }

    pub fn open_batch(
        &mut self,
        caller: &Caller,
        now: u64,
    ) -> Result<(BatchId, Effects), LedgerError> {
        require_owner(&self.meta.roles, caller)?;
        require_not_paused(&self.meta.safety)?;
        let batch_id = self
            .meta
            .current_batch_id
            .next()
            .ok_or_else(|| LedgerError::internal("batch id space exhausted"))?;
        let total = self.accumulator.zero()?;
        let count = self.accumulator.zero()?;

        self.meta.current_batch_id = batch_id;
        self.batches
            .insert(batch_id, Batch::open(batch_id, total, count, now));
        info!(%batch_id, "Opened batch");

        Ok((
            batch_id,
            Effects::default()
                .meta()
                .batch(batch_id)
                .event(BatchOpened { batch_id, at: now }),
        ))
    }

    pub fn close_batch(
        &mut self,
        caller: &Caller,
        batch_id: BatchId,
        now: u64,
    ) -> Result<Effects, LedgerError> {
        require_owner(&self.meta.roles, caller)?;
        require_not_paused(&self.meta.safety)?;
        self.batch_in(batch_id, BatchStatus::Open)?;

        let batch = self.batch_mut(batch_id)?;
        batch.status = BatchStatus::Closed;
        batch.closed_at = Some(now);
        info!(%batch_id, "Closed batch");

        Ok(Effects::default()
            .batch(batch_id)
            .event(BatchClosed { batch_id, at: now }))
    }

    pub fn submit_donation(
        &mut self,
        caller: &Caller,
        batch_id: BatchId,
        amount: EncryptedHandle,
        now: u64,
    ) -> Result<Effects, LedgerError> {
        let donor = require_account(caller)?;
        require_not_paused(&self.meta.safety)?;
        require_cooldown_elapsed(
            &donor,
            self.meta.safety.table(RateLimited::Submission),
            self.meta.safety.cooldown_seconds,
            now,
        )?;
        let batch = self.batch_in(batch_id, BatchStatus::Open)?;
        self.accumulator.accept(&amount)?;

        let new_count = if batch.has_donated(&donor) {
            None
        } else {
            Some(self.accumulator.add_constant(&batch.encrypted_count, 1)?)
        };
        let new_total = self
            .accumulator
            .add_encrypted(&batch.encrypted_total, &amount)?;

        let batch = self.batch_mut(batch_id)?;
        if let Some(count) = new_count {
            batch.donors.insert(donor);
            batch.encrypted_count = count;
        }
        batch.encrypted_total = new_total;
        self.meta
            .safety
            .record(donor, RateLimited::Submission, now);
        info!(%batch_id, %donor, "Donation submitted");

        Ok(Effects::default()
            .meta()
            .batch(batch_id)
            .event(DonationSubmitted {
                batch_id,
                donor,
                at: now,
            }))
    }

    pub fn request_batch_decryption(
        &mut self,
        caller: &Caller,
        batch_id: BatchId,
        oracle: &dyn DecryptionOracle,
        now: u64,
    ) -> Result<(RequestId, Effects), LedgerError> {
        let provider = require_provider(&self.meta.roles, caller)?;
        require_not_paused(&self.meta.safety)?;
        require_cooldown_elapsed(
            &provider,
            self.meta.safety.table(RateLimited::DecryptionRequest),
            self.meta.safety.cooldown_seconds,
            now,
        )?;
        let batch = self.batch_in(batch_id, BatchStatus::Closed)?;
        let refs = self.export_refs(batch)?;
        let state_hash = state_hash(&refs, &self.ledger);

        let request_id = oracle
            .request_decryption(refs)
            .map_err(|e| LedgerError::internal(format!("decryption oracle refused: {e}")))?;
        if self.contexts.contains_key(&request_id) {
            return Err(LedgerError::internal(format!(
                "decryption oracle reissued {request_id}"
            )));
        }

        self.contexts.insert(
            request_id,
            DecryptionContext {
                request_id,
                batch_id,
                state_hash,
                processed: false,
                requested_by: provider,
                requested_at: now,
            },
        );
        self.batch_mut(batch_id)?
            .decryption_requests
            .push(request_id);
        self.meta
            .safety
            .record(provider, RateLimited::DecryptionRequest, now);
        info!(%batch_id, %request_id, %provider, "Decryption requested");

        Ok((
            request_id,
            Effects::default()
                .meta()
                .batch(batch_id)
                .context(request_id)
                .event(DecryptionRequested {
                    request_id,
                    batch_id,
                    provider,
                }),
        ))
    }

    /// Second phase of the reveal. Only the authenticated oracle reaches this.
    pub fn process_decryption_callback(
        &mut self,
        caller: &Caller,
        request_id: RequestId,
        cleartexts: &[u64],
        proof: &DecryptionProof,
        verifier: &dyn ProofVerifier,
    ) -> Result<(DecryptionCompleted, Effects), LedgerError> {
        require_oracle(caller)?;
        let context = self
            .contexts
            .get(&request_id)
            .ok_or(LedgerError::ReplayAttempt(request_id))?;
        if context.processed {
            return Err(LedgerError::ReplayAttempt(request_id));
        }
        let batch_id = context.batch_id;
        let batch = self.existing_batch(batch_id)?;
        let current = state_hash(&self.export_refs(batch)?, &self.ledger);
        if current != context.state_hash {
            return Err(LedgerError::StateMismatch {
                request_id,
                batch_id,
            });
        }
        verifier
            .verify(request_id, cleartexts, proof)
            .map_err(|e| LedgerError::DecryptionFailed {
                request_id,
                reason: e.to_string(),
            })?;
        let &[total_donations, donor_count] = cleartexts else {
            return Err(LedgerError::DecryptionFailed {
                request_id,
                reason: format!("expected 2 cleartexts, got {}", cleartexts.len()),
            });
        };

        if let Some(context) = self.contexts.get_mut(&request_id) {
            context.processed = true;
        }
        let completed = DecryptionCompleted {
            request_id,
            batch_id,
            total_donations,
            donor_count,
        };
        info!(%batch_id, %request_id, total_donations, donor_count, "Batch revealed");

        Ok((
            completed.clone(),
            Effects::default().context(request_id).event(completed),
        ))
    }

    pub fn set_paused(&mut self, caller: &Caller, paused: bool) -> Result<Effects, LedgerError> {
        require_owner(&self.meta.roles, caller)?;
        if self.meta.safety.paused == paused {
            return Ok(Effects::default());
        }
        self.meta.safety.paused = paused;
        info!(paused, "Pause flag changed");
        Ok(Effects::default().meta().event(PauseChanged { paused }))
    }

    pub fn set_cooldown(&mut self, caller: &Caller, seconds: u64) -> Result<Effects, LedgerError> {
        require_owner(&self.meta.roles, caller)?;
        if seconds == 0 {
            return Err(LedgerError::InvalidArgument(
                "cooldown must be greater than zero".to_string(),
            ));
        }
        self.meta.safety.cooldown_seconds = seconds;
        info!(seconds, "Cooldown changed");
        Ok(Effects::default().meta().event(CooldownChanged { seconds }))
    }

    pub fn transfer_ownership(
        &mut self,
        caller: &Caller,
        new_owner: Address,
    ) -> Result<Effects, LedgerError> {
        let previous = require_owner(&self.meta.roles, caller)?;
        if new_owner == Address::ZERO {
            return Err(LedgerError::InvalidArgument(
                "new owner cannot be the zero address".to_string(),
            ));
        }
        if new_owner == previous {
            return Err(LedgerError::InvalidArgument(format!(
                "{new_owner} already owns the ledger"
            )));
        }
        self.meta.roles.owner = new_owner;
        info!(%previous, %new_owner, "Ownership transferred");
        Ok(Effects::default().meta().event(OwnershipTransferred {
            previous,
            new_owner,
        }))
    }

    pub fn add_provider(
        &mut self,
        caller: &Caller,
        provider: Address,
    ) -> Result<Effects, LedgerError> {
        require_owner(&self.meta.roles, caller)?;
        if provider == Address::ZERO {
            return Err(LedgerError::InvalidArgument(
                "provider cannot be the zero address".to_string(),
            ));
        }
        if self.meta.roles.is_provider(&provider) {
            return Err(LedgerError::InvalidArgument(format!(
                "{provider} is already a provider"
            )));
        }
        self.meta.roles.providers.insert(provider);
        info!(%provider, "Provider added");
        Ok(Effects::default().meta().event(ProviderAdded { provider }))
    }

    pub fn remove_provider(
        &mut self,
        caller: &Caller,
        provider: Address,
    ) -> Result<Effects, LedgerError> {
        require_owner(&self.meta.roles, caller)?;
        if provider == Address::ZERO {
            return Err(LedgerError::InvalidArgument(
                "provider cannot be the zero address".to_string(),
            ));
        }
        if self.meta.roles.is_owner(&provider) {
            return Err(LedgerError::InvalidArgument(
                "the owner cannot be removed from the providers".to_string(),
            ));
        }
        if !self.meta.roles.providers.remove(&provider) {
            return Err(LedgerError::InvalidArgument(format!(
                "{provider} is not a provider"
            )));
        }
        info!(%provider, "Provider removed");
        Ok(Effects::default().meta().event(ProviderRemoved { provider }))
    }

    pub fn current_batch_id(&self) -> BatchId {
        self.meta.current_batch_id
    }

    pub fn batch_summary(&self, batch_id: &BatchId) -> Result<Option<BatchSummary>, LedgerError> {
        let Some(batch) = self.batches.get(batch_id) else {
            return Ok(None);
        };
        let mut refs = self.export_refs(batch)?.into_iter();
        let (Some(total_ref), Some(count_ref)) = (refs.next(), refs.next()) else {
            return Err(LedgerError::internal("missing exported ciphertext"));
        };
        Ok(Some(BatchSummary {
            id: batch.id,
            status: batch.status,
            total_ref,
            count_ref,
            decryption_requests: batch.decryption_requests.clone(),
            revealed: self.is_revealed(batch_id),
            opened_at: batch.opened_at,
            closed_at: batch.closed_at,
        }))
    }

    pub fn list_batches(&self) -> Result<Vec<BatchSummary>, LedgerError> {
        let mut summaries = Vec::with_capacity(self.batches.len());
        for batch_id in self.batches.keys() {
            if let Some(summary) = self.batch_summary(batch_id)? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }

    pub fn has_donated(&self, batch_id: &BatchId, donor: &Address) -> bool {
        self.batches
            .get(batch_id)
            .map(|b| b.has_donated(donor))
            .unwrap_or(false)
    }

    pub fn is_revealed(&self, batch_id: &BatchId) -> bool {
        self.batches
            .get(batch_id)
            .map(|b| {
                b.decryption_requests
                    .iter()
                    .filter_map(|id| self.contexts.get(id))
                    .any(|c| c.processed)
            })
            .unwrap_or(false)
    }

    pub fn owner(&self) -> Address {
        self.meta.roles.owner
    }

    pub fn is_provider(&self, address: &Address) -> bool {
        self.meta.roles.is_provider(address)
    }

    pub fn is_paused(&self) -> bool {
        self.meta.safety.paused
    }

    pub fn cooldown_seconds(&self) -> u64 {
        self.meta.safety.cooldown_seconds
    }

    pub fn cooldown_remaining(&self, actor: &Address, action: RateLimited, now: u64) -> u64 {
        self.meta.safety.cooldown_remaining(actor, action, now)
    }
}
