// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{
    AddProvider, BatchRepositoryFactory, Caller, CloseBatch, DecryptionCallback,
    DecryptionContextRepositoryFactory, Effects, GetBatch, GetCooldownRemaining,
    GetCooldownSeconds, GetCurrentBatchId, GetDecryptionContext, GetOwner, HasDonated, IsPaused,
    IsProvider, IsRevealed, LedgerError, LedgerMetaRepositoryFactory, LedgerState, ListBatches,
    OpenBatch, OracleCredential, RemoveProvider, RequestBatchDecryption, SetCooldown, SetPaused,
    SharedClock, SharedOracle, SharedVerifier, SubmitDonation, TransferOwnership,
};
use actix::{Actor, ActorContext, Addr, AsyncContext, Context, Handler, MessageResult, Recipient};
use anyhow::{anyhow, Result};
use hush_data::{Repositories, WriteBatch};
use hush_events::{
    BusHandle, ErrorDispatcher, ErrorEvent, EventPublisher, EventSubscriber, LedgerErrorType,
    LedgerEvent, Shutdown,
};
use tracing::{error, info, warn};

pub struct LedgerParams {
    pub state: LedgerState,
    pub bus: BusHandle,
    pub repositories: Repositories,
    pub clock: SharedClock,
    pub verifier: SharedVerifier,
}

/// Single writer over `LedgerState`. Every handler runs to completion without yielding, so
/// operations apply strictly in mailbox order.
pub struct Ledger {
    state: LedgerState,
    bus: BusHandle,
    repositories: Repositories,
    clock: SharedClock,
    oracle: SharedOracle,
    verifier: SharedVerifier,
    credential: OracleCredential,
}

impl Actor for Ledger {
    type Context = Context<Self>;
}

impl Ledger {
    /// Start the ledger. A fresh oracle credential is minted here and handed, together with the
    /// callback recipient, to `connect_oracle` only.
    pub fn attach<F>(params: LedgerParams, connect_oracle: F) -> Addr<Self>
    where
        F: FnOnce(Recipient<DecryptionCallback>, OracleCredential) -> SharedOracle,
    {
        let bus = params.bus.clone();
        let addr = Ledger::create(|ctx| {
            let credential = OracleCredential::random();
            let oracle = connect_oracle(ctx.address().recipient(), credential.clone());
            Ledger {
                state: params.state,
                bus: params.bus,
                repositories: params.repositories,
                clock: params.clock,
                oracle,
                verifier: params.verifier,
                credential,
            }
        });
        bus.subscribe("Shutdown", addr.clone().recipient());
        info!("Ledger started");
        addr
    }

    /// Run `operation` against a copy of the state. The copy replaces the live state only once
    /// every record it touched is staged, so a staging failure leaves memory and store in step.
    fn apply<T>(
        &mut self,
        operation: &str,
        op: impl FnOnce(&mut LedgerState) -> Result<(T, Effects), LedgerError>,
    ) -> Result<T, LedgerError> {
        let mut next = self.state.clone();
        let (value, effects) = match op(&mut next) {
            Ok(applied) => applied,
            Err(err) => return Err(self.reject(operation, err)),
        };
        let batch = match stage_records(&self.repositories, &next, &effects) {
            Ok(batch) => batch,
            Err(e) => {
                error!(operation, "Discarding operation, records could not be staged: {e}");
                let err = LedgerError::Internal(e.to_string());
                self.bus.err(LedgerErrorType::Data, e);
                return Err(err);
            }
        };
        batch.commit();
        self.state = next;
        for event in effects.events {
            self.bus.publish(event);
        }
        Ok(value)
    }

    fn apply_effects(
        &mut self,
        operation: &str,
        op: impl FnOnce(&mut LedgerState) -> Result<Effects, LedgerError>,
    ) -> Result<(), LedgerError> {
        self.apply(operation, |state| op(state).map(|effects| ((), effects)))
    }

    fn reject(&self, operation: &str, err: LedgerError) -> LedgerError {
        warn!(operation, kind = ?err.kind(), "Rejected: {err}");
        self.bus
            .publish(LedgerEvent::from_error(err.kind(), err.clone()));
        err
    }
}

/// Collect the records named by `effects` into one write batch without committing it.
fn stage_records(
    repositories: &Repositories,
    state: &LedgerState,
    effects: &Effects,
) -> Result<WriteBatch> {
    let mut batch = repositories.store.batch();
    if effects.meta {
        repositories.ledger_meta().stage(&mut batch, state.meta())?;
    }
    for batch_id in &effects.batches {
        let record = state
            .batch(batch_id)
            .ok_or_else(|| anyhow!("Batch {batch_id} vanished before it was persisted"))?;
        repositories.batch(batch_id).stage(&mut batch, record)?;
    }
    for request_id in &effects.contexts {
        let record = state
            .decryption_context(request_id)
            .ok_or_else(|| anyhow!("{request_id} vanished before it was persisted"))?;
        repositories
            .decryption_context(request_id)
            .stage(&mut batch, record)?;
    }
    Ok(batch)
}

impl Handler<LedgerEvent> for Ledger {
    type Result = ();
    fn handle(&mut self, msg: LedgerEvent, ctx: &mut Self::Context) -> Self::Result {
        if let LedgerEvent::Shutdown { data, .. } = msg {
            ctx.notify(data)
        }
    }
}

impl Handler<Shutdown> for Ledger {
    type Result = ();
    fn handle(&mut self, _: Shutdown, ctx: &mut Self::Context) -> Self::Result {
        info!("Ledger shutting down");
        ctx.stop();
    }
}

impl Handler<OpenBatch> for Ledger {
    type Result = Result<hush_events::BatchId, LedgerError>;
    fn handle(&mut self, msg: OpenBatch, _: &mut Self::Context) -> Self::Result {
        let now = self.clock.now();
        self.apply("open_batch", |state| {
            state.open_batch(&Caller::Account(msg.caller), now)
        })
    }
}

impl Handler<CloseBatch> for Ledger {
    type Result = Result<(), LedgerError>;
    fn handle(&mut self, msg: CloseBatch, _: &mut Self::Context) -> Self::Result {
        let now = self.clock.now();
        self.apply_effects("close_batch", |state| {
            state.close_batch(&Caller::Account(msg.caller), msg.batch_id, now)
        })
    }
}

impl Handler<SubmitDonation> for Ledger {
    type Result = Result<(), LedgerError>;
    fn handle(&mut self, msg: SubmitDonation, _: &mut Self::Context) -> Self::Result {
        let now = self.clock.now();
        self.apply_effects("submit_donation", |state| {
            state.submit_donation(&Caller::Account(msg.donor), msg.batch_id, msg.amount, now)
        })
    }
}

impl Handler<RequestBatchDecryption> for Ledger {
    type Result = Result<hush_events::RequestId, LedgerError>;
    fn handle(&mut self, msg: RequestBatchDecryption, _: &mut Self::Context) -> Self::Result {
        let now = self.clock.now();
        let oracle = self.oracle.clone();
        self.apply("request_batch_decryption", |state| {
            state.request_batch_decryption(
                &Caller::Account(msg.caller),
                msg.batch_id,
                oracle.as_ref(),
                now,
            )
        })
    }
}

impl Handler<DecryptionCallback> for Ledger {
    type Result = Result<(), LedgerError>;
    fn handle(&mut self, msg: DecryptionCallback, _: &mut Self::Context) -> Self::Result {
        if msg.credential != self.credential {
            return Err(self.reject("decryption_callback", LedgerError::NotOracle));
        }
        let verifier = self.verifier.clone();
        self.apply("decryption_callback", |state| {
            state
                .process_decryption_callback(
                    &Caller::Oracle,
                    msg.request_id,
                    &msg.cleartexts,
                    &msg.proof,
                    verifier.as_ref(),
                )
                .map(|(_, effects)| ((), effects))
        })
    }
}

impl Handler<SetPaused> for Ledger {
    type Result = Result<(), LedgerError>;
    fn handle(&mut self, msg: SetPaused, _: &mut Self::Context) -> Self::Result {
        self.apply_effects("set_paused", |state| {
            state.set_paused(&Caller::Account(msg.caller), msg.paused)
        })
    }
}

impl Handler<SetCooldown> for Ledger {
    type Result = Result<(), LedgerError>;
    fn handle(&mut self, msg: SetCooldown, _: &mut Self::Context) -> Self::Result {
        self.apply_effects("set_cooldown", |state| {
            state.set_cooldown(&Caller::Account(msg.caller), msg.seconds)
        })
    }
}

impl Handler<TransferOwnership> for Ledger {
    type Result = Result<(), LedgerError>;
    fn handle(&mut self, msg: TransferOwnership, _: &mut Self::Context) -> Self::Result {
        self.apply_effects("transfer_ownership", |state| {
            state.transfer_ownership(&Caller::Account(msg.caller), msg.new_owner)
        })
    }
}

impl Handler<AddProvider> for Ledger {
    type Result = Result<(), LedgerError>;
    fn handle(&mut self, msg: AddProvider, _: &mut Self::Context) -> Self::Result {
        self.apply_effects("add_provider", |state| {
            state.add_provider(&Caller::Account(msg.caller), msg.provider)
        })
    }
}

impl Handler<RemoveProvider> for Ledger {
    type Result = Result<(), LedgerError>;
    fn handle(&mut self, msg: RemoveProvider, _: &mut Self::Context) -> Self::Result {
        self.apply_effects("remove_provider", |state| {
            state.remove_provider(&Caller::Account(msg.caller), msg.provider)
        })
    }
}

impl Handler<GetCurrentBatchId> for Ledger {
    type Result = MessageResult<GetCurrentBatchId>;
    fn handle(&mut self, _: GetCurrentBatchId, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.state.current_batch_id())
    }
}

impl Handler<GetBatch> for Ledger {
    type Result = MessageResult<GetBatch>;
    fn handle(&mut self, msg: GetBatch, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.state.batch_summary(&msg.batch_id))
    }
}

impl Handler<ListBatches> for Ledger {
    type Result = MessageResult<ListBatches>;
    fn handle(&mut self, _: ListBatches, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.state.list_batches())
    }
}

impl Handler<HasDonated> for Ledger {
    type Result = bool;
    fn handle(&mut self, msg: HasDonated, _: &mut Self::Context) -> Self::Result {
        self.state.has_donated(&msg.batch_id, &msg.donor)
    }
}

impl Handler<GetDecryptionContext> for Ledger {
    type Result = MessageResult<GetDecryptionContext>;
    fn handle(&mut self, msg: GetDecryptionContext, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.state.decryption_context(&msg.request_id).cloned())
    }
}

impl Handler<IsRevealed> for Ledger {
    type Result = bool;
    fn handle(&mut self, msg: IsRevealed, _: &mut Self::Context) -> Self::Result {
        self.state.is_revealed(&msg.batch_id)
    }
}

impl Handler<GetOwner> for Ledger {
    type Result = MessageResult<GetOwner>;
    fn handle(&mut self, _: GetOwner, _: &mut Self::Context) -> Self::Result {
        MessageResult(self.state.owner())
    }
}

impl Handler<IsProvider> for Ledger {
    type Result = bool;
    fn handle(&mut self, msg: IsProvider, _: &mut Self::Context) -> Self::Result {
        self.state.is_provider(&msg.address)
    }
}

impl Handler<IsPaused> for Ledger {
    type Result = bool;
    fn handle(&mut self, _: IsPaused, _: &mut Self::Context) -> Self::Result {
        self.state.is_paused()
    }
}

impl Handler<GetCooldownSeconds> for Ledger {
    type Result = u64;
    fn handle(&mut self, _: GetCooldownSeconds, _: &mut Self::Context) -> Self::Result {
        self.state.cooldown_seconds()
    }
}

impl Handler<GetCooldownRemaining> for Ledger {
    type Result = u64;
    fn handle(&mut self, msg: GetCooldownRemaining, _: &mut Self::Context) -> Self::Result {
        self.state
            .cooldown_remaining(&msg.actor, msg.action, self.clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        load_ledger_state, ConfidentialAccumulator, DecryptionOracle, DecryptionProof,
        LedgerMeta, LedgerState, ManualClock, ProofVerifier,
    };
    use actix::Actor;
    use alloy::primitives::{address, Address};
    use hush_data::{DataStore, InMemStore};
    use hush_events::{BatchId, RequestId, TakeEvents};
    use hush_fhe::{CiphertextRef, PlainArithmetic};
    use std::sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    };

    const OWNER: Address = address!("0x00000000000000000000000000000000000000aa");

    struct CountingOracle(AtomicU64);

    impl DecryptionOracle for CountingOracle {
        fn request_decryption(&self, _: Vec<CiphertextRef>) -> Result<RequestId> {
            Ok(RequestId::new(self.0.fetch_add(1, Ordering::SeqCst) + 1))
        }
    }

    struct AcceptAll;

    impl ProofVerifier for AcceptAll {
        fn verify(&self, _: RequestId, _: &[u64], _: &DecryptionProof) -> Result<()> {
            Ok(())
        }
    }

    fn accumulator() -> ConfidentialAccumulator {
        ConfidentialAccumulator::new(Arc::new(PlainArithmetic::new()))
    }

    async fn start(store: &DataStore, bus: &BusHandle) -> Result<Addr<Ledger>> {
        let repositories = Repositories::new(store.clone());
        let state = load_ledger_state(
            &repositories,
            Address::repeat_byte(7),
            accumulator(),
            LedgerMeta::genesis(OWNER, [], 60, false),
        )
        .await?;
        Ok(Ledger::attach(
            LedgerParams {
                state,
                bus: bus.clone(),
                repositories,
                clock: Arc::new(ManualClock::new(0)),
                verifier: Arc::new(AcceptAll),
            },
            |_, _| Arc::new(CountingOracle(AtomicU64::new(0))),
        ))
    }

    #[actix::test]
    async fn staging_fails_as_a_whole_when_a_record_is_missing() -> Result<()> {
        let store = DataStore::from(&InMemStore::new(false).start());
        let repositories = Repositories::new(store.clone());
        let state = LedgerState::new(
            Address::repeat_byte(7),
            LedgerMeta::genesis(OWNER, [], 60, false),
            accumulator(),
        );
        let effects = Effects {
            meta: true,
            batches: vec![BatchId::new(5)],
            ..Effects::default()
        };

        assert!(stage_records(&repositories, &state, &effects).is_err());
        // Nothing was committed, not even the meta record staged before the failure
        assert_eq!(repositories.ledger_meta().read().await?, None);

        let effects = Effects {
            meta: true,
            ..Effects::default()
        };
        stage_records(&repositories, &state, &effects)?.commit();
        assert_eq!(
            repositories.ledger_meta().read().await?.as_ref(),
            Some(state.meta())
        );
        Ok(())
    }

    #[actix::test]
    async fn rejected_operations_publish_and_keep_state() -> Result<()> {
        let bus = BusHandle::start();
        let errors = bus.errors();
        let store = DataStore::from(&InMemStore::new(false).start());
        let ledger = start(&store, &bus).await?;

        let batch_id = ledger.send(OpenBatch { caller: OWNER }).await??;
        let res = ledger
            .send(CloseBatch {
                caller: Address::repeat_byte(9),
                batch_id,
            })
            .await?;
        assert_eq!(res, Err(LedgerError::NotOwner(Address::repeat_byte(9))));
        assert_eq!(errors.send(TakeEvents::new(1)).await?.len(), 1);

        let summary = ledger
            .send(GetBatch { batch_id })
            .await??
            .expect("batch exists");
        assert_eq!(summary.closed_at, None);
        Ok(())
    }

    #[actix::test]
    async fn forged_credentials_are_rejected_and_published() -> Result<()> {
        let bus = BusHandle::start();
        let errors = bus.errors();
        let store = DataStore::from(&InMemStore::new(false).start());
        let ledger = start(&store, &bus).await?;

        let res = ledger
            .send(DecryptionCallback {
                credential: OracleCredential::random(),
                request_id: RequestId::new(1),
                cleartexts: vec![1, 1],
                proof: DecryptionProof::default(),
            })
            .await?;
        assert_eq!(res, Err(LedgerError::NotOracle));

        let errors = errors.send(TakeEvents::new(1)).await?;
        let LedgerEvent::LedgerError { data, .. } = &errors[0] else {
            panic!("expected a LedgerError event, got {:?}", errors[0]);
        };
        assert_eq!(data.err_type, LedgerErrorType::Authorization);
        Ok(())
    }

    #[actix::test]
    async fn state_survives_a_restart() -> Result<()> {
        let bus = BusHandle::start();
        let store = DataStore::from(&InMemStore::new(false).start());
        let ledger = start(&store, &bus).await?;

        let batch_id = ledger.send(OpenBatch { caller: OWNER }).await??;
        ledger
            .send(CloseBatch {
                caller: OWNER,
                batch_id,
            })
            .await??;
        let request_id = ledger
            .send(RequestBatchDecryption {
                caller: OWNER,
                batch_id,
            })
            .await??;
        ledger.send(OpenBatch { caller: OWNER }).await??;

        let restarted = start(&store, &bus).await?;
        assert_eq!(
            restarted.send(GetCurrentBatchId).await?,
            BatchId::new(2)
        );
        let context = restarted
            .send(GetDecryptionContext { request_id })
            .await?
            .expect("context persisted");
        assert_eq!(context.batch_id, batch_id);
        assert!(!context.processed);
        assert_eq!(
            restarted
                .send(GetCooldownRemaining {
                    actor: OWNER,
                    action: crate::RateLimited::DecryptionRequest
                })
                .await?,
            60
        );
        Ok(())
    }
}
