// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{create_bfv_keys, create_shared_rng_from_u64, LEDGER_ADDRESS, OWNER, START_TIME};
use actix::Addr;
use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use hush_builder::{LedgerNodeBuilder, LedgerNodeHandle};
use hush_events::{
    BatchId, DecryptionCompleted, HistoryCollector, LedgerError, LedgerEvent, RequestId,
    ResetHistory, TakeEvents,
};
use hush_ledger::{
    CloseBatch, Ledger, LedgerError as Rejection, ManualClock, OpenBatch,
    RequestBatchDecryption, SubmitDonation,
};
use std::{sync::Arc, time::Duration};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(10);

/// An in memory ledger node on a manual clock with a history collector attached.
pub struct TestNode {
    pub handle: LedgerNodeHandle,
    pub clock: ManualClock,
    history: Addr<HistoryCollector<LedgerEvent>>,
}

impl TestNode {
    /// Plaintext backend with the given cooldown
    pub async fn plain(cooldown_seconds: u64) -> Result<Self> {
        Self::build_with(|b| b.with_cooldown(cooldown_seconds)).await
    }

    /// Real BFV encryption with deterministic keys
    pub async fn bfv(cooldown_seconds: u64, seed: u64) -> Result<Self> {
        let rng = create_shared_rng_from_u64(seed);
        let keys = create_bfv_keys(&rng)?;
        Self::build_with(move |b| {
            b.with_cooldown(cooldown_seconds)
                .with_bfv_keys(keys, rng.clone())
        })
        .await
    }

    /// Start from the standard test setup and let the caller adjust the builder
    pub async fn build_with(
        customize: impl FnOnce(LedgerNodeBuilder) -> LedgerNodeBuilder,
    ) -> Result<Self> {
        let clock = ManualClock::new(START_TIME);
        let builder = LedgerNodeBuilder::new(OWNER)
            .with_name("test")
            .with_ledger_address(LEDGER_ADDRESS)
            .with_clock(Arc::new(clock.clone()))
            .testmode_with_history()
            .testmode_with_errors();
        let handle = customize(builder).build().await?;
        let history = handle
            .history()
            .ok_or_else(|| anyhow!("history collector was not attached"))?;
        Ok(Self {
            handle,
            clock,
            history,
        })
    }

    pub fn ledger(&self) -> &Addr<Ledger> {
        self.handle.ledger()
    }

    pub fn advance(&self, seconds: u64) {
        self.clock.advance(seconds)
    }

    pub async fn open_batch(&self) -> Result<BatchId, Rejection> {
        self.send_checked(OpenBatch { caller: OWNER }).await
    }

    pub async fn close_batch(&self, batch_id: BatchId) -> Result<(), Rejection> {
        self.send_checked(CloseBatch {
            caller: OWNER,
            batch_id,
        })
        .await
    }

    /// Encrypt `amount` client side and submit it as `donor`
    pub async fn donate(
        &self,
        donor: Address,
        batch_id: BatchId,
        amount: u64,
    ) -> Result<(), Rejection> {
        let amount = self
            .handle
            .encrypt(amount)
            .map_err(|e| Rejection::Internal(e.to_string()))?;
        self.send_checked(SubmitDonation {
            donor,
            batch_id,
            amount,
        })
        .await
    }

    pub async fn request_decryption(
        &self,
        caller: Address,
        batch_id: BatchId,
    ) -> Result<RequestId, Rejection> {
        self.send_checked(RequestBatchDecryption { caller, batch_id })
            .await
    }

    async fn send_checked<M, T>(&self, msg: M) -> Result<T, Rejection>
    where
        M: actix::Message<Result = Result<T, Rejection>> + Send + 'static,
        T: Send + 'static,
        Ledger: actix::Handler<M>,
    {
        self.ledger()
            .send(msg)
            .await
            .map_err(|e| Rejection::Internal(e.to_string()))?
    }

    /// Wait for the next `n` events on the bus
    pub async fn take_events(&self, n: usize) -> Result<Vec<LedgerEvent>> {
        Ok(timeout(WAIT, self.history.send(TakeEvents::new(n))).await??)
    }

    /// Consume events until `request_id` completes
    pub async fn wait_for_completion(&self, request_id: RequestId) -> Result<DecryptionCompleted> {
        loop {
            for event in self.take_events(1).await? {
                if let LedgerEvent::DecryptionCompleted { data, .. } = event {
                    if data.request_id == request_id {
                        return Ok(data);
                    }
                }
            }
        }
    }

    /// Drop everything collected so far
    pub fn clear_history(&self) {
        self.history.do_send(ResetHistory);
    }

    /// Consume events until the next bus error
    pub async fn wait_for_error(&self) -> Result<LedgerError> {
        loop {
            for event in self.take_events(1).await? {
                if let LedgerEvent::LedgerError { data, .. } = event {
                    return Ok(data);
                }
            }
        }
    }
}
