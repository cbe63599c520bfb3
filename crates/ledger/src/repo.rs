// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Batch, ConfidentialAccumulator, DecryptionContext, LedgerMeta, LedgerState};
use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use hush_config::StoreKeys;
use hush_data::{Repositories, Repository};
use hush_events::{BatchId, RequestId};
use tracing::info;

pub trait LedgerMetaRepositoryFactory {
    fn ledger_meta(&self) -> Repository<LedgerMeta>;
}

impl LedgerMetaRepositoryFactory for Repositories {
    fn ledger_meta(&self) -> Repository<LedgerMeta> {
        Repository::new(self.store.scope(StoreKeys::ledger_meta()))
    }
}

pub trait BatchRepositoryFactory {
    fn batch(&self, batch_id: &BatchId) -> Repository<Batch>;
}

impl BatchRepositoryFactory for Repositories {
    fn batch(&self, batch_id: &BatchId) -> Repository<Batch> {
        Repository::new(self.store.scope(StoreKeys::batch(batch_id)))
    }
}

pub trait DecryptionContextRepositoryFactory {
    fn decryption_context(&self, request_id: &RequestId) -> Repository<DecryptionContext>;
}

impl DecryptionContextRepositoryFactory for Repositories {
    fn decryption_context(&self, request_id: &RequestId) -> Repository<DecryptionContext> {
        Repository::new(self.store.scope(StoreKeys::decryption(request_id)))
    }
}

/// Hydrate the ledger: meta first, then every batch up to the counter, then every context a
/// batch refers to. Without a meta record this is a fresh deployment and `genesis` is written.
pub async fn load_ledger_state(
    repositories: &Repositories,
    ledger: Address,
    accumulator: ConfidentialAccumulator,
    genesis: LedgerMeta,
) -> Result<LedgerState> {
    let meta_repo = repositories.ledger_meta();
    let meta = match meta_repo.read().await? {
        Some(meta) => meta,
        None => {
            info!(owner = %genesis.roles.owner, "No ledger state found, starting from genesis");
            meta_repo.write_sync(&genesis).await?;
            genesis
        }
    };

    let mut batches = Vec::new();
    let mut contexts = Vec::new();
    for batch_id in meta.current_batch_id.up_to() {
        let batch = repositories
            .batch(&batch_id)
            .read()
            .await?
            .ok_or_else(|| anyhow!("Batch {batch_id} is missing from the store"))?;
        for request_id in &batch.decryption_requests {
            let context = repositories
                .decryption_context(request_id)
                .read()
                .await?
                .ok_or_else(|| anyhow!("{request_id} is missing from the store"))?;
            contexts.push(context);
        }
        batches.push(batch);
    }

    info!(
        batches = batches.len(),
        contexts = contexts.len(),
        "Ledger state loaded"
    );
    Ok(LedgerState::from_parts(
        ledger,
        meta,
        batches,
        contexts,
        accumulator,
    )?)
}
