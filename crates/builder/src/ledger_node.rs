// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Addr;
use alloy::primitives::Address;
use anyhow::Result;
use derivative::Derivative;
use hush_data::{DataStore, InMemStore, RepositoriesFactory, SledDb};
use hush_events::{BusHandle, EventPublisher, HistoryCollector, LedgerEvent, Shutdown};
use hush_fhe::{AmountEncryptor, EncryptedHandle};
use hush_ledger::{Ledger, LedgerMetaRepositoryFactory};
use tracing::info;
use hush_oracle::LocalOracle;

/// A running ledger node. Clones share the same actors.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct LedgerNodeHandle {
    pub name: String,
    pub ledger_address: Address,
    pub owner: Address,
    #[derivative(Debug = "ignore")]
    pub ledger: Addr<Ledger>,
    #[derivative(Debug = "ignore")]
    pub oracle: Addr<LocalOracle>,
    pub store: DataStore,
    pub bus: BusHandle,
    #[derivative(Debug = "ignore")]
    pub history: Option<Addr<HistoryCollector<LedgerEvent>>>,
    #[derivative(Debug = "ignore")]
    pub errors: Option<Addr<HistoryCollector<LedgerEvent>>>,
    #[derivative(Debug = "ignore")]
    pub encryptor: AmountEncryptor,
    pub oracle_signers: Vec<Address>,
}

impl LedgerNodeHandle {
    pub fn ledger(&self) -> &Addr<Ledger> {
        &self.ledger
    }

    pub fn bus(&self) -> &BusHandle {
        &self.bus
    }

    pub fn history(&self) -> Option<Addr<HistoryCollector<LedgerEvent>>> {
        self.history.clone()
    }

    pub fn errors(&self) -> Option<Addr<HistoryCollector<LedgerEvent>>> {
        self.errors.clone()
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Encrypt an amount the way a donor would before submitting it
    pub fn encrypt(&self, amount: u64) -> Result<EncryptedHandle> {
        self.encryptor.encrypt(amount)
    }

    pub fn in_mem_store(&self) -> Option<&Addr<InMemStore>> {
        self.store.get_addr().to_maybe_in_mem()
    }

    /// Wait for pending writes to land, stop the actors and flush every open database.
    pub async fn shutdown(&self) -> Result<()> {
        // Store mailboxes are FIFO so this read lands after every queued write
        self.store.repositories().ledger_meta().read().await?;
        self.bus.publish(Shutdown);
        SledDb::close_all_connections();
        info!(name = %self.name, "Ledger node stopped");
        Ok(())
    }
}
