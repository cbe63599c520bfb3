// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use hush_builder::{LedgerNodeBuilder, LedgerNodeHandle};
use hush_config::AppConfig;
use hush_data::{DataStore, InMemStore, SledStore};
use hush_events::BusHandle;
use hush_fhe::{params_from_config, shared_rng_from_entropy, BfvKeys};
use hush_oracle::read_signer;
use actix::Actor;
use tracing::info;

/// Bring up a ledger node over the configured store and key material
pub async fn open_node(config: &AppConfig) -> Result<LedgerNodeHandle> {
    let params = params_from_config(config.fhe())?;
    let keys = BfvKeys::read(&config.key_file(), params)
        .with_context(|| "Could not read the FHE key file. Run `hush keygen` first.")?;
    let signer = read_signer(&config.signer_file())
        .with_context(|| "Could not read the oracle signer. Run `hush keygen` first.")?;

    let bus = BusHandle::start();
    let store: DataStore = if config.use_in_mem_store() {
        info!("Using in memory store");
        (&InMemStore::new(false).start()).into()
    } else {
        (&SledStore::new(&bus, &config.db_file())?).into()
    };

    let ledger = config.ledger();
    let oracle = config.oracle();
    let trusted = if oracle.signers.is_empty() {
        vec![signer.address()]
    } else {
        oracle.signers.clone()
    };

    LedgerNodeBuilder::new(config.owner()?)
        .with_name(config.name())
        .with_ledger_address(ledger.address)
        .with_providers(&ledger.providers)
        .with_cooldown(ledger.cooldown_seconds)
        .start_paused(ledger.start_paused)
        .with_bfv_keys(keys, shared_rng_from_entropy())
        .with_oracle_signers(vec![signer])
        .with_trusted_signers(&trusted, oracle.threshold)
        .with_source_bus(bus.bus())
        .with_datastore(store)
        .with_logging()
        .build()
        .await
}
