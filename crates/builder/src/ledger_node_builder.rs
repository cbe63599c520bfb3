// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::LedgerNodeHandle;
use actix::{Actor, Addr};
use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use anyhow::Result;
use derivative::Derivative;
use hush_data::{DataStore, InMemStore, RepositoriesFactory};
use hush_events::{BusHandle, EventBus, LedgerEvent};
use hush_fhe::{
    AmountEncryptor, BfvKeys, PlainArithmetic, PlainDecryptor, SharedArithmetic,
    SharedDecryptor, SharedRng,
};
use hush_ledger::{
    load_ledger_state, ConfidentialAccumulator, Ledger, LedgerMeta, LedgerParams, SharedClock,
    SystemClock,
};
use hush_logger::SimpleLogger;
use hush_oracle::{LocalOracle, OracleClient, SignerSetVerifier};
use hush_utils::rand_eth_addr;
use std::sync::Arc;
use tracing::info;

#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub enum Backend {
    /// Cleartext handles. Only fit for tests and local demos.
    Plain,
    Bfv {
        #[derivative(Debug = "ignore")]
        keys: BfvKeys,
        #[derivative(Debug = "ignore")]
        rng: SharedRng,
    },
}

/// Build a ledger node: bus, store, ledger actor and an in process decryption oracle.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct LedgerNodeBuilder {
    name: String,
    owner: Address,
    ledger_address: Option<Address>,
    providers: Vec<Address>,
    cooldown_seconds: u64,
    start_paused: bool,
    backend: Backend,
    #[derivative(Debug = "ignore")]
    oracle_signers: Vec<PrivateKeySigner>,
    trusted_signers: Option<(Vec<Address>, usize)>,
    datastore: Option<DataStore>,
    #[derivative(Debug = "ignore")]
    source_bus: Option<Addr<EventBus<LedgerEvent>>>,
    #[derivative(Debug = "ignore")]
    clock: Option<SharedClock>,
    logging: bool,
    testmode_history: bool,
    testmode_errors: bool,
}

impl LedgerNodeBuilder {
    pub fn new(owner: Address) -> Self {
        Self {
            name: "hush".to_string(),
            owner,
            ledger_address: None,
            providers: vec![],
            cooldown_seconds: 60,
            start_paused: false,
            backend: Backend::Plain,
            oracle_signers: vec![],
            trusted_signers: None,
            datastore: None,
            source_bus: None,
            clock: None,
            logging: false,
            testmode_history: false,
            testmode_errors: false,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_owned();
        self
    }

    /// Address the ledger is known by. Oracle signatures are bound to it.
    pub fn with_ledger_address(mut self, address: Address) -> Self {
        self.ledger_address = Some(address);
        self
    }

    /// Providers granted at genesis. Ignored when the store already holds ledger state.
    pub fn with_providers(mut self, providers: &[Address]) -> Self {
        self.providers = providers.to_vec();
        self
    }

    pub fn with_cooldown(mut self, seconds: u64) -> Self {
        self.cooldown_seconds = seconds;
        self
    }

    pub fn start_paused(mut self, paused: bool) -> Self {
        self.start_paused = paused;
        self
    }

    pub fn with_plaintext_backend(mut self) -> Self {
        self.backend = Backend::Plain;
        self
    }

    pub fn with_bfv_keys(mut self, keys: BfvKeys, rng: SharedRng) -> Self {
        self.backend = Backend::Bfv { keys, rng };
        self
    }

    /// Keys the local oracle signs its decryption results with
    pub fn with_oracle_signers(mut self, signers: Vec<PrivateKeySigner>) -> Self {
        self.oracle_signers = signers;
        self
    }

    /// Signers the ledger accepts proofs from. Defaults to every oracle signer with a
    /// threshold of one.
    pub fn with_trusted_signers(mut self, signers: &[Address], threshold: usize) -> Self {
        self.trusted_signers = Some((signers.to_vec(), threshold));
        self
    }

    pub fn with_datastore(mut self, store: DataStore) -> Self {
        self.datastore = Some(store);
        self
    }

    /// Use the given bus for all events. No new bus is created.
    pub fn with_source_bus(mut self, bus: &Addr<EventBus<LedgerEvent>>) -> Self {
        self.source_bus = Some(bus.clone());
        self
    }

    pub fn with_clock(mut self, clock: SharedClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Log every event on the bus
    pub fn with_logging(mut self) -> Self {
        self.logging = true;
        self
    }

    /// Attach a history collecting test module.
    /// This is conspicuously named so we understand that this should only be used when testing
    pub fn testmode_with_history(mut self) -> Self {
        self.testmode_history = true;
        self
    }

    /// Attach an error collecting test module
    /// This is conspicuously named so we understand that this should only be used when testing
    pub fn testmode_with_errors(mut self) -> Self {
        self.testmode_errors = true;
        self
    }

    fn crypto(&self) -> (SharedArithmetic, SharedDecryptor, AmountEncryptor) {
        match &self.backend {
            Backend::Plain => (
                Arc::new(PlainArithmetic::new()),
                Arc::new(PlainDecryptor),
                AmountEncryptor::Plain(PlainArithmetic::new()),
            ),
            Backend::Bfv { keys, rng } => {
                let arith = keys.arithmetic(rng.clone());
                (
                    Arc::new(arith.clone()),
                    Arc::new(keys.decryptor()),
                    AmountEncryptor::Bfv(arith),
                )
            }
        }
    }

    pub async fn build(self) -> Result<LedgerNodeHandle> {
        let bus = match self.source_bus {
            Some(ref bus) => BusHandle::new(bus.clone()),
            None => BusHandle::start(),
        };

        let history = if self.testmode_history {
            info!("Setting up history collector");
            Some(bus.history())
        } else {
            None
        };

        let errors = if self.testmode_errors {
            info!("Setting up error collector");
            Some(bus.errors())
        } else {
            None
        };

        if self.logging {
            SimpleLogger::<LedgerEvent>::attach(&self.name, bus.bus().clone());
        }

        let ledger_address = match self.ledger_address {
            Some(address) => address,
            None => {
                info!("Using random ledger address");
                rand_eth_addr(&mut rand::thread_rng())
            }
        };

        let store = self
            .datastore
            .clone()
            .unwrap_or_else(|| (&InMemStore::new(self.logging).start()).into());
        let repositories = store.repositories();

        let oracle_signers = if self.oracle_signers.is_empty() {
            info!("No oracle signer given, generating one");
            vec![PrivateKeySigner::random()]
        } else {
            self.oracle_signers.clone()
        };
        let signer_addresses: Vec<Address> =
            oracle_signers.iter().map(|s| s.address()).collect();
        let (trusted, threshold) = self
            .trusted_signers
            .clone()
            .unwrap_or_else(|| (signer_addresses.clone(), 1));
        let verifier = SignerSetVerifier::new(ledger_address, trusted, threshold)?;

        let (arith, decryptor, encryptor) = self.crypto();
        let genesis = LedgerMeta::genesis(
            self.owner,
            self.providers.clone(),
            self.cooldown_seconds,
            self.start_paused,
        );
        let state = load_ledger_state(
            &repositories,
            ledger_address,
            ConfidentialAccumulator::new(arith),
            genesis,
        )
        .await?;
        let owner = state.owner();
        let (counter, next_request_id) = OracleClient::resume(&repositories).await?;

        let params = LedgerParams {
            state,
            bus: bus.clone(),
            repositories,
            clock: self.clock.clone().unwrap_or_else(|| Arc::new(SystemClock)),
            verifier: Arc::new(verifier),
        };

        let oracle_bus = bus.clone();
        let mut oracle_addr = None;
        let ledger = Ledger::attach(params, |callback, credential| {
            let oracle = LocalOracle::new(
                decryptor,
                oracle_signers,
                ledger_address,
                callback,
                credential,
                oracle_bus,
            )
            .start();
            let client = OracleClient::new(oracle.clone().recipient(), counter, next_request_id);
            oracle_addr = Some(oracle);
            Arc::new(client)
        });
        let oracle = oracle_addr.ok_or_else(|| anyhow::anyhow!("Oracle was not started"))?;

        info!(%ledger_address, %owner, "Ledger node ready");
        Ok(LedgerNodeHandle {
            name: self.name,
            ledger_address,
            owner,
            ledger,
            oracle,
            store,
            bus,
            history,
            errors,
            encryptor,
            oracle_signers: signer_addresses,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hush_events::TakeEvents;
    use hush_ledger::{
        CloseBatch, GetBatch, ManualClock, OpenBatch, RequestBatchDecryption, SubmitDonation,
    };

    #[actix::test]
    async fn builds_a_node_that_reveals_a_batch() -> Result<()> {
        let owner = Address::repeat_byte(0x01);
        let donor = Address::repeat_byte(0x02);
        let clock = ManualClock::new(1_000);
        let node = LedgerNodeBuilder::new(owner)
            .with_clock(Arc::new(clock.clone()))
            .testmode_with_history()
            .build()
            .await?;

        let caller = owner;
        let batch_id = node.ledger.send(OpenBatch { caller }).await??;
        node.ledger
            .send(SubmitDonation {
                donor,
                batch_id,
                amount: node.encrypt(25)?,
            })
            .await??;
        node.ledger.send(CloseBatch { caller, batch_id }).await??;
        node.ledger
            .send(RequestBatchDecryption { caller, batch_id })
            .await??;

        // opened, donated, closed, requested, completed
        let history = node.history().ok_or_else(|| anyhow::anyhow!("no history"))?;
        let events = history.send(TakeEvents::new(5)).await?;
        let Some(LedgerEvent::DecryptionCompleted { data, .. }) = events.last() else {
            panic!("expected a completed decryption, got {events:?}");
        };
        assert_eq!(data.total_donations, 25);
        assert_eq!(data.donor_count, 1);

        let summary = node
            .ledger
            .send(GetBatch { batch_id })
            .await??
            .ok_or_else(|| anyhow::anyhow!("missing batch"))?;
        assert!(summary.revealed);
        Ok(())
    }
}
