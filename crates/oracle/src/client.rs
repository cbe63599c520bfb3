// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{DecryptionJob, OracleRepositoryFactory};
use actix::Recipient;
use anyhow::{anyhow, Result};
use hush_data::{Repositories, Repository};
use hush_events::RequestId;
use hush_fhe::CiphertextRef;
use hush_ledger::DecryptionOracle;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Ledger side of the oracle. Hands out request ids and queues the job for the worker.
pub struct OracleClient {
    worker: Recipient<DecryptionJob>,
    next_id: AtomicU64,
    counter: Repository<u64>,
}

impl OracleClient {
    /// Resume the id sequence from the store so ids stay unique across restarts.
    pub async fn resume(repositories: &Repositories) -> Result<(Repository<u64>, u64)> {
        let counter = repositories.oracle_next_request_id();
        let next = counter.read().await?.unwrap_or(1);
        Ok((counter, next))
    }

    pub fn new(worker: Recipient<DecryptionJob>, counter: Repository<u64>, next: u64) -> Self {
        Self {
            worker,
            next_id: AtomicU64::new(next),
            counter,
        }
    }
}

impl DecryptionOracle for OracleClient {
    fn request_decryption(&self, refs: Vec<CiphertextRef>) -> Result<RequestId> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.counter.write(&(id + 1));
        let request_id = RequestId::new(id);
        debug!(%request_id, ciphertexts = refs.len(), "Queueing decryption job");
        self.worker
            .try_send(DecryptionJob { request_id, refs })
            .map_err(|e| anyhow!("Decryption worker unavailable: {e}"))?;
        Ok(request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix::Actor;
    use hush_data::{DataStore, InMemStore};
    use hush_utils::actix::channel::mpsc;

    #[actix::test]
    async fn ids_continue_after_a_restart() -> Result<()> {
        let store = DataStore::from(&InMemStore::new(false).start());
        let repositories = Repositories::new(store);
        let (worker, mut jobs) = mpsc::<DecryptionJob>(8);

        let (counter, next) = OracleClient::resume(&repositories).await?;
        assert_eq!(next, 1);
        let client = OracleClient::new(worker.clone(), counter, next);
        let refs = vec![CiphertextRef::from_bytes(vec![1])];
        assert_eq!(client.request_decryption(refs.clone())?, RequestId::new(1));
        assert_eq!(client.request_decryption(refs.clone())?, RequestId::new(2));

        let job = jobs.recv().await.expect("job queued");
        assert_eq!(job.request_id, RequestId::new(1));
        assert_eq!(job.refs, refs);

        let (counter, next) = OracleClient::resume(&repositories).await?;
        assert_eq!(next, 3);
        let client = OracleClient::new(worker, counter, next);
        assert_eq!(client.request_decryption(refs)?, RequestId::new(3));
        Ok(())
    }
}
