// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::node::open_node;
use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use hush_config::AppConfig;
use hush_events::{BatchId, DecryptionCompleted, LedgerEvent, RequestId, TakeEvents};
use hush_ledger::RequestBatchDecryption;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, instrument};

#[instrument(skip_all)]
pub async fn execute(config: &AppConfig, caller: Address, batch: BatchId, wait: u64) -> Result<()> {
    let node = open_node(config).await?;
    let history = node.bus().history();

    let request_id = node
        .ledger()
        .send(RequestBatchDecryption {
            caller,
            batch_id: batch,
        })
        .await??;
    println!("decryption of batch {batch} requested as {request_id}");

    let deadline = Instant::now() + Duration::from_secs(wait);
    let outcome = loop {
        let Ok(events) = timeout_at(deadline, history.send(TakeEvents::new(1))).await else {
            break Err(anyhow!("Timed out waiting for {request_id}"));
        };
        if let Some(outcome) = events?
            .into_iter()
            .find_map(|event| settled(event, request_id))
        {
            break outcome;
        }
    };
    node.shutdown().await?;

    let completed = outcome?;
    println!("batch {}", completed.batch_id);
    println!("  total donations: {}", completed.total_donations);
    println!("  donors:          {}", completed.donor_count);
    Ok(())
}

/// The event that ends the wait for `request_id`, if this is one
fn settled(event: LedgerEvent, request_id: RequestId) -> Option<Result<DecryptionCompleted>> {
    debug!("{event}");
    match event {
        LedgerEvent::DecryptionCompleted { data, .. } if data.request_id == request_id => {
            Some(Ok(data))
        }
        LedgerEvent::LedgerError { data, .. } => {
            Some(Err(anyhow!("{:?}: {}", data.err_type, data.message)))
        }
        _ => None,
    }
}
