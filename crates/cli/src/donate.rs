// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::node::open_node;
use alloy::primitives::Address;
use anyhow::Result;
use hush_config::AppConfig;
use hush_events::BatchId;
use hush_ledger::SubmitDonation;
use tracing::instrument;

#[instrument(skip_all)]
pub async fn execute(config: &AppConfig, donor: Address, batch: BatchId, amount: u64) -> Result<()> {
    let node = open_node(config).await?;
    // Encrypted before it reaches the ledger
    let encrypted = node.encrypt(amount)?;
    node.ledger()
        .send(SubmitDonation {
            donor,
            batch_id: batch,
            amount: encrypted,
        })
        .await??;
    println!("donation from {donor} recorded in batch {batch}");
    node.shutdown().await
}
