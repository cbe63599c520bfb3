// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{helpers::format_time, node::open_node};
use alloy::primitives::Address;
use anyhow::{anyhow, Result};
use clap::Subcommand;
use hush_config::AppConfig;
use hush_events::BatchId;
use hush_ledger::{BatchSummary, CloseBatch, GetBatch, ListBatches, OpenBatch};
use tracing::instrument;

#[derive(Subcommand, Debug)]
pub enum BatchCommands {
    /// Open a new batch
    Open,
    /// Close an open batch
    Close { batch: BatchId },
    /// Show a single batch
    Show {
        batch: BatchId,
        /// Print as json
        #[arg(long)]
        json: bool,
    },
    /// List every batch
    List {
        /// Print as json
        #[arg(long)]
        json: bool,
    },
}

#[instrument(skip_all)]
pub async fn execute(command: BatchCommands, config: &AppConfig, caller: Address) -> Result<()> {
    let node = open_node(config).await?;
    let ledger = node.ledger();

    match command {
        BatchCommands::Open => {
            let batch_id = ledger.send(OpenBatch { caller }).await??;
            println!("opened batch {batch_id}");
        }
        BatchCommands::Close { batch } => {
            ledger
                .send(CloseBatch {
                    caller,
                    batch_id: batch,
                })
                .await??;
            println!("closed batch {batch}");
        }
        BatchCommands::Show { batch, json } => {
            let summary = ledger
                .send(GetBatch { batch_id: batch })
                .await??
                .ok_or_else(|| anyhow!("Batch {batch} does not exist"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        BatchCommands::List { json } => {
            let batches = ledger.send(ListBatches).await??;
            if json {
                println!("{}", serde_json::to_string_pretty(&batches)?);
            } else if batches.is_empty() {
                println!("no batches");
            } else {
                batches.iter().for_each(print_summary);
            }
        }
    }

    node.shutdown().await
}

fn print_summary(summary: &BatchSummary) {
    println!("batch {}", summary.id);
    println!("  status:    {:?}", summary.status);
    println!("  opened:    {}", format_time(summary.opened_at));
    if let Some(closed_at) = summary.closed_at {
        println!("  closed:    {}", format_time(closed_at));
    }
    println!("  total:     {}", summary.total_ref.digest());
    println!("  count:     {}", summary.count_ref.digest());
    let requests: Vec<String> = summary
        .decryption_requests
        .iter()
        .map(|r| r.to_string())
        .collect();
    println!("  requests:  [{}]", requests.join(", "));
    println!("  revealed:  {}", summary.revealed);
}
