// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::node::open_node;
use alloy::primitives::Address;
use anyhow::Result;
use clap::Subcommand;
use hush_config::AppConfig;
use hush_ledger::{
    AddProvider, GetCooldownRemaining, GetCooldownSeconds, GetCurrentBatchId, GetOwner,
    IsPaused, IsProvider, RateLimited, RemoveProvider, SetCooldown, SetPaused,
    TransferOwnership,
};
use hush_utils::parse_address;
use tracing::instrument;

#[derive(Subcommand, Debug)]
pub enum AdminCommands {
    /// Reject donations and decryption requests until unpaused
    Pause,
    /// Resume normal operation
    Unpause,
    /// Set the per actor cooldown in seconds
    Cooldown { seconds: u64 },
    /// Grant the provider role
    AddProvider {
        #[arg(value_parser = parse_address)]
        provider: Address,
    },
    /// Revoke the provider role
    RemoveProvider {
        #[arg(value_parser = parse_address)]
        provider: Address,
    },
    /// Hand the ledger to a new owner
    TransferOwnership {
        #[arg(value_parser = parse_address)]
        new_owner: Address,
    },
    /// Print owner, pause flag, cooldown and the acting address' role
    Status,
}

#[instrument(skip_all)]
pub async fn execute(command: AdminCommands, config: &AppConfig, caller: Address) -> Result<()> {
    let node = open_node(config).await?;
    let ledger = node.ledger();

    match command {
        AdminCommands::Pause => {
            ledger.send(SetPaused { caller, paused: true }).await??;
            println!("paused");
        }
        AdminCommands::Unpause => {
            ledger
                .send(SetPaused {
                    caller,
                    paused: false,
                })
                .await??;
            println!("unpaused");
        }
        AdminCommands::Cooldown { seconds } => {
            ledger.send(SetCooldown { caller, seconds }).await??;
            println!("cooldown set to {seconds}s");
        }
        AdminCommands::AddProvider { provider } => {
            ledger.send(AddProvider { caller, provider }).await??;
            println!("{provider} is now a provider");
        }
        AdminCommands::RemoveProvider { provider } => {
            ledger.send(RemoveProvider { caller, provider }).await??;
            println!("{provider} is no longer a provider");
        }
        AdminCommands::TransferOwnership { new_owner } => {
            ledger
                .send(TransferOwnership { caller, new_owner })
                .await??;
            println!("ownership transferred to {new_owner}");
        }
        AdminCommands::Status => {
            println!("ledger:        {}", node.ledger_address);
            println!("owner:         {}", ledger.send(GetOwner).await?);
            println!("paused:        {}", ledger.send(IsPaused).await?);
            println!("cooldown:      {}s", ledger.send(GetCooldownSeconds).await?);
            println!("current batch: {}", ledger.send(GetCurrentBatchId).await?);
            println!(
                "{caller} provider: {}",
                ledger.send(IsProvider { address: caller }).await?
            );
            for action in [RateLimited::Submission, RateLimited::DecryptionRequest] {
                let remaining = ledger
                    .send(GetCooldownRemaining {
                        actor: caller,
                        action,
                    })
                    .await?;
                println!("{action:?} cooldown remaining: {remaining}s");
            }
        }
    }

    node.shutdown().await
}
