// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::admin::{self, AdminCommands};
use crate::batch::{self, BatchCommands};
use crate::helpers::telemetry::setup_tracing;
use crate::{decrypt, donate, keygen};
use alloy::primitives::Address;
use anyhow::Result;
use clap::{command, ArgAction, Parser, Subcommand};
use hush_config::{load_config, AppConfig};
use hush_events::BatchId;
use hush_utils::parse_address;
use tracing::{info, instrument, Level};

#[derive(Parser, Debug)]
#[command(name = "hush")]
#[command(about = "Confidential donation batches with encrypted totals and verified reveal", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `hush -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,

    /// The node name (used for logs and open telemetry)
    #[arg(long, global = true)]
    pub name: Option<String>,

    /// Set the Open Telemetry collector grpc endpoint. Eg. http://localhost:4317
    #[arg(long = "otel", global = true)]
    pub otel: Option<String>,

    /// Address to act as. Defaults to the configured owner.
    #[arg(long = "as", global = true, value_parser = parse_address)]
    pub acting_as: Option<Address>,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        let config = self.load_config()?;
        setup_tracing(&config, self.log_level())?;
        info!(
            "hush {} ({}) config loaded from: {:?}",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_SHA"),
            config.config_file()
        );

        // Acting identity, only resolved for commands that touch the ledger
        let caller = || match self.acting_as {
            Some(address) => Ok(address),
            None => config.owner(),
        };

        match self.command {
            Commands::Keygen { force } => keygen::execute(&config, force).await?,
            Commands::Batch { command } => batch::execute(command, &config, caller()?).await?,
            Commands::Donate { batch, amount } => {
                donate::execute(&config, caller()?, batch, amount).await?
            }
            Commands::Decrypt { batch, timeout } => {
                decrypt::execute(&config, caller()?, batch, timeout).await?
            }
            Commands::Admin { command } => {
                admin::execute(command, &config, caller()?).await?
            }
        }

        Ok(())
    }

    pub fn load_config(&self) -> Result<AppConfig> {
        let config = load_config(&self.name(), self.config.clone(), self.otel.clone())?;
        Ok(config)
    }

    pub fn name(&self) -> String {
        // If no name is provided assume we are working with the default node
        self.name.clone().unwrap_or("_default".to_string())
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the BFV key pair and the oracle signer key
    Keygen {
        /// Overwrite existing key files
        #[arg(long)]
        force: bool,
    },

    /// Batch lifecycle commands
    Batch {
        #[command(subcommand)]
        command: BatchCommands,
    },

    /// Encrypt an amount locally and submit it to a batch
    Donate {
        #[arg(long)]
        batch: BatchId,

        #[arg(long)]
        amount: u64,
    },

    /// Request decryption of a closed batch and wait for the result
    Decrypt {
        batch: BatchId,

        /// Seconds to wait for the oracle
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },

    /// Owner administration
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_identity_and_commands() -> Result<()> {
        let cli = Cli::try_parse_from([
            "hush",
            "--as",
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            "donate",
            "--batch",
            "3",
            "--amount",
            "25",
        ])?;
        assert_eq!(
            cli.acting_as,
            Some(parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")?)
        );
        assert!(matches!(
            cli.command,
            Commands::Donate { batch, amount: 25 } if batch == BatchId::from(3)
        ));
        Ok(())
    }

    #[test]
    fn verbosity_maps_to_levels() -> Result<()> {
        assert_eq!(Cli::try_parse_from(["hush", "batch", "list"])?.log_level(), Level::WARN);
        assert_eq!(
            Cli::try_parse_from(["hush", "-vv", "batch", "list"])?.log_level(),
            Level::DEBUG
        );
        assert_eq!(
            Cli::try_parse_from(["hush", "-q", "batch", "list"])?.log_level(),
            Level::ERROR
        );
        assert!(Cli::try_parse_from(["hush", "-q", "-v", "batch", "list"]).is_err());
        Ok(())
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(Cli::try_parse_from(["hush", "admin", "add-provider", "nope"]).is_err());
    }
}
