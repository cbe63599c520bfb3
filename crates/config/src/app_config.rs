// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::load_config::{find_in_parent, resolve_config_path};
use crate::paths_engine::{PathOverrides, PathsEngine, DEFAULT_CONFIG_NAME};
use crate::validation::{validate_fhe, validate_ledger, validate_oracle};
use crate::yaml::load_yaml_with_env;
use alloy::primitives::Address;
use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
};

/// Per node file locations
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct NodeDefinition {
    /// Database location, relative paths land under `<data_dir>/<name>/`
    pub db_file: Option<PathBuf>,
    /// BFV key file, relative paths land under `<config_dir>/<name>/`
    pub key_file: Option<PathBuf>,
    /// Oracle signer key file, relative paths land under `<config_dir>/<name>/`
    pub signer_file: Option<PathBuf>,
    /// Defaults to `~/.local/share/hush`
    pub data_dir: Option<PathBuf>,
    /// Defaults to `~/.config/hush`
    pub config_dir: Option<PathBuf>,
    /// Keep everything in memory. Nothing survives a restart.
    pub in_mem_store: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct LedgerConfig {
    /// Identity of this ledger. Salts every decryption state hash.
    pub address: Address,
    /// Initial owner. Only consulted when no ledger state has been persisted yet.
    pub owner: Option<Address>,
    /// Initial providers in addition to the owner
    pub providers: Vec<Address>,
    pub cooldown_seconds: u64,
    pub start_paused: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            address: Address::ZERO,
            owner: None,
            providers: vec![],
            cooldown_seconds: 60,
            start_paused: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct OracleConfig {
    /// Minimum number of distinct signers a decryption proof must carry
    pub threshold: usize,
    /// Accepted oracle signers. Empty means "whoever holds the local signer key".
    pub signers: Vec<Address>,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            threshold: 1,
            signers: vec![],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct FheConfig {
    pub degree: usize,
    pub plaintext_modulus: u64,
    pub moduli: Vec<u64>,
}

impl Default for FheConfig {
    fn default() -> Self {
        Self {
            degree: 2048,
            plaintext_modulus: 1032193,
            moduli: vec![0x3FFFFFFF000001],
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    name: String,
    node: NodeDefinition,
    paths: PathsEngine,
    ledger: LedgerConfig,
    oracle: OracleConfig,
    fhe: FheConfig,
    /// Open Telemetry collector grpc endpoint. Eg. 127.0.0.1:4317
    otel: Option<String>,
}

impl AppConfig {
    pub fn try_from_unscoped(
        name: &str,
        config: UnscopedAppConfig,
        default_data_dir: &Path,
        default_config_dir: &Path,
    ) -> Result<Self> {
        let mut config = config;

        if config.nodes.contains_key("_default") {
            bail!("Cannot use the `_default` node profile name as it is a reserved node name. In order to configure the _default profile use the `node` key in your yaml configuration.");
        }

        config.nodes.insert("_default".to_string(), config.node);

        let Some(node) = config.nodes.remove(name) else {
            bail!("Could not find node definition for node '{}'. Did you forget to include it in your configuration?", name);
        };

        validate_ledger(&config.ledger)?;
        validate_oracle(&config.oracle)?;
        validate_fhe(&config.fhe)?;

        let paths = PathsEngine::new(
            name,
            default_data_dir,
            default_config_dir,
            PathOverrides {
                found_config_file: config.found_config_file.as_deref(),
                config_dir: node.config_dir.as_deref().or(config.config_dir.as_deref()),
                data_dir: node.data_dir.as_deref().or(config.data_dir.as_deref()),
                db_file: node.db_file.as_deref(),
                key_file: node.key_file.as_deref(),
                signer_file: node.signer_file.as_deref(),
            },
        );

        Ok(AppConfig {
            name: name.to_owned(),
            node,
            paths,
            ledger: config.ledger,
            oracle: config.oracle,
            fhe: config.fhe,
            otel: config.otel,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_file(&self) -> PathBuf {
        self.paths.key_file()
    }

    pub fn signer_file(&self) -> PathBuf {
        self.paths.signer_file()
    }

    pub fn db_file(&self) -> PathBuf {
        self.paths.db_file()
    }

    pub fn config_file(&self) -> PathBuf {
        self.paths.config_file()
    }

    pub fn use_in_mem_store(&self) -> bool {
        self.node.in_mem_store
    }

    pub fn ledger(&self) -> &LedgerConfig {
        &self.ledger
    }

    pub fn oracle(&self) -> &OracleConfig {
        &self.oracle
    }

    pub fn fhe(&self) -> &FheConfig {
        &self.fhe
    }

    pub fn otel(&self) -> Option<String> {
        self.otel.clone()
    }

    /// Configured owner, required to bootstrap a fresh ledger
    pub fn owner(&self) -> Result<Address> {
        self.ledger
            .owner
            .context("No ledger owner configured. Set `ledger.owner` in your configuration.")
    }
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
#[serde(deny_unknown_fields)]
pub struct UnscopedAppConfig {
    /// Base folder for secrets, defaults to `~/.config/hush` on linux
    config_dir: Option<PathBuf>,
    /// Base folder for data, defaults to `~/.local/share/hush`
    data_dir: Option<PathBuf>,
    /// The config file as resolved before loading. Set by the loader, not by users.
    found_config_file: Option<PathBuf>,
    /// The `_default` node profile
    node: NodeDefinition,
    /// Named node profiles selected with `--name`
    nodes: HashMap<String, NodeDefinition>,
    ledger: LedgerConfig,
    oracle: OracleConfig,
    fhe: FheConfig,
    otel: Option<String>,
}

impl Default for UnscopedAppConfig {
    fn default() -> Self {
        Self {
            config_dir: None,
            data_dir: None,
            found_config_file: None,
            node: NodeDefinition::default(),
            nodes: HashMap::new(),
            ledger: LedgerConfig::default(),
            oracle: OracleConfig::default(),
            fhe: FheConfig::default(),
            otel: None,
        }
    }
}

impl UnscopedAppConfig {
    /// Convert to a scoped configuration using local OS based default configuration
    pub fn into_scoped(self, name: &str) -> Result<AppConfig> {
        AppConfig::try_from_unscoped(name, self, &OsDirs::data_dir()?, &OsDirs::config_dir()?)
    }

    /// Convert to a scoped configuration passing in the default folders
    pub fn into_scoped_with_defaults(
        self,
        name: &str,
        default_data_dir: &Path,
        default_config_dir: &Path,
    ) -> Result<AppConfig> {
        AppConfig::try_from_unscoped(name, self, default_data_dir, default_config_dir)
    }
}

#[derive(Default, Serialize, Deserialize, Clone, Debug)]
struct CliOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub found_config_file: Option<PathBuf>,
}

/// Environment overrides, eg. `HUSH_LEDGER__COOLDOWN_SECONDS=30`
fn env_provider() -> Env {
    Env::prefixed("HUSH_").split("__").filter(|key| {
        let key = key.as_str();
        ["ledger", "oracle", "fhe", "otel"]
            .iter()
            .any(|section| key.starts_with(section))
    })
}

pub fn load_config(
    name: &str,
    config_file: Option<String>,
    otel: Option<String>,
) -> Result<AppConfig> {
    let resolved_config_path = resolve_config_path(
        find_in_parent,
        env::current_dir()?,
        OsDirs::config_dir()?,
        DEFAULT_CONFIG_NAME,
        config_file.map(PathBuf::from),
    );

    let loaded_yaml =
        load_yaml_with_env(&resolved_config_path).context("Configuration file not found")?;

    let config: UnscopedAppConfig =
        Figment::from(Serialized::defaults(&UnscopedAppConfig::default()))
            .merge(Yaml::string(&loaded_yaml))
            .merge(env_provider())
            .merge(Serialized::defaults(&CliOverrides {
                otel,
                found_config_file: Some(resolved_config_path),
            }))
            .extract()
            .context("Could not parse configuration")?;

    config
        .into_scoped(name)
        .with_context(|| format!("Could not apply scope '{}' to configuration.", name))
}

pub struct OsDirs;

impl OsDirs {
    pub fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("hush may only be run on an OS that can provide a config dir")?
            .join("hush"))
    }

    pub fn data_dir() -> Result<PathBuf> {
        Ok(dirs::data_local_dir()
            .context("hush may only be run on an OS that can provide a data dir")?
            .join("hush"))
    }
}
