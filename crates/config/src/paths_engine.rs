// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use path_clean::clean;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "hush.config.yaml";
pub const DEFAULT_KEY_NAME: &str = "fhe.key";
pub const DEFAULT_SIGNER_NAME: &str = "oracle.key";
pub const DEFAULT_DB_NAME: &str = "db";

/// Resolves node file locations. Secrets live under `<config_dir>/<name>/`, the database
/// under `<data_dir>/<name>/`. Relative overrides are joined onto those folders.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsEngine {
    name: String,
    found_config_file: Option<PathBuf>,
    config_dir_override: Option<PathBuf>,
    data_dir_override: Option<PathBuf>,
    db_file_override: Option<PathBuf>,
    key_file_override: Option<PathBuf>,
    signer_file_override: Option<PathBuf>,
    default_data_dir: PathBuf,
    default_config_dir: PathBuf,
}

#[derive(Default)]
pub struct PathOverrides<'a> {
    pub found_config_file: Option<&'a Path>,
    pub config_dir: Option<&'a Path>,
    pub data_dir: Option<&'a Path>,
    pub db_file: Option<&'a Path>,
    pub key_file: Option<&'a Path>,
    pub signer_file: Option<&'a Path>,
}

impl PathsEngine {
    pub fn new(
        name: &str,
        default_data_dir: &Path,
        default_config_dir: &Path,
        overrides: PathOverrides,
    ) -> Self {
        Self {
            name: name.to_owned(),
            default_data_dir: default_data_dir.to_path_buf(),
            default_config_dir: default_config_dir.to_path_buf(),
            found_config_file: overrides.found_config_file.map(PathBuf::from),
            config_dir_override: overrides.config_dir.map(PathBuf::from),
            data_dir_override: overrides.data_dir.map(PathBuf::from),
            db_file_override: overrides.db_file.map(PathBuf::from),
            key_file_override: overrides.key_file.map(PathBuf::from),
            signer_file_override: overrides.signer_file.map(PathBuf::from),
        }
    }

    /// Full path to the config file that will be loaded
    pub fn config_file(&self) -> PathBuf {
        match &self.found_config_file {
            Some(file) => clean(file),
            None => clean(self.config_dir().join(DEFAULT_CONFIG_NAME)),
        }
    }

    /// BFV key material
    pub fn key_file(&self) -> PathBuf {
        self.in_node_dir(
            &self.config_dir(),
            self.key_file_override.as_deref(),
            DEFAULT_KEY_NAME,
        )
    }

    /// Oracle signing key
    pub fn signer_file(&self) -> PathBuf {
        self.in_node_dir(
            &self.config_dir(),
            self.signer_file_override.as_deref(),
            DEFAULT_SIGNER_NAME,
        )
    }

    pub fn db_file(&self) -> PathBuf {
        self.in_node_dir(
            &self.data_dir(),
            self.db_file_override.as_deref(),
            DEFAULT_DB_NAME,
        )
    }

    fn in_node_dir(&self, base: &Path, file: Option<&Path>, default: &str) -> PathBuf {
        match file {
            Some(file) if file.is_absolute() => clean(file),
            Some(file) => clean(base.join(&self.name).join(file)),
            None => clean(base.join(&self.name).join(default)),
        }
    }

    fn config_dir(&self) -> PathBuf {
        self.config_dir_override
            .clone()
            .unwrap_or_else(|| self.default_config_dir.clone())
    }

    fn data_dir(&self) -> PathBuf {
        self.data_dir_override
            .clone()
            .unwrap_or_else(|| self.default_data_dir.clone())
    }
}
