// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing::info;

/// Signer keys are stored as a single hex line.
pub fn write_signer(path: &Path, signer: &PrivateKeySigner) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Could not create {}", parent.display()))?;
    }
    let encoded = format!("0x{}", hex::encode(signer.to_bytes()));
    fs::write(path, encoded)
        .with_context(|| format!("Could not write signer file {}", path.display()))?;
    info!(address = %signer.address(), "Wrote oracle signer to {}", path.display());
    Ok(())
}

pub fn read_signer(path: &Path) -> Result<PrivateKeySigner> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Could not read signer file {}", path.display()))?;
    contents
        .trim()
        .parse::<PrivateKeySigner>()
        .with_context(|| format!("Malformed signer file {}", path.display()))
}
