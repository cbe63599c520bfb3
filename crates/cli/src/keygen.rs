// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::signers::local::PrivateKeySigner;
use anyhow::{bail, Result};
use hush_config::AppConfig;
use hush_fhe::{params_from_config, shared_rng_from_entropy, BfvKeys};
use hush_oracle::write_signer;
use tracing::{info, instrument};

#[instrument(skip_all)]
pub async fn execute(config: &AppConfig, force: bool) -> Result<()> {
    let key_file = config.key_file();
    let signer_file = config.signer_file();
    if !force && (key_file.exists() || signer_file.exists()) {
        bail!(
            "Key material already exists at {:?} / {:?}. Use --force to replace it.",
            key_file,
            signer_file
        );
    }

    let params = params_from_config(config.fhe())?;
    let keys = BfvKeys::generate(params, &shared_rng_from_entropy())?;
    keys.write(&key_file)?;
    info!("FHE keys written to {:?}", key_file);

    let signer = PrivateKeySigner::random();
    write_signer(&signer_file, &signer)?;
    info!("Oracle signer written to {:?}", signer_file);

    println!("oracle signer: {}", signer.address());
    Ok(())
}
