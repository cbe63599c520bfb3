// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{FheConfig, LedgerConfig, OracleConfig};
use alloy::primitives::Address;
use anyhow::{bail, Result};
use std::collections::HashSet;
use tracing::warn;

pub fn validate_ledger(config: &LedgerConfig) -> Result<()> {
    if config.cooldown_seconds == 0 {
        bail!("ledger.cooldown_seconds must be greater than zero");
    }
    if config.owner == Some(Address::ZERO) {
        bail!("ledger.owner cannot be the zero address");
    }
    if config.providers.contains(&Address::ZERO) {
        bail!("ledger.providers cannot contain the zero address");
    }
    if config.address == Address::ZERO {
        warn!("ledger.address is not set; decryption state hashes will be salted with the zero address");
    }
    Ok(())
}

pub fn validate_oracle(config: &OracleConfig) -> Result<()> {
    if config.threshold == 0 {
        bail!("oracle.threshold must be at least 1");
    }
    let unique: HashSet<_> = config.signers.iter().collect();
    if unique.len() != config.signers.len() {
        bail!("oracle.signers contains duplicates");
    }
    if !config.signers.is_empty() && config.threshold > config.signers.len() {
        bail!(
            "oracle.threshold ({}) exceeds the number of configured signers ({})",
            config.threshold,
            config.signers.len()
        );
    }
    Ok(())
}

pub fn validate_fhe(config: &FheConfig) -> Result<()> {
    if !config.degree.is_power_of_two() || config.degree < 8 {
        bail!("fhe.degree must be a power of two no smaller than 8");
    }
    if config.plaintext_modulus < 2 {
        bail!("fhe.plaintext_modulus must be at least 2");
    }
    if config.moduli.is_empty() {
        bail!("fhe.moduli cannot be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_rules() {
        assert!(validate_ledger(&LedgerConfig::default()).is_ok());
        assert!(validate_ledger(&LedgerConfig {
            owner: Some(Address::ZERO),
            ..Default::default()
        })
        .is_err());
        assert!(validate_ledger(&LedgerConfig {
            providers: vec![Address::ZERO],
            ..Default::default()
        })
        .is_err());
    }

    #[test]
    fn oracle_threshold_must_be_reachable() {
        let signer = Address::repeat_byte(1);
        assert!(validate_oracle(&OracleConfig {
            threshold: 2,
            signers: vec![signer],
        })
        .is_err());
        assert!(validate_oracle(&OracleConfig {
            threshold: 1,
            signers: vec![signer, signer],
        })
        .is_err());
        assert!(validate_oracle(&OracleConfig {
            threshold: 0,
            signers: vec![],
        })
        .is_err());
        assert!(validate_oracle(&OracleConfig::default()).is_ok());
    }

    #[test]
    fn fhe_degree_must_be_power_of_two() {
        assert!(validate_fhe(&FheConfig::default()).is_ok());
        assert!(validate_fhe(&FheConfig {
            degree: 1000,
            ..Default::default()
        })
        .is_err());
    }
}
