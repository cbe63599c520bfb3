// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use anyhow::{Context, Result};
use rand::Rng;

pub fn rand_eth_addr<R: Rng>(rng: &mut R) -> Address {
    Address::from(rng.gen::<[u8; 20]>())
}

/// Parse a hex address, accepting both checksummed and lowercase forms.
pub fn parse_address(value: &str) -> Result<Address> {
    value
        .trim()
        .parse::<Address>()
        .with_context(|| format!("'{}' is not a valid address", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_addresses() -> Result<()> {
        let addr = parse_address("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")?;
        assert_eq!(
            addr,
            parse_address("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")?
        );
        assert!(parse_address("not-an-address").is_err());
        Ok(())
    }
}
