// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use anyhow::Result;
use hush_config::FheConfig;
use hush_fhe::{params_from_config, shared_rng_from_seed, BfvKeys, SharedRng};

pub const OWNER: Address = Address::repeat_byte(0x0a);
pub const PROVIDER: Address = Address::repeat_byte(0x0b);
pub const OUTSIDER: Address = Address::repeat_byte(0x0c);
pub const LEDGER_ADDRESS: Address = Address::repeat_byte(0x1e);

/// Arbitrary but fixed starting time for manual clocks
pub const START_TIME: u64 = 1_700_000_000;

/// Distinct donor addresses, stable across runs
pub fn donor(n: u8) -> Address {
    Address::with_last_byte(0xd0_u8.wrapping_add(n))
}

pub fn create_shared_rng_from_u64(seed: u64) -> SharedRng {
    shared_rng_from_seed(seed)
}

/// Plaintext modulus of the default parameter set
pub fn plaintext_modulus() -> u64 {
    FheConfig::default().plaintext_modulus
}

/// BFV keys under the default parameter set
pub fn create_bfv_keys(rng: &SharedRng) -> Result<BfvKeys> {
    let params = params_from_config(&FheConfig::default())?;
    BfvKeys::generate(params, rng)
}
