// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

mod arithmetic;
mod bfv;
mod client;
mod keys;
mod params;
mod plain;

pub use arithmetic::*;
pub use bfv::*;
pub use client::*;
pub use keys::*;
pub use params::*;
pub use plain::*;

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::sync::{Arc, Mutex};

pub type SharedRng = Arc<Mutex<ChaCha20Rng>>;

/// Shared rng seeded from the operating system.
pub fn shared_rng_from_entropy() -> SharedRng {
    Arc::new(Mutex::new(ChaCha20Rng::from_entropy()))
}

/// Deterministic shared rng for tests and reproducible runs.
pub fn shared_rng_from_seed(seed: u64) -> SharedRng {
    Arc::new(Mutex::new(ChaCha20Rng::seed_from_u64(seed)))
}
