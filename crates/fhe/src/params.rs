// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use fhe::bfv::{BfvParameters, BfvParametersBuilder};
use hush_config::FheConfig;
use std::sync::Arc;

pub fn build_bfv_params_arc(
    degree: usize,
    plaintext_modulus: u64,
    moduli: &[u64],
) -> Result<Arc<BfvParameters>> {
    BfvParametersBuilder::new()
        .set_degree(degree)
        .set_plaintext_modulus(plaintext_modulus)
        .set_moduli(moduli)
        .build_arc()
        .context("Failed to build BFV parameters")
}

pub fn params_from_config(config: &FheConfig) -> Result<Arc<BfvParameters>> {
    build_bfv_params_arc(config.degree, config.plaintext_modulus, &config.moduli)
}
