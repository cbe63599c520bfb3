// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::recover_decryption_signer;
use alloy::primitives::Address;
use anyhow::{bail, Result};
use hush_events::RequestId;
use hush_ledger::{DecryptionProof, ProofVerifier};
use std::collections::BTreeSet;
use tracing::debug;

/// Accepts a proof once `threshold` distinct trusted signers have signed the exact result.
#[derive(Clone, Debug)]
pub struct SignerSetVerifier {
    ledger: Address,
    signers: BTreeSet<Address>,
    threshold: usize,
}

impl SignerSetVerifier {
    pub fn new(
        ledger: Address,
        signers: impl IntoIterator<Item = Address>,
        threshold: usize,
    ) -> Result<Self> {
        let signers: BTreeSet<Address> = signers.into_iter().collect();
        if threshold == 0 {
            bail!("Signer threshold must be at least 1");
        }
        if threshold > signers.len() {
            bail!(
                "Signer threshold {} exceeds the {} trusted signers",
                threshold,
                signers.len()
            );
        }
        Ok(Self {
            ledger,
            signers,
            threshold,
        })
    }
}

impl ProofVerifier for SignerSetVerifier {
    fn verify(
        &self,
        request_id: RequestId,
        cleartexts: &[u64],
        proof: &DecryptionProof,
    ) -> Result<()> {
        let mut approvals = BTreeSet::new();
        for signature in &proof.signatures {
            match recover_decryption_signer(signature, &self.ledger, request_id, cleartexts) {
                Ok(signer) if self.signers.contains(&signer) => {
                    approvals.insert(signer);
                }
                Ok(signer) => debug!(%signer, "Ignoring signature from untrusted signer"),
                Err(e) => debug!("Ignoring malformed signature: {e}"),
            }
        }
        if approvals.len() < self.threshold {
            bail!(
                "{} of {} required signers approved",
                approvals.len(),
                self.threshold
            );
        }
        Ok(())
    }
}
