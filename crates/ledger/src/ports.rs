// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use hush_events::RequestId;
use hush_fhe::CiphertextRef;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// Submission side of the external decryption oracle. Assigns the request id synchronously;
/// the result arrives later as a `DecryptionCallback`.
pub trait DecryptionOracle: Send + Sync + 'static {
    fn request_decryption(&self, refs: Vec<CiphertextRef>) -> Result<RequestId>;
}

/// Checks that cleartexts were produced by the oracle for this request.
pub trait ProofVerifier: Send + Sync + 'static {
    fn verify(&self, request_id: RequestId, cleartexts: &[u64], proof: &DecryptionProof)
        -> Result<()>;
}

pub type SharedOracle = Arc<dyn DecryptionOracle>;
pub type SharedVerifier = Arc<dyn ProofVerifier>;

/// Oracle signatures over a decryption result, 65 bytes each.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionProof {
    pub signatures: Vec<Vec<u8>>,
}

impl DecryptionProof {
    pub fn new(signatures: Vec<Vec<u8>>) -> Self {
        Self { signatures }
    }
}

/// Capability handed only to the oracle adapter. Callbacks presenting any other value are
/// rejected before they are looked at.
#[derive(Clone, PartialEq, Eq)]
pub struct OracleCredential([u8; 32]);

impl OracleCredential {
    pub fn random() -> Self {
        Self(rand::random())
    }
}

impl fmt::Debug for OracleCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OracleCredential(..)")
    }
}
