// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::{
    primitives::{keccak256, Address, B256},
    sol_types::SolValue,
};
use hush_events::{BatchId, RequestId};
use hush_fhe::CiphertextRef;
use serde::{Deserialize, Serialize};

/// Pending or finished decryption request. Created once per request and never deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionContext {
    pub request_id: RequestId,
    pub batch_id: BatchId,
    pub state_hash: B256,
    pub processed: bool,
    pub requested_by: Address,
    pub requested_at: u64,
}

/// Binds a request to the exact ciphertexts sent for decryption, salted with the ledger identity.
/// The order of `refs` matters.
pub fn state_hash(refs: &[CiphertextRef], ledger: &Address) -> B256 {
    let digests: Vec<B256> = refs.iter().map(|r| r.digest()).collect();
    keccak256((digests, *ledger).abi_encode_packed())
}
