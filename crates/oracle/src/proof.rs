// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{keccak256, Address, Signature, U256};
use alloy::signers::{local::PrivateKeySigner, SignerSync};
use alloy::sol_types::SolValue;
use anyhow::{anyhow, Result};
use hush_events::RequestId;

/// keccak256(abi.encodePacked(ledger, requestId, cleartexts...))
pub fn decryption_digest(ledger: &Address, request_id: RequestId, cleartexts: &[u64]) -> [u8; 32] {
    let values: Vec<U256> = cleartexts.iter().map(|v| U256::from(*v)).collect();
    let encoded = (*ledger, U256::from(request_id.value()), values).abi_encode_packed();
    keccak256(&encoded).into()
}

/// EIP-191 signature over the decryption digest, 65 bytes.
pub fn sign_decryption(
    signer: &PrivateKeySigner,
    ledger: &Address,
    request_id: RequestId,
    cleartexts: &[u64],
) -> Result<Vec<u8>> {
    let digest = decryption_digest(ledger, request_id, cleartexts);
    let sig = signer
        .sign_message_sync(&digest)
        .map_err(|e| anyhow!("Failed to sign decryption result: {e}"))?;
    Ok(sig.as_bytes().to_vec())
}

pub fn recover_decryption_signer(
    signature: &[u8],
    ledger: &Address,
    request_id: RequestId,
    cleartexts: &[u64],
) -> Result<Address> {
    let sig = Signature::try_from(signature).map_err(|e| anyhow!("Invalid signature: {e}"))?;
    let digest = decryption_digest(ledger, request_id, cleartexts);
    sig.recover_address_from_msg(&digest)
        .map_err(|e| anyhow!("Failed to recover signer address: {e}"))
}
