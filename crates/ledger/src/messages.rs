// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Commands and queries understood by the `Ledger` actor.

use crate::{
    BatchSummary, DecryptionContext, DecryptionProof, LedgerError, OracleCredential, RateLimited,
};
use actix::Message;
use alloy::primitives::Address;
use hush_events::{BatchId, RequestId};
use hush_fhe::EncryptedHandle;

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<BatchId, LedgerError>")]
pub struct OpenBatch {
    pub caller: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), LedgerError>")]
pub struct CloseBatch {
    pub caller: Address,
    pub batch_id: BatchId,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), LedgerError>")]
pub struct SubmitDonation {
    pub donor: Address,
    pub batch_id: BatchId,
    pub amount: EncryptedHandle,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<RequestId, LedgerError>")]
pub struct RequestBatchDecryption {
    pub caller: Address,
    pub batch_id: BatchId,
}

/// Delivered by the decryption oracle once cleartexts are available.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), LedgerError>")]
pub struct DecryptionCallback {
    pub credential: OracleCredential,
    pub request_id: RequestId,
    pub cleartexts: Vec<u64>,
    pub proof: DecryptionProof,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), LedgerError>")]
pub struct SetPaused {
    pub caller: Address,
    pub paused: bool,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), LedgerError>")]
pub struct SetCooldown {
    pub caller: Address,
    pub seconds: u64,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), LedgerError>")]
pub struct TransferOwnership {
    pub caller: Address,
    pub new_owner: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), LedgerError>")]
pub struct AddProvider {
    pub caller: Address,
    pub provider: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), LedgerError>")]
pub struct RemoveProvider {
    pub caller: Address,
    pub provider: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "BatchId")]
pub struct GetCurrentBatchId;

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<Option<BatchSummary>, LedgerError>")]
pub struct GetBatch {
    pub batch_id: BatchId,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<Vec<BatchSummary>, LedgerError>")]
pub struct ListBatches;

#[derive(Message, Clone, Debug)]
#[rtype(result = "bool")]
pub struct HasDonated {
    pub batch_id: BatchId,
    pub donor: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Option<DecryptionContext>")]
pub struct GetDecryptionContext {
    pub request_id: RequestId,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "bool")]
pub struct IsRevealed {
    pub batch_id: BatchId,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Address")]
pub struct GetOwner;

#[derive(Message, Clone, Debug)]
#[rtype(result = "bool")]
pub struct IsProvider {
    pub address: Address,
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "bool")]
pub struct IsPaused;

#[derive(Message, Clone, Debug)]
#[rtype(result = "u64")]
pub struct GetCooldownSeconds;

#[derive(Message, Clone, Debug)]
#[rtype(result = "u64")]
pub struct GetCooldownRemaining {
    pub actor: Address,
    pub action: RateLimited,
}
