// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use hush_events::{BatchId, LedgerErrorType, RequestId};
use thiserror::Error;

/// Every way a ledger operation can be rejected. A rejected operation never changes state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{0} is not the owner")]
    NotOwner(Address),
    #[error("{0} is not a decryption provider")]
    NotProvider(Address),
    #[error("Callback did not come from the decryption oracle")]
    NotOracle,
    #[error("Ledger is paused")]
    Paused,
    #[error("Cooldown active for {actor}, {remaining}s remaining")]
    CooldownActive { actor: Address, remaining: u64 },
    #[error("Invalid batch {batch_id}: {reason}")]
    InvalidBatch {
        batch_id: BatchId,
        reason: &'static str,
    },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Replay attempt for {0}")]
    ReplayAttempt(RequestId),
    #[error("Encrypted state of batch {batch_id} changed since {request_id} was issued")]
    StateMismatch {
        request_id: RequestId,
        batch_id: BatchId,
    },
    #[error("Decryption failed for {request_id}: {reason}")]
    DecryptionFailed {
        request_id: RequestId,
        reason: String,
    },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    pub fn kind(&self) -> LedgerErrorType {
        match self {
            LedgerError::NotOwner(_) | LedgerError::NotProvider(_) | LedgerError::NotOracle => {
                LedgerErrorType::Authorization
            }
            LedgerError::Paused | LedgerError::CooldownActive { .. } => {
                LedgerErrorType::Availability
            }
            LedgerError::InvalidBatch { .. } | LedgerError::InvalidArgument(_) => {
                LedgerErrorType::Argument
            }
            LedgerError::ReplayAttempt(_)
            | LedgerError::StateMismatch { .. }
            | LedgerError::DecryptionFailed { .. } => LedgerErrorType::ProtocolIntegrity,
            LedgerError::Internal(_) => LedgerErrorType::Internal,
        }
    }

    pub fn invalid_batch(batch_id: BatchId, reason: &'static str) -> Self {
        LedgerError::InvalidBatch { batch_id, reason }
    }

    pub fn internal(error: impl std::fmt::Display) -> Self {
        LedgerError::Internal(error.to_string())
    }
}
