// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Message;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct LedgerError {
    pub err_type: LedgerErrorType,
    pub message: String,
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.err_type, self.message)
    }
}

/// Error taxonomy shared by the ledger and its collaborators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerErrorType {
    /// Caller lacks the required role
    Authorization,
    /// Temporarily disallowed: paused or cooling down
    Availability,
    /// Bad identifier or value supplied by the caller
    Argument,
    /// Replay, state binding or proof failures on the decryption callback
    ProtocolIntegrity,
    /// Encrypted arithmetic backend failed
    Internal,
    /// Persistence failed
    Data,
    /// Decryption oracle worker failed
    Oracle,
}

impl LedgerError {
    pub fn new(err_type: LedgerErrorType, message: &str) -> Self {
        Self {
            err_type,
            message: message.to_string(),
        }
    }

    pub fn from_error(err_type: LedgerErrorType, error: impl Into<anyhow::Error>) -> Self {
        Self {
            err_type,
            message: error.into().to_string(),
        }
    }
}
