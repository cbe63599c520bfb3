// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{BatchId, RequestId};
use actix::Message;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct DecryptionRequested {
    pub request_id: RequestId,
    pub batch_id: BatchId,
    pub provider: Address,
}

impl Display for DecryptionRequested {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request_id: {}, batch_id: {}, provider: {}",
            self.request_id, self.batch_id, self.provider
        )
    }
}

/// The only place aggregate plaintext ever surfaces.
#[derive(Message, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[rtype(result = "()")]
pub struct DecryptionCompleted {
    pub request_id: RequestId,
    pub batch_id: BatchId,
    pub total_donations: u64,
    pub donor_count: u64,
}

impl Display for DecryptionCompleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "request_id: {}, batch_id: {}, total_donations: {}, donor_count: {}",
            self.request_id, self.batch_id, self.total_donations, self.donor_count
        )
    }
}
