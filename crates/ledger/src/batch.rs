// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use hush_events::{BatchId, RequestId};
use hush_fhe::{CiphertextRef, EncryptedHandle};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Open -> Closed, never back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStatus {
    Open,
    Closed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub id: BatchId,
    pub encrypted_total: EncryptedHandle,
    pub encrypted_count: EncryptedHandle,
    pub status: BatchStatus,
    /// Donors counted so far. Entries are never removed.
    pub donors: BTreeSet<Address>,
    pub decryption_requests: Vec<RequestId>,
    pub opened_at: u64,
    pub closed_at: Option<u64>,
}

impl Batch {
    pub fn open(
        id: BatchId,
        encrypted_total: EncryptedHandle,
        encrypted_count: EncryptedHandle,
        now: u64,
    ) -> Self {
        Self {
            id,
            encrypted_total,
            encrypted_count,
            status: BatchStatus::Open,
            donors: BTreeSet::new(),
            decryption_requests: vec![],
            opened_at: now,
            closed_at: None,
        }
    }

    pub fn has_donated(&self, donor: &Address) -> bool {
        self.donors.contains(donor)
    }
}

/// Public view of a batch. Carries exported ciphertext references, never plaintext.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub id: BatchId,
    pub status: BatchStatus,
    pub total_ref: CiphertextRef,
    pub count_ref: CiphertextRef,
    pub decryption_requests: Vec<RequestId>,
    pub revealed: bool,
    pub opened_at: u64,
    pub closed_at: Option<u64>,
}
