// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::Address;
use anyhow::Result;
use hush_events::{BatchId, RequestId};
use hush_fhe::{CiphertextRef, Decryptor, PlainArithmetic, PlainDecryptor};
use hush_ledger::{
    Caller, ConfidentialAccumulator, DecryptionOracle, DecryptionProof, LedgerError, LedgerMeta,
    LedgerState, ProofVerifier,
};
use proptest::prelude::*;
use std::{collections::BTreeSet, sync::Arc, sync::Mutex};

const COOLDOWN: u64 = 10;

#[derive(Default)]
struct Oracle(Mutex<Vec<Vec<CiphertextRef>>>);

impl DecryptionOracle for Oracle {
    fn request_decryption(&self, refs: Vec<CiphertextRef>) -> Result<RequestId> {
        let mut jobs = self.0.lock().unwrap();
        jobs.push(refs);
        Ok(RequestId::new(jobs.len() as u64))
    }
}

struct Trusting;

impl ProofVerifier for Trusting {
    fn verify(&self, _: RequestId, _: &[u64], _: &DecryptionProof) -> Result<()> {
        Ok(())
    }
}

fn owner() -> Address {
    Address::repeat_byte(0xaa)
}

fn donor(i: u8) -> Address {
    Address::repeat_byte(i + 1)
}

fn fresh() -> LedgerState {
    LedgerState::new(
        Address::repeat_byte(0xcc),
        LedgerMeta::genesis(owner(), Vec::new(), COOLDOWN, false),
        ConfidentialAccumulator::new(Arc::new(PlainArithmetic::new())),
    )
}

/// Run donations spaced by the cooldown, close, request and reveal.
fn reveal(donations: &[(u8, u32)]) -> (u64, u64) {
    let mut state = fresh();
    let oracle = Oracle::default();
    let arith = PlainArithmetic::new();
    let owner = Caller::Account(owner());
    let (batch_id, _) = state.open_batch(&owner, 0).unwrap();

    let mut now = 0;
    for (who, amount) in donations {
        state
            .submit_donation(
                &Caller::Account(donor(*who)),
                batch_id,
                arith.encrypt(*amount as u64),
                now,
            )
            .unwrap();
        now += COOLDOWN;
    }
    state.close_batch(&owner, batch_id, now).unwrap();
    let (request_id, _) = state
        .request_batch_decryption(&owner, batch_id, &oracle, now)
        .unwrap();

    let refs = oracle.0.lock().unwrap().last().cloned().unwrap();
    let cleartexts: Vec<u64> = refs
        .iter()
        .map(|r| PlainDecryptor.decrypt(r).unwrap())
        .collect();
    let (completed, _) = state
        .process_decryption_callback(
            &Caller::Oracle,
            request_id,
            &cleartexts,
            &DecryptionProof::default(),
            &Trusting,
        )
        .unwrap();
    (completed.total_donations, completed.donor_count)
}

proptest! {
    #[test]
    fn revealed_count_is_distinct_donors(donations in prop::collection::vec((0u8..6, 0u32..1000), 0..40)) {
        let distinct: BTreeSet<u8> = donations.iter().map(|(who, _)| *who).collect();
        let (_, count) = reveal(&donations);
        prop_assert_eq!(count, distinct.len() as u64);
    }

    #[test]
    fn revealed_total_is_exact_sum(donations in prop::collection::vec((0u8..6, 0u32..1000), 0..40)) {
        let sum: u64 = donations.iter().map(|(_, amount)| *amount as u64).sum();
        let (total, _) = reveal(&donations);
        prop_assert_eq!(total, sum);
    }

    #[test]
    fn closed_or_missing_batches_reject_everything(id in 0u64..20, opened in 1u64..5) {
        let mut state = fresh();
        let owner = Caller::Account(owner());
        for _ in 0..opened {
            let (batch_id, _) = state.open_batch(&owner, 0).unwrap();
            state.close_batch(&owner, batch_id, 0).unwrap();
        }
        let before = state.list_batches().unwrap();
        let batch_id = BatchId::new(id);

        let closed = state.close_batch(&owner, batch_id, 1);
        let is_invalid_batch = matches!(closed, Err(LedgerError::InvalidBatch { .. }));
        prop_assert!(is_invalid_batch);
        let submitted = state.submit_donation(
            &Caller::Account(donor(0)),
            batch_id,
            PlainArithmetic::new().encrypt(1),
            1,
        );
        let is_invalid_batch = matches!(submitted, Err(LedgerError::InvalidBatch { .. }));
        prop_assert!(is_invalid_batch);
        prop_assert_eq!(state.list_batches().unwrap(), before);
    }

    #[test]
    fn cooldown_boundary(gap in 0u64..(3 * COOLDOWN)) {
        let mut state = fresh();
        let (batch_id, _) = state.open_batch(&Caller::Account(owner()), 0).unwrap();
        let who = Caller::Account(donor(0));
        let arith = PlainArithmetic::new();
        state.submit_donation(&who, batch_id, arith.encrypt(1), 100).unwrap();
        let second = state.submit_donation(&who, batch_id, arith.encrypt(1), 100 + gap);
        if gap < COOLDOWN {
            let is_cooldown = matches!(second, Err(LedgerError::CooldownActive { .. }));
            prop_assert!(is_cooldown);
        } else {
            prop_assert!(second.is_ok());
        }
    }
}
