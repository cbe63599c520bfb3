// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use hush_events::{BatchId, GetEvents, LedgerErrorType, LedgerEvent};
use hush_ledger::{
    AddProvider, GetBatch, GetCurrentBatchId, GetDecryptionContext, HasDonated, IsRevealed,
    LedgerError, OpenBatch, SetPaused,
};
use hush_oracle::DecryptionJob;
use hush_test_helpers::{donor, trace_to_test_writer, TestNode, OUTSIDER, OWNER, PROVIDER};

const COOLDOWN: u64 = 60;

#[actix::test]
async fn reveals_distinct_donors_and_exact_total() -> Result<()> {
    let _guard = trace_to_test_writer("info");
    let node = TestNode::plain(COOLDOWN).await?;
    let (a, b) = (donor(1), donor(2));

    let batch = node.open_batch().await?;
    assert_eq!(batch, BatchId::new(1));

    node.donate(a, batch, 3).await?;
    let err = node.donate(a, batch, 2).await.unwrap_err();
    assert!(matches!(err, LedgerError::CooldownActive { actor, .. } if actor == a));

    node.advance(COOLDOWN);
    node.donate(a, batch, 2).await?;
    node.donate(b, batch, 5).await?;
    node.close_batch(batch).await?;

    let request_id = node.request_decryption(OWNER, batch).await?;
    let completed = node.wait_for_completion(request_id).await?;
    assert_eq!(completed.batch_id, batch);
    assert_eq!(completed.total_donations, 10);
    assert_eq!(completed.donor_count, 2);

    assert!(node.ledger().send(IsRevealed { batch_id: batch }).await?);
    let context = node
        .ledger()
        .send(GetDecryptionContext { request_id })
        .await?
        .expect("context is stored");
    assert!(context.processed);
    Ok(())
}

#[actix::test]
async fn non_owner_cannot_open_a_batch() -> Result<()> {
    let node = TestNode::plain(COOLDOWN).await?;

    let err = node
        .ledger()
        .send(OpenBatch { caller: OUTSIDER })
        .await?
        .unwrap_err();
    assert_eq!(err, LedgerError::NotOwner(OUTSIDER));
    assert_eq!(node.ledger().send(GetCurrentBatchId).await?, BatchId::NONE);

    let error = node.wait_for_error().await?;
    assert_eq!(error.err_type, LedgerErrorType::Authorization);
    Ok(())
}

#[actix::test]
async fn decryption_requires_a_closed_batch() -> Result<()> {
    let node = TestNode::plain(COOLDOWN).await?;
    let batch = node.open_batch().await?;
    node.donate(donor(1), batch, 7).await?;

    let err = node.request_decryption(OWNER, batch).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidBatch { batch_id, .. } if batch_id == batch));

    let missing = BatchId::new(9);
    let err = node.request_decryption(OWNER, missing).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidBatch { batch_id, .. } if batch_id == missing));
    Ok(())
}

#[actix::test]
async fn closed_and_unknown_batches_reject_writes() -> Result<()> {
    let node = TestNode::plain(COOLDOWN).await?;
    let batch = node.open_batch().await?;
    node.donate(donor(1), batch, 4).await?;
    node.close_batch(batch).await?;
    let before = node.ledger().send(GetBatch { batch_id: batch }).await??;

    assert!(matches!(
        node.close_batch(batch).await,
        Err(LedgerError::InvalidBatch { .. })
    ));
    assert!(matches!(
        node.close_batch(BatchId::new(2)).await,
        Err(LedgerError::InvalidBatch { .. })
    ));
    node.advance(COOLDOWN);
    assert!(matches!(
        node.donate(donor(2), batch, 1).await,
        Err(LedgerError::InvalidBatch { .. })
    ));
    assert!(matches!(
        node.donate(donor(2), BatchId::new(2), 1).await,
        Err(LedgerError::InvalidBatch { .. })
    ));

    let after = node.ledger().send(GetBatch { batch_id: batch }).await??;
    assert_eq!(before, after);
    assert!(
        !node
            .ledger()
            .send(HasDonated {
                batch_id: batch,
                donor: donor(2)
            })
            .await?
    );
    Ok(())
}

#[actix::test]
async fn second_callback_for_a_request_is_a_replay() -> Result<()> {
    let node = TestNode::plain(COOLDOWN).await?;
    let batch = node.open_batch().await?;
    node.donate(donor(1), batch, 11).await?;
    node.close_batch(batch).await?;

    let request_id = node.request_decryption(OWNER, batch).await?;
    node.wait_for_completion(request_id).await?;

    // Make the oracle answer the same request again
    let summary = node
        .ledger()
        .send(GetBatch { batch_id: batch })
        .await??
        .expect("batch exists");
    node.handle.oracle.do_send(DecryptionJob {
        request_id,
        refs: vec![summary.total_ref, summary.count_ref],
    });

    let error = node.wait_for_error().await?;
    assert_eq!(error.err_type, LedgerErrorType::ProtocolIntegrity);
    assert!(error.message.contains("Replay"));

    // Nothing else was emitted for the request
    let history = node.handle.history().expect("history is attached");
    let trailing = history.send(GetEvents::new()).await?;
    assert!(!trailing
        .iter()
        .any(|e| matches!(e, LedgerEvent::DecryptionCompleted { .. })));
    Ok(())
}

#[actix::test]
async fn untrusted_oracle_signatures_leave_the_request_pending() -> Result<()> {
    let stranger = alloy::signers::local::PrivateKeySigner::random();
    let node =
        TestNode::build_with(|b| b.with_trusted_signers(&[stranger.address()], 1)).await?;
    let batch = node.open_batch().await?;
    node.donate(donor(1), batch, 5).await?;
    node.close_batch(batch).await?;

    let request_id = node.request_decryption(OWNER, batch).await?;
    let error = node.wait_for_error().await?;
    assert_eq!(error.err_type, LedgerErrorType::ProtocolIntegrity);

    let context = node
        .ledger()
        .send(GetDecryptionContext { request_id })
        .await?
        .expect("context is stored");
    assert!(!context.processed);
    assert!(!node.ledger().send(IsRevealed { batch_id: batch }).await?);
    Ok(())
}

#[actix::test]
async fn pause_blocks_donations_and_requests_until_lifted() -> Result<()> {
    let node = TestNode::plain(COOLDOWN).await?;
    let batch = node.open_batch().await?;

    node.ledger()
        .send(SetPaused {
            caller: OWNER,
            paused: true,
        })
        .await??;
    assert_eq!(
        node.donate(donor(1), batch, 1).await,
        Err(LedgerError::Paused)
    );

    node.ledger()
        .send(SetPaused {
            caller: OWNER,
            paused: false,
        })
        .await??;
    node.donate(donor(1), batch, 1).await?;
    Ok(())
}

#[actix::test]
async fn providers_share_the_request_cooldown_per_actor() -> Result<()> {
    let node = TestNode::plain(COOLDOWN).await?;
    node.ledger()
        .send(AddProvider {
            caller: OWNER,
            provider: PROVIDER,
        })
        .await??;

    let first = node.open_batch().await?;
    let second = node.open_batch().await?;
    node.donate(donor(1), first, 1).await?;
    node.donate(donor(2), second, 2).await?;
    node.close_batch(first).await?;
    node.close_batch(second).await?;

    assert!(matches!(
        node.request_decryption(OUTSIDER, first).await,
        Err(LedgerError::NotProvider(addr)) if addr == OUTSIDER
    ));

    let r1 = node.request_decryption(PROVIDER, first).await?;
    assert!(matches!(
        node.request_decryption(PROVIDER, second).await,
        Err(LedgerError::CooldownActive { .. })
    ));
    // A different provider is not held back
    let r2 = node.request_decryption(OWNER, second).await?;

    let done_first = node.wait_for_completion(r1).await?;
    let done_second = node.wait_for_completion(r2).await?;
    assert_eq!((done_first.total_donations, done_first.donor_count), (1, 1));
    assert_eq!((done_second.total_donations, done_second.donor_count), (2, 1));
    Ok(())
}
