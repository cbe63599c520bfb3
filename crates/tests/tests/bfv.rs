// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;
use hush_fhe::EncryptedHandle;
use hush_ledger::{LedgerError, SubmitDonation};
use hush_test_helpers::{donor, plaintext_modulus, trace_to_test_writer, TestNode, OWNER};

#[actix::test]
#[serial_test::serial]
async fn bfv_batch_reveals_the_encrypted_sum() -> Result<()> {
    let _guard = trace_to_test_writer("info");
    let node = TestNode::bfv(30, 42).await?;
    let (a, b, c) = (donor(1), donor(2), donor(3));

    let batch = node.open_batch().await?;
    node.donate(a, batch, 3).await?;
    node.advance(30);
    node.donate(a, batch, 2).await?;
    node.donate(b, batch, 5).await?;
    node.donate(c, batch, 1_000).await?;
    node.close_batch(batch).await?;

    let request_id = node.request_decryption(OWNER, batch).await?;
    let completed = node.wait_for_completion(request_id).await?;
    assert_eq!(completed.total_donations, 1_010);
    assert_eq!(completed.donor_count, 3);
    Ok(())
}

#[actix::test]
#[serial_test::serial]
async fn bfv_ledger_rejects_foreign_ciphertexts() -> Result<()> {
    let node = TestNode::bfv(30, 7).await?;
    let batch = node.open_batch().await?;

    let err = node
        .ledger()
        .send(SubmitDonation {
            donor: donor(1),
            batch_id: batch,
            amount: EncryptedHandle::from_bytes(vec![0xde, 0xad, 0xbe, 0xef]),
        })
        .await?
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidArgument(_)));

    // The donor was not recorded and may donate right away
    node.donate(donor(1), batch, 9).await?;
    Ok(())
}

#[actix::test]
#[serial_test::serial]
async fn bfv_amounts_beyond_the_plaintext_modulus_never_reach_the_ledger() -> Result<()> {
    let node = TestNode::bfv(30, 11).await?;
    let batch = node.open_batch().await?;

    let err = node
        .donate(donor(1), batch, plaintext_modulus() + 5)
        .await
        .unwrap_err();
    assert!(matches!(&err, LedgerError::Internal(msg) if msg.contains("plaintext modulus")));

    node.donate(donor(1), batch, 5).await?;
    node.close_batch(batch).await?;
    let request_id = node.request_decryption(OWNER, batch).await?;
    let completed = node.wait_for_completion(request_id).await?;
    assert_eq!(completed.total_donations, 5);
    assert_eq!(completed.donor_count, 1);
    Ok(())
}
