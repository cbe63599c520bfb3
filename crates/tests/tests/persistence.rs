// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use actix::Addr;
use anyhow::Result;
use hush_builder::LedgerNodeBuilder;
use hush_data::{DataStore, RepositoriesFactory, SledStore};
use hush_events::{BatchId, BusHandle, EventBus, LedgerEvent, RequestId};
use hush_ledger::{
    BatchStatus, CloseBatch, GetBatch, GetCurrentBatchId, HasDonated, IsRevealed,
    LedgerMetaRepositoryFactory, RequestBatchDecryption,
};
use hush_test_helpers::{donor, TestNode, LEDGER_ADDRESS, OWNER};
use std::path::Path;
use tempfile::tempdir;

fn sled_store(path: &Path) -> Result<(DataStore, Addr<EventBus<LedgerEvent>>)> {
    let bus = BusHandle::start();
    let store = DataStore::from(&SledStore::new(&bus, path)?);
    Ok((store, bus.bus().clone()))
}

#[actix::test]
#[serial_test::serial]
async fn ledger_resumes_from_disk() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("db");
    let signer = alloy::signers::local::PrivateKeySigner::random();

    let (store, bus) = sled_store(&path)?;
    let first_signer = signer.clone();
    let first = TestNode::build_with(move |b| {
        b.with_datastore(store)
            .with_source_bus(&bus)
            .with_oracle_signers(vec![first_signer])
    })
    .await?;

    let batch = first.open_batch().await?;
    first.donate(donor(1), batch, 8).await?;
    first.close_batch(batch).await?;
    let request_id = first.request_decryption(OWNER, batch).await?;
    first.wait_for_completion(request_id).await?;
    let open = first.open_batch().await?;
    // Writes are queued behind this read
    first
        .handle
        .store()
        .repositories()
        .ledger_meta()
        .read()
        .await?;

    let (store, bus) = sled_store(&path)?;
    let second = LedgerNodeBuilder::new(OWNER)
        .with_ledger_address(LEDGER_ADDRESS)
        .with_datastore(store)
        .with_source_bus(&bus)
        .with_oracle_signers(vec![signer])
        .testmode_with_history()
        .build()
        .await?;
    let ledger = second.ledger();

    assert_eq!(ledger.send(GetCurrentBatchId).await?, BatchId::new(2));
    assert!(ledger.send(IsRevealed { batch_id: batch }).await?);
    assert!(
        ledger
            .send(HasDonated {
                batch_id: batch,
                donor: donor(1)
            })
            .await?
    );
    let summary = ledger
        .send(GetBatch { batch_id: open })
        .await??
        .expect("second batch was persisted");
    assert_eq!(summary.status, BatchStatus::Open);

    // Request ids continue where the previous process stopped
    ledger
        .send(CloseBatch {
            caller: OWNER,
            batch_id: open,
        })
        .await??;
    let next = ledger
        .send(RequestBatchDecryption {
            caller: OWNER,
            batch_id: open,
        })
        .await??;
    assert_eq!(next, RequestId::new(2));
    Ok(())
}
