// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Get, Insert, InsertBatch, InsertSync, KeyValStore, SledDb};
use actix::{Actor, ActorContext, Addr, Handler};
use anyhow::Result;
use hush_events::{BusHandle, ErrorDispatcher, EventSubscriber, LedgerErrorType, LedgerEvent};
use std::path::Path;
use tracing::{error, info};

/// Actor owning the sled tree. Write failures are reported on the bus since inserts are
/// fire and forget.
pub struct SledStore {
    db: Option<SledDb>,
    bus: BusHandle,
}

impl Actor for SledStore {
    type Context = actix::Context<Self>;
}

impl SledStore {
    pub fn new(bus: &BusHandle, path: &Path) -> Result<Addr<Self>> {
        info!("Starting SledStore with {:?}", path);
        let db = SledDb::new(path, "datastore")?;

        let store = Self {
            db: Some(db),
            bus: bus.clone(),
        }
        .start();

        bus.subscribe("Shutdown", store.clone().recipient());

        Ok(store)
    }

    fn with_db(&mut self, op: impl FnOnce(&mut SledDb) -> Result<()>) {
        let Some(db) = self.db.as_mut() else {
            error!("Attempt to write to dropped db");
            return;
        };
        if let Err(err) = op(db) {
            self.bus.err(LedgerErrorType::Data, err);
        }
    }
}

impl Handler<Insert> for SledStore {
    type Result = ();

    fn handle(&mut self, event: Insert, _: &mut Self::Context) -> Self::Result {
        self.with_db(|db| db.insert(event))
    }
}

impl Handler<InsertBatch> for SledStore {
    type Result = ();

    fn handle(&mut self, event: InsertBatch, _: &mut Self::Context) -> Self::Result {
        self.with_db(|db| db.insert_batch(event))
    }
}

impl Handler<InsertSync> for SledStore {
    type Result = Result<()>;

    fn handle(&mut self, event: InsertSync, _: &mut Self::Context) -> Self::Result {
        match self.db.as_mut() {
            Some(db) => db.insert(event.into()),
            None => Err(anyhow::anyhow!("Attempt to write to dropped db")),
        }
    }
}

impl Handler<Get> for SledStore {
    type Result = Option<Vec<u8>>;

    fn handle(&mut self, event: Get, _: &mut Self::Context) -> Self::Result {
        let Some(db) = self.db.as_ref() else {
            error!("Attempt to get data from dropped db");
            return None;
        };
        match db.get(event) {
            Ok(v) => v,
            Err(err) => {
                self.bus.err(LedgerErrorType::Data, err);
                None
            }
        }
    }
}

impl Handler<LedgerEvent> for SledStore {
    type Result = ();

    fn handle(&mut self, msg: LedgerEvent, ctx: &mut Self::Context) -> Self::Result {
        if let LedgerEvent::Shutdown { .. } = msg {
            if let Some(db) = self.db.take() {
                if let Err(err) = db.flush() {
                    error!("Could not flush db on shutdown: {err}");
                }
            }
            ctx.stop()
        }
    }
}
