// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{Get, Insert, InsertBatch, InsertSync};
use actix::{Actor, Handler, Message};
use anyhow::Result;
use std::collections::BTreeMap;

#[derive(Message, Clone, Debug, PartialEq, Eq, Hash)]
#[rtype(result = "Vec<DataOp>")]
pub struct GetLog;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataOp {
    Insert(Insert),
}

/// BTreeMap backed store for tests and ephemeral nodes. With `capture` set every
/// operation is recorded so tests can assert on exactly what was persisted.
pub struct InMemStore {
    db: BTreeMap<Vec<u8>, Vec<u8>>,
    log: Vec<DataOp>,
    capture: bool,
}

impl Actor for InMemStore {
    type Context = actix::Context<Self>;
}

impl InMemStore {
    pub fn new(capture: bool) -> Self {
        Self {
            db: BTreeMap::new(),
            capture,
            log: vec![],
        }
    }

    fn apply(&mut self, event: Insert) {
        self.db.insert(event.key().to_vec(), event.value().to_vec());
        if self.capture {
            self.log.push(DataOp::Insert(event));
        }
    }
}

impl Handler<Insert> for InMemStore {
    type Result = ();

    fn handle(&mut self, event: Insert, _: &mut Self::Context) {
        self.apply(event)
    }
}

impl Handler<InsertBatch> for InMemStore {
    type Result = ();

    fn handle(&mut self, msg: InsertBatch, _: &mut Self::Context) -> Self::Result {
        for cmd in msg.commands() {
            self.apply(cmd.clone());
        }
    }
}

impl Handler<InsertSync> for InMemStore {
    type Result = Result<()>;

    fn handle(&mut self, event: InsertSync, _: &mut Self::Context) -> Self::Result {
        self.apply(event.into());
        Ok(())
    }
}

impl Handler<Get> for InMemStore {
    type Result = Option<Vec<u8>>;

    fn handle(&mut self, event: Get, _: &mut Self::Context) -> Option<Vec<u8>> {
        self.db.get(event.key()).cloned()
    }
}

impl Handler<GetLog> for InMemStore {
    type Result = Vec<DataOp>;

    fn handle(&mut self, _: GetLog, _: &mut Self::Context) -> Vec<DataOp> {
        self.log.clone()
    }
}
