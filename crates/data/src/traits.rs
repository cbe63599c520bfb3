// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::Result;

use crate::{Get, Insert, InsertBatch};

pub trait KeyValStore {
    fn insert(&mut self, msg: Insert) -> Result<()>;
    fn insert_batch(&mut self, msg: InsertBatch) -> Result<()>;
    fn get(&self, msg: Get) -> Result<Option<Vec<u8>>>;
}
