// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{Context, Result};
use sled::Tree;
use std::path::Path;

use crate::{
    sled_utils::{clear_all_caches, get_or_open_db_tree},
    Get, Insert, InsertBatch, KeyValStore,
};

pub struct SledDb {
    db: Tree,
}

impl SledDb {
    pub fn new(path: &Path, tree: &str) -> Result<Self> {
        let db = get_or_open_db_tree(path, tree)?;
        Ok(Self { db })
    }

    pub fn close_all_connections() {
        clear_all_caches()
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush().context("Could not flush db")?;
        Ok(())
    }
}

impl KeyValStore for SledDb {
    fn insert(&mut self, msg: Insert) -> Result<()> {
        self.db
            .insert(msg.key(), msg.value().to_vec())
            .context("Could not insert data into db")?;
        Ok(())
    }

    fn insert_batch(&mut self, msg: InsertBatch) -> Result<()> {
        let mut batch = sled::Batch::default();
        for cmd in msg.commands() {
            batch.insert(cmd.key().as_slice(), cmd.value().as_slice());
        }
        self.db
            .apply_batch(batch)
            .context("Could not apply batch to db")?;
        Ok(())
    }

    fn get(&self, msg: Get) -> Result<Option<Vec<u8>>> {
        let key = msg.key();
        let res = self
            .db
            .get(key)
            .with_context(|| format!("Failed to fetch {}", String::from_utf8_lossy(key)))?;

        Ok(res.map(|v| v.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn handles_to_the_same_path_share_data() -> Result<()> {
        let temp_dir = tempdir()?;
        let db_path = temp_dir.path().join("shared.db");

        let mut db1 = SledDb::new(&db_path, "datastore")?;
        db1.insert(Insert::new("//ledger/meta", b"meta".to_vec()))?;

        let db2 = SledDb::new(&db_path, "datastore")?;
        assert_eq!(db2.get(Get::new("//ledger/meta"))?, Some(b"meta".to_vec()));

        let other = SledDb::new(&temp_dir.path().join("other.db"), "datastore")?;
        assert!(other.get(Get::new("//ledger/meta"))?.is_none());
        Ok(())
    }

    #[test]
    fn batches_apply_every_insert() -> Result<()> {
        let temp_dir = tempdir()?;
        let mut db = SledDb::new(&temp_dir.path().join("batch.db"), "datastore")?;
        db.insert_batch(InsertBatch::from_vec(vec![
            Insert::new("//a", vec![1]),
            Insert::new("//b", vec![2]),
        ]))?;
        assert_eq!(db.get(Get::new("//a"))?, Some(vec![1]));
        assert_eq!(db.get(Get::new("//b"))?, Some(vec![2]));
        Ok(())
    }
}
