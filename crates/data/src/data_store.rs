// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::borrow::Cow;

use crate::{Get, Insert, InsertBatch, InsertSync};
use crate::{InMemStore, IntoKey, SledStore};
use actix::{Addr, Recipient};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Clone, Debug)]
pub enum StoreAddr {
    InMem(Addr<InMemStore>),
    Sled(Addr<SledStore>),
}

impl StoreAddr {
    pub fn to_maybe_in_mem(&self) -> Option<&Addr<InMemStore>> {
        match self {
            StoreAddr::InMem(store) => Some(store),
            _ => None,
        }
    }
}

/// Generate proxy for the DB / KV store
/// DataStore is scopable
#[derive(Clone, Debug)]
pub struct DataStore {
    scope: Vec<u8>,
    addr: StoreAddr,
    get: Recipient<Get>,
    insert: Recipient<Insert>,
    insert_batch: Recipient<InsertBatch>,
    insert_sync: Recipient<InsertSync>,
}

impl DataStore {
    /// Read data at the scope location
    pub async fn read<T>(&self) -> Result<Option<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let Some(bytes) = self.get.send(Get::new(&self.scope)).await? else {
            return Ok(None);
        };

        let value = bincode::deserialize(&bytes).with_context(|| {
            format!("Could not deserialize value at {}", self.scope_str())
        })?;
        Ok(Some(value))
    }

    /// Writes data to the scope location
    pub fn write<T: Serialize>(&self, value: T) {
        let Ok(serialized) = bincode::serialize(&value) else {
            error!("Could not serialize value passed to {}", self.scope_str());
            return;
        };
        self.insert.do_send(Insert::new(&self.scope, serialized))
    }

    /// Writes data and waits for the store to acknowledge it
    pub async fn write_sync<T: Serialize>(&self, value: T) -> Result<()> {
        let serialized = bincode::serialize(&value)
            .with_context(|| anyhow!("Could not serialize value passed to {}", self.scope_str()))?;

        self.insert_sync
            .send(InsertSync::new(&self.scope, serialized))
            .await??;
        Ok(())
    }

    /// Start collecting writes to be committed together
    pub fn batch(&self) -> WriteBatch {
        WriteBatch {
            inserts: vec![],
            sink: self.insert_batch.clone(),
        }
    }

    /// Get the scope as a string
    pub fn get_scope(&self) -> Result<Cow<str>> {
        Ok(String::from_utf8_lossy(&self.scope))
    }

    fn scope_str(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.scope)
    }

    pub fn get_addr(&self) -> &StoreAddr {
        &self.addr
    }

    /// Changes the scope for the data store.
    /// Note that if the scope does not start with a slash one is appended.
    /// ```
    /// use hush_data::DataStore;
    /// use hush_data::InMemStore;
    /// use actix::Actor;
    /// use anyhow::Result;
    ///
    /// #[actix::main]
    /// async fn main() -> Result<()>{
    ///   let addr = InMemStore::new(false).start();
    ///   let store = DataStore::from(&addr);
    ///   assert_eq!(store.base("//ledger")
    ///     .scope("batch")
    ///     .scope("/1")
    ///     .get_scope()?, "//ledger/batch/1");
    ///   Ok(())
    /// }
    /// ```
    pub fn scope<K: IntoKey>(&self, key: K) -> Self {
        let mut scope = self.scope.clone();
        let encoded_key = key.into_key();
        if !encoded_key.starts_with(b"/") {
            scope.push(b'/');
        }
        scope.extend(encoded_key);
        Self {
            scope,
            ..self.clone()
        }
    }

    /// Same store, absolute scope
    pub fn base<K: IntoKey>(&self, key: K) -> Self {
        Self {
            scope: key.into_key(),
            ..self.clone()
        }
    }
}

impl From<&Addr<SledStore>> for DataStore {
    fn from(addr: &Addr<SledStore>) -> Self {
        Self {
            addr: StoreAddr::Sled(addr.clone()),
            get: addr.clone().recipient(),
            insert: addr.clone().recipient(),
            insert_batch: addr.clone().recipient(),
            insert_sync: addr.clone().recipient(),
            scope: vec![],
        }
    }
}

impl From<&Addr<InMemStore>> for DataStore {
    fn from(addr: &Addr<InMemStore>) -> Self {
        Self {
            addr: StoreAddr::InMem(addr.clone()),
            get: addr.clone().recipient(),
            insert: addr.clone().recipient(),
            insert_batch: addr.clone().recipient(),
            insert_sync: addr.clone().recipient(),
            scope: vec![],
        }
    }
}

/// Writes staged against any scope of the same store and sent as a single InsertBatch.
pub struct WriteBatch {
    inserts: Vec<Insert>,
    sink: Recipient<InsertBatch>,
}

impl WriteBatch {
    pub fn put<T: Serialize>(&mut self, at: &DataStore, value: &T) -> Result<()> {
        let serialized = bincode::serialize(value)
            .with_context(|| format!("Could not serialize value for {}", at.scope_str()))?;
        self.inserts.push(Insert::new(&at.scope, serialized));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inserts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty()
    }

    pub fn commit(self) {
        if self.inserts.is_empty() {
            return;
        }
        self.sink.do_send(InsertBatch::from_vec(self.inserts))
    }
}
