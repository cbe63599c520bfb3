// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use sled::{Db, Tree};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::{info, warn};

/// sled takes an exclusive file lock per process so handles are shared per path.
static SLED_CACHE: Lazy<Arc<Mutex<HashMap<PathBuf, Db>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

fn canonical_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let base = parent
        .canonicalize()
        .unwrap_or_else(|_| parent.to_path_buf());
    match path.file_name() {
        Some(tail) => base.join(tail),
        None => base,
    }
}

fn get_or_open_db(path: &Path) -> Result<Db> {
    std::fs::create_dir_all(path)
        .with_context(|| format!("Could not create database dir '{}'", path.display()))?;
    let key = canonical_key(path);
    let mut cache = SLED_CACHE
        .lock()
        .map_err(|_| anyhow!("sled cache lock poisoned"))?;
    if let Some(db) = cache.get(&key) {
        return Ok(db.clone());
    }
    let db = sled::open(path)
        .with_context(|| format!("Could not open database at path '{}'", path.display()))?;
    cache.insert(key, db.clone());
    if db.was_recovered() {
        info!("recovered db at: {:?}", path);
    } else {
        info!("created db at: {:?}", path);
    }

    Ok(db)
}

pub fn get_or_open_db_tree(path: &Path, tree: &str) -> Result<Tree> {
    let db = get_or_open_db(path)?;
    Ok(db.open_tree(tree)?)
}

/// Flush and drop every cached handle
pub fn clear_all_caches() {
    if let Ok(mut cache) = SLED_CACHE.lock() {
        for (path, db) in cache.iter() {
            if let Err(err) = db.flush() {
                warn!("Could not flush db at {:?}: {err}", path);
            }
        }
        cache.clear();
    }
}
