// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use hush_config::StoreKeys;
use hush_data::{Repositories, Repository};

pub trait OracleRepositoryFactory {
    fn oracle_next_request_id(&self) -> Repository<u64>;
}

impl OracleRepositoryFactory for Repositories {
    fn oracle_next_request_id(&self) -> Repository<u64> {
        Repository::new(self.store.scope(StoreKeys::oracle_next_request_id()))
    }
}
