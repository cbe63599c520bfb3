// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use hush_events::{BatchId, RequestId};

/// Key layout for everything the node persists
pub struct StoreKeys;

impl StoreKeys {
    pub fn ledger_meta() -> String {
        String::from("//ledger/meta")
    }

    pub fn batch(batch_id: &BatchId) -> String {
        format!("//ledger/batch/{batch_id}")
    }

    pub fn decryption(request_id: &RequestId) -> String {
        format!("//ledger/decryption/{}", request_id.value())
    }

    pub fn oracle_next_request_id() -> String {
        String::from("//oracle/next_request_id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_per_record() {
        assert_eq!(StoreKeys::batch(&BatchId::new(4)), "//ledger/batch/4");
        assert_eq!(
            StoreKeys::decryption(&RequestId::new(9)),
            "//ledger/decryption/9"
        );
    }
}
