// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub [u8; 32]);

impl EventId {
    /// Content address of a serializable value. Stable across processes as it hashes the
    /// bincode encoding rather than a std Hasher state.
    pub fn hash<T: Serialize>(value: &T) -> Self {
        let bytes = bincode::serialize(value).unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        EventId(hasher.finalize().into())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base58_string = bs58::encode(&self.0).into_string();
        write!(f, "evt:{}", &base58_string[0..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_value_same_id() {
        assert_eq!(EventId::hash(&(1u64, "a")), EventId::hash(&(1u64, "a")));
        assert_ne!(EventId::hash(&(1u64, "a")), EventId::hash(&(2u64, "a")));
    }

    #[test]
    fn displays_short_base58() {
        let id = EventId::hash(&42u64);
        let s = id.to_string();
        assert!(s.starts_with("evt:"));
        assert_eq!(s.len(), 12);
    }
}
