// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Batch identifier. Allocated sequentially starting at 1; 0 never names a batch.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BatchId(u64);

impl BatchId {
    pub const NONE: BatchId = BatchId(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }

    /// Every batch id allocated up to and including this one
    pub fn up_to(&self) -> impl Iterator<Item = BatchId> {
        (1..=self.0).map(BatchId)
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for BatchId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl FromStr for BatchId {
    type Err = std::num::ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Identifier the decryption oracle assigns to a request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req:{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_ids_enumerate_from_one() {
        let ids: Vec<u64> = BatchId::new(3).up_to().map(|b| b.value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(BatchId::NONE.up_to().count(), 0);
    }

    #[test]
    fn batch_id_overflow_is_detected() {
        assert_eq!(BatchId::new(u64::MAX).next(), None);
        assert_eq!(BatchId::new(1).next(), Some(BatchId::new(2)));
    }

    #[test]
    fn parses_batch_id() {
        assert_eq!("7".parse::<BatchId>().unwrap(), BatchId::new(7));
        assert!("x".parse::<BatchId>().is_err());
    }
}
