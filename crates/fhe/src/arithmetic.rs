// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use alloy::primitives::{keccak256, B256};
use anyhow::Result;
use hush_utils::ArcBytes;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

/// Opaque encrypted integer. The bytes are only meaningful to the adapter that produced them.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncryptedHandle(ArcBytes);

impl EncryptedHandle {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(ArcBytes::from_bytes(bytes))
    }

    pub fn bytes(&self) -> &ArcBytes {
        &self.0
    }

    pub fn size_bytes(&self) -> usize {
        self.0.size_bytes()
    }
}

impl From<Vec<u8>> for EncryptedHandle {
    fn from(value: Vec<u8>) -> Self {
        Self::from_bytes(value)
    }
}

impl fmt::Debug for EncryptedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedHandle({} bytes)", self.size_bytes())
    }
}

/// Reference to a ciphertext in the form handed to a decryption oracle.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CiphertextRef(ArcBytes);

impl CiphertextRef {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(ArcBytes::from_bytes(bytes))
    }

    pub fn bytes(&self) -> &ArcBytes {
        &self.0
    }

    pub fn digest(&self) -> B256 {
        keccak256(&*self.0)
    }
}

impl fmt::Debug for CiphertextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CiphertextRef({})", self.digest())
    }
}

/// Additive encrypted arithmetic. Every operation is a pure function over handles; callers own
/// persistence of the returned handle. Implementations never expose plaintext.
pub trait EncryptedArithmetic: Send + Sync + 'static {
    /// Fresh encryption of zero.
    fn zero(&self) -> Result<EncryptedHandle>;

    /// Encrypt a plaintext constant.
    fn encode(&self, value: u32) -> Result<EncryptedHandle>;

    /// Homomorphic sum of two handles.
    fn add(&self, a: &EncryptedHandle, b: &EncryptedHandle) -> Result<EncryptedHandle>;

    /// Deterministic export of a handle for decryption.
    fn export_ref(&self, handle: &EncryptedHandle) -> Result<CiphertextRef>;

    /// Check that caller supplied bytes form a handle this adapter can compute on.
    fn validate(&self, handle: &EncryptedHandle) -> Result<()>;

    /// `handle + constant`.
    fn add_constant(&self, handle: &EncryptedHandle, value: u32) -> Result<EncryptedHandle> {
        let constant = self.encode(value)?;
        self.add(handle, &constant)
    }
}

pub type SharedArithmetic = Arc<dyn EncryptedArithmetic>;

/// Holder of decryption capability. Only oracle adapters own one of these.
pub trait Decryptor: Send + Sync + 'static {
    fn decrypt(&self, ciphertext: &CiphertextRef) -> Result<u64>;
}

pub type SharedDecryptor = Arc<dyn Decryptor>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_depends_only_on_bytes() {
        let a = CiphertextRef::from_bytes(vec![1, 2, 3]);
        let b = CiphertextRef::from_bytes(vec![1, 2, 3]);
        let c = CiphertextRef::from_bytes(vec![1, 2, 4]);
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), c.digest());
    }

    #[test]
    fn handle_debug_does_not_dump_bytes() {
        let handle = EncryptedHandle::from_bytes(vec![0xde, 0xad]);
        assert_eq!(format!("{:?}", handle), "EncryptedHandle(2 bytes)");
    }
}
