// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CiphertextRef, Decryptor, EncryptedArithmetic, EncryptedHandle};
use anyhow::{anyhow, bail, Result};

const TAG: &[u8; 4] = b"PLN1";
const HANDLE_LEN: usize = TAG.len() + 8;

/// Arithmetic over tagged little endian integers. Behaves like the BFV adapter from the
/// ledger's point of view but is deterministic and fast, so it is what unit tests run against.
#[derive(Clone, Debug, Default)]
pub struct PlainArithmetic;

impl PlainArithmetic {
    pub fn new() -> Self {
        Self
    }

    /// Produce a handle for a donor supplied amount.
    pub fn encrypt(&self, value: u64) -> EncryptedHandle {
        to_handle(value)
    }
}

fn to_handle(value: u64) -> EncryptedHandle {
    let mut bytes = Vec::with_capacity(HANDLE_LEN);
    bytes.extend_from_slice(TAG);
    bytes.extend_from_slice(&value.to_le_bytes());
    EncryptedHandle::from_bytes(bytes)
}

fn from_bytes(bytes: &[u8]) -> Result<u64> {
    if bytes.len() != HANDLE_LEN || &bytes[..TAG.len()] != TAG {
        bail!("Not a plaintext handle ({} bytes)", bytes.len());
    }
    let mut value = [0u8; 8];
    value.copy_from_slice(&bytes[TAG.len()..]);
    Ok(u64::from_le_bytes(value))
}

impl EncryptedArithmetic for PlainArithmetic {
    fn zero(&self) -> Result<EncryptedHandle> {
        Ok(to_handle(0))
    }

    fn encode(&self, value: u32) -> Result<EncryptedHandle> {
        Ok(to_handle(value as u64))
    }

    fn add(&self, a: &EncryptedHandle, b: &EncryptedHandle) -> Result<EncryptedHandle> {
        let a = from_bytes(a.bytes())?;
        let b = from_bytes(b.bytes())?;
        let sum = a
            .checked_add(b)
            .ok_or_else(|| anyhow!("Plaintext accumulator overflow"))?;
        Ok(to_handle(sum))
    }

    fn export_ref(&self, handle: &EncryptedHandle) -> Result<CiphertextRef> {
        from_bytes(handle.bytes())?;
        Ok(CiphertextRef::from_bytes(handle.bytes().extract_bytes()))
    }

    fn validate(&self, handle: &EncryptedHandle) -> Result<()> {
        from_bytes(handle.bytes()).map(|_| ())
    }
}

#[derive(Clone, Debug, Default)]
pub struct PlainDecryptor;

impl Decryptor for PlainDecryptor {
    fn decrypt(&self, ciphertext: &CiphertextRef) -> Result<u64> {
        from_bytes(ciphertext.bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_foreign_handles() {
        let arith = PlainArithmetic::new();
        let bogus = EncryptedHandle::from_bytes(vec![1, 2, 3]);
        assert!(arith.validate(&bogus).is_err());
        assert!(arith.add(&bogus, &arith.zero().unwrap()).is_err());
        assert!(arith.export_ref(&bogus).is_err());
    }

    #[test]
    fn overflow_is_an_error() {
        let arith = PlainArithmetic::new();
        let max = arith.encrypt(u64::MAX);
        assert!(arith.add_constant(&max, 1).is_err());
    }

    #[test]
    fn export_is_deterministic() {
        let arith = PlainArithmetic::new();
        let handle = arith.encrypt(42);
        assert_eq!(
            arith.export_ref(&handle).unwrap(),
            arith.export_ref(&handle.clone()).unwrap()
        );
    }

    proptest! {
        #[test]
        fn sums_decrypt_to_the_plain_sum(values in proptest::collection::vec(0u32..1_000_000, 0..32)) {
            let arith = PlainArithmetic::new();
            let mut acc = arith.zero().unwrap();
            for v in &values {
                acc = arith.add(&acc, &arith.encode(*v).unwrap()).unwrap();
            }
            let out = PlainDecryptor.decrypt(&arith.export_ref(&acc).unwrap()).unwrap();
            prop_assert_eq!(out, values.iter().map(|v| *v as u64).sum::<u64>());
        }
    }
}
