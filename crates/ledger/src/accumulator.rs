// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::LedgerError;
use hush_fhe::{CiphertextRef, EncryptedHandle, SharedArithmetic};

/// Ledger facing wrapper over the encrypted arithmetic capability. Backend failures become
/// `Internal` errors, malformed caller input becomes `InvalidArgument`.
#[derive(Clone)]
pub struct ConfidentialAccumulator {
    arith: SharedArithmetic,
}

impl ConfidentialAccumulator {
    pub fn new(arith: SharedArithmetic) -> Self {
        Self { arith }
    }

    pub fn zero(&self) -> Result<EncryptedHandle, LedgerError> {
        self.arith.zero().map_err(LedgerError::internal)
    }

    pub fn add_constant(
        &self,
        handle: &EncryptedHandle,
        constant: u32,
    ) -> Result<EncryptedHandle, LedgerError> {
        self.arith
            .add_constant(handle, constant)
            .map_err(LedgerError::internal)
    }

    pub fn add_encrypted(
        &self,
        a: &EncryptedHandle,
        b: &EncryptedHandle,
    ) -> Result<EncryptedHandle, LedgerError> {
        self.arith.add(a, b).map_err(LedgerError::internal)
    }

    pub fn export_for_decryption(
        &self,
        handle: &EncryptedHandle,
    ) -> Result<CiphertextRef, LedgerError> {
        self.arith.export_ref(handle).map_err(LedgerError::internal)
    }

    /// Reject caller supplied ciphertexts the backend cannot compute on
    pub fn accept(&self, handle: &EncryptedHandle) -> Result<(), LedgerError> {
        self.arith
            .validate(handle)
            .map_err(|e| LedgerError::InvalidArgument(format!("malformed encrypted amount: {e}")))
    }
}
