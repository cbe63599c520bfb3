// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{BfvArithmetic, EncryptedHandle, PlainArithmetic};
use anyhow::Result;

/// Donor side encryption of amounts, matching whichever backend the ledger computes with.
#[derive(Clone)]
pub enum AmountEncryptor {
    Plain(PlainArithmetic),
    Bfv(BfvArithmetic),
}

impl AmountEncryptor {
    pub fn encrypt(&self, amount: u64) -> Result<EncryptedHandle> {
        match self {
            AmountEncryptor::Plain(arith) => Ok(arith.encrypt(amount)),
            AmountEncryptor::Bfv(arith) => arith.encrypt(amount),
        }
    }
}
