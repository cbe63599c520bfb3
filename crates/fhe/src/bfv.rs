// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{CiphertextRef, Decryptor, EncryptedArithmetic, EncryptedHandle, SharedRng};
use anyhow::{anyhow, bail, Context, Result};
use fhe::bfv::{BfvParameters, Ciphertext, Encoding, Plaintext, PublicKey, SecretKey};
use fhe_traits::{DeserializeParametrized, FheDecoder, FheDecrypter, FheEncoder, FheEncrypter, Serialize};
use std::sync::Arc;

/// BFV adapter holding only the public key. It can compute on ciphertexts but never decrypt them.
#[derive(Clone)]
pub struct BfvArithmetic {
    params: Arc<BfvParameters>,
    pk: PublicKey,
    rng: SharedRng,
}

impl BfvArithmetic {
    pub fn new(params: Arc<BfvParameters>, pk: PublicKey, rng: SharedRng) -> Self {
        Self { params, pk, rng }
    }

    pub fn from_public_key_bytes(
        params: Arc<BfvParameters>,
        public_key: &[u8],
        rng: SharedRng,
    ) -> Result<Self> {
        let pk = PublicKey::from_bytes(public_key, &params)
            .map_err(|e| anyhow!("Error deserializing public key: {e}"))?;
        Ok(Self::new(params, pk, rng))
    }

    pub fn params(&self) -> Arc<BfvParameters> {
        self.params.clone()
    }

    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.pk.to_bytes()
    }

    /// Client side encryption of a donation amount. Values at or above the plaintext modulus
    /// would silently wrap, so they are refused.
    pub fn encrypt(&self, value: u64) -> Result<EncryptedHandle> {
        let modulus = self.params.plaintext();
        if value >= modulus {
            bail!("Value {value} does not fit below the plaintext modulus {modulus}");
        }
        let pt = Plaintext::try_encode(&[value], Encoding::poly(), &self.params)
            .map_err(|e| anyhow!("Error encoding plaintext: {e}"))?;
        let ct = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| anyhow!("Shared rng lock poisoned"))?;
            self.pk
                .try_encrypt(&pt, &mut *rng)
                .map_err(|e| anyhow!("Error encrypting data: {e}"))?
        };
        Ok(EncryptedHandle::from_bytes(ct.to_bytes()))
    }

    fn parse(&self, handle: &EncryptedHandle) -> Result<Ciphertext> {
        Ciphertext::from_bytes(handle.bytes(), &self.params).context("Error deserializing ciphertext")
    }
}

impl EncryptedArithmetic for BfvArithmetic {
    fn zero(&self) -> Result<EncryptedHandle> {
        // A fresh encryption rather than Ciphertext::zero so the handle always serializes
        self.encrypt(0)
    }

    fn encode(&self, value: u32) -> Result<EncryptedHandle> {
        self.encrypt(value as u64)
    }

    fn add(&self, a: &EncryptedHandle, b: &EncryptedHandle) -> Result<EncryptedHandle> {
        let mut sum = self.parse(a)?;
        let rhs = self.parse(b)?;
        sum += &rhs;
        Ok(EncryptedHandle::from_bytes(sum.to_bytes()))
    }

    fn export_ref(&self, handle: &EncryptedHandle) -> Result<CiphertextRef> {
        let ct = self.parse(handle)?;
        Ok(CiphertextRef::from_bytes(ct.to_bytes()))
    }

    fn validate(&self, handle: &EncryptedHandle) -> Result<()> {
        self.parse(handle).map(|_| ())
    }
}

/// Secret key holder. Lives with the oracle, never with the ledger.
pub struct BfvDecryptor {
    params: Arc<BfvParameters>,
    sk: SecretKey,
}

impl BfvDecryptor {
    pub fn new(params: Arc<BfvParameters>, sk: SecretKey) -> Self {
        Self { params, sk }
    }
}

impl Decryptor for BfvDecryptor {
    fn decrypt(&self, ciphertext: &CiphertextRef) -> Result<u64> {
        let ct = Ciphertext::from_bytes(ciphertext.bytes(), &self.params)
            .context("Error deserializing ciphertext")?;
        let pt = self
            .sk
            .try_decrypt(&ct)
            .map_err(|e| anyhow!("Error decrypting ciphertext: {e}"))?;
        let decoded = Vec::<u64>::try_decode(&pt, Encoding::poly())
            .map_err(|e| anyhow!("Error decoding plaintext: {e}"))?;
        decoded
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Decoded plaintext was empty"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_bfv_params_arc, shared_rng_from_seed, BfvKeys};

    fn setup() -> Result<(BfvArithmetic, BfvDecryptor)> {
        let params = build_bfv_params_arc(2048, 1032193, &[0x3FFFFFFF000001])?;
        let rng = shared_rng_from_seed(7);
        let keys = BfvKeys::generate(params.clone(), &rng)?;
        Ok((keys.arithmetic(rng), keys.decryptor()))
    }

    #[test]
    fn accumulates_encrypted_values() -> Result<()> {
        let (arith, dec) = setup()?;
        let mut total = arith.zero()?;
        for v in [3u64, 2, 5] {
            total = arith.add(&total, &arith.encrypt(v)?)?;
        }
        let count = arith.add_constant(&arith.zero()?, 1)?;
        let count = arith.add_constant(&count, 1)?;

        assert_eq!(dec.decrypt(&arith.export_ref(&total)?)?, 10);
        assert_eq!(dec.decrypt(&arith.export_ref(&count)?)?, 2);
        Ok(())
    }

    #[test]
    fn refuses_values_that_would_wrap() -> Result<()> {
        let (arith, dec) = setup()?;
        assert!(arith.encrypt(1032193 + 5).is_err());
        assert!(arith.encrypt(1032193).is_err());
        assert!(arith.encrypt(u64::MAX).is_err());

        let largest = arith.encrypt(1032192)?;
        assert_eq!(dec.decrypt(&arith.export_ref(&largest)?)?, 1032192);
        assert!(arith.encode(u32::MAX).is_err());
        assert!(arith.add_constant(&largest, 1_048_576).is_err());
        Ok(())
    }

    #[test]
    fn export_is_stable_for_a_handle() -> Result<()> {
        let (arith, _) = setup()?;
        let handle = arith.encrypt(9)?;
        assert_eq!(arith.export_ref(&handle)?, arith.export_ref(&handle)?);
        Ok(())
    }

    #[test]
    fn rejects_garbage() -> Result<()> {
        let (arith, _) = setup()?;
        let garbage = EncryptedHandle::from_bytes(vec![9; 16]);
        assert!(arith.validate(&garbage).is_err());
        assert!(arith.add(&garbage, &arith.zero()?).is_err());
        Ok(())
    }
}
