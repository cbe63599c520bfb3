// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::{BfvArithmetic, BfvDecryptor, SharedRng};
use anyhow::{anyhow, Context, Result};
use fhe::bfv::{BfvParameters, PublicKey, SecretKey};
use fhe_traits::{DeserializeParametrized, Serialize};
use serde::{Deserialize, Serialize as SerdeSerialize};
use std::{fs, path::Path, sync::Arc};
use tracing::info;

#[derive(SerdeSerialize, Deserialize)]
struct KeyFileData {
    coeffs: Box<[i64]>,
    public_key: Vec<u8>,
}

/// BFV key pair as written to the node key file.
#[derive(Clone)]
pub struct BfvKeys {
    params: Arc<BfvParameters>,
    sk: SecretKey,
    pk: PublicKey,
}

impl BfvKeys {
    pub fn generate(params: Arc<BfvParameters>, rng: &SharedRng) -> Result<Self> {
        let mut rng = rng.lock().map_err(|_| anyhow!("Shared rng lock poisoned"))?;
        let sk = SecretKey::random(&params, &mut *rng);
        let pk = PublicKey::new(&sk, &mut *rng);
        Ok(Self { params, sk, pk })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&KeyFileData {
            coeffs: self.sk.coeffs.clone(),
            public_key: self.pk.to_bytes(),
        })?)
    }

    pub fn from_bytes(bytes: &[u8], params: Arc<BfvParameters>) -> Result<Self> {
        let KeyFileData { coeffs, public_key } =
            bincode::deserialize(bytes).context("Malformed key file")?;
        let sk = SecretKey::new(coeffs.to_vec(), &params);
        let pk = PublicKey::from_bytes(&public_key, &params)
            .map_err(|e| anyhow!("Error deserializing public key: {e}"))?;
        Ok(Self { params, sk, pk })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        fs::write(path, self.to_bytes()?)
            .with_context(|| format!("Could not write key file {}", path.display()))?;
        info!("Wrote BFV key file to {}", path.display());
        Ok(())
    }

    pub fn read(path: &Path, params: Arc<BfvParameters>) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("Could not read key file {}", path.display()))?;
        Self::from_bytes(&bytes, params)
    }

    pub fn public_key_bytes(&self) -> Vec<u8> {
        self.pk.to_bytes()
    }

    pub fn arithmetic(&self, rng: SharedRng) -> BfvArithmetic {
        BfvArithmetic::new(self.params.clone(), self.pk.clone(), rng)
    }

    pub fn decryptor(&self) -> BfvDecryptor {
        BfvDecryptor::new(self.params.clone(), self.sk.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_bfv_params_arc, shared_rng_from_seed, Decryptor, EncryptedArithmetic};
    use tempfile::tempdir;

    #[test]
    fn key_file_survives_a_round_trip_to_disk() -> Result<()> {
        let params = build_bfv_params_arc(2048, 1032193, &[0x3FFFFFFF000001])?;
        let rng = shared_rng_from_seed(1);
        let keys = BfvKeys::generate(params.clone(), &rng)?;
        let dir = tempdir()?;
        let path = dir.path().join("keys").join("fhe.key");
        keys.write(&path)?;

        let loaded = BfvKeys::read(&path, params)?;
        assert_eq!(loaded.public_key_bytes(), keys.public_key_bytes());

        let arith = keys.arithmetic(rng);
        let ct = arith.encrypt(77)?;
        assert_eq!(loaded.decryptor().decrypt(&arith.export_ref(&ct)?)?, 77);
        Ok(())
    }
}
