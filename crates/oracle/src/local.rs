// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::sign_decryption;
use actix::{Actor, Context, Handler, Message, Recipient};
use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use anyhow::Result;
use hush_events::{BusHandle, ErrorDispatcher, LedgerErrorType, RequestId};
use hush_fhe::{CiphertextRef, SharedDecryptor};
use hush_ledger::{DecryptionCallback, DecryptionProof, OracleCredential};
use tracing::{error, info};

#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub struct DecryptionJob {
    pub request_id: RequestId,
    pub refs: Vec<CiphertextRef>,
}

/// In process decryption oracle. Holds the secret key and the signer keys and answers every
/// job with a signed callback.
pub struct LocalOracle {
    decryptor: SharedDecryptor,
    signers: Vec<PrivateKeySigner>,
    ledger: Address,
    callback: Recipient<DecryptionCallback>,
    credential: OracleCredential,
    bus: BusHandle,
}

impl Actor for LocalOracle {
    type Context = Context<Self>;
}

impl LocalOracle {
    pub fn new(
        decryptor: SharedDecryptor,
        signers: Vec<PrivateKeySigner>,
        ledger: Address,
        callback: Recipient<DecryptionCallback>,
        credential: OracleCredential,
        bus: BusHandle,
    ) -> Self {
        Self {
            decryptor,
            signers,
            ledger,
            callback,
            credential,
            bus,
        }
    }

    fn fulfil(&self, job: &DecryptionJob) -> Result<DecryptionCallback> {
        let cleartexts = job
            .refs
            .iter()
            .map(|r| self.decryptor.decrypt(r))
            .collect::<Result<Vec<u64>>>()?;
        let signatures = self
            .signers
            .iter()
            .map(|s| sign_decryption(s, &self.ledger, job.request_id, &cleartexts))
            .collect::<Result<Vec<_>>>()?;
        Ok(DecryptionCallback {
            credential: self.credential.clone(),
            request_id: job.request_id,
            cleartexts,
            proof: DecryptionProof::new(signatures),
        })
    }
}

impl Handler<DecryptionJob> for LocalOracle {
    type Result = ();
    fn handle(&mut self, msg: DecryptionJob, _: &mut Self::Context) -> Self::Result {
        match self.fulfil(&msg) {
            Ok(callback) => {
                info!(request_id = %msg.request_id, "Decryption fulfilled, calling back");
                self.callback.do_send(callback);
            }
            Err(e) => {
                error!(request_id = %msg.request_id, "Decryption job failed");
                self.bus.err(LedgerErrorType::Oracle, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SignerSetVerifier;
    use hush_fhe::{EncryptedArithmetic, PlainArithmetic, PlainDecryptor};
    use hush_ledger::ProofVerifier;
    use std::sync::Arc;

    #[actix::test]
    async fn callbacks_carry_a_verifiable_proof() -> Result<()> {
        let ledger = Address::repeat_byte(1);
        let signer = PrivateKeySigner::random();
        let oracle = LocalOracle::new(
            Arc::new(PlainDecryptor),
            vec![signer.clone()],
            ledger,
            CallbackSink.start().recipient(),
            OracleCredential::random(),
            BusHandle::start(),
        );
        let arith = PlainArithmetic::new();
        let job = DecryptionJob {
            request_id: RequestId::new(4),
            refs: vec![
                arith.export_ref(&arith.encrypt(10))?,
                arith.export_ref(&arith.encrypt(2))?,
            ],
        };

        let callback = oracle.fulfil(&job)?;
        assert_eq!(callback.cleartexts, vec![10, 2]);
        let verifier = SignerSetVerifier::new(ledger, [signer.address()], 1)?;
        verifier.verify(job.request_id, &callback.cleartexts, &callback.proof)?;
        Ok(())
    }

    struct CallbackSink;

    impl Actor for CallbackSink {
        type Context = Context<Self>;
    }

    impl Handler<DecryptionCallback> for CallbackSink {
        type Result = Result<(), hush_ledger::LedgerError>;
        fn handle(&mut self, _: DecryptionCallback, _: &mut Self::Context) -> Self::Result {
            Ok(())
        }
    }
}
