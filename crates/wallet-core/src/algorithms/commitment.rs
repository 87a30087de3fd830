//! # Commitments and Signature Material
//!
//! The protocol treats all group arithmetic as opaque 32-byte values;
//! this module derives them deterministically with SHA3-256. The
//! generator table is built exactly once per process and every
//! derivation goes through it, so constructing a wallet requires the
//! one-time initialization to have run.

use crate::domain::{Amount, Commitment, Hash256, Scalar, TxId};
use rand::RngCore;
use sha3::{Digest, Sha3_256};
use std::sync::OnceLock;

/// Domain separation tags for the derivations below.
const TAG_GENERATOR: &[u8] = b"wallet-core/generator/v1";
const TAG_COMMIT: &[u8] = b"wallet-core/commit/v1";
const TAG_POINT: &[u8] = b"wallet-core/point/v1";
const TAG_SIGNATURE: &[u8] = b"wallet-core/partial-sig/v1";
const TAG_COMBINE: &[u8] = b"wallet-core/combine/v1";

static GENERATOR: OnceLock<Hash256> = OnceLock::new();

fn generator() -> &'static Hash256 {
    GENERATOR.get_or_init(|| {
        let mut hasher = Sha3_256::new();
        hasher.update(TAG_GENERATOR);
        hasher.finalize().into()
    })
}

/// Run the process-wide cryptographic initialization. Idempotent;
/// called by the wallet constructor.
pub fn ensure_initialized() {
    let _ = generator();
}

fn digest(parts: &[&[u8]]) -> Hash256 {
    let mut hasher = Sha3_256::new();
    hasher.update(generator());
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Commitment to `amount` under the blinding key `key`.
pub fn commit(key: &Scalar, amount: Amount) -> Commitment {
    Commitment(digest(&[TAG_COMMIT, &key.0, &amount.to_le_bytes()]))
}

/// Public counterpart of a secret scalar.
pub fn public_point(secret: &Scalar) -> Commitment {
    Commitment(digest(&[TAG_POINT, &secret.0]))
}

/// A uniformly random secret scalar.
pub fn random_scalar() -> Scalar {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    Scalar(bytes)
}

/// One party's partial signature over a transfer, bound to the
/// transfer id and fee.
pub fn partial_signature(excess: &Scalar, nonce: &Scalar, tx_id: &TxId, fee: Amount) -> Scalar {
    Scalar(digest(&[
        TAG_SIGNATURE,
        &excess.0,
        &nonce.0,
        tx_id.as_bytes(),
        &fee.to_le_bytes(),
    ]))
}

/// Fold two partial signatures into the aggregate carried by the
/// registered transaction.
pub fn combine_signatures(sender: &Scalar, receiver: &Scalar) -> Scalar {
    Scalar(digest(&[TAG_COMBINE, &sender.0, &receiver.0]))
}
