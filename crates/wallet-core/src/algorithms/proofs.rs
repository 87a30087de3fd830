//! # UTXO Presence Proofs
//!
//! A proof folds the proven output's leaf digest through a sibling
//! path; the result must equal the chain definition from the block
//! header under which the proof was requested.

use crate::domain::{ChainDefinition, Hash256, Height, Input, UtxoProof};
use sha3::{Digest, Sha3_256};

fn hash_pair(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut hasher = Sha3_256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

fn leaf_digest(input: &Input, maturity: Height) -> Hash256 {
    let mut hasher = Sha3_256::new();
    hasher.update(b"wallet-core/utxo-leaf/v1");
    hasher.update(input.commitment.0);
    hasher.update(maturity.to_le_bytes());
    hasher.finalize().into()
}

/// Fold a proof up to its root.
pub fn proof_root(proof: &UtxoProof, input: &Input) -> ChainDefinition {
    let mut digest = leaf_digest(input, proof.maturity);
    for step in &proof.path {
        digest = if step.right {
            hash_pair(&digest, &step.hash)
        } else {
            hash_pair(&step.hash, &digest)
        };
    }
    digest
}

/// Whether `proof` places `input` inside the state identified by
/// `definition`.
pub fn verify_utxo_proof(proof: &UtxoProof, input: &Input, definition: &ChainDefinition) -> bool {
    proof_root(proof, input) == *definition
}
