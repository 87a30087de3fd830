//! # Algorithms
//!
//! Pure computation: commitment derivation, UTXO presence proof
//! verification, and input selection. No I/O, no ports.

pub mod coin_selection;
pub mod commitment;
pub mod proofs;

pub use coin_selection::{select_coins, Selection};
pub use commitment::{
    combine_signatures, commit, ensure_initialized, partial_signature, public_point, random_scalar,
};
pub use proofs::{proof_root, verify_utxo_proof};
