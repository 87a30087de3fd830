//! # Domain Value Objects
//!
//! Identifiers, chain-state handles, and the opaque cryptographic
//! values the transfer protocol carries around.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Value in atomic units.
pub type Amount = u64;

/// Block height.
pub type Height = u64;

/// Sentinel height meaning "not yet mature / unbounded".
pub const MAX_HEIGHT: Height = Height::MAX;

/// 32-byte digest.
pub type Hash256 = [u8; 32];

/// Accumulator root from a block header; UTXO presence proofs are
/// verified against it.
pub type ChainDefinition = Hash256;

/// Transaction identifier: 16 random bytes, generated by the
/// initiating wallet and echoed verbatim by the peer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TxId([u8; 16]);

impl TxId {
    /// Generate a fresh identifier from a uniform random source.
    pub fn generate() -> Self {
        Self(*Uuid::new_v4().as_bytes())
    }

    /// Wrap raw bytes (peer side: echo what the initiator sent).
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Raw byte view.
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        write!(f, "]")
    }
}

/// Network-layer handle for a connected peer wallet. Comparable for
/// equality only; the transport owns its meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// Chain tip identifier: height plus block hash.
///
/// "Newer" means strictly greater height, or the same height with a
/// differing hash (a reorganized tip).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStateId {
    /// Tip height.
    pub height: Height,
    /// Tip block hash.
    pub hash: Hash256,
}

impl SystemStateId {
    /// Create a state id.
    pub fn new(height: Height, hash: Hash256) -> Self {
        Self { height, hash }
    }

    /// Whether `self` supersedes `other` as a chain view.
    pub fn newer_than(&self, other: &SystemStateId) -> bool {
        self.height > other.height || (self.height == other.height && self.hash != other.hash)
    }
}

impl fmt::Display for SystemStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:02x}{:02x}{:02x}{:02x}",
            self.height, self.hash[0], self.hash[1], self.hash[2], self.hash[3]
        )
    }
}

/// Opaque secret scalar (key material, blinding factors, signatures).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scalar(pub Hash256);

/// Opaque group element: a value commitment or a public key/nonce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment(pub Hash256);

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0[..8] {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Transaction input: spends the UTXO behind `commitment`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// Commitment to the spent value.
    pub commitment: Commitment,
}

/// Transaction output: a newly created UTXO.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Commitment to the created value.
    pub commitment: Commitment,
}

/// One folding step of a UTXO presence proof path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    /// Sibling digest.
    pub hash: Hash256,
    /// True when the sibling sits on the right of the running digest.
    pub right: bool,
}

/// Proof that a UTXO is present in the chain state identified by a
/// [`ChainDefinition`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoProof {
    /// Height at which the proven output becomes spendable.
    pub maturity: Height,
    /// Path folding the output leaf up to the definition root.
    pub path: Vec<ProofStep>,
}

/// Render an amount as whole coins plus atomic units for logs.
pub struct DisplayAmount {
    /// Value in atomic units.
    pub value: Amount,
    /// Atomic units per whole coin.
    pub coin_unit: Amount,
}

impl DisplayAmount {
    /// Pair a value with the chain's coin denomination.
    pub fn new(value: Amount, coin_unit: Amount) -> Self {
        Self { value, coin_unit }
    }
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.value / self.coin_unit;
        let rest = self.value % self.coin_unit;
        if whole > 0 {
            write!(f, "{whole} coins")?;
            if rest > 0 {
                write!(f, " ")?;
            }
        }
        if rest > 0 || whole == 0 {
            write!(f, "{rest} units")?;
        }
        Ok(())
    }
}
