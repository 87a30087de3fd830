//! # Domain Layer
//!
//! Core wallet types: identifiers, coins, wire messages, errors, and
//! the invariants the orchestrator maintains over them.

pub mod entities;
pub mod errors;
pub mod invariants;
pub mod messages;
pub mod value_objects;

pub use entities::{Coin, CoinStatus, KeyType, WalletAddress};
pub use errors::WalletError;
pub use invariants::{registry_consistent, status_transition_allowed};
pub use messages::{
    BlockDescription, ConfirmInvitation, ConfirmTransaction, InviteReceiver, MinedEntry, NodeEvent,
    NodeRequest, PeerMessage, Transaction, TxFailed, TxRegistered,
};
pub use value_objects::{
    Amount, ChainDefinition, Commitment, DisplayAmount, Hash256, Height, Input, Output, PeerId,
    ProofStep, Scalar, SystemStateId, TxId, UtxoProof, MAX_HEIGHT,
};
