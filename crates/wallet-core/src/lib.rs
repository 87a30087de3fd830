//! # Wallet Core
//!
//! Core of a confidential UTXO wallet: two-party transfer negotiation
//! plus a local coin set kept in sync with an upstream node.
//!
//! ## Purpose
//!
//! The wallet multiplexes many in-flight transfers through
//! per-transaction state machines, routes two asynchronous message
//! streams (peer wallets and the upstream node), and drives a
//! multi-phase chain-sync protocol that gates transfer progress on a
//! consistent chain view.
//!
//! ## Module Structure
//!
//! ```text
//! wallet-core/
//! ├── domain/          # Coin, addresses, wire messages, errors, invariants
//! ├── algorithms/      # Commitments, UTXO proofs, coin selection
//! ├── ports/           # API trait (inbound) + dependency traits (outbound)
//! ├── application/     # Wallet orchestrator, transfer FSMs, event loop
//! ├── adapters/        # Channel-backed network implementation
//! └── config.rs        # WalletConfig
//! ```
//!
//! Everything I/O-shaped sits behind a port: the durable coin store
//! (`Keychain`), the address keystore (`Keystore`), and the transport
//! (`WalletNetwork`). The orchestrator itself is single-threaded and
//! processes one inbound event to completion at a time.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::{ChannelNetwork, NetworkOp};
pub use application::{
    bootstrap_default_address, generate_address, wallet_channel, Receiver, ReceiverEvent,
    ReceiverState, Sender, SenderEvent, SenderState, TxAction, TxCompletedAction, Wallet,
    WalletEvent, WalletService,
};
pub use config::WalletConfig;
pub use domain::{
    Amount, ChainDefinition, Coin, CoinStatus, Commitment, DisplayAmount, Hash256, Height, Input,
    KeyType, Output, PeerId, Scalar, SystemStateId, TxId, UtxoProof, WalletAddress, WalletError,
    MAX_HEIGHT,
};
pub use domain::{
    BlockDescription, ConfirmInvitation, ConfirmTransaction, InviteReceiver, MinedEntry, NodeEvent,
    NodeRequest, PeerMessage, Transaction, TxFailed, TxRegistered,
};
pub use ports::{
    Keychain, Keystore, MockKeychain, MockKeystore, MockNetwork, WalletApi, WalletNetwork,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
