//! # Inbound Port
//!
//! What the host (event loop, bindings) may ask the wallet core to do.
//! One call per inbound event; each call runs to completion before
//! the next is made.

use crate::domain::{Amount, NodeEvent, PeerId, PeerMessage, WalletError};
use async_trait::async_trait;

/// Driving API of the wallet core.
#[async_trait]
pub trait WalletApi {
    /// Start an outbound transfer of `amount` to `to`.
    async fn transfer_money(&mut self, to: PeerId, amount: Amount) -> Result<(), WalletError>;

    /// Deliver a message received from a peer wallet.
    async fn on_tx_message(&mut self, from: PeerId, msg: PeerMessage) -> Result<(), WalletError>;

    /// Deliver a message received from the upstream node. Returns
    /// `false` when the node subscription should be dropped.
    async fn on_node_message(&mut self, msg: NodeEvent) -> Result<bool, WalletError>;

    /// Report a broken peer connection.
    async fn on_connection_error(&mut self, from: PeerId) -> Result<(), WalletError>;
}
