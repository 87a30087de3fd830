//! # Wallet Event Loop
//!
//! Bridges the async world onto the single-threaded orchestrator:
//! events arrive on a channel and are handed to the wallet one at a
//! time, each processed to completion before the next.

use super::wallet::Wallet;
use crate::domain::{Amount, NodeEvent, PeerId, PeerMessage, WalletError};
use crate::ports::{Keychain, WalletNetwork};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Everything the host can feed into the wallet.
#[derive(Clone, Debug)]
pub enum WalletEvent {
    /// Start an outbound transfer.
    Transfer {
        /// Receiving peer.
        to: PeerId,
        /// Value in atomic units.
        amount: Amount,
    },
    /// A message arrived from a peer wallet.
    TxMessage {
        /// Originating peer.
        from: PeerId,
        /// The payload.
        message: PeerMessage,
    },
    /// A message arrived from the upstream node.
    NodeMessage(NodeEvent),
    /// A peer connection broke.
    ConnectionError(PeerId),
}

/// An event channel pair for wiring a [`WalletService`].
pub fn wallet_channel() -> (
    mpsc::UnboundedSender<WalletEvent>,
    mpsc::UnboundedReceiver<WalletEvent>,
) {
    mpsc::unbounded_channel()
}

/// Owns a [`Wallet`] and drains an event channel into it.
pub struct WalletService<K, N> {
    wallet: Wallet<K, N>,
    events: mpsc::UnboundedReceiver<WalletEvent>,
}

impl<K: Keychain, N: WalletNetwork> WalletService<K, N> {
    /// Wrap a wallet and its event source.
    pub fn new(wallet: Wallet<K, N>, events: mpsc::UnboundedReceiver<WalletEvent>) -> Self {
        Self { wallet, events }
    }

    /// Process events until every sender is gone, then hand the
    /// wallet back. Handler errors are contained: remote misbehavior
    /// must not take the loop down.
    pub async fn run(mut self) -> Wallet<K, N> {
        while let Some(event) = self.events.recv().await {
            if let Err(err) = self.dispatch(event).await {
                warn!("[wallet] event handling failed: {err}");
            }
        }
        debug!("[wallet] event channel closed, stopping");
        self.wallet
    }

    async fn dispatch(&mut self, event: WalletEvent) -> Result<(), WalletError> {
        match event {
            WalletEvent::Transfer { to, amount } => self.wallet.transfer_money(to, amount).await,
            WalletEvent::TxMessage { from, message } => {
                self.wallet.on_tx_message(from, message).await
            }
            WalletEvent::NodeMessage(message) => {
                let keep = self.wallet.on_node_message(message).await?;
                if !keep {
                    debug!("[wallet] node subscription dropped");
                }
                Ok(())
            }
            WalletEvent::ConnectionError(peer) => self.wallet.on_connection_error(peer).await,
        }
    }
}
