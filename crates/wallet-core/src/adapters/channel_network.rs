//! Channel Network Adapter
//!
//! Implements [`WalletNetwork`] over an unbounded channel so a host
//! transport task can consume outbound traffic as a single ordered
//! stream.

use crate::domain::{NodeRequest, PeerId, PeerMessage, WalletError};
use crate::ports::WalletNetwork;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// One outbound operation, in the order the core produced it.
#[derive(Clone, Debug)]
pub enum NetworkOp {
    /// Deliver a message to a peer wallet.
    TxMessage {
        /// Destination peer.
        peer: PeerId,
        /// The payload.
        message: PeerMessage,
    },
    /// Deliver a request to the upstream node.
    NodeMessage(NodeRequest),
    /// Drop the connection to a peer.
    CloseConnection(PeerId),
    /// Drop the node connection.
    CloseNodeConnection,
}

/// Channel-backed [`WalletNetwork`].
pub struct ChannelNetwork {
    ops: mpsc::UnboundedSender<NetworkOp>,
}

impl ChannelNetwork {
    /// The adapter plus the stream of operations it will emit.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NetworkOp>) {
        let (ops, stream) = mpsc::unbounded_channel();
        (Self { ops }, stream)
    }

    fn push(&self, op: NetworkOp) -> Result<(), WalletError> {
        self.ops
            .send(op)
            .map_err(|_| WalletError::Network("transport task is gone".into()))
    }
}

#[async_trait]
impl WalletNetwork for ChannelNetwork {
    async fn send_tx_message(&self, peer: PeerId, msg: PeerMessage) -> Result<(), WalletError> {
        self.push(NetworkOp::TxMessage { peer, message: msg })
    }

    async fn send_node_message(&self, msg: NodeRequest) -> Result<(), WalletError> {
        self.push(NetworkOp::NodeMessage(msg))
    }

    async fn close_connection(&self, peer: PeerId) {
        let _ = self.push(NetworkOp::CloseConnection(peer));
    }

    async fn close_node_connection(&self) {
        let _ = self.push(NetworkOp::CloseNodeConnection);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TxFailed;

    #[tokio::test]
    async fn test_operations_preserve_order() {
        let (network, mut stream) = ChannelNetwork::new();
        let tx_id = crate::domain::TxId::generate();

        network
            .send_tx_message(PeerId(1), PeerMessage::TxFailed(TxFailed { tx_id }))
            .await
            .unwrap();
        network
            .send_node_message(NodeRequest::GetMined { height: 4 })
            .await
            .unwrap();
        network.close_node_connection().await;

        assert!(matches!(
            stream.recv().await,
            Some(NetworkOp::TxMessage { peer: PeerId(1), .. })
        ));
        assert!(matches!(
            stream.recv().await,
            Some(NetworkOp::NodeMessage(NodeRequest::GetMined { height: 4 }))
        ));
        assert!(matches!(
            stream.recv().await,
            Some(NetworkOp::CloseNodeConnection)
        ));
    }

    #[tokio::test]
    async fn test_send_fails_when_consumer_dropped() {
        let (network, stream) = ChannelNetwork::new();
        drop(stream);
        let res = network
            .send_node_message(NodeRequest::GetMined { height: 1 })
            .await;
        assert!(matches!(res, Err(WalletError::Network(_))));
    }
}
