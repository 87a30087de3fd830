//! # Wire Messages
//!
//! Typed payloads exchanged with peer wallets and with the upstream
//! node. The transport encodes them; the core only sees these shapes.

use super::value_objects::{
    Amount, ChainDefinition, Commitment, Height, Input, Output, Scalar, SystemStateId, TxId,
    UtxoProof,
};
use serde::{Deserialize, Serialize};

/// Opening move of a transfer: the sender invites the peer to build
/// the receiving half of the transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteReceiver {
    /// Transfer identifier, generated by the sender.
    pub tx_id: TxId,
    /// Value to transfer, in atomic units.
    pub amount: Amount,
    /// Fee the sender is paying.
    pub fee: Amount,
    /// Chain height at which the sender built the transfer.
    pub min_height: Height,
    /// Inputs the sender is spending.
    pub inputs: Vec<Input>,
    /// The sender's change outputs.
    pub change: Vec<Output>,
    /// Sender's public blinding excess.
    pub sender_public_excess: Commitment,
    /// Sender's public signature nonce.
    pub sender_public_nonce: Commitment,
}

/// The receiver's reply: its output, public material, and partial
/// signature over the transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmInvitation {
    /// Transfer identifier, echoed from the invitation.
    pub tx_id: TxId,
    /// Outputs the receiver adds (its own incoming coin).
    pub outputs: Vec<Output>,
    /// Receiver's public blinding excess.
    pub receiver_public_excess: Commitment,
    /// Receiver's public signature nonce.
    pub receiver_public_nonce: Commitment,
    /// Receiver's partial signature.
    pub receiver_signature: Scalar,
}

/// The sender's closing confirmation carrying its partial signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmTransaction {
    /// Transfer identifier.
    pub tx_id: TxId,
    /// Sender's partial signature.
    pub sender_signature: Scalar,
}

/// Relayed outcome of the sender's chain registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRegistered {
    /// Transfer identifier.
    pub tx_id: TxId,
    /// True when the node accepted the transaction.
    pub value: bool,
}

/// Terminal failure notice for a transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxFailed {
    /// Transfer identifier.
    pub tx_id: TxId,
}

/// Messages exchanged between peer wallets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PeerMessage {
    /// Sender → receiver: open a transfer.
    InviteReceiver(InviteReceiver),
    /// Receiver → sender: accept and co-sign.
    ConfirmInvitation(ConfirmInvitation),
    /// Sender → receiver: final partial signature.
    ConfirmTransaction(ConfirmTransaction),
    /// Sender → receiver: chain registration outcome.
    TxRegistered(TxRegistered),
    /// Either side: the transfer is dead.
    TxFailed(TxFailed),
}

impl PeerMessage {
    /// The transfer a message belongs to.
    pub fn tx_id(&self) -> TxId {
        match self {
            PeerMessage::InviteReceiver(m) => m.tx_id,
            PeerMessage::ConfirmInvitation(m) => m.tx_id,
            PeerMessage::ConfirmTransaction(m) => m.tx_id,
            PeerMessage::TxRegistered(m) => m.tx_id,
            PeerMessage::TxFailed(m) => m.tx_id,
        }
    }
}

/// A fully negotiated transaction ready for node registration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transfer identifier.
    pub tx_id: TxId,
    /// Fee paid to the chain.
    pub fee: Amount,
    /// Earliest height at which the transaction is valid.
    pub min_height: Height,
    /// Spent inputs.
    pub inputs: Vec<Input>,
    /// Created outputs, both sides.
    pub outputs: Vec<Output>,
    /// Aggregate two-party signature.
    pub signature: Scalar,
}

/// Requests the core sends to the upstream node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeRequest {
    /// Submit a negotiated transaction for inclusion.
    NewTransaction {
        /// The transaction to register.
        transaction: Transaction,
    },
    /// Ask for rewards mined to this wallet above a height.
    GetMined {
        /// Lower bound, exclusive of already-known state.
        height: Height,
    },
    /// Ask for a presence proof of one UTXO.
    GetProofUtxo {
        /// The commitment being proven.
        input: Input,
        /// Minimum maturity of interest; zero means any.
        maturity: Height,
    },
}

/// Header summary delivered by the node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDescription {
    /// Tip this header describes.
    pub id: SystemStateId,
    /// Accumulator root for UTXO proofs at this tip.
    pub definition: ChainDefinition,
}

/// One entry of the node's mined list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinedEntry {
    /// Height of the mined block.
    pub height: Height,
    /// True when the block is on the active branch.
    pub active: bool,
    /// Fees collected by the block, in atomic units.
    pub fees: Amount,
}

/// Messages the node delivers to the core.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeEvent {
    /// Reply to a `NewTransaction` submission, in FIFO order.
    RegistrationResult {
        /// True when the transaction was accepted.
        value: bool,
    },
    /// A new chain tip was announced.
    NewTip {
        /// The announced tip.
        id: SystemStateId,
    },
    /// Header details for the announced tip.
    Header {
        /// Tip id plus proof definition.
        description: BlockDescription,
    },
    /// Blocks mined to this wallet.
    Mined {
        /// Mined list entries.
        entries: Vec<MinedEntry>,
    },
    /// Reply to a `GetProofUtxo`, in FIFO order. Empty proof list
    /// means the UTXO is not in the chain state.
    ProofUtxo {
        /// Zero or more presence proofs.
        proofs: Vec<UtxoProof>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some_invite(tx_id: TxId) -> InviteReceiver {
        InviteReceiver {
            tx_id,
            amount: 100,
            fee: 0,
            min_height: 5,
            inputs: vec![],
            change: vec![],
            sender_public_excess: Commitment([1u8; 32]),
            sender_public_nonce: Commitment([2u8; 32]),
        }
    }

    #[test]
    fn test_peer_message_tx_id() {
        let id = TxId::from_bytes([3u8; 16]);
        assert_eq!(PeerMessage::InviteReceiver(some_invite(id)).tx_id(), id);
        assert_eq!(
            PeerMessage::TxFailed(TxFailed { tx_id: id }).tx_id(),
            id
        );
        assert_eq!(
            PeerMessage::TxRegistered(TxRegistered { tx_id: id, value: true }).tx_id(),
            id
        );
    }
}
