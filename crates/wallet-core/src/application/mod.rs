//! # Application Layer
//!
//! The wallet orchestrator, the two per-transfer state machines it
//! owns, and the event loop that feeds it.
//!
//! The state machines never call outward themselves. Each event
//! produces a list of [`TxAction`] effects which the orchestrator
//! executes; that keeps the FSM ↔ orchestrator relation acyclic.

pub mod addresses;
pub mod receiver;
pub mod sender;
pub mod service;
pub mod wallet;

pub use addresses::{bootstrap_default_address, generate_address};
pub use receiver::{Receiver, ReceiverEvent, ReceiverState};
pub use sender::{Sender, SenderEvent, SenderState};
pub use service::{wallet_channel, WalletEvent, WalletService};
pub use wallet::{TxCompletedAction, Wallet};

use crate::domain::{ConfirmInvitation, ConfirmTransaction, InviteReceiver, Transaction};

/// Effect emitted by a transfer state machine for the orchestrator to
/// execute. The transfer id is implicit: the orchestrator knows which
/// machine it is driving.
#[derive(Clone, Debug)]
pub enum TxAction {
    /// Send the opening invitation to the peer.
    SendInvitation(InviteReceiver),
    /// Send the receiver's acceptance back to the initiator.
    SendInvitationAck(ConfirmInvitation),
    /// Send the sender's closing confirmation to the peer.
    SendConfirmation(ConfirmTransaction),
    /// Submit the negotiated transaction to the node.
    RegisterTransaction(Transaction),
    /// Tell the peer the chain accepted the transaction.
    NotifyRegistered,
    /// Tell the peer the transfer is dead.
    NotifyFailed,
    /// The machine reached a terminal state; release it.
    Complete,
}
