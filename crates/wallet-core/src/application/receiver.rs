//! # Receiver State Machine
//!
//! Responder side of a transfer: record the incoming coin, co-sign,
//! wait for the sender to register the transaction on chain.

use super::TxAction;
use crate::algorithms::{combine_signatures, commit, partial_signature, public_point, random_scalar};
use crate::domain::{
    Amount, Coin, ConfirmInvitation, ConfirmTransaction, InviteReceiver, KeyType, Output, Scalar,
    TxId, WalletError,
};
use crate::ports::Keychain;
use tracing::debug;

/// Receiver lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverState {
    /// Constructed from an invitation, not yet started.
    Init,
    /// Acceptance sent; waiting for the sender's confirmation.
    AwaitSenderConfirm,
    /// Waiting for the registration outcome relayed by the sender.
    AwaitRegistration,
    /// Transfer registered.
    Completed,
    /// Transfer dead.
    Failed,
}

/// Events the orchestrator feeds into a receiver.
#[derive(Clone, Debug)]
pub enum ReceiverEvent {
    /// Begin responding to the stored invitation.
    Start,
    /// The sender sent its closing confirmation.
    SenderConfirmed(ConfirmTransaction),
    /// The sender relayed a successful chain registration.
    RegistrationSucceeded,
    /// The transfer failed (peer, node, or connection).
    Failed,
}

/// Responder-side state machine for one inbound transfer.
pub struct Receiver {
    invite: InviteReceiver,
    state: ReceiverState,
    blinding_excess: Scalar,
    nonce: Scalar,
    signature: Scalar,
    aggregate: Option<Scalar>,
}

impl Receiver {
    /// A receiver built from a peer's invitation.
    pub fn new(invite: InviteReceiver) -> Self {
        Self {
            invite,
            state: ReceiverState::Init,
            blinding_excess: random_scalar(),
            nonce: random_scalar(),
            signature: Scalar::default(),
            aggregate: None,
        }
    }

    /// Transfer id this machine owns.
    pub fn tx_id(&self) -> TxId {
        self.invite.tx_id
    }

    /// Value being received.
    pub fn amount(&self) -> Amount {
        self.invite.amount
    }

    /// Current state.
    pub fn state(&self) -> ReceiverState {
        self.state
    }

    /// Aggregate signature, present once the sender has confirmed.
    pub fn aggregate_signature(&self) -> Option<Scalar> {
        self.aggregate
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, ReceiverState::Completed | ReceiverState::Failed)
    }

    /// Process one event, returning the effects to execute.
    pub fn process_event(
        &mut self,
        event: ReceiverEvent,
        keychain: &dyn Keychain,
    ) -> Result<Vec<TxAction>, WalletError> {
        match event {
            ReceiverEvent::Start => self.on_start(keychain),
            ReceiverEvent::SenderConfirmed(data) => Ok(self.on_sender_confirmed(data)),
            ReceiverEvent::RegistrationSucceeded => Ok(self.on_registration_succeeded()),
            ReceiverEvent::Failed => Ok(self.on_failed()),
        }
    }

    fn on_start(&mut self, keychain: &dyn Keychain) -> Result<Vec<TxAction>, WalletError> {
        if self.state != ReceiverState::Init {
            debug!("[receiver] duplicate start for {}, ignoring", self.tx_id());
            return Ok(vec![]);
        }

        let mut coin = Coin::new(self.invite.amount, KeyType::Regular, self.invite.min_height);
        coin.create_tx_id = Some(self.tx_id());
        keychain.store(&mut coin)?;

        let output = Output {
            commitment: commit(&keychain.calc_key(&coin), coin.amount),
        };
        self.signature = partial_signature(
            &self.blinding_excess,
            &self.nonce,
            &self.invite.tx_id,
            self.invite.fee,
        );

        let ack = ConfirmInvitation {
            tx_id: self.tx_id(),
            outputs: vec![output],
            receiver_public_excess: public_point(&self.blinding_excess),
            receiver_public_nonce: public_point(&self.nonce),
            receiver_signature: self.signature,
        };
        self.state = ReceiverState::AwaitSenderConfirm;
        debug!("[receiver] accepting invitation {}", self.tx_id());
        Ok(vec![TxAction::SendInvitationAck(ack)])
    }

    fn on_sender_confirmed(&mut self, data: ConfirmTransaction) -> Vec<TxAction> {
        if self.state != ReceiverState::AwaitSenderConfirm {
            debug!(
                "[receiver] unexpected sender confirmation for {} in {:?}",
                self.tx_id(),
                self.state
            );
            return vec![];
        }
        self.aggregate = Some(combine_signatures(&data.sender_signature, &self.signature));
        self.state = ReceiverState::AwaitRegistration;
        debug!(
            "[receiver] {} co-signed, awaiting chain registration",
            self.tx_id()
        );
        vec![]
    }

    fn on_registration_succeeded(&mut self) -> Vec<TxAction> {
        if self.state != ReceiverState::AwaitRegistration {
            debug!(
                "[receiver] unexpected registration result for {} in {:?}",
                self.tx_id(),
                self.state
            );
            return vec![];
        }
        self.state = ReceiverState::Completed;
        debug!("[receiver] {} completed", self.tx_id());
        vec![TxAction::Complete]
    }

    fn on_failed(&mut self) -> Vec<TxAction> {
        if self.is_terminal() {
            debug!("[receiver] duplicate terminal event for {}", self.tx_id());
            return vec![];
        }
        self.state = ReceiverState::Failed;
        debug!("[receiver] {} failed", self.tx_id());
        vec![TxAction::NotifyFailed, TxAction::Complete]
    }
}
