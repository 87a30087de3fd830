//! # Sender State Machine
//!
//! Drives the initiator side of a two-party transfer: lock inputs,
//! invite the peer, fold signatures, register the transaction.

use super::TxAction;
use crate::algorithms::{
    combine_signatures, commit, partial_signature, public_point, random_scalar, select_coins,
};
use crate::domain::{
    Amount, Coin, CoinStatus, ConfirmInvitation, ConfirmTransaction, Input, InviteReceiver,
    KeyType, Output, Scalar, Transaction, TxId, WalletError,
};
use crate::ports::Keychain;
use tracing::{debug, error};

/// Sender lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SenderState {
    /// Constructed, not yet started.
    Init,
    /// Invitation sent; waiting for the receiver's acceptance.
    AwaitInvitationAck,
    /// Transaction submitted; waiting for the chain's verdict.
    AwaitRegistration,
    /// Transfer registered.
    Completed,
    /// Transfer dead.
    Failed,
}

/// Events the orchestrator feeds into a sender.
#[derive(Clone, Debug)]
pub enum SenderEvent {
    /// Begin the transfer.
    Start,
    /// The receiver accepted and co-signed.
    InvitationAccepted(ConfirmInvitation),
    /// The chain accepted the registered transaction.
    RegistrationSucceeded,
    /// The transfer failed (peer, node, or connection).
    Failed,
}

/// Initiator-side state machine for one outbound transfer.
pub struct Sender {
    tx_id: TxId,
    amount: Amount,
    fee: Amount,
    state: SenderState,
    blinding_excess: Scalar,
    nonce: Scalar,
    invite: Option<InviteReceiver>,
}

impl Sender {
    /// A sender in its initial state.
    pub fn new(tx_id: TxId, amount: Amount, fee: Amount) -> Self {
        Self {
            tx_id,
            amount,
            fee,
            state: SenderState::Init,
            blinding_excess: random_scalar(),
            nonce: random_scalar(),
            invite: None,
        }
    }

    /// Transfer id this machine owns.
    pub fn tx_id(&self) -> TxId {
        self.tx_id
    }

    /// Current state.
    pub fn state(&self) -> SenderState {
        self.state
    }

    fn is_terminal(&self) -> bool {
        matches!(self.state, SenderState::Completed | SenderState::Failed)
    }

    /// Process one event, returning the effects to execute.
    pub fn process_event(
        &mut self,
        event: SenderEvent,
        keychain: &dyn Keychain,
    ) -> Result<Vec<TxAction>, WalletError> {
        match event {
            SenderEvent::Start => self.on_start(keychain),
            SenderEvent::InvitationAccepted(data) => self.on_invitation_accepted(data),
            SenderEvent::RegistrationSucceeded => self.on_registration_succeeded(),
            SenderEvent::Failed => Ok(self.on_failed()),
        }
    }

    fn on_start(&mut self, keychain: &dyn Keychain) -> Result<Vec<TxAction>, WalletError> {
        if self.state != SenderState::Init {
            debug!("[sender] duplicate start for {}, ignoring", self.tx_id);
            return Ok(vec![]);
        }

        let mut available = Vec::new();
        keychain.visit(&mut |coin| {
            if coin.is_spendable() {
                available.push(coin.clone());
            }
            true
        })?;

        let required = self.amount + self.fee;
        let Some(selection) = select_coins(&available, required) else {
            let err = WalletError::InsufficientFunds {
                available: available.iter().map(|c| c.amount).sum(),
                required,
            };
            error!("[sender] cannot fund {}: {err}", self.tx_id);
            self.state = SenderState::Failed;
            // Nothing went out yet, so there is no peer to notify.
            return Ok(vec![TxAction::Complete]);
        };

        let height = keychain.current_height()?;

        let mut locked = selection.coins;
        for coin in &mut locked {
            coin.status = CoinStatus::Locked;
            coin.locked_height = height;
            coin.spent_tx_id = Some(self.tx_id);
        }
        keychain.update(&locked)?;

        let inputs: Vec<Input> = locked
            .iter()
            .map(|coin| Input {
                commitment: commit(&keychain.calc_key(coin), coin.amount),
            })
            .collect();

        let mut change = Vec::new();
        if selection.change > 0 {
            let mut change_coin = Coin::new(selection.change, KeyType::Regular, height);
            change_coin.create_tx_id = Some(self.tx_id);
            keychain.store(&mut change_coin)?;
            change.push(Output {
                commitment: commit(&keychain.calc_key(&change_coin), change_coin.amount),
            });
        }

        let invite = InviteReceiver {
            tx_id: self.tx_id,
            amount: self.amount,
            fee: self.fee,
            min_height: height,
            inputs,
            change,
            sender_public_excess: public_point(&self.blinding_excess),
            sender_public_nonce: public_point(&self.nonce),
        };
        self.invite = Some(invite.clone());
        self.state = SenderState::AwaitInvitationAck;
        debug!("[sender] inviting receiver for {}", self.tx_id);
        Ok(vec![TxAction::SendInvitation(invite)])
    }

    fn on_invitation_accepted(
        &mut self,
        data: ConfirmInvitation,
    ) -> Result<Vec<TxAction>, WalletError> {
        if self.state != SenderState::AwaitInvitationAck {
            debug!(
                "[sender] unexpected invitation ack for {} in {:?}",
                self.tx_id, self.state
            );
            return Ok(vec![]);
        }
        let Some(invite) = self.invite.take() else {
            return Err(WalletError::InvariantViolated(format!(
                "{} accepted without an invitation",
                self.tx_id
            )));
        };

        let sender_signature =
            partial_signature(&self.blinding_excess, &self.nonce, &self.tx_id, self.fee);
        let signature = combine_signatures(&sender_signature, &data.receiver_signature);

        let mut outputs = invite.change.clone();
        outputs.extend(data.outputs);
        let transaction = Transaction {
            tx_id: self.tx_id,
            fee: self.fee,
            min_height: invite.min_height,
            inputs: invite.inputs,
            outputs,
            signature,
        };

        self.state = SenderState::AwaitRegistration;
        debug!("[sender] confirming and registering {}", self.tx_id);
        Ok(vec![
            TxAction::SendConfirmation(ConfirmTransaction {
                tx_id: self.tx_id,
                sender_signature,
            }),
            TxAction::RegisterTransaction(transaction),
        ])
    }

    fn on_registration_succeeded(&mut self) -> Result<Vec<TxAction>, WalletError> {
        if self.state != SenderState::AwaitRegistration {
            debug!(
                "[sender] unexpected registration result for {} in {:?}",
                self.tx_id, self.state
            );
            return Ok(vec![]);
        }
        self.state = SenderState::Completed;
        debug!("[sender] {} completed", self.tx_id);
        Ok(vec![TxAction::NotifyRegistered, TxAction::Complete])
    }

    fn on_failed(&mut self) -> Vec<TxAction> {
        if self.is_terminal() {
            debug!("[sender] duplicate terminal event for {}", self.tx_id);
            return vec![];
        }
        self.state = SenderState::Failed;
        debug!("[sender] {} failed", self.tx_id);
        vec![TxAction::NotifyFailed, TxAction::Complete]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockKeychain;

    fn funded_keychain(amounts: &[Amount]) -> MockKeychain {
        let keychain = MockKeychain::new();
        keychain.set_height(10);
        for amount in amounts {
            let mut coin = Coin::new(*amount, KeyType::Regular, 1);
            coin.status = CoinStatus::Unspent;
            keychain.add_coin(coin);
        }
        keychain
    }

    fn accepted(tx_id: TxId) -> ConfirmInvitation {
        ConfirmInvitation {
            tx_id,
            outputs: vec![Output {
                commitment: crate::domain::Commitment([9u8; 32]),
            }],
            receiver_public_excess: crate::domain::Commitment([1u8; 32]),
            receiver_public_nonce: crate::domain::Commitment([2u8; 32]),
            receiver_signature: Scalar([3u8; 32]),
        }
    }

    #[test]
    fn test_start_locks_inputs_and_invites() {
        let keychain = funded_keychain(&[60, 70]);
        let tx_id = TxId::generate();
        let mut sender = Sender::new(tx_id, 100, 0);

        let actions = sender.process_event(SenderEvent::Start, &keychain).unwrap();
        assert_eq!(sender.state(), SenderState::AwaitInvitationAck);
        assert_eq!(actions.len(), 1);
        let TxAction::SendInvitation(invite) = &actions[0] else {
            panic!("expected invitation");
        };
        assert_eq!(invite.amount, 100);
        assert_eq!(invite.inputs.len(), 2);
        assert_eq!(invite.change.len(), 1);

        let coins = keychain.coins();
        let locked: Vec<_> = coins
            .iter()
            .filter(|c| c.status == CoinStatus::Locked)
            .collect();
        assert_eq!(locked.len(), 2);
        assert!(locked.iter().all(|c| c.spent_tx_id == Some(tx_id)));
        // change coin 30, unconfirmed
        let change: Vec<_> = coins
            .iter()
            .filter(|c| c.status == CoinStatus::Unconfirmed)
            .collect();
        assert_eq!(change.len(), 1);
        assert_eq!(change[0].amount, 30);
        assert_eq!(change[0].create_tx_id, Some(tx_id));
    }

    #[test]
    fn test_start_without_funds_fails_silently_to_peer() {
        let keychain = funded_keychain(&[10]);
        let mut sender = Sender::new(TxId::generate(), 100, 0);
        let actions = sender.process_event(SenderEvent::Start, &keychain).unwrap();
        assert_eq!(sender.state(), SenderState::Failed);
        assert!(matches!(actions.as_slice(), [TxAction::Complete]));
    }

    #[test]
    fn test_acceptance_confirms_and_registers() {
        let keychain = funded_keychain(&[100]);
        let tx_id = TxId::generate();
        let mut sender = Sender::new(tx_id, 100, 0);
        sender.process_event(SenderEvent::Start, &keychain).unwrap();

        let actions = sender
            .process_event(SenderEvent::InvitationAccepted(accepted(tx_id)), &keychain)
            .unwrap();
        assert_eq!(sender.state(), SenderState::AwaitRegistration);
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], TxAction::SendConfirmation(_)));
        let TxAction::RegisterTransaction(tx) = &actions[1] else {
            panic!("expected registration");
        };
        assert_eq!(tx.tx_id, tx_id);
        assert_eq!(tx.inputs.len(), 1);
        // receiver output only, no change for an exact amount
        assert_eq!(tx.outputs.len(), 1);
    }

    #[test]
    fn test_registration_success_completes() {
        let keychain = funded_keychain(&[100]);
        let tx_id = TxId::generate();
        let mut sender = Sender::new(tx_id, 100, 0);
        sender.process_event(SenderEvent::Start, &keychain).unwrap();
        sender
            .process_event(SenderEvent::InvitationAccepted(accepted(tx_id)), &keychain)
            .unwrap();

        let actions = sender
            .process_event(SenderEvent::RegistrationSucceeded, &keychain)
            .unwrap();
        assert_eq!(sender.state(), SenderState::Completed);
        assert!(matches!(
            actions.as_slice(),
            [TxAction::NotifyRegistered, TxAction::Complete]
        ));
    }

    #[test]
    fn test_failure_notifies_peer_once() {
        let keychain = funded_keychain(&[100]);
        let mut sender = Sender::new(TxId::generate(), 100, 0);
        sender.process_event(SenderEvent::Start, &keychain).unwrap();

        let actions = sender.process_event(SenderEvent::Failed, &keychain).unwrap();
        assert!(matches!(
            actions.as_slice(),
            [TxAction::NotifyFailed, TxAction::Complete]
        ));

        // duplicate terminal events are dropped
        let again = sender.process_event(SenderEvent::Failed, &keychain).unwrap();
        assert!(again.is_empty());
    }

    #[test]
    fn test_out_of_order_events_are_dropped() {
        let keychain = funded_keychain(&[100]);
        let tx_id = TxId::generate();
        let mut sender = Sender::new(tx_id, 100, 0);
        // registration result before start
        let actions = sender
            .process_event(SenderEvent::RegistrationSucceeded, &keychain)
            .unwrap();
        assert!(actions.is_empty());
        assert_eq!(sender.state(), SenderState::Init);
    }
}
