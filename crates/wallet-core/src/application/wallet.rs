//! # Wallet Orchestrator
//!
//! Owns the sender/receiver machines, routes inbound peer and node
//! messages, and drives the chain-sync protocol that gates transfer
//! startup on a consistent chain view.
//!
//! Single-threaded cooperative: every handler runs to completion on
//! the event loop, so keychain access and state mutation need no
//! locking here.

use super::receiver::{Receiver, ReceiverEvent};
use super::sender::{Sender, SenderEvent};
use super::TxAction;
use crate::algorithms::{commit, ensure_initialized, verify_utxo_proof};
use crate::config::WalletConfig;
use crate::domain::{
    Amount, BlockDescription, ChainDefinition, Coin, CoinStatus, ConfirmInvitation,
    ConfirmTransaction, DisplayAmount, Input, InviteReceiver, KeyType, MinedEntry, NodeEvent,
    NodeRequest, PeerId, PeerMessage, SystemStateId, Transaction, TxId, TxRegistered, UtxoProof,
    WalletError,
};
use crate::ports::{Keychain, WalletApi, WalletNetwork};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Callback fired once per transfer when it reaches a terminal state.
pub type TxCompletedAction = Box<dyn Fn(TxId) + Send + Sync>;

/// A proof request in flight, bound to the chain definition that was
/// current when it was issued.
struct PendingProof {
    coin: Coin,
    definition: Option<ChainDefinition>,
}

/// The wallet core.
///
/// Generic over the durable store and the transport so hosts and
/// tests can plug their own implementations.
pub struct Wallet<K, N> {
    keychain: Arc<K>,
    network: Arc<N>,
    config: WalletConfig,
    tx_completed_action: Option<TxCompletedAction>,

    senders: HashMap<TxId, Sender>,
    receivers: HashMap<TxId, Receiver>,
    peers: HashMap<TxId, PeerId>,
    by_peer: HashMap<PeerId, Vec<TxId>>,
    pending_senders: Vec<TxId>,
    pending_receivers: Vec<TxId>,
    removed_senders: Vec<Sender>,
    removed_receivers: Vec<Receiver>,

    node_requests: VecDeque<TxId>,
    pending_proofs: VecDeque<PendingProof>,

    syncing: u32,
    synchronized: bool,
    known_state_id: SystemStateId,
    new_state_id: SystemStateId,
    chain_definition: Option<ChainDefinition>,
}

impl<K: Keychain, N: WalletNetwork> Wallet<K, N> {
    /// Build a wallet over its dependencies. Loads the last committed
    /// chain state from the keychain; the wallet is unsynchronized
    /// until the first sync round completes.
    pub fn new(
        keychain: Arc<K>,
        network: Arc<N>,
        config: WalletConfig,
        tx_completed_action: Option<TxCompletedAction>,
    ) -> Result<Self, WalletError> {
        ensure_initialized();
        let known_state_id = keychain.system_state_id()?;
        debug!("[wallet] starting from state {known_state_id}");
        Ok(Self {
            keychain,
            network,
            config,
            tx_completed_action,
            senders: HashMap::new(),
            receivers: HashMap::new(),
            peers: HashMap::new(),
            by_peer: HashMap::new(),
            pending_senders: Vec::new(),
            pending_receivers: Vec::new(),
            removed_senders: Vec::new(),
            removed_receivers: Vec::new(),
            node_requests: VecDeque::new(),
            pending_proofs: VecDeque::new(),
            syncing: 0,
            synchronized: false,
            known_state_id,
            new_state_id: known_state_id,
            chain_definition: None,
        })
    }

    // -------------------------------------------------------------------------
    // Public operations
    // -------------------------------------------------------------------------

    /// Start an outbound transfer. The sender machine starts
    /// immediately when the wallet is synchronized and is parked
    /// until the next sync completion otherwise.
    pub async fn transfer_money(&mut self, to: PeerId, amount: Amount) -> Result<(), WalletError> {
        let result = self.transfer_money_inner(to, amount).await;
        self.drain_removed();
        result
    }

    /// Deliver a peer message.
    pub async fn on_tx_message(
        &mut self,
        from: PeerId,
        msg: PeerMessage,
    ) -> Result<(), WalletError> {
        let result = self.on_tx_message_inner(from, msg).await;
        self.drain_removed();
        result
    }

    /// Deliver a node message. Returns `false` when the node
    /// subscription should be dropped.
    pub async fn on_node_message(&mut self, msg: NodeEvent) -> Result<bool, WalletError> {
        let result = self.on_node_message_inner(msg).await;
        self.drain_removed();
        result
    }

    /// Report a broken peer connection: every transfer bound to that
    /// peer fails.
    pub async fn on_connection_error(&mut self, from: PeerId) -> Result<(), WalletError> {
        let result = self.on_connection_error_inner(from).await;
        self.drain_removed();
        result
    }

    /// Detach and disconnect the peer of a transfer, if any.
    pub async fn remove_peer(&mut self, tx_id: TxId) {
        if let Some(peer) = self.peers.remove(&tx_id) {
            if let Some(list) = self.by_peer.get_mut(&peer) {
                list.retain(|id| *id != tx_id);
                if list.is_empty() {
                    self.by_peer.remove(&peer);
                }
            }
            self.network.close_connection(peer).await;
        }
    }

    /// Re-encrypt the persistent stores under a new password.
    pub fn change_password(&self, new_password: &str) -> Result<(), WalletError> {
        self.keychain.change_password(new_password)
    }

    /// Snapshot of every coin the keychain holds.
    pub fn utxos(&self) -> Result<Vec<Coin>, WalletError> {
        let mut coins = Vec::new();
        self.keychain.visit(&mut |coin| {
            coins.push(coin.clone());
            true
        })?;
        Ok(coins)
    }

    /// The last chain state committed to the keychain.
    pub fn system_state(&self) -> SystemStateId {
        self.known_state_id
    }

    /// Whether the wallet has caught up with the last announced tip.
    pub fn is_synchronized(&self) -> bool {
        self.synchronized
    }

    /// Outstanding node replies needed to reach a consistent view.
    pub fn sync_in_flight(&self) -> u32 {
        self.syncing
    }

    /// Live transfers (either direction).
    pub fn active_transfers(&self) -> usize {
        self.senders.len() + self.receivers.len()
    }

    /// Transfers parked until synchronization completes.
    pub fn parked_transfers(&self) -> usize {
        self.pending_senders.len() + self.pending_receivers.len()
    }

    /// Transactions submitted to the node and not yet answered.
    pub fn pending_registrations(&self) -> usize {
        self.node_requests.len()
    }

    /// Proof requests sent to the node and not yet answered.
    pub fn pending_proof_requests(&self) -> usize {
        self.pending_proofs.len()
    }

    // -------------------------------------------------------------------------
    // Outbound effects
    // -------------------------------------------------------------------------

    /// Send a transfer invitation to its peer.
    pub async fn send_tx_invitation(&mut self, data: InviteReceiver) -> Result<(), WalletError> {
        self.send_to_peer(data.tx_id, PeerMessage::InviteReceiver(data))
            .await
    }

    /// Send the receiver's acceptance to its peer.
    pub async fn send_invitation_ack(
        &mut self,
        data: ConfirmInvitation,
    ) -> Result<(), WalletError> {
        self.send_to_peer(data.tx_id, PeerMessage::ConfirmInvitation(data))
            .await
    }

    /// Send the sender's closing confirmation to its peer.
    pub async fn send_tx_confirmation(
        &mut self,
        data: ConfirmTransaction,
    ) -> Result<(), WalletError> {
        self.send_to_peer(data.tx_id, PeerMessage::ConfirmTransaction(data))
            .await
    }

    /// Tell the peer of a transfer that the chain accepted it.
    pub async fn send_tx_registered(&mut self, tx_id: TxId) -> Result<(), WalletError> {
        self.send_to_peer(tx_id, PeerMessage::TxRegistered(TxRegistered { tx_id, value: true }))
            .await
    }

    /// Tell the peer of a transfer that it is dead.
    pub async fn send_tx_failed(&mut self, tx_id: TxId) -> Result<(), WalletError> {
        self.send_to_peer(
            tx_id,
            PeerMessage::TxFailed(crate::domain::TxFailed { tx_id }),
        )
        .await
    }

    /// Submit a negotiated transaction to the node. The reply arrives
    /// later as a [`NodeEvent::RegistrationResult`], paired FIFO.
    pub async fn register_tx(
        &mut self,
        tx_id: TxId,
        transaction: Transaction,
    ) -> Result<(), WalletError> {
        debug!("[wallet] sending {tx_id} for registration");
        self.node_requests.push_back(tx_id);
        self.network
            .send_node_message(NodeRequest::NewTransaction { transaction })
            .await
    }

    /// Release a terminal transfer: drop its machine and peer, fire
    /// the completion callback, and close the node connection when
    /// nothing else is outstanding.
    pub async fn on_tx_completed(&mut self, tx_id: TxId) {
        self.remove_sender(tx_id).await;
        self.remove_receiver(tx_id).await;
        if let Some(action) = &self.tx_completed_action {
            action(tx_id);
        }
        if self.node_requests.is_empty() && self.syncing == 0 {
            self.network.close_node_connection().await;
        }
    }

    async fn send_to_peer(&mut self, tx_id: TxId, msg: PeerMessage) -> Result<(), WalletError> {
        match self.peers.get(&tx_id) {
            Some(peer) => self.network.send_tx_message(*peer, msg).await,
            None => {
                debug!("[wallet] {tx_id} has no peer attached, dropping outbound message");
                Ok(())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Inbound peer messages
    // -------------------------------------------------------------------------

    async fn transfer_money_inner(
        &mut self,
        to: PeerId,
        amount: Amount,
    ) -> Result<(), WalletError> {
        let tx_id = TxId::generate();
        info!(
            "[sender] sending {} to {to}, tx {tx_id}",
            DisplayAmount::new(amount, self.config.coin_unit)
        );
        self.attach_peer(tx_id, to);
        self.senders
            .insert(tx_id, Sender::new(tx_id, amount, self.config.fee));
        if self.synchronized {
            self.drive_sender(tx_id, SenderEvent::Start).await
        } else {
            debug!("[sender] not synchronized yet, parking {tx_id}");
            self.pending_senders.push(tx_id);
            Ok(())
        }
    }

    async fn on_tx_message_inner(
        &mut self,
        from: PeerId,
        msg: PeerMessage,
    ) -> Result<(), WalletError> {
        match msg {
            PeerMessage::InviteReceiver(data) => self.handle_invite(from, data).await,
            PeerMessage::ConfirmInvitation(data) => self.handle_invitation_ack(data).await,
            PeerMessage::ConfirmTransaction(data) => {
                self.handle_sender_confirmation(from, data).await
            }
            PeerMessage::TxRegistered(data) => self.handle_peer_registered(from, data).await,
            PeerMessage::TxFailed(data) => {
                debug!("[wallet] tx {} failed", data.tx_id);
                self.handle_tx_failed(data.tx_id).await
            }
        }
    }

    async fn handle_invite(
        &mut self,
        from: PeerId,
        data: InviteReceiver,
    ) -> Result<(), WalletError> {
        let tx_id = data.tx_id;
        if self.receivers.contains_key(&tx_id) || self.senders.contains_key(&tx_id) {
            debug!("[receiver] unexpected tx invitation {tx_id}");
            return Ok(());
        }
        info!(
            "[receiver] received invitation {tx_id} for {}",
            DisplayAmount::new(data.amount, self.config.coin_unit)
        );
        self.attach_peer(tx_id, from);
        self.receivers.insert(tx_id, Receiver::new(data));
        if self.synchronized {
            self.drive_receiver(tx_id, ReceiverEvent::Start).await
        } else {
            debug!("[receiver] not synchronized yet, parking {tx_id}");
            self.pending_receivers.push(tx_id);
            Ok(())
        }
    }

    async fn handle_invitation_ack(&mut self, data: ConfirmInvitation) -> Result<(), WalletError> {
        let tx_id = data.tx_id;
        if self.senders.contains_key(&tx_id) {
            debug!("[sender] received invitation ack {tx_id}");
            self.drive_sender(tx_id, SenderEvent::InvitationAccepted(data))
                .await
        } else {
            debug!("[sender] unexpected invitation ack {tx_id}");
            Ok(())
        }
    }

    async fn handle_sender_confirmation(
        &mut self,
        from: PeerId,
        data: ConfirmTransaction,
    ) -> Result<(), WalletError> {
        let tx_id = data.tx_id;
        if self.receivers.contains_key(&tx_id) {
            debug!("[receiver] received sender confirmation {tx_id}");
            self.drive_receiver(tx_id, ReceiverEvent::SenderConfirmed(data))
                .await
        } else {
            // Stale peer or protocol violation; cut it loose.
            let err = WalletError::ProtocolViolation {
                peer: from,
                details: format!("confirmation for unknown tx {tx_id}"),
            };
            warn!("[receiver] {err}");
            self.network.close_connection(from).await;
            Ok(())
        }
    }

    async fn handle_peer_registered(
        &mut self,
        from: PeerId,
        data: TxRegistered,
    ) -> Result<(), WalletError> {
        match self.peers.get(&data.tx_id) {
            Some(peer) if *peer == from => self.handle_tx_registered(data.tx_id, data.value).await,
            _ => {
                debug!(
                    "[wallet] registration report for unknown tx {} from {from}",
                    data.tx_id
                );
                Ok(())
            }
        }
    }

    async fn handle_tx_registered(&mut self, tx_id: TxId, ok: bool) -> Result<(), WalletError> {
        debug!(
            "[wallet] tx {tx_id} {}",
            if ok { "registered" } else { "failed to register" }
        );
        if !ok {
            return self.handle_tx_failed(tx_id).await;
        }
        if self.receivers.contains_key(&tx_id) {
            return self
                .drive_receiver(tx_id, ReceiverEvent::RegistrationSucceeded)
                .await;
        }
        if self.senders.contains_key(&tx_id) {
            return self
                .drive_sender(tx_id, SenderEvent::RegistrationSucceeded)
                .await;
        }
        Ok(())
    }

    async fn handle_tx_failed(&mut self, tx_id: TxId) -> Result<(), WalletError> {
        if self.senders.contains_key(&tx_id) {
            return self.drive_sender(tx_id, SenderEvent::Failed).await;
        }
        if self.receivers.contains_key(&tx_id) {
            return self.drive_receiver(tx_id, ReceiverEvent::Failed).await;
        }
        Ok(())
    }

    async fn on_connection_error_inner(&mut self, from: PeerId) -> Result<(), WalletError> {
        let Some(tx_ids) = self.by_peer.get(&from).cloned() else {
            return Ok(());
        };
        warn!("[wallet] connection to {from} lost, failing {} transfer(s)", tx_ids.len());
        for tx_id in tx_ids {
            self.handle_tx_failed(tx_id).await?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Inbound node messages and chain sync
    // -------------------------------------------------------------------------

    async fn on_node_message_inner(&mut self, msg: NodeEvent) -> Result<bool, WalletError> {
        match msg {
            NodeEvent::RegistrationResult { value } => self.on_registration_result(value).await,
            NodeEvent::NewTip { id } => self.on_new_tip(id).await,
            NodeEvent::Header { description } => self.on_header(description).await,
            NodeEvent::Mined { entries } => self.on_mined(&entries).await,
            NodeEvent::ProofUtxo { proofs } => self.on_proof_utxo(&proofs).await,
        }
    }

    async fn on_registration_result(&mut self, ok: bool) -> Result<bool, WalletError> {
        let Some(tx_id) = self.node_requests.pop_front() else {
            warn!(
                "[wallet] {}",
                WalletError::UnexpectedNodeReply("tx registration confirmation")
            );
            debug_assert!(
                self.senders.is_empty() && self.receivers.is_empty(),
                "stray registration reply while transfers are live"
            );
            return Ok(false);
        };
        self.handle_tx_registered(tx_id, ok).await?;
        Ok(true)
    }

    async fn on_new_tip(&mut self, id: SystemStateId) -> Result<bool, WalletError> {
        // One slot for the header that follows every tip notice.
        self.syncing += 1;
        if id.newer_than(&self.known_state_id) {
            debug!("[wallet] new tip {id}, known state {}", self.known_state_id);
            self.new_state_id = id;
            self.synchronized = false;
            // And one for the mined list we ask for.
            self.syncing += 1;
            self.network
                .send_node_message(NodeRequest::GetMined {
                    height: self.known_state_id.height,
                })
                .await?;
        }
        Ok(true)
    }

    async fn on_header(&mut self, description: BlockDescription) -> Result<bool, WalletError> {
        self.chain_definition = Some(description.definition);

        let mut awaiting = Vec::new();
        self.keychain.visit(&mut |coin| {
            if matches!(coin.status, CoinStatus::Unconfirmed | CoinStatus::Locked) {
                awaiting.push(coin.clone());
            }
            true
        })?;
        self.request_utxo_proofs(awaiting).await?;

        self.new_state_id = description.id;
        self.finish_sync().await
    }

    async fn on_mined(&mut self, entries: &[MinedEntry]) -> Result<bool, WalletError> {
        let current_height = self.keychain.current_height()?;
        let mut mined = Vec::new();
        // Only rewards on the active branch that our committed state
        // has not already accounted for.
        for entry in entries {
            if entry.active && entry.height >= current_height {
                mined.push(Coin::mined(
                    self.config.coinbase_emission,
                    KeyType::Coinbase,
                    entry.height,
                ));
                if entry.fees > 0 {
                    mined.push(Coin::mined(entry.fees, KeyType::Commission, entry.height));
                }
            }
        }
        if !mined.is_empty() {
            debug!("[wallet] {} mined coin(s) to confirm", mined.len());
            self.request_utxo_proofs(mined).await?;
        }
        self.finish_sync().await
    }

    async fn on_proof_utxo(&mut self, proofs: &[UtxoProof]) -> Result<bool, WalletError> {
        let Some(pending) = self.pending_proofs.pop_front() else {
            warn!("[wallet] {}", WalletError::UnexpectedNodeReply("UTXO proof"));
            return Ok(false);
        };
        let PendingProof {
            mut coin,
            definition,
        } = pending;
        let input = Input {
            commitment: commit(&self.keychain.calc_key(&coin), coin.amount),
        };

        if proofs.is_empty() {
            warn!("[wallet] got empty proof for {}", input.commitment);
            if coin.status == CoinStatus::Locked {
                // The chain no longer knows this coin: it was spent.
                coin.status = CoinStatus::Spent;
                self.keychain.update(std::slice::from_ref(&coin))?;
            }
        } else {
            for proof in proofs {
                if coin.status != CoinStatus::Unconfirmed {
                    continue;
                }
                let Some(definition) = definition.as_ref() else {
                    warn!(
                        "[wallet] no chain definition for proof of {}, leaving unconfirmed",
                        input.commitment
                    );
                    continue;
                };
                if verify_utxo_proof(proof, &input, definition) {
                    debug!("[wallet] got proof for {}", input.commitment);
                    coin.status = CoinStatus::Unspent;
                    coin.maturity = proof.maturity;
                    coin.confirm_height = self.new_state_id.height;
                    coin.confirm_hash = self.new_state_id.hash;
                    match coin.key_type {
                        KeyType::Coinbase | KeyType::Commission => {
                            info!(
                                "[wallet] block reward received: {}",
                                DisplayAmount::new(coin.amount, self.config.coin_unit)
                            );
                            self.keychain.store(&mut coin)?;
                        }
                        KeyType::Regular => {
                            self.keychain.update(std::slice::from_ref(&coin))?;
                        }
                    }
                } else {
                    error!("[wallet] invalid proof provided for {}", input.commitment);
                }
            }
        }

        self.finish_sync().await
    }

    async fn request_utxo_proofs(&mut self, coins: Vec<Coin>) -> Result<(), WalletError> {
        for coin in coins {
            self.syncing += 1;
            let input = Input {
                commitment: commit(&self.keychain.calc_key(&coin), coin.amount),
            };
            debug!("[wallet] requesting proof for {}", input.commitment);
            self.pending_proofs.push_back(PendingProof {
                coin,
                definition: self.chain_definition,
            });
            self.network
                .send_node_message(NodeRequest::GetProofUtxo { input, maturity: 0 })
                .await?;
        }
        Ok(())
    }

    /// Account for one answered node reply. When the last one lands,
    /// commit the new state, release parked transfers, and flip to
    /// synchronized. Returns `false` when the node connection was
    /// closed because nothing more is wanted.
    async fn finish_sync(&mut self) -> Result<bool, WalletError> {
        if self.syncing > 0 {
            self.syncing -= 1;
            if self.syncing == 0 {
                self.keychain.set_system_state_id(self.new_state_id)?;
                self.known_state_id = self.new_state_id;
                info!("[wallet] synchronized at {}", self.known_state_id);

                let parked = std::mem::take(&mut self.pending_senders);
                for tx_id in parked {
                    self.drive_sender(tx_id, SenderEvent::Start).await?;
                }
                let parked = std::mem::take(&mut self.pending_receivers);
                for tx_id in parked {
                    self.drive_receiver(tx_id, ReceiverEvent::Start).await?;
                }
                self.synchronized = true;
            }
        }
        if self.syncing == 0 && self.node_requests.is_empty() {
            self.network.close_node_connection().await;
            return Ok(false);
        }
        Ok(true)
    }

    // -------------------------------------------------------------------------
    // Machine bookkeeping
    // -------------------------------------------------------------------------

    async fn drive_sender(&mut self, tx_id: TxId, event: SenderEvent) -> Result<(), WalletError> {
        let keychain = Arc::clone(&self.keychain);
        let actions = match self.senders.get_mut(&tx_id) {
            Some(sender) => sender.process_event(event, keychain.as_ref())?,
            None => return Ok(()),
        };
        self.run_actions(tx_id, actions).await
    }

    async fn drive_receiver(
        &mut self,
        tx_id: TxId,
        event: ReceiverEvent,
    ) -> Result<(), WalletError> {
        let keychain = Arc::clone(&self.keychain);
        let actions = match self.receivers.get_mut(&tx_id) {
            Some(receiver) => receiver.process_event(event, keychain.as_ref())?,
            None => return Ok(()),
        };
        self.run_actions(tx_id, actions).await
    }

    async fn run_actions(&mut self, tx_id: TxId, actions: Vec<TxAction>) -> Result<(), WalletError> {
        for action in actions {
            match action {
                TxAction::SendInvitation(data) => self.send_tx_invitation(data).await?,
                TxAction::SendInvitationAck(data) => self.send_invitation_ack(data).await?,
                TxAction::SendConfirmation(data) => self.send_tx_confirmation(data).await?,
                TxAction::RegisterTransaction(tx) => self.register_tx(tx_id, tx).await?,
                TxAction::NotifyRegistered => self.send_tx_registered(tx_id).await?,
                TxAction::NotifyFailed => self.send_tx_failed(tx_id).await?,
                TxAction::Complete => self.on_tx_completed(tx_id).await,
            }
        }
        Ok(())
    }

    fn attach_peer(&mut self, tx_id: TxId, peer: PeerId) {
        self.peers.insert(tx_id, peer);
        self.by_peer.entry(peer).or_default().push(tx_id);
    }

    async fn remove_sender(&mut self, tx_id: TxId) {
        if let Some(sender) = self.senders.remove(&tx_id) {
            self.remove_peer(tx_id).await;
            // Keep the machine alive until the current handler is done
            // with its stack; it may be the one that fired this event.
            self.removed_senders.push(sender);
        }
    }

    async fn remove_receiver(&mut self, tx_id: TxId) {
        if let Some(receiver) = self.receivers.remove(&tx_id) {
            self.remove_peer(tx_id).await;
            self.removed_receivers.push(receiver);
        }
    }

    /// Destroy machines staged for removal. Runs as the last step of
    /// every public entry point.
    fn drain_removed(&mut self) {
        #[cfg(debug_assertions)]
        {
            use crate::domain::registry_consistent;
            let senders = self.senders.keys().copied().collect();
            let receivers = self.receivers.keys().copied().collect();
            let peers = self.peers.keys().copied().collect();
            if let Err(err) = registry_consistent(&senders, &receivers, &peers) {
                panic!("{err}");
            }
        }
        self.removed_senders.clear();
        self.removed_receivers.clear();
    }
}

#[async_trait]
impl<K: Keychain, N: WalletNetwork> WalletApi for Wallet<K, N> {
    async fn transfer_money(&mut self, to: PeerId, amount: Amount) -> Result<(), WalletError> {
        Wallet::transfer_money(self, to, amount).await
    }

    async fn on_tx_message(&mut self, from: PeerId, msg: PeerMessage) -> Result<(), WalletError> {
        Wallet::on_tx_message(self, from, msg).await
    }

    async fn on_node_message(&mut self, msg: NodeEvent) -> Result<bool, WalletError> {
        Wallet::on_node_message(self, msg).await
    }

    async fn on_connection_error(&mut self, from: PeerId) -> Result<(), WalletError> {
        Wallet::on_connection_error(self, from).await
    }
}
