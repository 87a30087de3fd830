//! # Outbound Ports
//!
//! Traits for the wallet's external dependencies: the durable coin
//! store, the address keystore, and the transport. Mock
//! implementations for testing live alongside the traits.

use crate::domain::{
    status_transition_allowed, Coin, Hash256, Height, KeyType, NodeRequest, PeerId, PeerMessage,
    Scalar, SystemStateId, WalletAddress, WalletError,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use sha3::{Digest, Sha3_256};
use std::collections::BTreeMap;

/// Durable coin and key store - outbound port.
///
/// Implementations are consulted synchronously from the event loop;
/// interior mutability is their concern.
pub trait Keychain: Send + Sync {
    /// Iterate all coins; a visitor returning `false` stops early.
    fn visit(&self, visitor: &mut dyn FnMut(&Coin) -> bool) -> Result<(), WalletError>;

    /// Persist a new coin, assigning its row id.
    fn store(&self, coin: &mut Coin) -> Result<(), WalletError>;

    /// Write back modified coins.
    fn update(&self, coins: &[Coin]) -> Result<(), WalletError>;

    /// Derive the blinding key of a coin.
    fn calc_key(&self, coin: &Coin) -> Scalar;

    /// Height of the last committed chain state.
    fn current_height(&self) -> Result<Height, WalletError>;

    /// Last committed chain state id; the zero state when never set.
    fn system_state_id(&self) -> Result<SystemStateId, WalletError>;

    /// Commit a chain state id.
    fn set_system_state_id(&self, id: SystemStateId) -> Result<(), WalletError>;

    /// Persist an address record.
    fn save_address(&self, address: &WalletAddress) -> Result<(), WalletError>;

    /// Re-encrypt the store under a new password.
    fn change_password(&self, new_password: &str) -> Result<(), WalletError>;
}

/// Address keypair store - outbound port. Used only when creating
/// wallet addresses.
pub trait Keystore: Send + Sync {
    /// Generate a keypair and return its public id.
    fn gen_keypair(&self) -> Result<Hash256, WalletError>;

    /// Persist a generated keypair.
    fn save_keypair(&self, wallet_id: &Hash256, own: bool) -> Result<(), WalletError>;
}

/// Transport - outbound port. Fire-and-forget from the core's side;
/// delivery failures come back as connection errors.
#[async_trait]
pub trait WalletNetwork: Send + Sync {
    /// Send a message to a peer wallet.
    async fn send_tx_message(&self, peer: PeerId, msg: PeerMessage) -> Result<(), WalletError>;

    /// Send a request to the upstream node.
    async fn send_node_message(&self, msg: NodeRequest) -> Result<(), WalletError>;

    /// Drop the connection to a peer.
    async fn close_connection(&self, peer: PeerId);

    /// Drop the node connection.
    async fn close_node_connection(&self);
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

#[derive(Default)]
struct KeychainState {
    coins: BTreeMap<u64, Coin>,
    next_id: u64,
    height: Height,
    state_id: SystemStateId,
    addresses: Vec<WalletAddress>,
    password: Option<String>,
}

/// In-memory keychain for tests.
pub struct MockKeychain {
    master: Hash256,
    state: Mutex<KeychainState>,
}

impl Default for MockKeychain {
    fn default() -> Self {
        Self {
            master: [0x4du8; 32],
            state: Mutex::new(KeychainState {
                next_id: 1,
                ..Default::default()
            }),
        }
    }
}

impl MockKeychain {
    /// Empty keychain at height zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the committed height (test setup).
    pub fn set_height(&self, height: Height) {
        self.state.lock().height = height;
    }

    /// Insert a coin directly, returning its id (test setup).
    pub fn add_coin(&self, mut coin: Coin) -> u64 {
        let mut state = self.state.lock();
        let id = coin.id.unwrap_or(state.next_id);
        state.next_id = state.next_id.max(id + 1);
        coin.id = Some(id);
        state.coins.insert(id, coin);
        id
    }

    /// Snapshot of all coins in id order.
    pub fn coins(&self) -> Vec<Coin> {
        self.state.lock().coins.values().cloned().collect()
    }

    /// A single coin by id.
    pub fn coin(&self, id: u64) -> Option<Coin> {
        self.state.lock().coins.get(&id).cloned()
    }

    /// Saved addresses.
    pub fn addresses(&self) -> Vec<WalletAddress> {
        self.state.lock().addresses.clone()
    }

    /// The password last set through `change_password`.
    pub fn password(&self) -> Option<String> {
        self.state.lock().password.clone()
    }
}

impl Keychain for MockKeychain {
    fn visit(&self, visitor: &mut dyn FnMut(&Coin) -> bool) -> Result<(), WalletError> {
        let state = self.state.lock();
        for coin in state.coins.values() {
            if !visitor(coin) {
                break;
            }
        }
        Ok(())
    }

    fn store(&self, coin: &mut Coin) -> Result<(), WalletError> {
        let mut state = self.state.lock();
        if coin.id.is_none() {
            coin.id = Some(state.next_id);
            state.next_id += 1;
        }
        let id = coin.id.unwrap_or_default();
        state.next_id = state.next_id.max(id + 1);
        state.coins.insert(id, coin.clone());
        Ok(())
    }

    fn update(&self, coins: &[Coin]) -> Result<(), WalletError> {
        let mut state = self.state.lock();
        for coin in coins {
            let id = coin.id.ok_or_else(|| {
                WalletError::Keychain("update of a coin that was never stored".into())
            })?;
            if let Some(existing) = state.coins.get(&id) {
                debug_assert!(
                    status_transition_allowed(existing.status, coin.status),
                    "coin {id}: {:?} -> {:?}",
                    existing.status,
                    coin.status
                );
            }
            state.coins.insert(id, coin.clone());
        }
        Ok(())
    }

    fn calc_key(&self, coin: &Coin) -> Scalar {
        let mut hasher = Sha3_256::new();
        hasher.update(self.master);
        match coin.key_type {
            KeyType::Regular => {
                hasher.update([0u8]);
                hasher.update(coin.id.unwrap_or_default().to_le_bytes());
            }
            // Reward keys derive from the block, not the row id: the
            // key must exist before the coin is stored.
            KeyType::Coinbase => {
                hasher.update([1u8]);
                hasher.update(coin.create_height.to_le_bytes());
            }
            KeyType::Commission => {
                hasher.update([2u8]);
                hasher.update(coin.create_height.to_le_bytes());
            }
        }
        Scalar(hasher.finalize().into())
    }

    fn current_height(&self) -> Result<Height, WalletError> {
        Ok(self.state.lock().height)
    }

    fn system_state_id(&self) -> Result<SystemStateId, WalletError> {
        Ok(self.state.lock().state_id)
    }

    fn set_system_state_id(&self, id: SystemStateId) -> Result<(), WalletError> {
        let mut state = self.state.lock();
        state.state_id = id;
        state.height = id.height;
        Ok(())
    }

    fn save_address(&self, address: &WalletAddress) -> Result<(), WalletError> {
        self.state.lock().addresses.push(address.clone());
        Ok(())
    }

    fn change_password(&self, new_password: &str) -> Result<(), WalletError> {
        self.state.lock().password = Some(new_password.to_string());
        Ok(())
    }
}

/// In-memory keystore for tests.
#[derive(Default)]
pub struct MockKeystore {
    state: Mutex<KeystoreState>,
}

#[derive(Default)]
struct KeystoreState {
    counter: u64,
    saved: Vec<(Hash256, bool)>,
}

impl MockKeystore {
    /// Empty keystore.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keypairs saved so far, with their ownership flags.
    pub fn saved(&self) -> Vec<(Hash256, bool)> {
        self.state.lock().saved.clone()
    }
}

impl Keystore for MockKeystore {
    fn gen_keypair(&self) -> Result<Hash256, WalletError> {
        let mut state = self.state.lock();
        state.counter += 1;
        let mut hasher = Sha3_256::new();
        hasher.update(b"mock-keystore");
        hasher.update(state.counter.to_le_bytes());
        Ok(hasher.finalize().into())
    }

    fn save_keypair(&self, wallet_id: &Hash256, own: bool) -> Result<(), WalletError> {
        self.state.lock().saved.push((*wallet_id, own));
        Ok(())
    }
}

#[derive(Default)]
struct NetworkState {
    tx_messages: Vec<(PeerId, PeerMessage)>,
    node_messages: Vec<NodeRequest>,
    closed_peers: Vec<PeerId>,
    node_close_count: usize,
}

/// Recording network for tests.
#[derive(Default)]
pub struct MockNetwork {
    pub(crate) state: Mutex<NetworkState>,
    /// Should sends return errors?
    pub should_fail: bool,
}

impl MockNetwork {
    /// Recording network that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// All peer messages sent so far.
    pub fn tx_messages(&self) -> Vec<(PeerId, PeerMessage)> {
        self.state.lock().tx_messages.clone()
    }

    /// Drain recorded peer messages.
    pub fn take_tx_messages(&self) -> Vec<(PeerId, PeerMessage)> {
        std::mem::take(&mut self.state.lock().tx_messages)
    }

    /// All node requests sent so far.
    pub fn node_messages(&self) -> Vec<NodeRequest> {
        self.state.lock().node_messages.clone()
    }

    /// Drain recorded node requests.
    pub fn take_node_messages(&self) -> Vec<NodeRequest> {
        std::mem::take(&mut self.state.lock().node_messages)
    }

    /// Peers whose connections were closed.
    pub fn closed_peers(&self) -> Vec<PeerId> {
        self.state.lock().closed_peers.clone()
    }

    /// How many times the node connection was closed.
    pub fn node_close_count(&self) -> usize {
        self.state.lock().node_close_count
    }
}

#[async_trait]
impl WalletNetwork for MockNetwork {
    async fn send_tx_message(&self, peer: PeerId, msg: PeerMessage) -> Result<(), WalletError> {
        if self.should_fail {
            return Err(WalletError::Network("mock failure".into()));
        }
        self.state.lock().tx_messages.push((peer, msg));
        Ok(())
    }

    async fn send_node_message(&self, msg: NodeRequest) -> Result<(), WalletError> {
        if self.should_fail {
            return Err(WalletError::Network("mock failure".into()));
        }
        self.state.lock().node_messages.push(msg);
        Ok(())
    }

    async fn close_connection(&self, peer: PeerId) {
        self.state.lock().closed_peers.push(peer);
    }

    async fn close_node_connection(&self) {
        self.state.lock().node_close_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CoinStatus, TxId};

    #[test]
    fn test_mock_keychain_store_assigns_ids() {
        let keychain = MockKeychain::new();
        let mut a = Coin::new(10, KeyType::Regular, 1);
        let mut b = Coin::new(20, KeyType::Regular, 1);
        keychain.store(&mut a).unwrap();
        keychain.store(&mut b).unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(keychain.coins().len(), 2);
    }

    #[test]
    fn test_mock_keychain_update_rejects_unknown() {
        let keychain = MockKeychain::new();
        let coin = Coin::new(10, KeyType::Regular, 1);
        assert!(keychain.update(&[coin]).is_err());
    }

    #[test]
    fn test_mock_keychain_visit_stops_early() {
        let keychain = MockKeychain::new();
        for amount in [1, 2, 3] {
            keychain.add_coin(Coin::new(amount, KeyType::Regular, 1));
        }
        let mut seen = 0;
        keychain
            .visit(&mut |_| {
                seen += 1;
                seen < 2
            })
            .unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_calc_key_stable_for_regular_coin() {
        let keychain = MockKeychain::new();
        let mut coin = Coin::new(10, KeyType::Regular, 1);
        keychain.store(&mut coin).unwrap();
        assert_eq!(keychain.calc_key(&coin), keychain.calc_key(&coin));
    }

    #[test]
    fn test_calc_key_for_reward_ignores_row_id() {
        let keychain = MockKeychain::new();
        let mut coin = Coin::mined(40, KeyType::Coinbase, 9);
        let before = keychain.calc_key(&coin);
        keychain.store(&mut coin).unwrap();
        assert_eq!(keychain.calc_key(&coin), before);
    }

    #[test]
    fn test_mock_keychain_state_id_round_trip() {
        let keychain = MockKeychain::new();
        let id = SystemStateId::new(42, [7u8; 32]);
        keychain.set_system_state_id(id).unwrap();
        assert_eq!(keychain.system_state_id().unwrap(), id);
        assert_eq!(keychain.current_height().unwrap(), 42);
    }

    #[test]
    fn test_mock_keystore_keys_unique() {
        let keystore = MockKeystore::new();
        let a = keystore.gen_keypair().unwrap();
        let b = keystore.gen_keypair().unwrap();
        assert_ne!(a, b);
        keystore.save_keypair(&a, true).unwrap();
        assert_eq!(keystore.saved(), vec![(a, true)]);
    }

    #[tokio::test]
    async fn test_mock_network_records() {
        let network = MockNetwork::new();
        let tx_id = TxId::from_bytes([1u8; 16]);
        network
            .send_tx_message(
                PeerId(5),
                PeerMessage::TxFailed(crate::domain::TxFailed { tx_id }),
            )
            .await
            .unwrap();
        network.close_connection(PeerId(5)).await;
        network.close_node_connection().await;
        assert_eq!(network.tx_messages().len(), 1);
        assert_eq!(network.closed_peers(), vec![PeerId(5)]);
        assert_eq!(network.node_close_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_network_failure_mode() {
        let network = MockNetwork {
            should_fail: true,
            ..Default::default()
        };
        let res = network
            .send_node_message(NodeRequest::GetMined { height: 1 })
            .await;
        assert!(res.is_err());
    }

    #[test]
    fn test_update_allows_lock_then_spend() {
        let keychain = MockKeychain::new();
        let mut coin = Coin::new(10, KeyType::Regular, 1);
        coin.status = CoinStatus::Unspent;
        keychain.store(&mut coin).unwrap();
        coin.status = CoinStatus::Locked;
        keychain.update(&[coin.clone()]).unwrap();
        coin.status = CoinStatus::Spent;
        keychain.update(&[coin.clone()]).unwrap();
        assert_eq!(keychain.coin(coin.id.unwrap()).unwrap().status, CoinStatus::Spent);
    }
}
