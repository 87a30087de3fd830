//! # Domain Entities
//!
//! The wallet's local record of a UTXO and the addresses it owns.

use super::value_objects::{Amount, Hash256, Height, TxId, MAX_HEIGHT};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinStatus {
    /// Created locally (change, incoming transfer, fresh reward) but
    /// not yet seen in the chain state.
    Unconfirmed,
    /// Present in the chain state and available for spending.
    Unspent,
    /// Reserved as an input of an in-flight transfer.
    Locked,
    /// Consumed by a registered transaction.
    Spent,
}

/// Key derivation class of a coin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyType {
    /// Ordinary transfer output.
    Regular,
    /// Miner reward.
    Coinbase,
    /// Collected transaction fees.
    Commission,
}

/// Wallet-local record of a UTXO.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Keychain row id; `None` until the coin has been stored.
    pub id: Option<u64>,
    /// Value in atomic units.
    pub amount: Amount,
    /// Lifecycle status.
    pub status: CoinStatus,
    /// Height at which the coin was created.
    pub create_height: Height,
    /// Height at which the chain confirmed the coin.
    pub confirm_height: Height,
    /// Height at which the coin was locked for spending.
    pub locked_height: Height,
    /// Height from which the coin may be spent.
    pub maturity: Height,
    /// Key derivation class.
    pub key_type: KeyType,
    /// Chain hash observed at confirmation.
    pub confirm_hash: Hash256,
    /// Transfer that created this coin, when known.
    pub create_tx_id: Option<TxId>,
    /// Transfer that is spending or spent this coin, when known.
    pub spent_tx_id: Option<TxId>,
}

impl Coin {
    /// A freshly created, unconfirmed coin.
    pub fn new(amount: Amount, key_type: KeyType, create_height: Height) -> Self {
        Self {
            id: None,
            amount,
            status: CoinStatus::Unconfirmed,
            create_height,
            confirm_height: MAX_HEIGHT,
            locked_height: MAX_HEIGHT,
            maturity: MAX_HEIGHT,
            key_type,
            confirm_hash: [0u8; 32],
            create_tx_id: None,
            spent_tx_id: None,
        }
    }

    /// A reward coin reported by the node's mined list.
    pub fn mined(amount: Amount, key_type: KeyType, height: Height) -> Self {
        Self::new(amount, key_type, height)
    }

    /// Whether this coin can be selected as a transfer input.
    pub fn is_spendable(&self) -> bool {
        self.status == CoinStatus::Unspent
    }
}

/// Seconds-since-epoch timestamp used by address records.
pub type Timestamp = u64;

/// An address owned by (or known to) this wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAddress {
    /// Public key identifying the address on the message bulletin.
    pub wallet_id: Hash256,
    /// Human label.
    pub label: String,
    /// True when the keypair belongs to this wallet.
    pub own: bool,
    /// Creation time, unix seconds.
    pub create_time: Timestamp,
    /// Validity duration in seconds; `u64::MAX` means forever.
    pub duration: u64,
}

impl WalletAddress {
    /// Duration value meaning "never expires".
    pub const FOREVER: u64 = u64::MAX;

    /// Create an address record.
    pub fn new(wallet_id: Hash256, label: impl Into<String>, own: bool, create_time: Timestamp) -> Self {
        Self {
            wallet_id,
            label: label.into(),
            own,
            create_time,
            duration: Self::FOREVER,
        }
    }
}
