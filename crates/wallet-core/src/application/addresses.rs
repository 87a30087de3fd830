//! # Address Management
//!
//! Keypair generation and persistence for wallet addresses. Only
//! used when a wallet (or a new address) is created.

use crate::domain::{WalletAddress, WalletError};
use crate::ports::{Keychain, Keystore};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Generate a keypair, persist it, and record the address.
pub fn generate_address(
    keychain: &dyn Keychain,
    keystore: &dyn Keystore,
    label: &str,
    own: bool,
) -> Result<WalletAddress, WalletError> {
    let wallet_id = keystore.gen_keypair()?;
    keystore.save_keypair(&wallet_id, own)?;
    let address = WalletAddress::new(wallet_id, label, own, now_secs());
    keychain.save_address(&address)?;
    info!("[wallet] created address '{label}'");
    Ok(address)
}

/// Create the address a fresh wallet starts with.
pub fn bootstrap_default_address(
    keychain: &dyn Keychain,
    keystore: &dyn Keystore,
) -> Result<WalletAddress, WalletError> {
    generate_address(keychain, keystore, "default", true)
}
