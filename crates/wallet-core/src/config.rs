//! # Wallet Configuration
//!
//! Chain rules the wallet core needs locally. Everything else
//! (endpoints, storage paths, passwords) belongs to the host.

use crate::domain::Amount;
use serde::{Deserialize, Serialize};

/// Wallet configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Atomic units per whole coin, used for pretty-printing amounts.
    pub coin_unit: Amount,

    /// Block reward credited to a miner, in atomic units.
    pub coinbase_emission: Amount,

    /// Flat fee attached to outbound transfers.
    pub fee: Amount,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            coin_unit: 1_000_000,
            coinbase_emission: 40_000_000,
            fee: 100,
        }
    }
}

impl WalletConfig {
    /// Config for tests: tiny denominations, no fee, so scenario
    /// amounts stay exact.
    pub fn for_testing() -> Self {
        Self {
            coin_unit: 100,
            coinbase_emission: 40,
            fee: 0,
        }
    }
}
