//! # Input Selection
//!
//! Greedy selection over spendable coins, oldest row first. Good
//! enough for a wallet whose coin count stays small; smarter
//! strategies can replace this behind the same signature.

use crate::domain::{Amount, Coin};

/// Outcome of a selection: the chosen inputs and the change they
/// leave over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Coins to spend.
    pub coins: Vec<Coin>,
    /// Selected total minus the target.
    pub change: Amount,
}

/// Pick spendable coins covering `target`. Returns `None` when the
/// spendable balance falls short.
pub fn select_coins(coins: &[Coin], target: Amount) -> Option<Selection> {
    let mut spendable: Vec<&Coin> = coins.iter().filter(|c| c.is_spendable()).collect();
    spendable.sort_by_key(|c| c.id);

    let mut picked = Vec::new();
    let mut total: Amount = 0;
    for coin in spendable {
        if total >= target {
            break;
        }
        total += coin.amount;
        picked.push(coin.clone());
    }

    if total < target {
        return None;
    }
    Some(Selection {
        coins: picked,
        change: total - target,
    })
}
