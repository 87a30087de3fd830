//! # Domain Invariants
//!
//! Rules the orchestrator's registries and the coin lifecycle must
//! satisfy in every reachable state.

use super::entities::CoinStatus;
use super::errors::WalletError;
use super::value_objects::TxId;
use std::collections::HashSet;

/// Registry consistency: a transfer id is tracked by exactly one FSM
/// set, and it is peered if and only if an FSM owns it.
pub fn registry_consistent(
    senders: &HashSet<TxId>,
    receivers: &HashSet<TxId>,
    peers: &HashSet<TxId>,
) -> Result<(), WalletError> {
    if let Some(id) = senders.intersection(receivers).next() {
        return Err(WalletError::InvariantViolated(format!(
            "{id} owned by both a sender and a receiver"
        )));
    }
    for id in senders.union(receivers) {
        if !peers.contains(id) {
            return Err(WalletError::InvariantViolated(format!(
                "{id} has an FSM but no peer"
            )));
        }
    }
    for id in peers {
        if !senders.contains(id) && !receivers.contains(id) {
            return Err(WalletError::InvariantViolated(format!(
                "{id} has a peer but no FSM"
            )));
        }
    }
    Ok(())
}

/// Whether a coin may move from `from` to `to`.
///
/// Spent is terminal, and a confirmed coin never becomes unconfirmed
/// again.
pub fn status_transition_allowed(from: CoinStatus, to: CoinStatus) -> bool {
    use CoinStatus::*;
    match (from, to) {
        (a, b) if a == b => true,
        (Unconfirmed, Unspent) => true,
        (Unconfirmed, Spent) => true,
        (Unspent, Locked) => true,
        (Unspent, Spent) => true,
        (Locked, Spent) => true,
        (Locked, Unspent) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: &[u8]) -> HashSet<TxId> {
        n.iter().map(|b| TxId::from_bytes([*b; 16])).collect()
    }

    #[test]
    fn test_registry_consistent_ok() {
        let senders = ids(&[1]);
        let receivers = ids(&[2]);
        let peers = ids(&[1, 2]);
        assert!(registry_consistent(&senders, &receivers, &peers).is_ok());
    }

    #[test]
    fn test_registry_overlapping_fsms() {
        let senders = ids(&[1]);
        let receivers = ids(&[1]);
        let peers = ids(&[1]);
        assert!(registry_consistent(&senders, &receivers, &peers).is_err());
    }

    #[test]
    fn test_registry_fsm_without_peer() {
        let senders = ids(&[1]);
        let receivers = ids(&[]);
        let peers = ids(&[]);
        assert!(registry_consistent(&senders, &receivers, &peers).is_err());
    }

    #[test]
    fn test_registry_peer_without_fsm() {
        let senders = ids(&[]);
        let receivers = ids(&[]);
        let peers = ids(&[9]);
        assert!(registry_consistent(&senders, &receivers, &peers).is_err());
    }

    #[test]
    fn test_forbidden_status_transitions() {
        use CoinStatus::*;
        assert!(!status_transition_allowed(Spent, Unspent));
        assert!(!status_transition_allowed(Unspent, Unconfirmed));
        assert!(!status_transition_allowed(Spent, Unconfirmed));
        assert!(!status_transition_allowed(Spent, Locked));
    }

    #[test]
    fn test_allowed_status_transitions() {
        use CoinStatus::*;
        assert!(status_transition_allowed(Unconfirmed, Unspent));
        assert!(status_transition_allowed(Unspent, Locked));
        assert!(status_transition_allowed(Locked, Spent));
        assert!(status_transition_allowed(Locked, Locked));
    }
}
