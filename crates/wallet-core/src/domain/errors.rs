//! # Domain Errors

use super::value_objects::{Amount, PeerId, TxId};
use thiserror::Error;

/// Wallet core error types.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The durable coin store failed.
    #[error("keychain failure: {0}")]
    Keychain(String),

    /// The address keystore failed.
    #[error("keystore failure: {0}")]
    Keystore(String),

    /// Outbound message could not be handed to the transport.
    #[error("network failure: {0}")]
    Network(String),

    /// Spendable coins do not cover the requested transfer.
    #[error("insufficient funds: have {available}, need {required}")]
    InsufficientFunds {
        /// Total spendable value.
        available: Amount,
        /// Amount plus fee requested.
        required: Amount,
    },

    /// A peer sent something the protocol does not allow here.
    #[error("protocol violation from {peer}: {details}")]
    ProtocolViolation {
        /// The offending peer.
        peer: PeerId,
        /// What was wrong.
        details: String,
    },

    /// A node reply arrived with no matching outstanding request.
    #[error("unexpected node reply: {0}")]
    UnexpectedNodeReply(&'static str),

    /// A transfer reached its failure state.
    #[error("transaction {0} failed")]
    TxFailed(TxId),

    /// An internal bookkeeping rule was broken.
    #[error("state invariant violated: {0}")]
    InvariantViolated(String),
}
