//! # Ports
//!
//! Inbound: the API the host/event loop drives. Outbound: the
//! dependencies the wallet core calls into, with mock
//! implementations for tests.

pub mod inbound;
pub mod outbound;

pub use inbound::WalletApi;
pub use outbound::{Keychain, Keystore, MockKeychain, MockKeystore, MockNetwork, WalletNetwork};
