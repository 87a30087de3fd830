//! # Adapters
//!
//! Concrete implementations of the outbound ports for wiring the
//! core into a host I/O layer.

pub mod channel_network;

pub use channel_network::{ChannelNetwork, NetworkOp};
