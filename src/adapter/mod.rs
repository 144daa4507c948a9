//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - Driving adapters: the CLI and the Telegram chat surface
//! - [`outbound`] - Driven adapters: market data, persistence, notification

pub mod inbound;
pub mod outbound;
