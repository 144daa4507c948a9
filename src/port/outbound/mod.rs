//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the market data provider, persistence, and
//! alert delivery.

pub mod market;
pub mod notifier;
pub mod store;
