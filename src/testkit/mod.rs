//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`gateway`]: `ScriptedGateway`, an in-memory market data provider.
//! - [`notifier`]: `RecordingNotifier`, which captures alert texts.
//! - [`store`]: migrated in-memory SQLite stores.
//! - [`domain`]: builders for snapshots and samples.

pub mod domain;
pub mod gateway;
pub mod notifier;
pub mod store;
