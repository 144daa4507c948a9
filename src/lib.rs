//! Pricewatch - crypto price-change monitoring with Telegram alerts.
//!
//! A scheduled monitor samples the top assets by market cap plus every
//! asset a chat user subscribed to, compares each price against a short
//! window of stored history, and alerts the admin chat when a move
//! crosses the configured threshold, at most three times per asset per
//! hour.
//!
//! # Architecture
//!
//! The crate is organized in hexagonal layers:
//!
//! - [`domain`] - Identifiers, samples, and the pure spike detector
//! - [`port`] - Traits for market data, persistence and notification
//! - [`application`] - Monitoring cycle, rate limiter, chat use cases
//! - [`adapter`] - CoinGecko, SQLite, Telegram and CLI implementations
//! - [`infrastructure`] - Configuration, logging and wiring
//!
//! # Features
//!
//! - `telegram` (default) - Telegram alerts and chat commands
//! - `testkit` - In-memory fakes for integration tests

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
