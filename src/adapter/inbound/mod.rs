//! Driving adapters.

pub mod cli;

#[cfg(feature = "telegram")]
pub mod telegram;
