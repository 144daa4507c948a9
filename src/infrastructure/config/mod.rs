//! Infrastructure configuration modules.

pub mod database;
pub mod logging;
pub mod monitor;
pub mod settings;
pub mod telegram;
