//! Terminal output for CLI handlers.
//!
//! Human-readable output uses colored symbols. `--json` switches every
//! line to a `{"type", "payload"}` object for scripting and `--quiet`
//! suppresses everything but warnings and errors.

use std::fmt::Display;
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use serde_json::json;

/// Output configuration shared by CLI handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub json: bool,
    pub quiet: bool,
}

static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

fn config() -> OutputConfig {
    OUTPUT_CONFIG.get().copied().unwrap_or_default()
}

fn emit_json_line(kind: &str, payload: serde_json::Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// Apply output settings from the global CLI flags. First call wins.
pub fn configure(output: OutputConfig) {
    let _ = OUTPUT_CONFIG.set(output);
}

#[must_use]
pub fn is_json() -> bool {
    config().json
}

/// Print the application header with name and version.
pub fn header(version: &str) {
    let config = config();
    if config.json {
        emit_json_line("header", json!({ "app": "pricewatch", "version": version }));
        return;
    }
    if config.quiet {
        return;
    }
    println!("{} {}", "pricewatch".bold(), version.dimmed());
}

/// Print a section header.
pub fn section(title: &str) {
    let config = config();
    if config.json {
        emit_json_line("section", json!({ "title": title }));
        return;
    }
    if config.quiet {
        return;
    }
    println!();
    println!("{}", title.bold());
}

/// Print a labeled value.
pub fn field(label: &str, value: impl Display) {
    let config = config();
    let value = value.to_string();
    if config.json {
        emit_json_line("field", json!({ "label": label, "value": value }));
        return;
    }
    if config.quiet {
        return;
    }
    println!("  {:<18} {}", label.dimmed(), value);
}

pub fn success(message: &str) {
    let config = config();
    if config.json {
        emit_json_line("success", json!({ "message": message }));
        return;
    }
    if config.quiet {
        return;
    }
    println!("  {} {}", "✓".green(), message);
}

pub fn warning(message: &str) {
    if is_json() {
        emit_json_line("warning", json!({ "message": message }));
        return;
    }
    println!("  {} {}", "⚠".yellow(), message);
}

pub fn error(message: &str) {
    if is_json() {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
        return;
    }
    eprintln!("  {} {}", "×".red(), message);
}

/// Print a pre-rendered block (tables). JSON mode prints `value` instead.
pub fn block(text: &str, value: serde_json::Value) {
    let config = config();
    if config.json {
        emit_json_line("table", value);
        return;
    }
    if config.quiet {
        return;
    }
    println!("{text}");
}
