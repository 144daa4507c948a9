use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const ENV_VARS: [&str; 5] = [
    "BOT_TOKEN",
    "ADMIN_ID",
    "PRICE_CHANGE_THRESHOLD",
    "COINGECKO_API_KEY",
    "DATABASE_PATH",
];

/// The binary with a clean environment and Telegram disabled.
fn pricewatch(dir: &TempDir) -> Command {
    let config = dir.path().join("pricewatch.toml");
    std::fs::write(&config, "[telegram]\nenabled = false\n").expect("write config");

    let mut cmd = Command::cargo_bin("pricewatch").expect("binary built");
    for var in ENV_VARS {
        cmd.env_remove(var);
    }
    cmd.current_dir(dir.path())
        .env("RUST_LOG", "error")
        .env("DATABASE_PATH", dir.path().join("test.db"))
        .arg("--config")
        .arg(config);
    cmd
}

#[test]
fn help_lists_commands() {
    Command::cargo_bin("pricewatch")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("once"))
        .stdout(predicate::str::contains("history"))
        .stdout(predicate::str::contains("reset"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn check_fails_without_threshold() {
    let dir = tempfile::tempdir().unwrap();

    pricewatch(&dir)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PRICE_CHANGE_THRESHOLD"));
}

#[test]
fn check_rejects_non_numeric_threshold() {
    let dir = tempfile::tempdir().unwrap();

    pricewatch(&dir)
        .env("PRICE_CHANGE_THRESHOLD", "lots")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value for PRICE_CHANGE_THRESHOLD"));
}

#[test]
fn check_passes_with_threshold() {
    let dir = tempfile::tempdir().unwrap();

    pricewatch(&dir)
        .env("PRICE_CHANGE_THRESHOLD", "5")
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration check complete"));
}

#[test]
fn history_of_unknown_asset_is_empty() {
    let dir = tempfile::tempdir().unwrap();

    pricewatch(&dir)
        .args(["history", "bitcoin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No samples stored for `bitcoin`"));
}

#[test]
fn reset_with_yes_skips_prompt() {
    let dir = tempfile::tempdir().unwrap();

    pricewatch(&dir)
        .args(["reset", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 0 row(s)"));
}
