use crate::prelude::*;

#[test]
fn missing_root_is_a_clean_error() {
    runboard()
        .args(["/definitely/not/a/workspace", "--once"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("is not a directory"));
}

#[test]
fn unknown_flag_is_rejected() {
    runboard().arg("--frobnicate").assert().failure();
}

#[test]
fn explicit_config_must_exist() {
    let root = workspace();
    runboard()
        .arg(root.path())
        .args(["--once", "--config", "/nope/config.toml"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("cannot read config"));
}

#[test]
fn invalid_config_key_is_rejected() {
    let root = workspace();
    let config = root.path().join("config.toml");
    std::fs::write(&config, "heartbeat_seconds = 3\n").unwrap();

    runboard()
        .arg(root.path())
        .arg("--once")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicates::str::contains("invalid config"));
}
