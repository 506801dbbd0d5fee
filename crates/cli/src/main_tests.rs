// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

#[test]
fn args_parse_root_and_flags() {
    let args = Args::try_parse_from(["runboard", "/tmp/wandb", "--once", "--no-color"]).unwrap();
    assert_eq!(args.root, Some(PathBuf::from("/tmp/wandb")));
    assert!(args.once);
    assert!(args.no_color);
    assert_eq!(args.config, None);
}

#[test]
fn args_reject_unknown_flags() {
    assert!(Args::try_parse_from(["runboard", "--watch-harder"]).is_err());
}

#[test]
fn explicit_config_must_exist() {
    let dir = tempdir().unwrap();
    let err = load_config(Some(&dir.path().join("missing.toml"))).unwrap_err();
    assert!(err.to_string().contains("cannot read config"));
}

#[test]
fn explicit_config_is_parsed_and_normalized() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "heartbeat_secs = 0\nlive_chunk_records = 500\n").unwrap();

    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.heartbeat_secs, 1, "clamped to the minimum");
    assert_eq!(config.live_chunk_records, 500);
}

#[test]
fn invalid_config_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "not valid toml [").unwrap();
    assert!(load_config(Some(&path)).is_err());
}
