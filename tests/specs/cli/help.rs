use crate::prelude::*;

#[test]
fn help_documents_the_flags() {
    let assert = runboard().arg("--help").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("Terminal dashboard"));
    assert!(stdout.contains("--once"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--log-file"));
    assert!(stdout.contains("--no-color"));
}

#[test]
fn version_prints_name_and_semver() {
    let assert = runboard().arg("--version").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.starts_with("runboard "));
}
