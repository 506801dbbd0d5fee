use crate::prelude::*;
use runboard_core::test_support::{
    exit_record, history_record, run_record, summary_record,
};
use serial_test::serial;

const KEY_A: &str = "run-20240301_000000-aaa111";
const KEY_B: &str = "run-20240201_000000-bbb222";

#[test]
fn single_finished_run_prints_its_overview() {
    let root = workspace();
    write_run(
        root.path(),
        KEY_A,
        &[
            run_record("aaa111", "warm-sunset-7", "mnist"),
            history_record(1, &[("loss", "0.42")]),
            summary_record(&[("loss", "0.42")]),
            exit_record(0),
        ],
    );

    let assert = runboard()
        .arg(root.path())
        .arg("--once")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("warm-sunset-7"), "{stdout}");
    assert!(stdout.contains("[mnist]"), "{stdout}");
    assert!(stdout.contains("finished"), "{stdout}");
    assert!(stdout.contains("(exit 0)"), "{stdout}");
    assert!(stdout.contains("loss"), "{stdout}");
}

#[test]
fn failed_run_sets_a_nonzero_exit_code() {
    let root = workspace();
    write_run(root.path(), KEY_A, &[exit_record(3)]);

    let assert = runboard()
        .arg(root.path())
        .arg("--once")
        .assert()
        .failure();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("failed"), "{stdout}");
    assert!(stdout.contains("(exit 3)"), "{stdout}");
}

#[test]
fn all_runs_are_loaded_newest_first() {
    let root = workspace();
    write_run(
        root.path(),
        KEY_A,
        &[run_record("aaa111", "newest", "p"), exit_record(0)],
    );
    write_run(
        root.path(),
        KEY_B,
        &[run_record("bbb222", "older", "p"), exit_record(0)],
    );

    let assert = runboard()
        .arg(root.path())
        .arg("--once")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let newest = stdout.find("newest").unwrap();
    let older = stdout.find("older").unwrap();
    assert!(newest < older, "summary must list newest first:\n{stdout}");
}

#[test]
fn still_running_log_with_a_torn_tail_loads_cleanly() {
    use runboard_storage::writer::FramedLogWriter;

    let root = workspace();
    let path = root.path().join(KEY_A).join("run-aaa111.wandb");
    let mut writer = FramedLogWriter::create(&path).unwrap();
    writer
        .append(&run_record("aaa111", "in-flight", "p"))
        .unwrap();
    writer
        .append(&history_record(1, &[("loss", "0.9")]))
        .unwrap();
    // The tracker was mid-write when we snapshotted.
    writer
        .append_torn(&history_record(2, &[("loss", "0.8")]), 5)
        .unwrap();
    writer.flush().unwrap();

    let assert = runboard()
        .arg(root.path())
        .arg("--once")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("in-flight"), "{stdout}");
    assert!(stdout.contains("live"), "{stdout}");
}

#[test]
fn empty_workspace_succeeds_with_no_runs() {
    let root = workspace();
    runboard().arg(root.path()).arg("--once").assert().success();
}

#[test]
#[serial]
fn wandb_dir_env_selects_the_root() {
    let root = workspace();
    write_run(
        root.path(),
        KEY_A,
        &[run_record("aaa111", "from-env", "p"), exit_record(0)],
    );

    let mut cmd = assert_cmd::Command::cargo_bin("runboard").unwrap();
    let assert = cmd
        .env("WANDB_DIR", root.path())
        .env("NO_COLOR", "1")
        .arg("--once")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(stdout.contains("from-env"), "{stdout}");
}
