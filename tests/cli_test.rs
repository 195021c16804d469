//! End-to-end tests driving the built binary over stdin

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn snipstore(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("snipstore"));
    cmd.current_dir(dir.path()).args(["--embedder", "hashing"]);
    cmd
}

#[test]
fn query_then_quit_on_fresh_store() {
    let dir = TempDir::new().unwrap();

    snipstore(&dir)
        .write_stdin("query pet\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching documents found."))
        .stdout(predicate::str::contains("Exiting Chroma CLI. Goodbye!"));

    assert!(dir.path().join("chromadb").join("input_storage").is_dir());
}

#[test]
fn added_snippet_is_found_in_later_run() {
    let dir = TempDir::new().unwrap();

    snipstore(&dir)
        .write_stdin("add dog\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added input with ID: "));

    snipstore(&dir)
        .write_stdin("query dog\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Result 1:\nDocument: dog\n"))
        .stdout(predicate::str::contains("Distance: 0.0000"));
}

#[test]
fn custom_data_dir_and_collection() {
    let dir = TempDir::new().unwrap();

    snipstore(&dir)
        .args(["--data-dir", "store", "--collection", "notes"])
        .write_stdin("add hello\nquit\n")
        .assert()
        .success();

    assert!(dir.path().join("store").join("notes").join("manifest.json").exists());
}

#[test]
fn invalid_collection_name_fails() {
    let dir = TempDir::new().unwrap();

    snipstore(&dir)
        .args(["--collection", "x"])
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open collection x"));
}

#[test]
fn metric_change_on_existing_collection_fails() {
    let dir = TempDir::new().unwrap();

    snipstore(&dir).write_stdin("quit\n").assert().success();

    snipstore(&dir)
        .args(["--metric", "cosine"])
        .write_stdin("quit\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Collection mismatch"));
}

#[test]
fn zero_results_is_rejected() {
    let dir = TempDir::new().unwrap();

    snipstore(&dir)
        .args(["--results", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be at least 1"));
}

#[test]
fn extra_arguments_are_ignored() {
    let dir = TempDir::new().unwrap();

    snipstore(&dir)
        .args(["stray", "words"])
        .write_stdin("add dog\nquery dog\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Result 1:\nDocument: dog\n"));
}
