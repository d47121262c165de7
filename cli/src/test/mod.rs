#![allow(clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::{
    predicate::str::{contains, is_empty},
    PredicateBooleanExt,
};

mod import_operations;

#[test]
fn test_server_arg() {
    // --server arg overrides the STUDY_SERVER env var
    let mut cmd = Command::cargo_bin("study").unwrap();

    let assert = cmd
        .env("STUDY_SERVER", "http://wrong-server:1")
        .env("STUDY_PROFILE", "test_server_arg_profile")
        .args(["--server", "http://from-arg:8080"])
        .arg("config")
        .assert();

    assert
        .success()
        .stdout(
            contains(r#""server_url": "http://from-arg:8080""#).and(contains(r#""page_size""#)),
        )
        .stderr(is_empty());
}

#[test]
fn test_server_env() {
    // STUDY_SERVER env var sets the server url
    let mut cmd = Command::cargo_bin("study").unwrap();

    let assert = cmd
        .env("STUDY_SERVER", "http://from-env:8080")
        .env("STUDY_PROFILE", "test_server_env_profile")
        .arg("config")
        .assert();

    assert
        .success()
        .stdout(
            contains(r#""server_url": "http://from-env:8080""#).and(contains(r#""page_size""#)),
        )
        .stderr(is_empty());
}

#[test]
fn test_server_default() {
    // Without a flag, env var or profile the built-in default applies
    let mut cmd = Command::cargo_bin("study").unwrap();

    let assert = cmd
        .env_remove("STUDY_SERVER")
        .env("STUDY_PROFILE", "test_server_default_profile")
        .arg("config")
        .assert();

    assert
        .success()
        .stdout(
            contains(r#""server_url": "http://localhost:8080""#)
                .and(contains(r#""profile_exists": false"#)),
        )
        .stderr(is_empty());
}
