#![allow(clippy::unwrap_used)]

use predicates::prelude::{predicate::str::contains, PredicateBooleanExt};

use crate::test::test_context::TestContext;

// Nothing listens here, so any test that got past batch validation
// would fail with a transport error instead of the expected message.
const UNREACHABLE_SERVER: &str = "http://127.0.0.1:9";

#[test]
fn test_import_missing_file() {
    let ctx = TestContext::new(UNREACHABLE_SERVER);

    ctx.command()
        .args(["import", "no_such_file.json"])
        .assert()
        .failure()
        .stderr(contains("failed to read batch file"));
}

#[test]
fn test_import_rejects_malformed_json() {
    let ctx = TestContext::new(UNREACHABLE_SERVER);
    let batch = ctx.temp_dir.path().join("batch.json");
    std::fs::write(&batch, "{oops").unwrap();

    ctx.command()
        .args(["import", batch.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("invalid JSON"));
}

#[test]
fn test_import_rejects_non_array() {
    let ctx = TestContext::new(UNREACHABLE_SERVER);
    let batch = ctx.temp_dir.path().join("batch.json");
    std::fs::write(&batch, r#"{"content": "x"}"#).unwrap();

    ctx.command()
        .args(["import", batch.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("array"));
}

#[test]
fn test_import_rejects_empty_batch() {
    let ctx = TestContext::new(UNREACHABLE_SERVER);
    let batch = ctx.temp_dir.path().join("batch.json");
    std::fs::write(&batch, "[]").unwrap();

    ctx.command()
        .args(["import", batch.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("no records"));
}

#[test]
fn test_import_names_item_and_missing_field() {
    let ctx = TestContext::new(UNREACHABLE_SERVER);
    let batch = ctx.temp_dir.path().join("batch.json");
    std::fs::write(
        &batch,
        r#"[
            {"content": "a", "answer": "b", "category": "Go"},
            {"content": "c", "answer": "d"}
        ]"#,
    )
    .unwrap();

    ctx.command()
        .args(["import", batch.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(contains("item 2").and(contains("category")));
}
