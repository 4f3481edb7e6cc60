// tests/options.rs

use std::error::Error;
use std::path::PathBuf;

use serde_json::json;
use shelltest::CommandExpectation;
use shelltest_test_utils::{init_tracing, FakeSpawner};

type TestResult = Result<(), Box<dyn Error>>;

const TEST_CMD: &str = "echo 'testing123'";

/// Reports `{ code: 0 }` as a process error, the way a stubbed
/// `child_process.exec` would.
fn fake() -> FakeSpawner {
    FakeSpawner::failing(0, "test_stdout", "test_stderr")
}

#[tokio::test]
async fn runs_the_configured_command() -> TestResult {
    init_tracing();
    let spawner = fake();

    CommandExpectation::with_spawner(spawner.as_spawner())
        .cmd(TEST_CMD)
        .end()
        .await?;

    let calls = spawner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].command, TEST_CMD);
    assert!(calls[0].options.is_empty());
    assert_eq!(serde_json::to_value(&calls[0].options)?, json!({}));
    Ok(())
}

#[tokio::test]
async fn cwd_is_the_only_option_passed() -> TestResult {
    let spawner = fake();

    CommandExpectation::with_spawner(spawner.as_spawner())
        .cmd(TEST_CMD)
        .cwd("testcwd")
        .end()
        .await?;

    let call = spawner.last_call();
    assert_eq!(call.options.cwd, Some(PathBuf::from("testcwd")));
    assert_eq!(serde_json::to_value(&call.options)?, json!({ "cwd": "testcwd" }));
    Ok(())
}

#[tokio::test]
async fn env_is_the_only_option_passed() -> TestResult {
    let spawner = fake();

    CommandExpectation::with_spawner(spawner.as_spawner())
        .cmd(TEST_CMD)
        .env([("testkey", "testval")])
        .end()
        .await?;

    let call = spawner.last_call();
    assert_eq!(
        serde_json::to_value(&call.options)?,
        json!({ "env": { "testkey": "testval" } })
    );
    Ok(())
}

#[tokio::test]
async fn timeout_is_the_only_option_passed() -> TestResult {
    let spawner = fake();

    CommandExpectation::with_spawner(spawner.as_spawner())
        .cmd(TEST_CMD)
        .timeout(10)
        .end()
        .await?;

    assert_eq!(
        serde_json::to_value(&spawner.last_call().options)?,
        json!({ "timeout": 10 })
    );
    Ok(())
}

#[tokio::test]
async fn uid_is_the_only_option_passed() -> TestResult {
    let spawner = fake();

    CommandExpectation::with_spawner(spawner.as_spawner())
        .cmd(TEST_CMD)
        .uid(11)
        .end()
        .await?;

    assert_eq!(
        serde_json::to_value(&spawner.last_call().options)?,
        json!({ "uid": 11 })
    );
    Ok(())
}

#[tokio::test]
async fn gid_is_the_only_option_passed() -> TestResult {
    let spawner = fake();

    CommandExpectation::with_spawner(spawner.as_spawner())
        .cmd(TEST_CMD)
        .gid(12)
        .end()
        .await?;

    assert_eq!(
        serde_json::to_value(&spawner.last_call().options)?,
        json!({ "gid": 12 })
    );
    Ok(())
}

#[tokio::test]
async fn all_options_are_passed_together() -> TestResult {
    let spawner = fake();

    CommandExpectation::with_spawner(spawner.as_spawner())
        .cmd(TEST_CMD)
        .gid(12)
        .cwd("dir")
        .uid(11)
        .timeout(500)
        .env([("A".to_string(), "1".to_string())])
        .end()
        .await?;

    let options = spawner.last_call().options;
    assert_eq!(options.keys(), vec!["cwd", "env", "timeout", "uid", "gid"]);
    assert_eq!(
        serde_json::to_value(&options)?,
        json!({ "cwd": "dir", "env": { "A": "1" }, "timeout": 500, "uid": 11, "gid": 12 })
    );
    Ok(())
}

#[test]
fn builder_exposes_pending_configuration() {
    let builder = CommandExpectation::new()
        .cmd(TEST_CMD)
        .cwd("x")
        .expect(0)
        .expect_stdout("out");

    assert_eq!(builder.options().keys(), vec!["cwd"]);
    assert_eq!(builder.expectations().len(), 2);
}
