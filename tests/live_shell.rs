// tests/live_shell.rs
#![cfg(unix)]

use std::error::Error;
use std::time::{Duration, Instant};

use regex::Regex;
use shelltest::{shelltest, Failure, ShellConfig, ShellSpawner, ShellTestError, Spawner, SpawnOptions};
use shelltest_test_utils::{init_tracing, with_timeout};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn echo_passes_exit_code_and_stdout_checks() -> TestResult {
    init_tracing();

    let report = with_timeout(
        shelltest()
            .cmd("echo hello")
            .expect(0)
            .expect_stdout("hello\n")
            .expect_stderr("")
            .end(),
    )
    .await?;

    assert!(report.error.is_none());
    Ok(())
}

#[tokio::test]
async fn nonzero_exit_is_reported_with_its_code() -> TestResult {
    let spawner = ShellSpawner::with_config(ShellConfig::default())?;
    let report = with_timeout(spawner.spawn("echo oops >&2; exit 42", &SpawnOptions::default())).await;

    let err = report.error.expect("exit 42 must produce a process error");
    assert_eq!(err.code, 42);
    assert!(!err.killed);
    assert_eq!(report.stderr, "oops\n");
    Ok(())
}

#[tokio::test]
async fn exit_code_mismatch_against_real_shell() {
    let err = with_timeout(shelltest().cmd("exit 3").expect(0).end())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Expected exit code of 0 got 3");
}

#[tokio::test]
async fn cwd_is_honoured() -> TestResult {
    let dir = TempDir::new()?;
    std::fs::write(dir.path().join("marker.txt"), "present")?;

    with_timeout(
        shelltest()
            .cmd("cat marker.txt")
            .cwd(dir.path())
            .expect_stdout("present")
            .end(),
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn env_replaces_the_inherited_environment() -> TestResult {
    // HOME is set for the test process but must not leak into a process
    // given an explicit environment.
    with_timeout(
        shelltest()
            .cmd("printf '%s|%s' \"$SHELLTEST_VAR\" \"${HOME:-unset}\"")
            .env([("SHELLTEST_VAR", "value")])
            .expect_stdout("value|unset")
            .end(),
    )
    .await?;
    Ok(())
}

#[tokio::test]
async fn timeout_kills_long_running_commands() -> TestResult {
    let mut seen = None;

    with_timeout(
        shelltest()
            .cmd("exec sleep 5")
            .timeout(100)
            .end_with(|failure, _, _| seen = failure),
    )
    .await?;

    match seen {
        Some(Failure::Process(e)) => {
            assert!(e.killed);
            assert_eq!(e.code, -1);
        }
        other => panic!("expected a killed process error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn timeout_returns_promptly_when_the_shell_has_children() -> TestResult {
    let mut seen = None;
    let started = Instant::now();

    with_timeout(
        shelltest()
            .cmd("echo before; sleep 3; echo done")
            .timeout(100)
            .end_with(|failure, stdout, _| seen = Some((failure, stdout.to_string()))),
    )
    .await?;

    let elapsed = started.elapsed();
    assert!(
        elapsed < Duration::from_millis(1000),
        "end_with took {elapsed:?} despite a 100ms timeout"
    );
    match seen {
        Some((Some(Failure::Process(e)), stdout)) => {
            assert!(e.killed);
            assert_eq!(stdout, "before\n", "output read before the kill is kept");
        }
        other => panic!("expected a killed process error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn missing_cwd_becomes_a_process_error() -> TestResult {
    let spawner = ShellSpawner::with_config(ShellConfig::default())?;
    let options = SpawnOptions {
        cwd: Some("/definitely/not/a/real/dir".into()),
        ..SpawnOptions::default()
    };

    let report = with_timeout(spawner.spawn("true", &options)).await;

    let err = report.error.expect("spawning in a missing dir must fail");
    assert_eq!(err.code, -1);
    assert!(err.message.contains("spawning process"));
    Ok(())
}

#[tokio::test]
async fn alternative_shell_can_be_configured() -> TestResult {
    let spawner = ShellSpawner::with_config(ShellConfig::new("/bin/sh", "-c"))?;
    assert_eq!(spawner.config().program, "/bin/sh");

    let report = with_timeout(spawner.spawn("printf abc", &SpawnOptions::default())).await;
    assert_eq!(report.stdout, "abc");
    assert!(Regex::new("^a")?.is_match(&report.stdout));
    Ok(())
}

#[test]
fn empty_shell_program_is_rejected() {
    let err = ShellSpawner::with_config(ShellConfig::new("", "-c")).unwrap_err();
    assert!(matches!(err, ShellTestError::Config(_)));
}
