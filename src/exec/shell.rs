// src/exec/shell.rs

//! Production spawner running commands through the system shell.

use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::config::ShellConfig;
use crate::errors::ProcessError;
use crate::exec::{ProcessReport, SpawnFuture, SpawnOptions, Spawner};

/// How long pipe readers may keep draining after a timed out process was
/// killed. Grandchildren started by the shell can hold the pipes open
/// indefinitely.
const KILLED_DRAIN_GRACE: Duration = Duration::from_millis(50);

/// Spawner that runs `<program> <flag> <command>` (by default `sh -c`) via
/// `tokio::process::Command`, capturing stdout and stderr.
#[derive(Debug, Clone)]
pub struct ShellSpawner {
    config: ShellConfig,
}

impl ShellSpawner {
    /// Spawner using [`ShellConfig::from_env`].
    pub fn new() -> crate::errors::Result<Self> {
        Self::with_config(ShellConfig::from_env())
    }

    pub fn with_config(config: ShellConfig) -> crate::errors::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    async fn run(&self, command: &str, options: &SpawnOptions) -> Result<ProcessReport> {
        info!(
            shell = %self.config.program,
            cmd = %command,
            "starting command process"
        );
        debug!(?options, "spawn options");

        let mut cmd = Command::new(&self.config.program);
        cmd.arg(&self.config.flag).arg(command);

        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }
        if let Some(env) = &options.env {
            cmd.env_clear().envs(env);
        }
        apply_identity(&mut cmd, options);

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning process for command '{command}'"))?;

        let stdout_capture = Capture::spawn(child.stdout.take());
        let stderr_capture = Capture::spawn(child.stderr.take());

        let (status, killed) = match options.timeout {
            Some(ms) if ms > 0 => {
                let waited = tokio::time::timeout(Duration::from_millis(ms), child.wait()).await;
                match waited {
                    Ok(status) => (status, false),
                    Err(_) => {
                        warn!(cmd = %command, timeout_ms = ms, "timeout elapsed; killing process");
                        if let Err(e) = child.kill().await {
                            warn!(cmd = %command, error = %e, "failed to kill timed out process");
                        }
                        (child.wait().await, true)
                    }
                }
            }
            _ => (child.wait().await, false),
        };
        let status =
            status.with_context(|| format!("waiting for process of command '{command}'"))?;

        let grace = killed.then_some(KILLED_DRAIN_GRACE);
        let stdout = stdout_capture.finish(grace).await;
        let stderr = stderr_capture.finish(grace).await;

        let code = status.code().unwrap_or(-1);
        info!(
            cmd = %command,
            exit_code = code,
            success = status.success(),
            killed,
            "command process exited"
        );
        if !stderr.is_empty() {
            debug!(cmd = %command, "stderr: {}", stderr);
        }

        let error = if status.success() && !killed {
            None
        } else {
            Some(ProcessError {
                code,
                signal: exit_signal(&status),
                killed,
                message: format!("Command failed: {command}"),
            })
        };

        Ok(ProcessReport {
            error,
            stdout,
            stderr,
        })
    }
}

impl Spawner for ShellSpawner {
    fn spawn<'a>(&'a self, command: &'a str, options: &'a SpawnOptions) -> SpawnFuture<'a> {
        Box::pin(async move {
            match self.run(command, options).await {
                Ok(report) => report,
                Err(err) => {
                    error!(cmd = %command, error = %err, "command execution error");
                    ProcessReport::failure(
                        ProcessError {
                            code: -1,
                            signal: None,
                            killed: false,
                            message: format!("{err:#}"),
                        },
                        String::new(),
                        String::new(),
                    )
                }
            }
        })
    }
}

/// Background reader collecting a child pipe into a shared buffer, so the
/// bytes read so far survive aborting the reader.
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    task: JoinHandle<()>,
}

impl Capture {
    fn spawn<R>(stream: Option<R>) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);

        let task = tokio::spawn(async move {
            let Some(mut stream) = stream else {
                return;
            };
            let mut chunk = [0u8; 8192];
            loop {
                match stream.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => lock(&sink).extend_from_slice(&chunk[..n]),
                    Err(e) => {
                        warn!(error = %e, "failed to read child output");
                        break;
                    }
                }
            }
        });

        Self { buf, task }
    }

    /// Wait for the reader to hit EOF, or at most `grace` before aborting
    /// it. Returns what was read, decoded lossily as UTF-8.
    async fn finish(mut self, grace: Option<Duration>) -> String {
        let joined = match grace {
            Some(grace) => tokio::time::timeout(grace, &mut self.task).await.ok(),
            None => Some((&mut self.task).await),
        };
        match joined {
            Some(Ok(())) => {}
            Some(Err(e)) => warn!(error = %e, "output reader task failed"),
            None => {
                debug!("output pipe still open after kill; abandoning reader");
                self.task.abort();
            }
        }
        String::from_utf8_lossy(&lock(&self.buf)).into_owned()
    }
}

fn lock(buf: &Mutex<Vec<u8>>) -> std::sync::MutexGuard<'_, Vec<u8>> {
    buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(unix)]
fn apply_identity(cmd: &mut Command, options: &SpawnOptions) {
    if let Some(uid) = options.uid {
        cmd.uid(uid);
    }
    if let Some(gid) = options.gid {
        cmd.gid(gid);
    }
}

#[cfg(not(unix))]
fn apply_identity(_cmd: &mut Command, options: &SpawnOptions) {
    if options.uid.is_some() || options.gid.is_some() {
        warn!("uid/gid are only supported on unix; ignoring");
    }
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
