use std::sync::{Arc, Mutex};

use shelltest::errors::ProcessError;
use shelltest::exec::{ProcessReport, SpawnFuture, SpawnOptions, Spawner};

/// One recorded `Spawner::spawn` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnCall {
    pub command: String,
    pub options: SpawnOptions,
}

/// A fake spawner that:
/// - records every `(command, options)` it is asked to run
/// - immediately yields the currently configured report.
#[derive(Debug, Clone)]
pub struct FakeSpawner {
    report: Arc<Mutex<ProcessReport>>,
    calls: Arc<Mutex<Vec<SpawnCall>>>,
}

impl FakeSpawner {
    pub fn new(report: ProcessReport) -> Self {
        Self {
            report: Arc::new(Mutex::new(report)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Yields a clean exit with the given output.
    pub fn succeeding(stdout: &str, stderr: &str) -> Self {
        Self::new(ProcessReport::success(stdout, stderr))
    }

    /// Yields a process error with `code` and the given output.
    pub fn failing(code: i32, stdout: &str, stderr: &str) -> Self {
        Self::new(ProcessReport::failure(process_error(code), stdout, stderr))
    }

    /// Change what subsequent spawns yield.
    pub fn set_report(&self, report: ProcessReport) {
        *self.report.lock().unwrap() = report;
    }

    pub fn calls(&self) -> Vec<SpawnCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent call; panics if nothing was spawned.
    pub fn last_call(&self) -> SpawnCall {
        self.calls
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("FakeSpawner was never called")
    }

    pub fn as_spawner(&self) -> Arc<dyn Spawner> {
        Arc::new(self.clone())
    }
}

impl Spawner for FakeSpawner {
    fn spawn<'a>(&'a self, command: &'a str, options: &'a SpawnOptions) -> SpawnFuture<'a> {
        let report = self.report.lock().unwrap().clone();
        self.calls.lock().unwrap().push(SpawnCall {
            command: command.to_string(),
            options: options.clone(),
        });

        Box::pin(async move { report })
    }
}

/// A bare process error carrying only an exit code.
pub fn process_error(code: i32) -> ProcessError {
    ProcessError::exited("fake", code)
}
