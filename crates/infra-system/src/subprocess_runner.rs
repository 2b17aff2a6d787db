// Subprocess runner implementation
// reason: async-trait, tokio for process management
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::info;

use ldbview_core::port::command_runner::{CommandResult, CommandRunner, Invocation, RunnerError};
use ldbview_core::port::TimeProvider;

/// Subprocess runner.
/// Spawns the tool with stdin closed and waits for it; no timeout, no retry.
pub struct SubprocessRunner {
    time_provider: Arc<dyn TimeProvider>,
}

impl SubprocessRunner {
    /// Create a new subprocess runner
    ///
    /// # Arguments
    /// * `time_provider` - Time provider for duration tracking
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self { time_provider }
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(
        &self,
        invocation: &Invocation,
    ) -> Result<std::process::Output, RunnerError> {
        let child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                RunnerError::SpawnFailed(format!("{}: {}", invocation.program.display(), e))
            })?;

        child
            .wait_with_output()
            .await
            .map_err(|e| RunnerError::IoError(e.to_string()))
    }

    /// Build command result from process output
    fn build_result(&self, output: std::process::Output, duration_ms: i64) -> CommandResult {
        CommandResult {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration_ms,
        }
    }
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandResult, RunnerError> {
        let start_time = self.time_provider.now_millis();

        info!(
            program = %invocation.program.display(),
            args = ?invocation.args,
            "Starting subprocess"
        );

        let output = self.spawn_and_wait(invocation).await?;

        let duration_ms = self.time_provider.now_millis() - start_time;
        let result = self.build_result(output, duration_ms);

        info!(
            program = %invocation.program.display(),
            duration_ms = %duration_ms,
            exit_code = ?result.exit_code,
            stdout_bytes = result.stdout.len(),
            stderr_bytes = result.stderr.len(),
            "Subprocess completed"
        );

        Ok(result)
    }
}
