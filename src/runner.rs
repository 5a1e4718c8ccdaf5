use crate::command::{CommandRunner, RunOptions};
use crate::error::EmbedError;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Runs a resolved executable against a single input file and returns its stdout.
///
/// Stdout is returned whatever the exit status; PhantomJS reports script errors
/// in its output.
#[derive(Clone)]
pub struct ProcessRunner {
    runner: Arc<dyn CommandRunner>,
    options: RunOptions,
}

impl ProcessRunner {
    pub fn new(runner: Arc<dyn CommandRunner>, options: RunOptions) -> Self {
        Self { runner, options }
    }

    pub fn run(&self, executable: &Path, input: &Path) -> Result<String, EmbedError> {
        let output = self
            .runner
            .run(executable, &[input.as_os_str()], &self.options)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(
                program = %executable.display(),
                status = %output.status,
                stderr = %stderr.trim(),
                "process exited unsuccessfully"
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
