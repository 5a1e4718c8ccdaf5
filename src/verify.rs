use crate::command::{CommandRunner, RunOptions};
use crate::version::Version;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Probes a candidate executable with `--version`. Every failure mode collapses to
/// "not usable"; nothing here returns an error.
#[derive(Clone)]
pub struct VersionVerifier {
    runner: Arc<dyn CommandRunner>,
    options: RunOptions,
}

impl VersionVerifier {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            options: RunOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn detect(&self, program: &Path) -> Option<Version> {
        let output = match self
            .runner
            .run(program, &[OsStr::new("--version")], &self.options)
        {
            Ok(output) => output,
            Err(err) => {
                warn!(program = %program.display(), error = %err, "version probe failed");
                return None;
            }
        };

        if !output.status.success() {
            warn!(
                program = %program.display(),
                status = %output.status,
                "version probe exited unsuccessfully"
            );
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match Version::from_output(&stdout) {
            Some(version) => {
                debug!(program = %program.display(), %version, "verified executable");
                Some(version)
            }
            None => {
                warn!(
                    program = %program.display(),
                    output = %stdout.trim(),
                    "unrecognized version output"
                );
                None
            }
        }
    }

    pub fn verify(&self, program: &Path) -> bool {
        self.detect(program).is_some()
    }
}
