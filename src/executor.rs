use crate::catalog::Catalog;
use crate::command::{CommandRunner, SystemCommandRunner};
use crate::config::Configuration;
use crate::error::EmbedError;
use crate::locator::ExecutableLocator;
use crate::provision::ArchiveProvisioner;
use crate::runner::ProcessRunner;
use crate::verify::VersionVerifier;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A PhantomJS executable resolved once at construction and reused for every run.
pub struct PhantomJs {
    executable: PathBuf,
    runner: ProcessRunner,
}

impl PhantomJs {
    pub fn new(configuration: Configuration) -> Result<Self, EmbedError> {
        Self::with_runner(configuration, Arc::new(SystemCommandRunner))
    }

    pub fn with_runner(
        configuration: Configuration,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<Self, EmbedError> {
        let catalog = match &configuration.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::bundled()?,
        };
        let verifier =
            VersionVerifier::new(runner.clone()).with_options(configuration.probe_options());
        let locator = ExecutableLocator::new(catalog, verifier, ArchiveProvisioner::new());
        let executable = locator.resolve(&configuration)?;
        let runner = ProcessRunner::new(runner, configuration.run_options());

        Ok(Self { executable, runner })
    }

    /// Runs the executable with `script` as its only argument and returns stdout.
    pub fn execute(&self, script: &Path) -> Result<String, EmbedError> {
        self.runner.run(&self.executable, script)
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }
}
