use crate::catalog::Catalog;
use crate::config::Configuration;
use crate::error::EmbedError;
use crate::platform::Platform;
use crate::provision::ArchiveProvisioner;
use crate::verify::VersionVerifier;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Decides which executable to use: a native install, a previously provisioned
/// binary, or a fresh download, in that order.
///
/// Nothing is cached here; the caller keeps the resolved path for as long as it needs.
pub struct ExecutableLocator {
    catalog: Catalog,
    verifier: VersionVerifier,
    provisioner: ArchiveProvisioner,
}

impl ExecutableLocator {
    pub fn new(catalog: Catalog, verifier: VersionVerifier, provisioner: ArchiveProvisioner) -> Self {
        Self {
            catalog,
            verifier,
            provisioner,
        }
    }

    pub fn resolve(&self, config: &Configuration) -> Result<PathBuf, EmbedError> {
        if config.check_native_installation {
            let native = Path::new(&config.native_command);
            if self.verifier.verify(native) {
                info!(command = %config.native_command, "using native phantomjs installation");
                return Ok(native.to_path_buf());
            }
            debug!(command = %config.native_command, "no usable native installation");
        }

        let installed = config.installed_binary_path();
        if self.verifier.verify(&installed) {
            info!(path = %installed.display(), "using provisioned phantomjs");
            return Ok(installed);
        }

        if !config.version.download_supported() {
            return Err(EmbedError::UnsupportedVersionForDownload(
                config.version.to_string(),
            ));
        }

        let platform = Platform::detect(&config.host_os, &config.host_arch)?;
        let archive_name = self.catalog.archive_name(config.version, &platform)?;
        debug!(%platform, archive = %archive_name, "provisioning phantomjs");

        let provisioned = self.provisioner.provision(config, &archive_name)?;
        Ok(provisioned.path)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::verify::tests::MockCommandRunner;
    use crate::version::Version;
    use mockito::{Matcher, Server};
    use std::sync::Arc;

    fn locator(runner: Arc<MockCommandRunner>) -> ExecutableLocator {
        ExecutableLocator::new(
            Catalog::bundled().expect("catalog"),
            VersionVerifier::new(runner),
            ArchiveProvisioner::new(),
        )
    }

    fn config(server_url: &str, target: &Path) -> Configuration {
        Configuration {
            host_os: "linux".to_string(),
            host_arch: "x86_64".to_string(),
            download_url: format!("{server_url}/"),
            target_installation_folder: target.to_path_buf(),
            native_command: "phantomjs".to_string(),
            executable_name: "phantomjs".to_string(),
            ..Configuration::default()
        }
    }

    #[test]
    fn native_installation_wins_without_network() {
        let mut server = Server::new();
        let mock = server.mock("GET", Matcher::Any).expect(0).create();
        let temp = tempfile::tempdir().expect("tempdir");
        let runner = Arc::new(MockCommandRunner::default().respond("phantomjs", 0, "1.9.8\n"));

        let resolved = locator(runner.clone())
            .resolve(&config(&server.url(), temp.path()))
            .expect("resolve");

        mock.assert();
        assert_eq!(resolved, PathBuf::from("phantomjs"));
        assert_eq!(runner.calls.lock().expect("calls").len(), 1);
    }

    #[test]
    fn provisioned_binary_is_reused() {
        let mut server = Server::new();
        let mock = server.mock("GET", Matcher::Any).expect(0).create();
        let temp = tempfile::tempdir().expect("tempdir");
        let installed = temp.path().join("phantomjs");
        let runner = Arc::new(MockCommandRunner::default().respond(installed.clone(), 0, "2.1.1"));

        let mut config = config(&server.url(), temp.path());
        config.check_native_installation = false;
        let resolved = locator(runner.clone()).resolve(&config).expect("resolve");

        mock.assert();
        assert_eq!(resolved, installed);
        assert_eq!(*runner.calls.lock().expect("calls"), vec![installed]);
    }

    #[test]
    fn provisioned_binary_is_reused_when_native_probe_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let installed = temp.path().join("phantomjs");
        let runner = Arc::new(
            MockCommandRunner::default()
                .respond("phantomjs", 0, "not phantomjs")
                .respond(installed.clone(), 0, "1.9.2"),
        );

        let resolved = locator(runner)
            .resolve(&config("http://127.0.0.1:9", temp.path()))
            .expect("resolve");
        assert_eq!(resolved, installed);
    }

    #[test]
    fn restricted_version_is_not_downloaded() {
        let mut server = Server::new();
        let mock = server.mock("GET", Matcher::Any).expect(0).create();
        let temp = tempfile::tempdir().expect("tempdir");

        let mut config = config(&server.url(), temp.path());
        config.version = Version::V2_0_0;
        let err = locator(Arc::new(MockCommandRunner::default()))
            .resolve(&config)
            .expect_err("unsupported");

        mock.assert();
        assert!(matches!(
            err,
            EmbedError::UnsupportedVersionForDownload(ref version) if version == "2.0.0"
        ));
    }

    #[test]
    fn unknown_platform_fails_before_download() {
        let mut server = Server::new();
        let mock = server.mock("GET", Matcher::Any).expect(0).create();
        let temp = tempfile::tempdir().expect("tempdir");

        let mut config = config(&server.url(), temp.path());
        config.host_os = "haiku".to_string();
        let err = locator(Arc::new(MockCommandRunner::default()))
            .resolve(&config)
            .expect_err("unsupported platform");

        mock.assert();
        assert!(matches!(err, EmbedError::UnsupportedPlatform { .. }));
    }
}
