use crate::command::RunOptions;
use crate::error::ConfigError;
use crate::version::Version;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DOWNLOAD_URL: &str = "https://bitbucket.org/ariya/phantomjs/downloads/";
pub const DEFAULT_NATIVE_COMMAND: &str = "phantomjs";

/// Inputs for one resolution cycle. Not mutated once resolution starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub version: Version,
    pub host_os: String,
    pub host_arch: String,
    pub download_url: String,
    pub target_installation_folder: PathBuf,
    pub check_native_installation: bool,
    /// Command probed on the search path when `check_native_installation` is set.
    pub native_command: String,
    /// File name of the provisioned binary inside `target_installation_folder`.
    pub executable_name: String,
    /// Replaces the bundled catalog when set.
    pub catalog_path: Option<PathBuf>,
    pub probe_timeout_secs: Option<u64>,
    pub run_timeout_secs: Option<u64>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            version: Version::default(),
            host_os: std::env::consts::OS.to_string(),
            host_arch: std::env::consts::ARCH.to_string(),
            download_url: DEFAULT_DOWNLOAD_URL.to_string(),
            target_installation_folder: default_installation_folder(),
            check_native_installation: true,
            native_command: DEFAULT_NATIVE_COMMAND.to_string(),
            executable_name: default_executable_name(),
            catalog_path: None,
            probe_timeout_secs: None,
            run_timeout_secs: None,
        }
    }
}

impl Configuration {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn default_path() -> Option<PathBuf> {
        let base = dirs::config_dir()?;
        Some(base.join("phantomjs-embed").join("config.json"))
    }

    pub fn installed_binary_path(&self) -> PathBuf {
        self.target_installation_folder.join(&self.executable_name)
    }

    pub fn probe_options(&self) -> RunOptions {
        RunOptions {
            timeout: self.probe_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            timeout: self.run_timeout_secs.map(Duration::from_secs),
        }
    }
}

fn default_installation_folder() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("phantomjs-embed")
        .join("bin")
}

fn default_executable_name() -> String {
    if cfg!(windows) {
        format!("{DEFAULT_NATIVE_COMMAND}.exe")
    } else {
        DEFAULT_NATIVE_COMMAND.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_host() {
        let config = Configuration::default();
        assert_eq!(config.version, Version::V1_9_8);
        assert_eq!(config.host_os, std::env::consts::OS);
        assert!(config.check_native_installation);
        assert_eq!(config.native_command, "phantomjs");
        assert!(config.download_url.ends_with('/'));
        assert!(config.target_installation_folder.ends_with("phantomjs-embed/bin"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Configuration = serde_json::from_str(
            r#"{"version":"2.1.1","check_native_installation":false,"run_timeout_secs":30}"#,
        )
        .expect("parse");

        assert_eq!(config.version, Version::V2_1_1);
        assert!(!config.check_native_installation);
        assert_eq!(config.run_options().timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.probe_options().timeout, None);
        assert_eq!(config.download_url, DEFAULT_DOWNLOAD_URL);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = serde_json::from_str::<Configuration>(r#"{"version":"9.9.9"}"#)
            .expect_err("unknown version");
        assert!(err.to_string().contains("unknown phantomjs version"));
    }

    #[test]
    fn load_missing_file_yields_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let config = Configuration::load(&temp.path().join("absent.json")).expect("load");
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn load_reads_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{"target_installation_folder":"/opt/phantomjs","executable_name":"pjs"}"#,
        )
        .expect("write");

        let config = Configuration::load(&path).expect("load");
        assert_eq!(
            config.installed_binary_path(),
            PathBuf::from("/opt/phantomjs/pjs")
        );
    }

    #[test]
    fn load_reports_parse_errors() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").expect("write");

        assert!(matches!(
            Configuration::load(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
