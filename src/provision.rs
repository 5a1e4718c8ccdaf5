use crate::archive::{ArchiveFormat, ArchiveReader};
use crate::config::Configuration;
use crate::error::EmbedError;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedBinary {
    pub path: PathBuf,
    pub archive: String,
    pub sha256: String,
}

/// Downloads a release archive and materializes its binary in the installation folder.
pub struct ArchiveProvisioner {
    client: Client,
}

impl ArchiveProvisioner {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("phantomjs-embed"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    pub fn provision(
        &self,
        config: &Configuration,
        archive_name: &str,
    ) -> Result<ProvisionedBinary, EmbedError> {
        let format = ArchiveFormat::detect(archive_name)?;
        let url = format!("{}{}", config.download_url, archive_name);

        // Removed on every exit path when `workdir` drops.
        let workdir = tempfile::Builder::new()
            .prefix("phantomjs-embed-")
            .tempdir()?;
        let archive_path = download_path(workdir.path(), archive_name)?;

        info!(%url, "downloading phantomjs archive");
        self.download(&url, &archive_path)?;

        let entry_suffix = format!("/bin/{}", config.executable_name);
        let mut reader = ArchiveReader::open(&archive_path, format)?;
        let mut installed = None;
        reader.scan(|name, entry| {
            if !name.ends_with(&entry_suffix) {
                return Ok(false);
            }
            debug!(entry = name, "extracting binary entry");
            installed = Some(install_entry(
                entry,
                &config.target_installation_folder,
                &config.executable_name,
            )?);
            Ok(true)
        })?;

        let Some(path) = installed else {
            return Err(EmbedError::BinaryEntryNotFound {
                archive: archive_name.to_string(),
                entry: entry_suffix,
            });
        };

        let sha256 = sha256_file(&path)?;
        info!(path = %path.display(), %sha256, "installed phantomjs");

        Ok(ProvisionedBinary {
            path,
            archive: archive_name.to_string(),
            sha256,
        })
    }

    fn download(&self, url: &str, dest: &Path) -> Result<(), EmbedError> {
        let failure = |details: String| EmbedError::DownloadFailure {
            url: url.to_string(),
            details,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|err| failure(err.to_string()))?;

        if !response.status().is_success() {
            return Err(failure(format!("status {}", response.status())));
        }

        let mut file = File::create(dest).map_err(|err| failure(err.to_string()))?;
        let bytes = response
            .copy_to(&mut file)
            .map_err(|err| failure(err.to_string()))?;
        file.flush().map_err(|err| failure(err.to_string()))?;
        debug!(%url, bytes, "download complete");

        Ok(())
    }
}

impl Default for ArchiveProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

/// Streams `entry` into a staging file beside the target and renames it into place,
/// so the final path never holds a partially written binary.
fn install_entry(
    entry: &mut dyn Read,
    target_dir: &Path,
    binary_name: &str,
) -> Result<PathBuf, EmbedError> {
    fs::create_dir_all(target_dir)?;

    let mut staged = tempfile::Builder::new()
        .prefix(".phantomjs-")
        .tempfile_in(target_dir)?;
    io::copy(entry, staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    set_executable(staged.path())?;

    let output = target_dir.join(binary_name);
    staged
        .persist(&output)
        .map_err(|err| EmbedError::Io(err.error))?;

    Ok(fs::canonicalize(&output)?)
}

fn set_executable(path: &Path) -> Result<(), EmbedError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(path, perms)?;
    }

    Ok(())
}

/// Only the final component of `archive_name` is used, so a catalog entry cannot place
/// the download outside `workdir`.
fn download_path(workdir: &Path, archive_name: &str) -> Result<PathBuf, EmbedError> {
    let file_name = Path::new(archive_name)
        .file_name()
        .ok_or_else(|| EmbedError::UnsupportedArchiveFormat(archive_name.to_string()))?;
    Ok(workdir.join(file_name))
}

fn sha256_file(path: &Path) -> Result<String, EmbedError> {
    let mut hasher = Sha256::new();
    io::copy(&mut File::open(path)?, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
