use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("unsupported platform: {os}-{arch}")]
    UnsupportedPlatform { os: String, arch: String },
    #[error("no archive name in catalog for version {version} on {platform}")]
    UnknownArchiveName { version: String, platform: String },
    #[error("version {0} is not available for download")]
    UnsupportedVersionForDownload(String),
    #[error("unsupported archive format: {0}")]
    UnsupportedArchiveFormat(String),
    #[error("download of {url} failed: {details}")]
    DownloadFailure { url: String, details: String },
    #[error("archive {archive} has no entry ending with '{entry}'")]
    BinaryEntryNotFound { archive: String, entry: String },
    #[error("failed to execute '{program}': {source}")]
    ExecutionFailure {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("archive error: {0}")]
    Archive(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed catalog line {line}: '{content}'")]
    Malformed { line: usize, content: String },
    #[error("catalog io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown phantomjs version: {0}")]
    UnknownVersion(String),
}
