pub mod archive;
pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod executor;
pub mod locator;
pub mod platform;
pub mod provision;
pub mod runner;
pub mod verify;
pub mod version;

pub use archive::{ArchiveFormat, ArchiveReader};
pub use catalog::Catalog;
pub use command::{CommandRunner, RunOptions, SystemCommandRunner};
pub use config::Configuration;
pub use error::{CatalogError, ConfigError, EmbedError};
pub use executor::PhantomJs;
pub use locator::ExecutableLocator;
pub use platform::{Arch, Platform, PlatformKey};
pub use provision::{ArchiveProvisioner, ProvisionedBinary};
pub use runner::ProcessRunner;
pub use verify::VersionVerifier;
pub use version::Version;
