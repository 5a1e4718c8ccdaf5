use crate::error::EmbedError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKey {
    Linux,
    Win,
    MacOsX,
}

impl PlatformKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKey::Linux => "linux",
            PlatformKey::Win => "win",
            PlatformKey::MacOsX => "macosx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    X86_64,
    I686,
}

impl Arch {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::I686 => "i686",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub key: PlatformKey,
    pub arch: Arch,
}

impl Platform {
    /// Normalizes raw host strings (e.g. `std::env::consts::OS` or a JVM-style
    /// `os.name`) into a platform key and bit-width tag.
    ///
    /// `mac` is tested before `win` because `darwin` contains `win`.
    pub fn detect(host_os: &str, host_arch: &str) -> Result<Self, EmbedError> {
        let os = host_os.to_lowercase();
        let key = if os.contains("linux") {
            PlatformKey::Linux
        } else if os.contains("mac") {
            PlatformKey::MacOsX
        } else if os.contains("win") {
            PlatformKey::Win
        } else {
            return Err(EmbedError::UnsupportedPlatform {
                os: host_os.to_string(),
                arch: host_arch.to_string(),
            });
        };

        let arch = if host_arch.contains("64") {
            Arch::X86_64
        } else {
            Arch::I686
        };

        Ok(Self { key, arch })
    }

    pub fn current() -> Result<Self, EmbedError> {
        Self::detect(std::env::consts::OS, std::env::consts::ARCH)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.key.as_str(), self.arch.as_str())
    }
}
