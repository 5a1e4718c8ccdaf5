use crate::error::{CatalogError, EmbedError};
use crate::platform::{Platform, PlatformKey};
use crate::version::Version;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUNDLED: &str = include_str!("../resources/catalog.properties");
const ARCH_PLACEHOLDER: &str = "%s";

/// Lookup table from `<version>.<platform>.name` to a downloadable archive file name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::parse(BUNDLED)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let mut entries = HashMap::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some((key, value)) = line.split_once(['=', ':']) else {
                return Err(CatalogError::Malformed {
                    line: index + 1,
                    content: line.to_string(),
                });
            };

            entries.insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Archive file name for `version` on `platform`, with the architecture tag
    /// substituted on Linux.
    pub fn archive_name(&self, version: Version, platform: &Platform) -> Result<String, EmbedError> {
        let key = format!("{}.{}.name", version.description(), platform.key.as_str());
        let template = self
            .entries
            .get(&key)
            .ok_or_else(|| EmbedError::UnknownArchiveName {
                version: version.to_string(),
                platform: platform.key.as_str().to_string(),
            })?;

        if platform.key == PlatformKey::Linux {
            Ok(template.replacen(ARCH_PLACEHOLDER, platform.arch.as_str(), 1))
        } else {
            Ok(template.clone())
        }
    }
}
