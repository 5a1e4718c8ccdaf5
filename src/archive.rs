use crate::error::EmbedError;
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fmt::Display;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;
use tar::Archive;
use zip::ZipArchive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    TarGzip,
    TarBzip2,
}

impl ArchiveFormat {
    pub fn detect(name: &str) -> Result<Self, EmbedError> {
        let lower = name.to_lowercase();
        if lower.ends_with(".zip") {
            Ok(ArchiveFormat::Zip)
        } else if lower.ends_with(".bz2") {
            Ok(ArchiveFormat::TarBzip2)
        } else if lower.ends_with(".gz") {
            Ok(ArchiveFormat::TarGzip)
        } else {
            Err(EmbedError::UnsupportedArchiveFormat(name.to_string()))
        }
    }
}

/// An opened archive of one of the supported container formats.
pub enum ArchiveReader<R: Read + Seek> {
    Zip(ZipArchive<R>),
    TarGzip(Archive<GzDecoder<R>>),
    TarBzip2(Archive<BzDecoder<R>>),
}

impl ArchiveReader<File> {
    pub fn open(path: &Path, format: ArchiveFormat) -> Result<Self, EmbedError> {
        let file = File::open(path)?;
        Self::new(format, file)
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    pub fn new(format: ArchiveFormat, reader: R) -> Result<Self, EmbedError> {
        Ok(match format {
            ArchiveFormat::Zip => ArchiveReader::Zip(ZipArchive::new(reader).map_err(archive_err)?),
            ArchiveFormat::TarGzip => ArchiveReader::TarGzip(Archive::new(GzDecoder::new(reader))),
            ArchiveFormat::TarBzip2 => {
                ArchiveReader::TarBzip2(Archive::new(BzDecoder::new(reader)))
            }
        })
    }

    /// Hands each regular-file entry, in archive order, to `visit` together with a
    /// reader over its contents. Stops at the first entry `visit` accepts and
    /// returns whether one was accepted.
    pub fn scan<F>(&mut self, mut visit: F) -> Result<bool, EmbedError>
    where
        F: FnMut(&str, &mut dyn Read) -> Result<bool, EmbedError>,
    {
        match self {
            ArchiveReader::Zip(archive) => {
                for index in 0..archive.len() {
                    let mut file = archive.by_index(index).map_err(archive_err)?;
                    if file.is_dir() {
                        continue;
                    }
                    let name = file.name().to_string();
                    if visit(&name, &mut file)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            ArchiveReader::TarGzip(archive) => scan_tar(archive, visit),
            ArchiveReader::TarBzip2(archive) => scan_tar(archive, visit),
        }
    }
}

fn scan_tar<R, F>(archive: &mut Archive<R>, mut visit: F) -> Result<bool, EmbedError>
where
    R: Read,
    F: FnMut(&str, &mut dyn Read) -> Result<bool, EmbedError>,
{
    for entry in archive.entries().map_err(archive_err)? {
        let mut entry = entry.map_err(archive_err)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        if visit(&name, &mut entry)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn archive_err(err: impl Display) -> EmbedError {
    EmbedError::Archive(err.to_string())
}
