#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Shell script that reports `version` for `--version` and echoes its argument otherwise.
pub fn stub_script(version: &str) -> String {
    format!(
        "#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then\n  echo {version}\nelse\n  printf '%s' \"$1\"\nfi\n"
    )
}

pub fn write_executable(dir: &Path, name: &str, contents: &str) -> PathBuf {
    fs::create_dir_all(dir).expect("create stub dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write stub");
    let mut perms = fs::metadata(&path).expect("stub metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod stub");
    path
}

pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::FileOptions::default().unix_permissions(0o755);
    for (name, data) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer.write_all(data).expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

fn tar_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o755);
        builder
            .append_data(&mut header, name, *data)
            .expect("append tar entry");
    }
    builder.into_inner().expect("finish tar")
}

pub fn tar_gz_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(&tar_archive(entries))
        .expect("gzip tar");
    encoder.finish().expect("finish gzip")
}

pub fn tar_bz2_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut encoder = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::best());
    encoder
        .write_all(&tar_archive(entries))
        .expect("bzip2 tar");
    encoder.finish().expect("finish bzip2")
}
