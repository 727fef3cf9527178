// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Candidate files handed to the validator and the archive members they expose.

use std::fs::{self, File};
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use zip::ZipArchive;

/// One member of a zip archive, as listed from its central directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub path: String,
    pub size: u64,
    pub is_dir: bool,
}

/// A byte-bearing upload candidate.
///
/// The validator only borrows candidates for the duration of a call.
pub trait CandidateFile {
    /// MIME type declared by the uploader, as supplied (not sniffed).
    fn mime_type(&self) -> &str;

    /// Length of the file in bytes.
    fn size_bytes(&self) -> u64;

    /// List archive members.
    ///
    /// # Errors
    ///
    /// Returns an error when the bytes cannot be read or are not a zip archive.
    fn archive_entries(&self) -> Result<Vec<ArchiveEntry>>;
}

/// Read every member name and size from a zip archive without extracting it.
///
/// Uses raw entry access so encrypted or oddly compressed members are still
/// listed instead of failing the whole read.
pub fn read_archive_entries<R: Read + Seek>(reader: R) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(reader).context("Failed to open zip archive")?;
    let mut entries = Vec::with_capacity(archive.len());
    for idx in 0..archive.len() {
        let member = archive
            .by_index_raw(idx)
            .with_context(|| format!("Failed to read zip entry #{idx}"))?;
        entries.push(ArchiveEntry {
            path: member.name().to_string(),
            size: member.size(),
            is_dir: member.is_dir(),
        });
    }
    Ok(entries)
}

/// Upload candidate held fully in memory.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }
}

impl CandidateFile for UploadFile {
    fn mime_type(&self) -> &str {
        &self.mime
    }

    fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    fn archive_entries(&self) -> Result<Vec<ArchiveEntry>> {
        read_archive_entries(Cursor::new(self.bytes.as_slice()))
            .with_context(|| format!("Failed to list archive {}", self.name))
    }
}

/// Upload candidate backed by a file on disk; bytes are read only when listing members.
#[derive(Clone, Debug)]
pub struct DiskFile {
    path: PathBuf,
    mime: String,
    size: u64,
}

impl DiskFile {
    /// Stat `path` and pair it with a declared MIME type.
    ///
    /// # Errors
    ///
    /// Returns an error when the file metadata cannot be read.
    pub fn open(path: &Path, mime: impl Into<String>) -> Result<Self> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to stat upload {:?}", path))?;
        Ok(Self {
            path: path.to_path_buf(),
            mime: mime.into(),
            size: metadata.len(),
        })
    }

    /// Like [`DiskFile::open`], with the declared type guessed from the file name.
    pub fn open_guessed(path: &Path) -> Result<Self> {
        Self::open(path, crate::utils::guess_mime(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CandidateFile for DiskFile {
    fn mime_type(&self) -> &str {
        &self.mime
    }

    fn size_bytes(&self) -> u64 {
        self.size
    }

    fn archive_entries(&self) -> Result<Vec<ArchiveEntry>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open upload {:?}", self.path))?;
        read_archive_entries(file)
            .with_context(|| format!("Failed to list archive {:?}", self.path))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};

    use zip::{CompressionMethod, ZipWriter, write::FileOptions};

    /// Build a zip in memory; names ending in `/` become directories.
    pub fn zip_bytes(names: &[&str]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions<'_, ()> =
            FileOptions::default().compression_method(CompressionMethod::Deflated);
        for name in names {
            if name.ends_with('/') {
                zip.add_directory(*name, options).unwrap();
            } else {
                zip.start_file(*name, options).unwrap();
                zip.write_all(b"{}").unwrap();
            }
        }
        zip.finish().unwrap().into_inner()
    }
}
