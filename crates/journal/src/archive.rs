//! Compressed archives of checkpoint contents (`files.tar.gz`)

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::Path;
use tracing::{debug, warn};

/// Outcome of building an archive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveReport {
    /// Files written into the archive
    pub archived: usize,
    /// Files that disappeared between enumeration and archiving
    pub vanished: Vec<String>,
}

/// Build a gzip-compressed tar of `files`, rooted at `root`
///
/// Entry names are the project-relative paths, so extracting over the
/// project root puts every file back where it was. A file that vanished
/// since enumeration is skipped; any other I/O error aborts.
pub fn build_archive(root: &Path, files: &[String], dest: &Path) -> Result<ArchiveReport> {
    let out = File::create(dest)
        .with_context(|| format!("Failed to create archive {}", dest.display()))?;
    let encoder = GzEncoder::new(BufWriter::new(out), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);

    let mut report = ArchiveReport::default();
    for rel in files {
        let mut file = match File::open(root.join(rel)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("File vanished before archiving: {}", rel);
                report.vanished.push(rel.clone());
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open {}", rel));
            }
        };

        builder
            .append_file(rel, &mut file)
            .with_context(|| format!("Failed to archive {}", rel))?;
        report.archived += 1;
    }

    let encoder = builder.into_inner().context("Failed to finish archive")?;
    let mut writer = encoder.finish().context("Failed to finish compression")?;
    std::io::Write::flush(&mut writer)?;
    writer
        .into_inner()
        .map_err(|e| e.into_error())
        .context("Failed to flush archive")?
        .sync_all()?;

    debug!(
        "Archived {} files into {} ({} vanished)",
        report.archived,
        dest.display(),
        report.vanished.len()
    );
    Ok(report)
}

/// Extract an archive over `root`, overwriting files it contains
///
/// Returns the number of entries unpacked. Entries that would escape `root`
/// are refused by `tar`.
pub fn extract_archive(archive: &Path, root: &Path) -> Result<usize> {
    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));
    tar.set_overwrite(true);
    tar.set_preserve_mtime(true);

    let mut count = 0usize;
    for entry in tar.entries().context("Failed to read archive")? {
        let mut entry = entry.context("Corrupt archive entry")?;
        let unpacked = entry
            .unpack_in(root)
            .with_context(|| format!("Failed to extract into {}", root.display()))?;
        if unpacked {
            count += 1;
        }
    }

    debug!("Extracted {} entries from {}", count, archive.display());
    Ok(count)
}

/// List entry names stored in an archive
pub fn archive_entries(archive: &Path) -> Result<Vec<String>> {
    let file = File::open(archive)
        .with_context(|| format!("Failed to open archive {}", archive.display()))?;
    let mut tar = tar::Archive::new(GzDecoder::new(BufReader::new(file)));

    let mut names = Vec::new();
    for entry in tar.entries()? {
        let entry = entry?;
        names.push(rw_core::to_store_path(&entry.path()?));
    }
    Ok(names)
}
