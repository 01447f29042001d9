//! Wheel archive writer

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Datelike, Timelike, Utc};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::manifest::ManifestEntry;
use crate::metadata::{IntegrityRecord, RecordRow};
use crate::{PackageError, Result};

/// Permissions stored for every member, independent of the host
const MEMBER_PERMISSIONS: u32 = 0o644;

/// Writer for creating wheel archives
///
/// Every member is deflated at the same level and stamped with the same
/// time, so the output only depends on the entries.
pub struct PackageWriter {
    /// Deflate level
    compression_level: u8,

    /// Timestamp for reproducible builds. `None` means 1980-01-01T00:00:00,
    /// the earliest time a zip header can hold.
    timestamp: Option<DateTime<Utc>>,
}

impl PackageWriter {
    /// Create a new PackageWriter
    pub fn new(compression_level: u8) -> Self {
        Self {
            compression_level,
            timestamp: None,
        }
    }

    /// Set the timestamp stored for every member
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    fn file_options(&self) -> Result<SimpleFileOptions> {
        let modified = match &self.timestamp {
            Some(timestamp) => zip_timestamp(timestamp)?,
            None => zip::DateTime::default(),
        };

        Ok(SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(self.compression_level)))
            .last_modified_time(modified)
            .unix_permissions(MEMBER_PERMISSIONS))
    }

    /// Write a wheel to the given output file
    ///
    /// The entries are written in order and hashed as they go. `RECORD` is
    /// then appended at `record_path` as the last member. The archive is
    /// assembled in a temporary file next to `output_path` and only renamed
    /// into place once it is complete; on error the temporary file is removed.
    ///
    /// Returns the rows of the written `RECORD`.
    pub fn write(
        &self,
        output_path: &Path,
        entries: &[ManifestEntry],
        record_path: &str,
    ) -> Result<Vec<RecordRow>> {
        let options = self.file_options()?;

        let output_dir = match output_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs_err::create_dir_all(output_dir)?;

        let mut builder = tempfile::Builder::new();
        builder.prefix(".wheel-build-").suffix(".whl.part");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o644));
        }
        let mut temp_file = builder.tempfile_in(output_dir)?;

        let mut record = IntegrityRecord::new();
        let mut zip = ZipWriter::new(temp_file.as_file_mut());

        for entry in entries {
            zip.start_file(entry.archive_path.as_str(), options)?;
            zip.write_all(&entry.content)?;
            record.add(entry.archive_path.as_str(), &entry.content);
            tracing::debug!(
                "Added {} ({} bytes)",
                entry.archive_path,
                entry.content.len()
            );
        }

        let (rows, record_content) = record.finish(record_path);
        zip.start_file(record_path, options)?;
        zip.write_all(record_content.as_bytes())?;
        zip.finish()?;

        temp_file.as_file().sync_all()?;
        // the error owns the temporary file; drop it here so it is removed right away
        temp_file
            .persist(output_path)
            .map_err(|e| PackageError::Io(e.error))?;

        Ok(rows)
    }
}

/// Convert to the (DOS) time format of zip headers
fn zip_timestamp(timestamp: &DateTime<Utc>) -> Result<zip::DateTime> {
    let invalid = || PackageError::InvalidTimestamp(timestamp.to_rfc3339());
    let year = u16::try_from(timestamp.year()).map_err(|_| invalid())?;

    zip::DateTime::from_date_and_time(
        year,
        timestamp.month() as u8,
        timestamp.day() as u8,
        timestamp.hour() as u8,
        timestamp.minute() as u8,
        timestamp.second() as u8,
    )
    .map_err(|_| invalid())
}
