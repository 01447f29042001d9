//! Re-reading a wheel and checking its `RECORD`

use std::io::Read;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::metadata::{IntegrityRecord, RECORD_FILE, RecordRow};
use crate::{PackageError, Result};

/// A wheel whose `RECORD` matched its contents
#[derive(Debug)]
pub struct VerifiedWheel {
    /// The verified file
    pub path: PathBuf,

    /// Member names in archive order
    pub members: Vec<String>,

    /// The parsed `RECORD`, in the same order
    pub record: Vec<RecordRow>,
}

/// Open a wheel and check that `RECORD` describes it exactly
///
/// Every member must have exactly one row, in archive order, whose hash and
/// size match the member's bytes. The row of `RECORD` itself must leave both
/// fields empty.
pub fn verify_wheel(path: &Path) -> Result<VerifiedWheel> {
    let invalid = |reason: String| PackageError::InvalidRecord {
        path: path.to_path_buf(),
        reason,
    };

    let mut archive = ZipArchive::new(fs_err::File::open(path)?)?;

    let mut members = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        members.push((file.name().to_string(), content));
    }

    let record_suffix = format!(".dist-info/{RECORD_FILE}");
    let mut records = members.iter().filter(|(name, _)| {
        name.strip_suffix(&record_suffix)
            .is_some_and(|dist_info| !dist_info.contains('/'))
    });
    let (record_path, record_content) = records
        .next()
        .ok_or_else(|| invalid("no .dist-info/RECORD member".to_string()))?;
    if records.next().is_some() {
        return Err(invalid("more than one RECORD member".to_string()));
    }

    let record_text = std::str::from_utf8(record_content)
        .map_err(|_| invalid("RECORD is not valid UTF-8".to_string()))?;
    let record = IntegrityRecord::parse(record_text)
        .map_err(|line| invalid(format!("malformed line {line}")))?;

    if record.len() != members.len() {
        return Err(invalid(format!(
            "{} rows for {} archive members",
            record.len(),
            members.len()
        )));
    }

    for (row, (name, content)) in record.iter().zip(&members) {
        if &row.path != name {
            return Err(invalid(format!(
                "expected a row for '{name}' but found '{}'",
                row.path
            )));
        }

        if name == record_path {
            if row.hash.is_some() || row.size.is_some() {
                return Err(invalid("the row for RECORD itself must be empty".to_string()));
            }
        } else if !row.matches(content) {
            return Err(invalid(format!("hash or size mismatch for '{name}'")));
        }
    }

    tracing::debug!("Verified {} members of {}", members.len(), path.display());

    Ok(VerifiedWheel {
        path: path.to_path_buf(),
        members: members.into_iter().map(|(name, _)| name).collect(),
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archiver::PackageWriter;
    use crate::manifest::ManifestEntry;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    #[test]
    fn test_verify_written_wheel() -> Result<()> {
        let output_dir = tempfile::tempdir()?;
        let path = output_dir.path().join("tool-1.0-py2.py3-none-any.whl");
        let entries = vec![
            ManifestEntry::new("tool.py", "x = 1\n"),
            ManifestEntry::new("tool-1.0.dist-info/METADATA", "Metadata-Version: 2.1\n"),
        ];
        PackageWriter::new(6).write(&path, &entries, "tool-1.0.dist-info/RECORD")?;

        let verified = verify_wheel(&path)?;
        assert_eq!(
            verified.members,
            vec![
                "tool.py",
                "tool-1.0.dist-info/METADATA",
                "tool-1.0.dist-info/RECORD"
            ]
        );
        assert_eq!(verified.record.len(), 3);

        Ok(())
    }

    #[test]
    fn test_verify_quoted_member_names() -> Result<()> {
        let output_dir = tempfile::tempdir()?;
        let path = output_dir.path().join("odd-1.0-py2.py3-none-any.whl");
        let entries = vec![
            ManifestEntry::new("odd/__init__.py", ""),
            ManifestEntry::new("odd/two\nlines, \"quoted\".txt", "data"),
        ];
        PackageWriter::new(6).write(&path, &entries, "odd-1.0.dist-info/RECORD")?;

        let verified = verify_wheel(&path)?;
        assert_eq!(verified.record.len(), 3);
        assert_eq!(verified.record[1].path, "odd/two\nlines, \"quoted\".txt");

        Ok(())
    }

    #[test]
    fn test_verify_detects_tampering() -> Result<()> {
        let output_dir = tempfile::tempdir()?;
        let path = output_dir.path().join("bad.whl");

        let record = format!(
            "tool.py,sha256={},6\ntool-1.0.dist-info/RECORD,,\n",
            crate::metadata::record_digest(b"x = 1\n")
        );

        let mut zip = zip::ZipWriter::new(fs_err::File::create(&path)?);
        zip.start_file("tool.py", SimpleFileOptions::default())?;
        zip.write_all(b"x = 2\n")?;
        zip.start_file("tool-1.0.dist-info/RECORD", SimpleFileOptions::default())?;
        zip.write_all(record.as_bytes())?;
        zip.finish()?;

        let err = verify_wheel(&path).unwrap_err();
        assert!(matches!(err, PackageError::InvalidRecord { .. }));
        assert!(err.to_string().contains("tool.py"));

        Ok(())
    }
}
