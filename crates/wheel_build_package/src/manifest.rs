//! The in-memory manifest: every archive member and its bytes, in write order

use std::path::{Component, Path};

use crate::files::{SourceFile, SourceUnit};
use crate::metadata::{
    CoreMetadataBuilder, METADATA_FILE, PackageIdentity, ProjectMetadata, WHEEL_FILE,
    WheelFileBuilder,
};
use crate::{PackageError, PythonTag, Result};

/// One member of the wheel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path inside the archive, always with `/` separators
    pub archive_path: String,

    /// The member's bytes
    pub content: Vec<u8>,
}

impl ManifestEntry {
    /// Create an entry from an archive path and its content
    pub fn new(archive_path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            archive_path: archive_path.into(),
            content: content.into(),
        }
    }

    /// Read a source file from disk
    pub fn from_source_file(file: &SourceFile) -> Result<Self> {
        let content = fs_err::read(&file.source).map_err(|e| PackageError::ReadSource {
            path: file.source.clone(),
            source: e,
        })?;
        Ok(Self::new(archive_path(&file.destination)?, content))
    }
}

/// Turn a relative destination into an archive member name (`/`-separated)
pub fn archive_path(relative: &Path) -> Result<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(
                part.to_str()
                    .ok_or_else(|| PackageError::InvalidArchivePath(relative.to_path_buf()))?,
            ),
            Component::CurDir => {}
            _ => return Err(PackageError::InvalidArchivePath(relative.to_path_buf())),
        }
    }
    Ok(parts.join("/"))
}

/// Builds the ordered list of members for a wheel, `RECORD` excluded
///
/// Source files come first in traversal order, followed by `METADATA` and `WHEEL`.
pub struct ManifestBuilder<'a> {
    unit: &'a SourceUnit,
    identity: &'a PackageIdentity,
    project: ProjectMetadata,
    tag: PythonTag,
}

impl<'a> ManifestBuilder<'a> {
    /// Create a manifest builder for the given source and identity
    pub fn new(unit: &'a SourceUnit, identity: &'a PackageIdentity) -> Self {
        Self {
            unit,
            identity,
            project: ProjectMetadata::default(),
            tag: PythonTag::default(),
        }
    }

    /// Set summary and description for `METADATA`
    pub fn with_project_metadata(mut self, project: ProjectMetadata) -> Self {
        self.project = project;
        self
    }

    /// Set the interpreter tag written into `WHEEL`
    pub fn with_tag(mut self, tag: PythonTag) -> Self {
        self.tag = tag;
        self
    }

    /// Read all source files and render the metadata records
    pub fn build(self) -> Result<Vec<ManifestEntry>> {
        let mut entries = self
            .unit
            .files()
            .iter()
            .map(ManifestEntry::from_source_file)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!("Read {} source files", entries.len());

        let dist_info = self.identity.dist_info_dir();

        let metadata = CoreMetadataBuilder::new(self.identity)
            .with_project_metadata(&self.project)
            .build();
        entries.push(ManifestEntry::new(
            format!("{dist_info}/{METADATA_FILE}"),
            metadata,
        ));

        let wheel = WheelFileBuilder::new().with_tag(self.tag).build();
        entries.push(ManifestEntry::new(format!("{dist_info}/{WHEEL_FILE}"), wheel));

        Ok(entries)
    }
}

/// Build the manifest with default settings (universal tag, no description)
pub fn build(unit: &SourceUnit, identity: &PackageIdentity) -> Result<Vec<ManifestEntry>> {
    ManifestBuilder::new(unit, identity).build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_err as fs;
    use std::path::PathBuf;

    #[test]
    fn test_archive_path() -> Result<()> {
        assert_eq!(
            archive_path(&PathBuf::from("mypkg").join("sub").join("mod.py"))?,
            "mypkg/sub/mod.py"
        );
        assert_eq!(archive_path(Path::new("./tool.py"))?, "tool.py");
        assert!(archive_path(Path::new("../escape.py")).is_err());
        Ok(())
    }

    #[test]
    fn test_manifest_order() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let pkg = temp_dir.path().join("mypkg");
        fs::create_dir_all(pkg.join("sub"))?;
        fs::write(pkg.join("__init__.py"), "__version__ = \"0.1\"\n")?;
        fs::write(pkg.join("sub/__init__.py"), "")?;
        fs::write(pkg.join("core.py"), "x = 1\n")?;

        let unit = crate::resolve(&pkg)?;
        let identity = crate::metadata::infer(&unit)?;
        let entries = build(&unit, &identity)?;

        let paths: Vec<&str> = entries.iter().map(|e| e.archive_path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "mypkg/__init__.py",
                "mypkg/core.py",
                "mypkg/sub/__init__.py",
                "mypkg-0.1.dist-info/METADATA",
                "mypkg-0.1.dist-info/WHEEL",
            ]
        );
        assert_eq!(entries[1].content, b"x = 1\n");

        let metadata = String::from_utf8_lossy(&entries[3].content);
        assert!(metadata.contains("Version: 0.1\n"));

        Ok(())
    }

    #[test]
    fn test_single_module_is_placed_at_root() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let module = temp_dir.path().join("tool.py");
        fs::write(&module, "")?;

        let unit = crate::resolve(&module)?;
        let identity = PackageIdentity::new("tool", "1.0")?;
        let entries = ManifestBuilder::new(&unit, &identity)
            .with_tag(PythonTag::Py3)
            .build()?;

        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].archive_path, "tool.py");
        let wheel = String::from_utf8_lossy(&entries[2].content);
        assert!(wheel.ends_with("Tag: py3-none-any\n"));

        Ok(())
    }
}
