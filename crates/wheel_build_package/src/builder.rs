//! Package builder - main API for creating wheels

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::archiver::PackageWriter;
use crate::files::{SourceUnit, resolve_excluding};
use crate::manifest::{ManifestBuilder, ManifestEntry};
use crate::metadata::{
    PackageIdentity, ProjectMetadata, RECORD_FILE, RecordRow, inference, infer_with_overrides,
};
use crate::{PythonTag, Result};

/// Configuration for wheel creation
///
/// The defaults are what makes builds reproducible: a fixed deflate level
/// and no host timestamp.
#[derive(Debug, Clone)]
pub struct PackageConfig {
    /// Deflate level (0-9, higher = better compression but slower)
    pub compression_level: u8,

    /// Timestamp stored for every member. `None` stores 1980-01-01T00:00:00.
    pub timestamp: Option<DateTime<Utc>>,

    /// Interpreter tag of the wheel
    pub python_tag: PythonTag,

    /// Extra glob patterns to leave out of package directories
    pub exclude: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            compression_level: 9,
            timestamp: None,
            python_tag: PythonTag::default(),
            exclude: Vec::new(),
        }
    }
}

/// Builder for creating wheels
///
/// Name, version, summary and description are inferred from the source
/// unless they are set explicitly.
///
/// # Examples
///
/// ```rust,no_run
/// use wheel_build_package::{PackageBuilder, PackageConfig};
/// use std::path::Path;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let output = PackageBuilder::from_path(Path::new("mymodule.py"), PackageConfig::default())?
///     .with_version("1.0.0")
///     .build(Path::new("dist"))?;
/// # Ok(())
/// # }
/// ```
pub struct PackageBuilder {
    source: SourceUnit,
    config: PackageConfig,

    // Overrides for inferred metadata
    name: Option<String>,
    version: Option<String>,
    project: Option<ProjectMetadata>,
}

impl PackageBuilder {
    /// Create a new package builder for an already resolved source
    pub fn new(source: SourceUnit, config: PackageConfig) -> Self {
        Self {
            source,
            config,
            name: None,
            version: None,
            project: None,
        }
    }

    /// Resolve `path` (a `.py` file or a package directory) and create a builder for it
    pub fn from_path(path: &Path, config: PackageConfig) -> Result<Self> {
        let source = resolve_excluding(path, &config.exclude)?;
        Ok(Self::new(source, config))
    }

    /// Set the distribution name instead of using the module or directory name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the version instead of looking for `__version__`
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the descriptive metadata of the project
    ///
    /// A missing summary or description is still read from the docstring and
    /// README.
    pub fn with_project_metadata(mut self, project: ProjectMetadata) -> Self {
        self.project = Some(project);
        self
    }

    /// The resolved source
    pub fn source(&self) -> &SourceUnit {
        &self.source
    }

    /// The identity the wheel will be built with
    pub fn identity(&self) -> Result<PackageIdentity> {
        infer_with_overrides(
            &self.source,
            self.name.as_deref(),
            self.version.as_deref(),
        )
    }

    /// Build the wheel and write it to the output directory
    ///
    /// The wheel is named `{name}-{version}-{tag}-none-any.whl`.
    pub fn build(self, output_dir: &Path) -> Result<PackageOutput> {
        let identity = self.identity()?;
        tracing::info!("Building wheel for {identity}");

        let inferred = inference::project_metadata(&self.source)?;
        let project = match self.project {
            Some(project) => project.or_inferred(inferred),
            None => inferred,
        };

        let entries = ManifestBuilder::new(&self.source, &identity)
            .with_project_metadata(project)
            .with_tag(self.config.python_tag)
            .build()?;

        let (path, record) = serialize(&entries, &identity, output_dir, &self.config)?;

        tracing::info!("Wheel created successfully: {}", path.display());

        Ok(PackageOutput {
            path,
            identity,
            record,
        })
    }
}

/// Write the manifest entries plus `RECORD` into a wheel inside `output_dir`
///
/// Returns the absolute path of the wheel and the rows of its `RECORD`.
pub fn serialize(
    entries: &[ManifestEntry],
    identity: &PackageIdentity,
    output_dir: &Path,
    config: &PackageConfig,
) -> Result<(PathBuf, Vec<RecordRow>)> {
    let output_dir = std::path::absolute(output_dir)?;
    let output_path = output_dir.join(identity.wheel_filename(config.python_tag));
    let record_path = format!("{}/{RECORD_FILE}", identity.dist_info_dir());

    tracing::info!("Creating wheel archive: {}", output_path.display());

    let mut writer = PackageWriter::new(config.compression_level);
    if let Some(timestamp) = config.timestamp {
        writer = writer.with_timestamp(timestamp);
    }

    let record = writer.write(&output_path, entries, &record_path)?;
    Ok((output_path, record))
}

/// Result of successful wheel creation
#[derive(Debug)]
pub struct PackageOutput {
    /// Absolute path to the created wheel
    pub path: PathBuf,

    /// Name and version the wheel was built with
    pub identity: PackageIdentity,

    /// The rows of the wheel's `RECORD`, in archive order
    pub record: Vec<RecordRow>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_err as fs;

    #[test]
    fn test_builder_overrides() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let module = temp_dir.path().join("tool.py");
        fs::write(&module, "__version__ = \"1.0\"\n")?;

        let builder = PackageBuilder::from_path(&module, PackageConfig::default())?
            .with_name("Renamed Tool")
            .with_version("2.0");
        let identity = builder.identity()?;
        assert_eq!(identity.name(), "renamed-tool");
        assert_eq!(identity.version(), "2.0");

        let output = builder.build(temp_dir.path())?;
        assert!(output.path.is_absolute());
        assert!(
            output
                .path
                .ends_with("renamed_tool-2.0-py2.py3-none-any.whl")
        );

        Ok(())
    }

    #[test]
    fn test_builder_python_tag() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let module = temp_dir.path().join("tool.py");
        fs::write(&module, "")?;

        let config = PackageConfig {
            python_tag: PythonTag::Py3,
            ..Default::default()
        };
        let output = PackageBuilder::from_path(&module, config)?.build(temp_dir.path())?;

        assert!(output.path.ends_with("tool-0.0.0-py3-none-any.whl"));
        assert_eq!(output.record.len(), 4);

        Ok(())
    }
}
