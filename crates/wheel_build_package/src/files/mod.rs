//! Source resolution and file collection for wheel creation

use std::path::{Path, PathBuf};

use crate::{PackageError, Result};

mod collector;

pub use collector::{EXCLUDED_DIRS, EXCLUDED_EXTENSIONS, EXCLUDED_FILES, FileCollector};

/// The file every package directory must contain
pub const PACKAGE_INIT: &str = "__init__.py";

/// The extension a single-module source must have
pub const MODULE_EXTENSION: &str = "py";

/// The readme that is picked up as the long description, if present
pub const README_FILE: &str = "README.rst";

/// Represents a file to be included in the wheel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Source path on disk
    pub source: PathBuf,

    /// Destination path within the wheel (relative to the archive root)
    pub destination: PathBuf,
}

impl SourceFile {
    /// Create a SourceFile from source and destination paths
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

/// The resolved input of a build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceUnit {
    /// A single `.py` file, placed at the archive root
    SingleModule(PathBuf),

    /// A package directory. Members keep their structure under the directory name.
    Package {
        /// The (canonicalized) package directory
        root: PathBuf,
        /// Every collected file, in sorted traversal order
        members: Vec<SourceFile>,
    },
}

impl SourceUnit {
    /// The file that is scanned for `__version__` and the module docstring
    pub fn entry_file(&self) -> PathBuf {
        match self {
            SourceUnit::SingleModule(path) => path.clone(),
            SourceUnit::Package { root, .. } => root.join(PACKAGE_INIT),
        }
    }

    /// The raw distribution name: the module stem or the directory name
    pub fn base_name(&self) -> String {
        let name = match self {
            SourceUnit::SingleModule(path) => path.file_stem(),
            SourceUnit::Package { root, .. } => root.file_name(),
        };
        name.map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Where an adjacent `README.rst` would live
    pub fn readme_path(&self) -> Option<PathBuf> {
        let dir = match self {
            SourceUnit::SingleModule(path) => path.parent(),
            SourceUnit::Package { root, .. } => root.parent(),
        }?;
        Some(dir.join(README_FILE))
    }

    /// The files to package, with their destinations inside the wheel
    pub fn files(&self) -> Vec<SourceFile> {
        match self {
            SourceUnit::SingleModule(path) => {
                let name = path.file_name().map(PathBuf::from).unwrap_or_default();
                vec![SourceFile::new(path.clone(), name)]
            }
            SourceUnit::Package { members, .. } => members.clone(),
        }
    }
}

/// Resolve a user supplied path into a [`SourceUnit`]
///
/// Build artifacts and caches are left out of packages; see [`FileCollector`].
pub fn resolve(path: &Path) -> Result<SourceUnit> {
    resolve_excluding(path, &[])
}

/// Like [`resolve`], with additional glob patterns to exclude from packages
///
/// Patterns are matched against the path relative to the package directory.
pub fn resolve_excluding(path: &Path, exclude: &[String]) -> Result<SourceUnit> {
    let path = match dunce::canonicalize(path) {
        Ok(path) => path,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(PackageError::SourceNotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(PackageError::ReadSource {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    if path.is_dir() {
        let init = path.join(PACKAGE_INIT);
        if !init.is_file() {
            return Err(PackageError::MissingPackageInit(path));
        }
        ensure_readable(&init)?;

        let package_name = path
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| PackageError::UnknownSource(path.clone()))?;

        let mut collector = FileCollector::new(path.clone());
        for pattern in exclude {
            collector = collector.exclude_glob(pattern)?;
        }

        let members = collector
            .collect()?
            .into_iter()
            .map(|file| SourceFile::new(file.source, package_name.join(file.destination)))
            .collect::<Vec<_>>();

        tracing::debug!(
            "Resolved package {} with {} files",
            path.display(),
            members.len()
        );

        Ok(SourceUnit::Package {
            root: path,
            members,
        })
    } else if path.is_file() {
        if path.extension().is_none_or(|ext| ext != MODULE_EXTENSION) {
            return Err(PackageError::NotAPythonModule(path));
        }
        ensure_readable(&path)?;

        tracing::debug!("Resolved single module {}", path.display());
        Ok(SourceUnit::SingleModule(path))
    } else {
        Err(PackageError::UnknownSource(path))
    }
}

fn ensure_readable(path: &Path) -> Result<()> {
    fs_err::File::open(path)
        .map(drop)
        .map_err(|e| PackageError::ReadSource {
            path: path.to_path_buf(),
            source: e,
        })
}
