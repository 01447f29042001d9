//! File collection from package directories

use globset::{Glob, GlobSetBuilder};
use std::ffi::OsStr;
use std::path::PathBuf;
use walkdir::{DirEntry, WalkDir};

use super::SourceFile;
use crate::{PackageError, Result};

/// Directories that never end up in a wheel (exact, case-sensitive match on the name)
pub const EXCLUDED_DIRS: &[&str] = &[
    "__pycache__",
    "build",
    "dist",
    ".git",
    ".hg",
    ".svn",
    ".tox",
    ".nox",
    ".eggs",
    ".mypy_cache",
    ".pytest_cache",
    ".ruff_cache",
    ".venv",
];

/// Files that belong to the project around the package, not the package itself
pub const EXCLUDED_FILES: &[&str] = &["README.rst", "setup.py", "setup.cfg", ".coverage"];

/// Compiled or packaged artifacts
pub const EXCLUDED_EXTENSIONS: &[&str] = &["pyc", "pyo", "whl"];

/// Collects files from a package directory for packaging
///
/// Traversal is sorted by file name so the resulting order does not depend
/// on the filesystem.
pub struct FileCollector {
    /// Source directory to scan
    source_dir: PathBuf,

    /// Glob patterns to exclude
    exclude_patterns: GlobSetBuilder,

    /// Whether to include hidden files and directories
    include_hidden: bool,
}

impl FileCollector {
    /// Create a new FileCollector for the given directory
    pub fn new(source_dir: PathBuf) -> Self {
        Self {
            source_dir,
            exclude_patterns: GlobSetBuilder::new(),
            include_hidden: false,
        }
    }

    /// Add a glob pattern to exclude files
    ///
    /// The pattern is matched against the path relative to the source directory.
    ///
    /// # Examples
    /// ```rust,no_run
    /// # use wheel_build_package::FileCollector;
    /// # use std::path::Path;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let collector = FileCollector::new(Path::new("/src/mypkg").to_path_buf())
    ///     .exclude_glob("tests/**")?
    ///     .exclude_glob("**/*.so")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn exclude_glob(mut self, pattern: &str) -> Result<Self> {
        let glob = Glob::new(pattern)?;
        self.exclude_patterns.add(glob);
        Ok(self)
    }

    /// Set whether to include hidden files (files starting with .)
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Collect all files that are not excluded
    ///
    /// Destinations are relative to the source directory.
    pub fn collect(self) -> Result<Vec<SourceFile>> {
        let exclude_set = self.exclude_patterns.build()?;
        let include_hidden = self.include_hidden;

        let mut files = Vec::new();

        let walker = WalkDir::new(&self.source_dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !is_excluded_dir(entry.file_name(), include_hidden)
            });

        for entry in walker {
            let entry = entry?;
            let path = entry.path();

            if !is_packageable_file(&entry) {
                continue;
            }

            let relative_path = path
                .strip_prefix(&self.source_dir)
                .map_err(PackageError::StripPrefix)?;

            if is_excluded_file(entry.file_name(), include_hidden) {
                tracing::trace!("Skipping {}", relative_path.display());
                continue;
            }

            if exclude_set.is_match(relative_path) {
                tracing::debug!("Excluded by pattern: {}", relative_path.display());
                continue;
            }

            files.push(SourceFile::new(path, relative_path));
        }

        Ok(files)
    }
}

/// Regular files, and symlinks that point at one
fn is_packageable_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

fn is_excluded_dir(name: &OsStr, include_hidden: bool) -> bool {
    let name = name.to_string_lossy();
    EXCLUDED_DIRS.contains(&name.as_ref()) || (!include_hidden && name.starts_with('.'))
}

fn is_excluded_file(name: &OsStr, include_hidden: bool) -> bool {
    let name = name.to_string_lossy();
    if EXCLUDED_FILES.contains(&name.as_ref()) || (!include_hidden && name.starts_with('.')) {
        return true;
    }
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| EXCLUDED_EXTENSIONS.contains(&ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_err as fs;
    use std::path::Path;

    fn destinations(files: &[SourceFile]) -> Vec<String> {
        files
            .iter()
            .map(|f| f.destination.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn test_collector_basic() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();

        fs::create_dir_all(base.join("sub"))?;
        fs::write(base.join("__init__.py"), "")?;
        fs::write(base.join("sub/__init__.py"), "")?;
        fs::write(base.join("data.json"), "{}")?;

        let files = FileCollector::new(base.to_path_buf()).collect()?;

        assert_eq!(
            destinations(&files),
            vec!["__init__.py", "data.json", "sub/__init__.py"]
        );

        Ok(())
    }

    #[test]
    fn test_collector_skips_artifacts_and_caches() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();

        for dir in ["__pycache__", "build", ".git", ".mypy_cache", ".hidden"] {
            fs::create_dir_all(base.join(dir))?;
            fs::write(base.join(dir).join("junk.py"), "")?;
        }
        fs::write(base.join("__init__.py"), "")?;
        fs::write(base.join("mod.pyc"), [0u8, 1, 2])?;
        fs::write(base.join("old.whl"), "")?;
        fs::write(base.join("setup.py"), "")?;
        fs::write(base.join("README.rst"), "")?;
        fs::write(base.join(".coverage"), "")?;

        let files = FileCollector::new(base.to_path_buf()).collect()?;

        assert_eq!(destinations(&files), vec!["__init__.py"]);

        Ok(())
    }

    #[test]
    fn test_collector_exclusion_is_case_sensitive() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();

        fs::create_dir_all(base.join("Build"))?;
        fs::write(base.join("Build/steps.py"), "")?;

        let files = FileCollector::new(base.to_path_buf()).collect()?;

        // Only meaningful on case-sensitive filesystems, but never drops "Build"
        assert!(destinations(&files).contains(&"Build/steps.py".to_string()));

        Ok(())
    }

    #[test]
    fn test_collector_with_glob() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();

        fs::create_dir_all(base.join("tests"))?;
        fs::write(base.join("__init__.py"), "")?;
        fs::write(base.join("tests/test_a.py"), "")?;
        fs::write(base.join("native.so"), "binary")?;

        let files = FileCollector::new(base.to_path_buf())
            .exclude_glob("tests/**")?
            .exclude_glob("*.so")?
            .collect()?;

        assert_eq!(destinations(&files), vec!["__init__.py"]);
        assert_eq!(files[0].source, Path::new(base).join("__init__.py"));

        Ok(())
    }

    #[test]
    fn test_collector_include_hidden() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let base = temp_dir.path();

        fs::write(base.join(".config"), "")?;

        let files = FileCollector::new(base.to_path_buf())
            .include_hidden(true)
            .collect()?;
        assert_eq!(destinations(&files), vec![".config"]);

        Ok(())
    }
}
