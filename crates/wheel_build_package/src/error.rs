//! Error types for the wheel_build_package crate

use std::path::PathBuf;

/// Result type alias using PackageError
pub type Result<T> = std::result::Result<T, PackageError>;

/// The broad class an error belongs to.
///
/// Every error aborts the build; the kind only decides how it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source path is missing, unreadable or has the wrong shape
    Input,
    /// Name or version could not be turned into valid metadata
    Metadata,
    /// Writing (or re-reading) the output archive failed
    Io,
}

/// Errors that can occur during wheel creation
#[derive(Debug, thiserror::Error)]
pub enum PackageError {
    /// The source path does not exist
    #[error("Source path does not exist: {0}")]
    SourceNotFound(PathBuf),

    /// A file was given that is not a python module
    #[error("Source file is not a python module (expected a `.py` file): {0}")]
    NotAPythonModule(PathBuf),

    /// A directory was given that is not a python package
    #[error("Source directory {0} must contain an __init__.py")]
    MissingPackageInit(PathBuf),

    /// The source path is neither a regular file nor a directory
    #[error("Unknown source: {0}")]
    UnknownSource(PathBuf),

    /// Reading a source file failed
    #[error("Failed to read source file {path}: {source}")]
    ReadSource {
        /// The file that could not be read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// WalkDir error
    #[error("Failed to walk directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// Failed to build glob pattern
    #[error("Failed to build glob pattern: {0}")]
    Glob(#[from] globset::Error),

    /// Failed to strip prefix from path
    #[error("Could not strip prefix from path: {0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// A path inside the package cannot be used as an archive member name
    #[error("Path cannot be stored in the archive (must be relative and valid UTF-8): {0}")]
    InvalidArchivePath(PathBuf),

    /// The package name is empty after canonicalization
    #[error("Package name '{0}' is empty after normalization")]
    EmptyName(String),

    /// The configured timestamp cannot be stored in a zip header
    #[error("Timestamp {0} cannot be represented in a zip archive (must be between 1980 and 2107)")]
    InvalidTimestamp(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive creation error
    #[error("Failed to create archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The RECORD of an existing wheel does not match its contents
    #[error("Invalid RECORD in {path}: {reason}")]
    InvalidRecord {
        /// The wheel that failed verification
        path: PathBuf,
        /// What did not match
        reason: String,
    },
}

impl PackageError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PackageError::SourceNotFound(_)
            | PackageError::NotAPythonModule(_)
            | PackageError::MissingPackageInit(_)
            | PackageError::UnknownSource(_)
            | PackageError::ReadSource { .. }
            | PackageError::WalkDir(_)
            | PackageError::Glob(_)
            | PackageError::StripPrefix(_)
            | PackageError::InvalidArchivePath(_) => ErrorKind::Input,
            PackageError::EmptyName(_)
            | PackageError::InvalidTimestamp(_) => ErrorKind::Metadata,
            PackageError::Io(_)
            | PackageError::Zip(_)
            | PackageError::InvalidRecord { .. } => ErrorKind::Io,
        }
    }
}
