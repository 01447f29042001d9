//! # wheel_build_package
//!
//! A library for creating pure-python wheels from a module or a package
//! directory, without a `pyproject.toml` or `setup.py`.
//!
//! This crate takes a single `.py` file or a directory with an `__init__.py`
//! and turns it into an installable `.whl`. It handles:
//!
//! - Source resolution and file collection (with build/cache directories excluded)
//! - Name and version inference from the source tree
//! - Metadata generation (`METADATA`, `WHEEL`, `RECORD`)
//! - Deterministic archive creation, so identical inputs give identical bytes
//!
//! ## Example
//!
//! ```rust,no_run
//! use wheel_build_package::{PackageBuilder, PackageConfig};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let output = PackageBuilder::from_path(Path::new("src/mypkg"), PackageConfig::default())?
//!     .build(Path::new("dist"))?;
//!
//! println!("Wheel created at: {}", output.path.display());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod archiver;
pub mod builder;
pub mod error;
pub mod files;
pub mod manifest;
pub mod metadata;

// Re-export main types
pub use archiver::{VerifiedWheel, verify_wheel};
pub use builder::{PackageBuilder, PackageConfig, PackageOutput};
pub use error::{ErrorKind, PackageError, Result};
pub use files::{FileCollector, SourceFile, SourceUnit, resolve};
pub use manifest::ManifestEntry;
pub use metadata::{
    CoreMetadataBuilder, IntegrityRecord, PackageIdentity, ProjectMetadata, WheelFileBuilder,
};

/// Name written into the `Generator` field of every `WHEEL` file
pub const GENERATOR_NAME: &str = "wheel-build";

/// Version written into the `Generator` field of every `WHEEL` file
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interpreter tag of the wheel.
///
/// The ABI and platform parts are always `none-any`: everything this crate
/// builds is pure python.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PythonTag {
    /// Installable on python 2 and python 3 (`py2.py3`)
    #[default]
    Universal,
    /// python 2 only (`py2`)
    Py2,
    /// python 3 only (`py3`)
    Py3,
}

impl PythonTag {
    /// Pick the tag from the `-2`/`-3` style flags. Neither (or both) means universal.
    pub fn from_flags(py2: bool, py3: bool) -> Self {
        match (py2, py3) {
            (true, false) => PythonTag::Py2,
            (false, true) => PythonTag::Py3,
            _ => PythonTag::Universal,
        }
    }

    /// The interpreter part as it appears in the filename, e.g. `py2.py3`
    pub fn as_str(&self) -> &'static str {
        match self {
            PythonTag::Universal => "py2.py3",
            PythonTag::Py2 => "py2",
            PythonTag::Py3 => "py3",
        }
    }

    /// The compatibility tag used in the wheel filename, e.g. `py2.py3-none-any`
    pub fn compatibility_tag(&self) -> String {
        format!("{}-none-any", self.as_str())
    }

    /// The expanded tags, one per `Tag:` line of the `WHEEL` file
    pub fn expanded_tags(&self) -> Vec<&'static str> {
        match self {
            PythonTag::Universal => vec!["py2-none-any", "py3-none-any"],
            PythonTag::Py2 => vec!["py2-none-any"],
            PythonTag::Py3 => vec!["py3-none-any"],
        }
    }
}
