//! Package name and version

use std::fmt;

use regex::Regex;

use super::FALLBACK_VERSION;
use crate::{PackageError, PythonTag, Result};

lazy_static::lazy_static! {
    /// Runs of characters that are not allowed in a canonical name
    static ref NAME_SEPARATORS: Regex = Regex::new(r"[^a-z0-9.]+").unwrap();

    /// Characters that cannot appear in a wheel filename component
    static ref FILENAME_UNSAFE: Regex = Regex::new(r"[^A-Za-z0-9.+]").unwrap();
}

/// Normalize a distribution name.
///
/// The name is lowercased and every run of characters outside `[a-z0-9.]`
/// collapses into a single `-`. Separators at either end are dropped, so
/// `"My Package!!"` becomes `my-package`.
pub fn canonicalize_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    NAME_SEPARATORS
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Escape a name or version for use as a component of a wheel filename.
///
/// Every character outside `[A-Za-z0-9.+]` becomes `_`, so the result never
/// contains a path separator.
pub fn escape_filename_component(value: &str) -> String {
    FILENAME_UNSAFE.replace_all(value, "_").into_owned()
}

/// The name and version of the wheel being built
///
/// Both fields are guaranteed non-empty and the name is canonical. The
/// version is kept as found, only its whitespace is normalized.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageIdentity {
    name: String,
    version: String,
}

impl PackageIdentity {
    /// Create an identity, canonicalizing the name
    ///
    /// Only the name can fail. A blank version becomes [`FALLBACK_VERSION`]
    /// and runs of whitespace (line breaks included) collapse into one space.
    pub fn new(raw_name: &str, version: impl AsRef<str>) -> Result<Self> {
        let name = canonicalize_name(raw_name);
        if name.is_empty() {
            return Err(PackageError::EmptyName(raw_name.to_string()));
        }

        let version = version
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        let version = if version.is_empty() {
            FALLBACK_VERSION.to_string()
        } else {
            version
        };

        Ok(Self { name, version })
    }

    /// The canonical name, as written into `METADATA`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version string
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The name as it appears in filenames, with `-` escaped to `_`
    pub fn escaped_name(&self) -> String {
        escape_filename_component(&self.name)
    }

    /// The version as it appears in filenames, see [`escape_filename_component`]
    pub fn escaped_version(&self) -> String {
        escape_filename_component(&self.version)
    }

    /// The `.dist-info` directory name, e.g. `mypkg-0.1.dist-info`
    pub fn dist_info_dir(&self) -> String {
        format!(
            "{}-{}.dist-info",
            self.escaped_name(),
            self.escaped_version()
        )
    }

    /// The wheel filename, e.g. `mypkg-0.1-py2.py3-none-any.whl`
    pub fn wheel_filename(&self, tag: PythonTag) -> String {
        format!(
            "{}-{}-{}.whl",
            self.escaped_name(),
            self.escaped_version(),
            tag.compatibility_tag()
        )
    }
}

impl fmt::Display for PackageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("My Package!!", "my-package")]
    #[case("mypkg", "mypkg")]
    #[case("Foo_Bar", "foo-bar")]
    #[case("zope.interface", "zope.interface")]
    #[case("a  __--b", "a-b")]
    #[case("__private", "private")]
    fn test_canonicalize_name(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(canonicalize_name(raw), expected);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = PackageIdentity::new("!!!", "1.0").unwrap_err();
        assert!(matches!(err, PackageError::EmptyName(_)));
        assert_eq!(err.kind(), crate::ErrorKind::Metadata);
    }

    #[rstest]
    #[case("", "0.0.0", "0.0.0")]
    #[case("   ", "0.0.0", "0.0.0")]
    #[case("1.0 beta", "1.0 beta", "1.0_beta")]
    #[case(" 2.0\n rc1 ", "2.0 rc1", "2.0_rc1")]
    #[case("../../escaped", "../../escaped", ".._.._escaped")]
    #[case("1.0+local.7", "1.0+local.7", "1.0+local.7")]
    fn test_version_is_never_rejected(
        #[case] version: &str,
        #[case] expected: &str,
        #[case] escaped: &str,
    ) {
        let identity = PackageIdentity::new("pkg", version).unwrap();
        assert_eq!(identity.version(), expected);
        assert_eq!(identity.escaped_version(), escaped);
    }

    #[test]
    fn test_file_names_stay_inside_output_dir() -> Result<()> {
        let identity = PackageIdentity::new("pkg", "../../escaped")?;

        let filename = identity.wheel_filename(PythonTag::Universal);
        assert_eq!(filename, "pkg-.._.._escaped-py2.py3-none-any.whl");
        assert!(!filename.contains(['/', '\\']));

        let dist_info = identity.dist_info_dir();
        assert_eq!(dist_info, "pkg-.._.._escaped.dist-info");
        assert_eq!(std::path::Path::new(&dist_info).components().count(), 1);
        Ok(())
    }

    #[test]
    fn test_file_names() -> Result<()> {
        let identity = PackageIdentity::new("My Package", "0.1")?;
        assert_eq!(identity.name(), "my-package");
        assert_eq!(identity.dist_info_dir(), "my_package-0.1.dist-info");
        assert_eq!(
            identity.wheel_filename(PythonTag::Universal),
            "my_package-0.1-py2.py3-none-any.whl"
        );
        assert_eq!(identity.to_string(), "my-package-0.1");

        let dev = PackageIdentity::new("pkg", "1.0-dev")?;
        assert_eq!(dev.version(), "1.0-dev");
        assert_eq!(dev.dist_info_dir(), "pkg-1.0_dev.dist-info");
        Ok(())
    }
}
