//! Inferring name, version and description from the source tree
//!
//! Nothing here parses python. Each detector is a small textual scan over the
//! entry file (the module itself, or the package's `__init__.py`), tried in
//! priority order until one of them recognises something.

use regex::Regex;

use super::{PackageIdentity, ProjectMetadata};
use crate::files::SourceUnit;
use crate::{PackageError, Result};

/// Used when no detector finds a version
pub const FALLBACK_VERSION: &str = "0.0.0";

lazy_static::lazy_static! {
    /// `__version__ = "1.2"` or `__version__: str = '1.2'`, at module level
    static ref DUNDER_VERSION: Regex = Regex::new(
        r#"(?m)^__version__\s*(?::[^=\n]*)?=\s*(?:"([^"\n]*)"|'([^'\n]*)')\s*(?:#.*)?$"#
    )
    .unwrap();

    /// `__version_info__ = (1, 2, 3)`, at module level
    static ref VERSION_INFO_TUPLE: Regex = Regex::new(
        r"(?m)^__version_info__\s*(?::[^=\n]*)?=\s*\(\s*(\d+(?:\s*,\s*\d+)*)\s*,?\s*\)"
    )
    .unwrap();
}

/// A version detector: returns the version if it recognises one in the text
type VersionStrategy = fn(&str) -> Option<String>;

/// Detectors in priority order
const VERSION_STRATEGIES: &[(&str, VersionStrategy)] = &[
    ("__version__ assignment", dunder_version),
    ("__version_info__ tuple", version_info_tuple),
];

/// The first literal string assigned to `__version__`
fn dunder_version(text: &str) -> Option<String> {
    DUNDER_VERSION.captures_iter(text).find_map(|captures| {
        let value = captures.get(1).or_else(|| captures.get(2))?.as_str().trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn version_info_tuple(text: &str) -> Option<String> {
    let captures = VERSION_INFO_TUPLE.captures(text)?;
    let parts: Vec<&str> = captures[1].split(',').map(str::trim).collect();
    Some(parts.join("."))
}

/// Run the version detectors over `text`, in priority order
pub fn detect_version(text: &str) -> Option<String> {
    VERSION_STRATEGIES.iter().find_map(|(label, strategy)| {
        let version = strategy(text)?;
        tracing::debug!("Found version {version} via {label}");
        Some(version)
    })
}

/// The first line of the module docstring, if the module starts with one
pub fn docstring_summary(text: &str) -> Option<String> {
    let mut rest = text.trim_start_matches('\u{feff}');

    // skip blank lines, comments, the shebang and the encoding line
    loop {
        let trimmed = rest.trim_start();
        match trimmed.strip_prefix('#') {
            Some(comment) => rest = comment.split_once('\n').map_or("", |(_, next)| next),
            None => {
                rest = trimmed;
                break;
            }
        }
    }

    let body = rest.trim_start_matches(['r', 'R', 'u', 'U']);
    let quote = ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find(|quote| body.starts_with(quote))?;
    let body = &body[quote.len()..];
    let docstring = &body[..body.find(quote)?];

    docstring
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// Read the file that carries `__version__` and the docstring
pub fn read_entry_file(unit: &SourceUnit) -> Result<String> {
    let path = unit.entry_file();
    let bytes = fs_err::read(&path).map_err(|e| PackageError::ReadSource {
        path: path.clone(),
        source: e,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Infer the package identity from the source
///
/// The name comes from the module or directory name, the version from the
/// entry file. A missing version falls back to [`FALLBACK_VERSION`]; only a
/// name that is empty after normalization is an error.
pub fn infer(unit: &SourceUnit) -> Result<PackageIdentity> {
    infer_with_overrides(unit, None, None)
}

/// Like [`infer`], but explicit values win over what is found in the source
pub fn infer_with_overrides(
    unit: &SourceUnit,
    name: Option<&str>,
    version: Option<&str>,
) -> Result<PackageIdentity> {
    let raw_name = match name {
        Some(name) => name.to_string(),
        None => unit.base_name(),
    };

    let version = match version {
        Some(version) => version.to_string(),
        None => {
            let text = read_entry_file(unit)?;
            detect_version(&text).unwrap_or_else(|| {
                tracing::debug!(
                    "No version found in {}, using {FALLBACK_VERSION}",
                    unit.entry_file().display()
                );
                FALLBACK_VERSION.to_string()
            })
        }
    };

    PackageIdentity::new(&raw_name, version)
}

/// Collect the optional descriptive metadata: docstring summary and README
pub fn project_metadata(unit: &SourceUnit) -> Result<ProjectMetadata> {
    let text = read_entry_file(unit)?;
    let summary = docstring_summary(&text);

    let description = match unit.readme_path() {
        Some(readme) if readme.is_file() => {
            tracing::debug!("Using {} as description", readme.display());
            let content = fs_err::read_to_string(&readme).map_err(|e| PackageError::ReadSource {
                path: readme.clone(),
                source: e,
            })?;
            Some(content)
        }
        _ => None,
    };

    Ok(ProjectMetadata {
        summary,
        description,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_err as fs;
    use rstest::rstest;

    #[rstest]
    #[case("__version__ = \"0.1\"\n", Some("0.1"))]
    #[case("__version__ = '2.0.1'  # bumped by CI\n", Some("2.0.1"))]
    #[case("__version__: str = \"3.4\"\n", Some("3.4"))]
    #[case("__version__ = get_version()\n__version__ = \"1.5\"\n", Some("1.5"))]
    #[case("__version__ = \"1.0\"\n__version__ = \"2.0\"\n", Some("1.0"))]
    #[case("    __version__ = \"9.9\"\n", None)]
    #[case("version = \"1.0\"\n", None)]
    #[case("__version_info__ = (1, 2, 3)\n", Some("1.2.3"))]
    #[case("__version_info__ = (4,)\n__version__ = \"5.0\"\n", Some("5.0"))]
    #[case("", None)]
    fn test_detect_version(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(detect_version(text).as_deref(), expected);
    }

    #[test]
    fn test_detect_version_crlf() {
        assert_eq!(
            detect_version("import os\r\n__version__ = \"0.3\"\r\n").as_deref(),
            Some("0.3")
        );
    }

    #[rstest]
    #[case("\"\"\"Minimalist wheel building\"\"\"\n", Some("Minimalist wheel building"))]
    #[case(
        "#!/usr/bin/env python\n# -*- coding: utf-8 -*-\n\n'''\n  Does things.\n\n  More text.\n'''\n",
        Some("Does things.")
    )]
    #[case("r\"\"\"Raw docstring\"\"\"\n", Some("Raw docstring"))]
    #[case("\"Single line\"\n", Some("Single line"))]
    #[case("import os\n\"\"\"Not a docstring\"\"\"\n", None)]
    #[case("\"\"\"\"\"\"\n", None)]
    fn test_docstring_summary(#[case] text: &str, #[case] expected: Option<&str>) {
        assert_eq!(docstring_summary(text).as_deref(), expected);
    }

    #[test]
    fn test_infer_package() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let pkg = temp_dir.path().join("mypkg");
        fs::create_dir(&pkg)?;
        fs::write(pkg.join("__init__.py"), "__version__ = \"0.1\"\n")?;

        let unit = crate::resolve(&pkg)?;
        let identity = infer(&unit)?;
        assert_eq!(identity.name(), "mypkg");
        assert_eq!(identity.version(), "0.1");

        Ok(())
    }

    #[test]
    fn test_infer_falls_back_to_default_version() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let module = temp_dir.path().join("My_Tool.py");
        fs::write(&module, "print('no version here')\n")?;

        let unit = crate::resolve(&module)?;
        let identity = infer(&unit)?;
        assert_eq!(identity.name(), "my-tool");
        assert_eq!(identity.version(), FALLBACK_VERSION);

        Ok(())
    }

    #[test]
    fn test_infer_with_overrides() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let module = temp_dir.path().join("tool.py");
        fs::write(&module, "__version__ = \"1.0\"\n")?;

        let unit = crate::resolve(&module)?;
        let identity = infer_with_overrides(&unit, Some("Other Name"), Some("2.0"))?;
        assert_eq!(identity.name(), "other-name");
        assert_eq!(identity.version(), "2.0");

        Ok(())
    }

    #[test]
    fn test_project_metadata_reads_readme() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let module = temp_dir.path().join("tool.py");
        fs::write(&module, "\"\"\"A small tool\"\"\"\n")?;
        fs::write(temp_dir.path().join("README.rst"), "Tool\n====\n")?;

        let unit = crate::resolve(&module)?;
        let metadata = project_metadata(&unit)?;
        assert_eq!(metadata.summary.as_deref(), Some("A small tool"));
        assert_eq!(metadata.description.as_deref(), Some("Tool\n====\n"));

        Ok(())
    }
}
