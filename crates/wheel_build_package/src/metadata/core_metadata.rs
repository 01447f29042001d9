//! The `METADATA` record (core metadata, version 2.1)

use super::PackageIdentity;

/// The core metadata version this crate writes
pub const METADATA_VERSION: &str = "2.1";

/// Optional, descriptive metadata of a project
///
/// `summary` and `description` are inferred from the source when not set;
/// everything else only comes from the caller. Multi-use fields are vectors
/// and produce one header line per value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    /// `Platform`
    pub platforms: Vec<String>,
    /// `Supported-Platform`
    pub supported_platforms: Vec<String>,
    /// First line of the module docstring
    pub summary: Option<String>,
    /// Long description, usually the contents of `README.rst`
    pub description: Option<String>,
    /// `Description-Content-Type`, e.g. `text/x-rst`
    pub description_content_type: Option<String>,
    /// `Keywords`, a single comma separated value
    pub keywords: Option<String>,
    /// `Home-page`
    pub home_page: Option<String>,
    /// `Download-URL`
    pub download_url: Option<String>,
    /// `Author`
    pub author: Option<String>,
    /// `Author-email`
    pub author_email: Option<String>,
    /// `Maintainer`, only written when it differs from the author
    pub maintainer: Option<String>,
    /// `Maintainer-email`, only written when it differs from the author email
    pub maintainer_email: Option<String>,
    /// `License`
    pub license: Option<String>,
    /// `Classifier`
    pub classifiers: Vec<String>,
    /// `Requires-Dist`. `Provides-Extra` is derived from the `extra` markers.
    pub requires_dist: Vec<String>,
    /// `Requires-Python`
    pub requires_python: Option<String>,
    /// `Requires-External`
    pub requires_external: Vec<String>,
    /// `Project-URL`, as `label, url`
    pub project_urls: Vec<String>,
    /// `Provides-Dist`
    pub provides_dist: Vec<String>,
    /// `Obsoletes-Dist`
    pub obsoletes_dist: Vec<String>,
}

impl ProjectMetadata {
    /// Fill `summary` and `description` from `inferred` where they are unset
    pub fn or_inferred(mut self, inferred: ProjectMetadata) -> Self {
        self.summary = self.summary.or(inferred.summary);
        self.description = self.description.or(inferred.description);
        self
    }

    /// The extras named by `extra == '...'` markers in `Requires-Dist`
    ///
    /// Only names that are valid normalized extra names are kept, each once,
    /// in order of first appearance.
    pub fn provides_extra(&self) -> Vec<String> {
        let mut extras: Vec<String> = Vec::new();
        for requirement in &self.requires_dist {
            let Some((_, marker)) = requirement.rsplit_once(';') else {
                continue;
            };
            if !marker.contains("extra") {
                continue;
            }

            let value = marker.rsplit("==").next().unwrap_or_default().trim();
            let value = value.trim_matches('\'').trim_matches('"');
            if is_extra_name(value) && !extras.iter().any(|extra| extra == value) {
                extras.push(value.to_string());
            }
        }
        extras
    }
}

/// Lowercase alphanumerics and single hyphens, starting and ending alphanumeric
fn is_extra_name(value: &str) -> bool {
    let alnum = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit();
    value.starts_with(alnum)
        && value.ends_with(alnum)
        && value.chars().all(|c| alnum(c) || c == '-')
        && !value.contains("--")
}

/// Builder for the `METADATA` record of a wheel
///
/// # Example
/// ```rust
/// use wheel_build_package::{CoreMetadataBuilder, PackageIdentity};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let identity = PackageIdentity::new("mypkg", "0.1")?;
/// let metadata = CoreMetadataBuilder::new(&identity)
///     .with_summary("A test package".to_string())
///     .with_requires_dist(vec!["pytest; extra == 'test'".to_string()])
///     .build();
/// assert!(metadata.contains("Summary: A test package\n"));
/// assert!(metadata.contains("Provides-Extra: test\n"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CoreMetadataBuilder {
    name: String,
    version: String,
    project: ProjectMetadata,
}

impl CoreMetadataBuilder {
    /// Create a new builder for the given package
    pub fn new(identity: &PackageIdentity) -> Self {
        Self {
            name: identity.name().to_string(),
            version: identity.version().to_string(),
            project: ProjectMetadata::default(),
        }
    }

    /// Take every field from the given project metadata
    pub fn with_project_metadata(mut self, metadata: &ProjectMetadata) -> Self {
        self.project = metadata.clone();
        self
    }

    /// Set the platforms
    pub fn with_platforms(mut self, platforms: Vec<String>) -> Self {
        self.project.platforms = platforms;
        self
    }

    /// Set the supported platforms
    pub fn with_supported_platforms(mut self, platforms: Vec<String>) -> Self {
        self.project.supported_platforms = platforms;
        self
    }

    /// Set the summary
    pub fn with_summary(mut self, summary: String) -> Self {
        self.project.summary = Some(summary);
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: String) -> Self {
        self.project.description = Some(description);
        self
    }

    /// Set the content type of the description
    pub fn with_description_content_type(mut self, content_type: String) -> Self {
        self.project.description_content_type = Some(content_type);
        self
    }

    /// Set the keywords
    pub fn with_keywords(mut self, keywords: String) -> Self {
        self.project.keywords = Some(keywords);
        self
    }

    /// Set the homepage
    pub fn with_home_page(mut self, url: String) -> Self {
        self.project.home_page = Some(url);
        self
    }

    /// Set the download url
    pub fn with_download_url(mut self, url: String) -> Self {
        self.project.download_url = Some(url);
        self
    }

    /// Set the author
    pub fn with_author(mut self, author: String) -> Self {
        self.project.author = Some(author);
        self
    }

    /// Set the author email
    pub fn with_author_email(mut self, email: String) -> Self {
        self.project.author_email = Some(email);
        self
    }

    /// Set the maintainer
    pub fn with_maintainer(mut self, maintainer: String) -> Self {
        self.project.maintainer = Some(maintainer);
        self
    }

    /// Set the maintainer email
    pub fn with_maintainer_email(mut self, email: String) -> Self {
        self.project.maintainer_email = Some(email);
        self
    }

    /// Set the license
    pub fn with_license(mut self, license: String) -> Self {
        self.project.license = Some(license);
        self
    }

    /// Set the trove classifiers
    pub fn with_classifiers(mut self, classifiers: Vec<String>) -> Self {
        self.project.classifiers = classifiers;
        self
    }

    /// Set the requirements
    pub fn with_requires_dist(mut self, requirements: Vec<String>) -> Self {
        self.project.requires_dist = requirements;
        self
    }

    /// Set the supported python versions, e.g. `>=3.8`
    pub fn with_requires_python(mut self, specifier: String) -> Self {
        self.project.requires_python = Some(specifier);
        self
    }

    /// Set the external (non-python) requirements
    pub fn with_requires_external(mut self, requirements: Vec<String>) -> Self {
        self.project.requires_external = requirements;
        self
    }

    /// Set the project urls (`label, url`)
    pub fn with_project_urls(mut self, urls: Vec<String>) -> Self {
        self.project.project_urls = urls;
        self
    }

    /// Set the provided distributions
    pub fn with_provides_dist(mut self, provides: Vec<String>) -> Self {
        self.project.provides_dist = provides;
        self
    }

    /// Set the obsoleted distributions
    pub fn with_obsoletes_dist(mut self, obsoletes: Vec<String>) -> Self {
        self.project.obsoletes_dist = obsoletes;
        self
    }

    /// Render the record
    ///
    /// Header fields come one `Key: value` per line, in a fixed order. The
    /// description, if any, follows after a blank line as the message body.
    pub fn build(self) -> String {
        let project = &self.project;
        let mut fields = HeaderFields::default();

        fields.push("Metadata-Version", METADATA_VERSION);
        fields.push("Name", &self.name);
        fields.push("Version", &self.version);
        fields.push_all("Platform", &project.platforms);
        fields.push_all("Supported-Platform", &project.supported_platforms);
        fields.push_opt("Summary", &project.summary);
        fields.push_opt("Description-Content-Type", &project.description_content_type);
        fields.push_opt("Keywords", &project.keywords);
        fields.push_opt("Home-page", &project.home_page);
        fields.push_opt("Download-URL", &project.download_url);
        fields.push_opt("Author", &project.author);
        fields.push_opt("Author-email", &project.author_email);
        if project.maintainer != project.author {
            fields.push_opt("Maintainer", &project.maintainer);
        }
        if project.maintainer_email != project.author_email {
            fields.push_opt("Maintainer-email", &project.maintainer_email);
        }
        fields.push_opt("License", &project.license);
        fields.push_all("Classifier", &project.classifiers);
        fields.push_all("Requires-Dist", &project.requires_dist);
        fields.push_opt("Requires-Python", &project.requires_python);
        fields.push_all("Requires-External", &project.requires_external);
        fields.push_all("Project-URL", &project.project_urls);
        fields.push_all("Provides-Extra", &project.provides_extra());
        fields.push_all("Provides-Dist", &project.provides_dist);
        fields.push_all("Obsoletes-Dist", &project.obsoletes_dist);

        let mut metadata = fields.0;
        if let Some(description) = &project.description {
            metadata.push('\n');
            metadata.push_str(description);
        }

        metadata
    }
}

/// The rendered header block
#[derive(Default)]
struct HeaderFields(String);

impl HeaderFields {
    fn push(&mut self, key: &str, value: &str) {
        // a header value cannot span lines
        let value = value.lines().next().unwrap_or_default().trim();
        self.0.push_str(&format!("{key}: {value}\n"));
    }

    fn push_opt(&mut self, key: &str, value: &Option<String>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    fn push_all(&mut self, key: &str, values: &[String]) {
        for value in values {
            self.push(key, value);
        }
    }
}
