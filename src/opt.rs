//! Command-line options.

use std::path::PathBuf;

use clap::{Args, Parser, crate_version};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use wheel_build_package::{PackageConfig, ProjectMetadata, PythonTag};

/// Build a pure-python wheel from a module or a package directory.
#[derive(Parser, Debug)]
#[clap(name = "wheel-build", version = crate_version!())]
pub struct App {
    /// A `.py` file or a directory containing `__init__.py`. Defaults to the current directory.
    #[arg(default_value = ".")]
    pub source: PathBuf,

    /// Output directory for the wheel.
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Build a wheel for python 2 only (`py2-none-any`).
    #[arg(short = '2', conflicts_with = "py3")]
    pub py2: bool,

    /// Build a wheel for python 3 only (`py3-none-any`).
    #[arg(short = '3')]
    pub py3: bool,

    /// Distribution name to use instead of the module or directory name.
    #[arg(long)]
    pub name: Option<String>,

    /// Version to use instead of the one found in the source.
    #[arg(long)]
    pub version_override: Option<String>,

    /// Leave out files matching this glob (relative to the package directory).
    /// Can be given multiple times.
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Re-read the wheel after writing it and check its RECORD.
    #[arg(long)]
    pub verify: bool,

    #[clap(flatten)]
    pub metadata: MetadataOpts,

    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl App {
    /// The package configuration these options describe
    pub fn package_config(&self) -> PackageConfig {
        PackageConfig {
            python_tag: PythonTag::from_flags(self.py2, self.py3),
            exclude: self.exclude.clone(),
            ..Default::default()
        }
    }
}

/// Core metadata written to `METADATA`. Repeatable options add one line each.
#[derive(Args, Debug, Default, Clone)]
pub struct MetadataOpts {
    /// One line summary. Defaults to the first line of the module docstring.
    #[arg(long, help_heading = "Metadata")]
    pub summary: Option<String>,

    /// Content type of the description, e.g. `text/x-rst`.
    #[arg(long, help_heading = "Metadata")]
    pub description_content_type: Option<String>,

    /// Comma separated keywords.
    #[arg(long, help_heading = "Metadata")]
    pub keywords: Option<String>,

    /// Homepage of the project.
    #[arg(long, help_heading = "Metadata")]
    pub home_page: Option<String>,

    /// Where the project can be downloaded.
    #[arg(long, help_heading = "Metadata")]
    pub download_url: Option<String>,

    #[arg(long, help_heading = "Metadata")]
    pub author: Option<String>,

    #[arg(long, help_heading = "Metadata")]
    pub author_email: Option<String>,

    /// Only written when it differs from `--author`.
    #[arg(long, help_heading = "Metadata")]
    pub maintainer: Option<String>,

    /// Only written when it differs from `--author-email`.
    #[arg(long, help_heading = "Metadata")]
    pub maintainer_email: Option<String>,

    #[arg(long, help_heading = "Metadata")]
    pub license: Option<String>,

    /// Supported python versions, e.g. `>=3.8`.
    #[arg(long, help_heading = "Metadata")]
    pub requires_python: Option<String>,

    #[arg(long = "platform", value_name = "PLATFORM", help_heading = "Metadata")]
    pub platforms: Vec<String>,

    #[arg(
        long = "supported-platform",
        value_name = "PLATFORM",
        help_heading = "Metadata"
    )]
    pub supported_platforms: Vec<String>,

    /// Trove classifier.
    #[arg(long = "classifier", value_name = "CLASSIFIER", help_heading = "Metadata")]
    pub classifiers: Vec<String>,

    /// Requirement, e.g. `pytest; extra == 'test'`. Extras named in markers
    /// are listed as `Provides-Extra`.
    #[arg(long = "requires-dist", value_name = "REQUIREMENT", help_heading = "Metadata")]
    pub requires_dist: Vec<String>,

    #[arg(
        long = "requires-external",
        value_name = "REQUIREMENT",
        help_heading = "Metadata"
    )]
    pub requires_external: Vec<String>,

    /// Labeled url as `label, url`.
    #[arg(long = "project-url", value_name = "LABEL, URL", help_heading = "Metadata")]
    pub project_urls: Vec<String>,

    #[arg(long = "provides-dist", value_name = "DIST", help_heading = "Metadata")]
    pub provides_dist: Vec<String>,

    #[arg(long = "obsoletes-dist", value_name = "DIST", help_heading = "Metadata")]
    pub obsoletes_dist: Vec<String>,
}

impl MetadataOpts {
    /// Whether any metadata option was given
    pub fn is_empty(&self) -> bool {
        self.project_metadata() == ProjectMetadata::default()
    }

    /// The project metadata these options describe
    pub fn project_metadata(&self) -> ProjectMetadata {
        let opts = self.clone();
        ProjectMetadata {
            platforms: opts.platforms,
            supported_platforms: opts.supported_platforms,
            summary: opts.summary,
            description: None,
            description_content_type: opts.description_content_type,
            keywords: opts.keywords,
            home_page: opts.home_page,
            download_url: opts.download_url,
            author: opts.author,
            author_email: opts.author_email,
            maintainer: opts.maintainer,
            maintainer_email: opts.maintainer_email,
            license: opts.license,
            classifiers: opts.classifiers,
            requires_dist: opts.requires_dist,
            requires_python: opts.requires_python,
            requires_external: opts.requires_external,
            project_urls: opts.project_urls,
            provides_dist: opts.provides_dist,
            obsoletes_dist: opts.obsoletes_dist,
        }
    }
}
