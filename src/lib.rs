//! The library pieces of the `wheel-build` binary.

pub mod console_utils;
pub mod opt;

use miette::{IntoDiagnostic, WrapErr};
use wheel_build_package::{PackageBuilder, PackageOutput, verify_wheel};

use crate::opt::App;

/// Build the wheel described by the command-line options.
///
/// Returns the output of the builder; its `path` is absolute.
pub fn build_from_args(args: &App) -> miette::Result<PackageOutput> {
    let mut builder = PackageBuilder::from_path(&args.source, args.package_config())
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read source '{}'", args.source.display()))?;

    if let Some(name) = &args.name {
        builder = builder.with_name(name);
    }
    if let Some(version) = &args.version_override {
        builder = builder.with_version(version);
    }
    if !args.metadata.is_empty() {
        builder = builder.with_project_metadata(args.metadata.project_metadata());
    }

    let output = builder
        .build(&args.output_dir)
        .into_diagnostic()
        .wrap_err("failed to build wheel")?;

    if args.verify {
        let verified = verify_wheel(&output.path).into_diagnostic()?;
        tracing::info!(
            "Verified RECORD of {} ({} members)",
            output.path.display(),
            verified.members.len()
        );
    }

    Ok(output)
}
