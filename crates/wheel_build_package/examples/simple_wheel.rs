//! Simple example of creating a wheel from a package directory

use fs_err as fs;
use wheel_build_package::{PackageBuilder, PackageConfig, ProjectMetadata, PythonTag};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Create a temporary directory with a small package
    let source_dir = tempfile::tempdir()?;
    let output_dir = tempfile::tempdir()?;

    let pkg = source_dir.path().join("greeter");
    fs::create_dir_all(pkg.join("templates"))?;
    fs::write(
        pkg.join("__init__.py"),
        "\"\"\"Friendly greetings.\"\"\"\n\n__version__ = \"1.2.0\"\n",
    )?;
    fs::write(pkg.join("cli.py"), "def main():\n    print('hi')\n")?;
    fs::write(pkg.join("templates").join("hello.txt"), "Hello, {name}!")?;
    fs::write(
        source_dir.path().join("README.rst"),
        "Greeter\n=======\n\nSays hello.\n",
    )?;

    let config = PackageConfig {
        python_tag: PythonTag::Py3,
        exclude: vec!["*.txt".to_string()],
        ..Default::default()
    };

    println!("Building wheel...");

    let output = PackageBuilder::from_path(&pkg, config)?
        .with_project_metadata(ProjectMetadata {
            summary: Some("Friendly greetings".to_string()),
            author: Some("Jane Doe".to_string()),
            requires_dist: vec!["colorama; extra == 'color'".to_string()],
            ..Default::default()
        })
        .build(output_dir.path())?;

    println!("Wheel created successfully!");
    println!("   Path: {}", output.path.display());
    println!("   Identity: {}", output.identity);
    println!("\nRECORD:");
    for row in &output.record {
        println!("   - {}", row.path);
    }

    Ok(())
}
