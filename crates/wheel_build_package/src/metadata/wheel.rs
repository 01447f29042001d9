//! The `WHEEL` record (build provenance and compatibility tags)

use crate::{GENERATOR_NAME, GENERATOR_VERSION, PythonTag};

/// The wheel format version this crate writes
pub const WHEEL_VERSION: &str = "1.0";

/// Builder for the `WHEEL` record
///
/// # Example
/// ```rust
/// use wheel_build_package::{PythonTag, WheelFileBuilder};
///
/// let wheel = WheelFileBuilder::new().with_tag(PythonTag::Py3).build();
/// assert!(wheel.ends_with("Tag: py3-none-any\n"));
/// ```
#[derive(Debug, Clone)]
pub struct WheelFileBuilder {
    generator: String,
    root_is_purelib: bool,
    tag: PythonTag,
}

impl Default for WheelFileBuilder {
    fn default() -> Self {
        Self {
            generator: format!("{GENERATOR_NAME} {GENERATOR_VERSION}"),
            root_is_purelib: true,
            tag: PythonTag::default(),
        }
    }
}

impl WheelFileBuilder {
    /// Create a new WheelFileBuilder for a universal, pure-python wheel
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the interpreter tag
    pub fn with_tag(mut self, tag: PythonTag) -> Self {
        self.tag = tag;
        self
    }

    /// Override the generator line (`<name> <version>`)
    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = generator.into();
        self
    }

    /// Render the record
    pub fn build(self) -> String {
        let mut wheel = format!(
            "Wheel-Version: {WHEEL_VERSION}\nGenerator: {}\nRoot-Is-Purelib: {}\n",
            self.generator, self.root_is_purelib
        );
        for tag in self.tag.expanded_tags() {
            wheel.push_str(&format!("Tag: {tag}\n"));
        }
        wheel
    }
}
