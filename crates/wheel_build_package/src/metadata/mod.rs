//! Metadata inference and the `.dist-info` records of a wheel

mod core_metadata;
mod identity;
pub mod inference;
mod record;
mod wheel;

pub use core_metadata::{CoreMetadataBuilder, METADATA_VERSION, ProjectMetadata};
pub use identity::{PackageIdentity, canonicalize_name};
pub use inference::{FALLBACK_VERSION, infer, infer_with_overrides};
pub use record::{HASH_ALGORITHM, IntegrityRecord, RecordRow, record_digest};
pub use wheel::{WHEEL_VERSION, WheelFileBuilder};

/// File name of the core metadata record inside `.dist-info`
pub const METADATA_FILE: &str = "METADATA";

/// File name of the wheel record inside `.dist-info`
pub const WHEEL_FILE: &str = "WHEEL";

/// File name of the integrity record inside `.dist-info`
pub const RECORD_FILE: &str = "RECORD";
