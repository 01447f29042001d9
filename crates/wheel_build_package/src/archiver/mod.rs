//! Writing and verifying wheel archives

mod reader;
mod writer;

pub use reader::{VerifiedWheel, verify_wheel};
pub use writer::PackageWriter;
