//! Shared plumbing for the colony workspace: log setup and config file
//! (de)serialization.

pub mod file_format;
pub mod log_setup;
pub mod serde_io;

pub use file_format::{FileExtensionError, FileFormat};
pub use serde_io::{SerdeFormatError, deserialize, read_file, serialize, write_file};
