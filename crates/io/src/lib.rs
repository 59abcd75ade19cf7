// File I/O operations

pub mod csv;
pub mod error;
pub mod session;

pub use error::SessionFileError;

/// Session file format version.
/// Increment when the schema changes in a way that old versions can't read.
pub const SESSION_FORMAT_VERSION: u32 = 1;
