use std::fmt;

#[derive(Debug)]
pub enum SessionFileError {
    /// File read/write error.
    Io(String),
    /// Malformed JSON, or a grid that breaks the shape rules.
    Parse(String),
    /// Written by a newer (or unknown) version of the format.
    UnsupportedVersion { found: u32, expected: u32 },
    /// CSV writer error.
    Csv(String),
}

impl fmt::Display for SessionFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Parse(msg) => write!(f, "session parse error: {msg}"),
            Self::UnsupportedVersion { found, expected } => {
                write!(f, "unsupported session format version {found} (expected {expected})")
            }
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for SessionFileError {}

impl From<std::io::Error> for SessionFileError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for SessionFileError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<::csv::Error> for SessionFileError {
    fn from(e: ::csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}
