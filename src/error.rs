//! Error module for the DBS inputs library.
use std::error::Error;
use std::fmt;

/// Error types for the library.
#[derive(Debug, PartialEq)]
pub enum DBSError {
    /// Error for invalid parameters, e.g., a non-positive step size.
    InvalidParameter(String),
    /// Error for I/O operations, including (de)serialization of configuration files.
    IOError(String),
}

impl fmt::Display for DBSError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DBSError::InvalidParameter(e) => write!(f, "Invalid parameters: {}", e),
            DBSError::IOError(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl Error for DBSError {}

impl From<std::io::Error> for DBSError {
    fn from(e: std::io::Error) -> Self {
        DBSError::IOError(e.to_string())
    }
}

impl From<serde_json::Error> for DBSError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() {
            // Well-formed JSON holding values that are rejected.
            return DBSError::InvalidParameter(e.to_string());
        }
        DBSError::IOError(e.to_string())
    }
}
