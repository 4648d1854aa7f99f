//! Error handling types
//!
//! Per-type conditions (an unrecognized marker, an unparseable argument
//! list, an unverifiable contract override) never surface here; the
//! pipeline degrades those to defaults or skips the type. `Error` is
//! reserved for whole-file failures and misuse of the library surface.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for generator operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the wireup generator
#[derive(Error, Debug)]
pub enum Error {
    /// I/O failure while reading a source tree or writing the artifact
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A source file failed to parse as Rust
    #[error("parse error in {path}: {message}")]
    Parse {
        /// File that failed to parse
        path: PathBuf,
        /// Parser message, with line/column when available
        message: String,
    },

    /// An invalid value reached the generator options
    #[error("invalid option {key}: {message}")]
    InvalidOption {
        /// Option key as supplied
        key: String,
        /// Description of what was wrong
        message: String,
    },
}

impl Error {
    /// I/O error tagged with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Parse failure for a whole source file
    pub fn parse(path: impl Into<PathBuf>, source: &syn::Error) -> Self {
        let start = source.span().start();
        Self::Parse {
            path: path.into(),
            message: format!("{source} (line {}, column {})", start.line, start.column),
        }
    }

    /// Rejected generator option value
    pub fn invalid_option(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            message: message.into(),
        }
    }
}
