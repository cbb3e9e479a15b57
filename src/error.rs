//! Library-wide error, warning, and result types.

use std::fmt;
use std::io;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors a transformer can produce.
///
/// Error messages are kept intentionally terse; callers that need richer
/// context should wrap `Error` in their own type.
#[derive(Debug)]
pub enum Error {
    /// A magic/signature field did not match the expected value.
    BadMagic,
    /// A structural constraint was violated (message describes which one).
    Parse(&'static str),
    /// A declared size or count exceeds the buffer that holds it.
    Truncated,
    /// The injected decompressor could not decompress a YAY0-framed block,
    /// for a caller whose contract treats this as terminal rather than a
    /// recoverable [`Warning`] (see [`crate::decompress`]).
    Decompress(String),
    /// An underlying I/O operation failed.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BadMagic => write!(f, "bad magic value"),
            Error::Parse(s) => write!(f, "parse error: {s}"),
            Error::Truncated => write!(f, "structure truncated by buffer bounds"),
            Error::Decompress(msg) => write!(f, "decompression failed: {msg}"),
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let Error::Io(e) = self {
            Some(e)
        } else {
            None
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// A non-fatal condition raised while converting one asset.
///
/// Decompression failure on a MapFS entry, missing configuration for a
/// named asset, and partial output from a truncated structure are all
/// reportable but do not abort the overall run.
#[derive(Debug, Clone)]
pub struct Warning {
    /// Name of the asset or MapFS entry the warning concerns.
    pub asset: String,
    /// Human-readable description.
    pub message: String,
}

impl Warning {
    pub fn new(asset: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.asset, self.message)
    }
}
