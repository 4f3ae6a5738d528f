use prefsync::error::Error as PsError;
use std::fmt;

/// Internal error type for the redb store adapter
#[derive(Debug)]
pub enum Error {
	Redb(String),
	NotOpen,
	Io(std::io::Error),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Error::Redb(msg) => write!(f, "redb error: {}", msg),
			Error::NotOpen => write!(f, "namespace is not open"),
			Error::Io(e) => write!(f, "io error: {}", e),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Self {
		Error::Io(e)
	}
}

impl From<Error> for PsError {
	fn from(e: Error) -> Self {
		match e {
			Error::Io(io_err) => PsError::Io(io_err),
			other => PsError::Store(other.to_string()),
		}
	}
}

/// Helper to convert redb errors
pub fn from_redb_error<E: fmt::Display>(err: E) -> Error {
	Error::Redb(err.to_string())
}

// vim: ts=4
