//! Error types shared by the registry core and its adapters.

pub type PsResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Opening the persistent namespace failed. Non-fatal: the registry
	/// keeps running in a degraded, in-memory-only mode.
	StoreOpen(String),
	/// A store read, write or clear failed.
	Store(String),
	/// A setting with the same name is already registered in this namespace.
	DuplicateSetting(String),
	/// The setting name exceeds the store's key-length limit.
	KeyTooLong(String),
	/// The setting name is reserved for registry control topics.
	ReservedName(String),
	/// The handle does not refer to a live setting in this registry.
	UnknownSetting,
	/// The handle's value kind does not match the registered setting.
	KindMismatch,
	/// Settings cannot be registered after `begin()` has run.
	AlreadyStarted,

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::StoreOpen(msg) => write!(f, "store open failed: {}", msg),
			Error::Store(msg) => write!(f, "store error: {}", msg),
			Error::DuplicateSetting(name) => write!(f, "duplicate setting '{}'", name),
			Error::KeyTooLong(name) => write!(f, "setting name '{}' exceeds key length limit", name),
			Error::ReservedName(name) => write!(f, "setting name '{}' is reserved", name),
			Error::UnknownSetting => write!(f, "unknown setting"),
			Error::KindMismatch => write!(f, "setting kind mismatch"),
			Error::AlreadyStarted => write!(f, "registry already started"),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

// vim: ts=4
