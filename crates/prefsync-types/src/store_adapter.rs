//! Adapter trait for the persistent, typed key-value store backing a
//! registry namespace.
//!
//! Values cross this boundary as [`SettingValue`] variants and the backend
//! persists each kind through a native typed accessor. The string wire
//! codec is never involved here; it is reserved for bus payloads.

use crate::error::PsResult;
use crate::value::{SettingKind, SettingValue};

/// Synchronous persistent store, one namespace per registry.
///
/// Operations may block on storage I/O. There is no timeout or retry;
/// callers accept eventual completion or a logged failure.
pub trait SettingsStore {
	/// Open (or create) the namespace. Must be called before any other
	/// operation; a closed store may be reopened later.
	fn open(&mut self, namespace: &str) -> PsResult<()>;

	/// Whether `key` holds a value of `kind` in the open namespace.
	fn contains(&self, key: &str, kind: SettingKind) -> PsResult<bool>;

	/// Load the value stored under `key`. The kind of `default` selects the
	/// typed accessor; `default` is returned when the key is absent.
	fn load(&self, key: &str, default: &SettingValue) -> PsResult<SettingValue>;

	/// Store `value` under `key` through the accessor for its kind.
	fn save(&mut self, key: &str, value: &SettingValue) -> PsResult<()>;

	/// Remove every key in the namespace.
	fn clear(&mut self) -> PsResult<()>;

	/// Close the namespace handle. Subsequent access requires `open`.
	fn close(&mut self);

	/// Longest key the backend accepts, if limited.
	fn max_key_len(&self) -> Option<usize> {
		None
	}
}

// vim: ts=4
