//! redb-based persistent store adapter.
//!
//! Implements the `SettingsStore` trait using redb. Each namespace maps to
//! one database file `<dir>/<namespace>.redb` holding five typed tables,
//! one per value kind, so every setting is persisted through a native
//! typed accessor and never stringified.
//!
//! # Storage Layout
//!
//! - `text`   - `&str` values
//! - `int`    - `i32` values
//! - `bool`   - `bool` values
//! - `float`  - `f32` values
//! - `double` - `f64` values
//!
//! Keys are the setting names, limited to [`MAX_KEY_LEN`] bytes for
//! compatibility with NVS-style stores.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

use std::path::PathBuf;

use redb::ReadableDatabase;
use tracing::debug;

use prefsync::error::{Error as PsError, PsResult};
use prefsync::store_adapter::SettingsStore;
use prefsync::value::{SettingKind, SettingValue};

mod error;
pub use error::Error;
use error::from_redb_error;

/// Longest key the adapter accepts, matching NVS-style key limits.
pub const MAX_KEY_LEN: usize = 15;

// Storage table definitions
mod tables {
	use redb::TableDefinition;

	pub const TABLE_TEXT: TableDefinition<&str, &str> = TableDefinition::new("text");
	pub const TABLE_INT: TableDefinition<&str, i32> = TableDefinition::new("int");
	pub const TABLE_BOOL: TableDefinition<&str, bool> = TableDefinition::new("bool");
	pub const TABLE_FLOAT: TableDefinition<&str, f32> = TableDefinition::new("float");
	pub const TABLE_DOUBLE: TableDefinition<&str, f64> = TableDefinition::new("double");
}

use tables::*;

/// `SettingsStore` implementation backed by redb.
#[derive(Debug)]
pub struct StoreAdapterRedb {
	storage_dir: PathBuf,
	db: Option<redb::Database>,
}

impl StoreAdapterRedb {
	/// Create an adapter storing namespace files under `storage_dir`.
	/// The directory is created on `open` if missing.
	pub fn new(storage_dir: impl Into<PathBuf>) -> Self {
		Self { storage_dir: storage_dir.into(), db: None }
	}

	fn db(&self) -> Result<&redb::Database, Error> {
		self.db.as_ref().ok_or(Error::NotOpen)
	}
}

impl SettingsStore for StoreAdapterRedb {
	fn open(&mut self, namespace: &str) -> PsResult<()> {
		std::fs::create_dir_all(&self.storage_dir)
			.map_err(|e| PsError::StoreOpen(e.to_string()))?;
		let path = self.storage_dir.join(format!("{}.redb", namespace));
		debug!("opening namespace '{}' at {:?}", namespace, path);
		let db = redb::Database::create(&path)
			.map_err(|e| PsError::StoreOpen(e.to_string()))?;

		// make sure all tables exist so reads never race table creation
		let tx = db.begin_write().map_err(|e| PsError::StoreOpen(e.to_string()))?;
		{
			tx.open_table(TABLE_TEXT).map_err(|e| PsError::StoreOpen(e.to_string()))?;
			tx.open_table(TABLE_INT).map_err(|e| PsError::StoreOpen(e.to_string()))?;
			tx.open_table(TABLE_BOOL).map_err(|e| PsError::StoreOpen(e.to_string()))?;
			tx.open_table(TABLE_FLOAT).map_err(|e| PsError::StoreOpen(e.to_string()))?;
			tx.open_table(TABLE_DOUBLE).map_err(|e| PsError::StoreOpen(e.to_string()))?;
		}
		tx.commit().map_err(|e| PsError::StoreOpen(e.to_string()))?;

		self.db = Some(db);
		Ok(())
	}

	fn contains(&self, key: &str, kind: SettingKind) -> PsResult<bool> {
		let db = self.db()?;
		let tx = db.begin_read().map_err(from_redb_error)?;
		let found = match kind {
			SettingKind::Text => {
				let table = tx.open_table(TABLE_TEXT).map_err(from_redb_error)?;
				table.get(key).map_err(from_redb_error)?.is_some()
			}
			SettingKind::Int => {
				let table = tx.open_table(TABLE_INT).map_err(from_redb_error)?;
				table.get(key).map_err(from_redb_error)?.is_some()
			}
			SettingKind::Bool => {
				let table = tx.open_table(TABLE_BOOL).map_err(from_redb_error)?;
				table.get(key).map_err(from_redb_error)?.is_some()
			}
			SettingKind::Float => {
				let table = tx.open_table(TABLE_FLOAT).map_err(from_redb_error)?;
				table.get(key).map_err(from_redb_error)?.is_some()
			}
			SettingKind::Double => {
				let table = tx.open_table(TABLE_DOUBLE).map_err(from_redb_error)?;
				table.get(key).map_err(from_redb_error)?.is_some()
			}
		};
		Ok(found)
	}

	fn load(&self, key: &str, default: &SettingValue) -> PsResult<SettingValue> {
		let db = self.db()?;
		let tx = db.begin_read().map_err(from_redb_error)?;
		let value = match default {
			SettingValue::Text(d) => {
				let table = tx.open_table(TABLE_TEXT).map_err(from_redb_error)?;
				let stored = table.get(key).map_err(from_redb_error)?;
				SettingValue::Text(stored.map_or_else(|| d.clone(), |g| g.value().to_string()))
			}
			SettingValue::Int(d) => {
				let table = tx.open_table(TABLE_INT).map_err(from_redb_error)?;
				let stored = table.get(key).map_err(from_redb_error)?;
				SettingValue::Int(stored.map_or(*d, |g| g.value()))
			}
			SettingValue::Bool(d) => {
				let table = tx.open_table(TABLE_BOOL).map_err(from_redb_error)?;
				let stored = table.get(key).map_err(from_redb_error)?;
				SettingValue::Bool(stored.map_or(*d, |g| g.value()))
			}
			SettingValue::Float(d) => {
				let table = tx.open_table(TABLE_FLOAT).map_err(from_redb_error)?;
				let stored = table.get(key).map_err(from_redb_error)?;
				SettingValue::Float(stored.map_or(*d, |g| g.value()))
			}
			SettingValue::Double(d) => {
				let table = tx.open_table(TABLE_DOUBLE).map_err(from_redb_error)?;
				let stored = table.get(key).map_err(from_redb_error)?;
				SettingValue::Double(stored.map_or(*d, |g| g.value()))
			}
		};
		Ok(value)
	}

	fn save(&mut self, key: &str, value: &SettingValue) -> PsResult<()> {
		let db = self.db()?;
		let tx = db.begin_write().map_err(from_redb_error)?;
		{
			match value {
				SettingValue::Text(v) => {
					let mut table = tx.open_table(TABLE_TEXT).map_err(from_redb_error)?;
					table.insert(key, v.as_str()).map_err(from_redb_error)?;
				}
				SettingValue::Int(v) => {
					let mut table = tx.open_table(TABLE_INT).map_err(from_redb_error)?;
					table.insert(key, *v).map_err(from_redb_error)?;
				}
				SettingValue::Bool(v) => {
					let mut table = tx.open_table(TABLE_BOOL).map_err(from_redb_error)?;
					table.insert(key, *v).map_err(from_redb_error)?;
				}
				SettingValue::Float(v) => {
					let mut table = tx.open_table(TABLE_FLOAT).map_err(from_redb_error)?;
					table.insert(key, *v).map_err(from_redb_error)?;
				}
				SettingValue::Double(v) => {
					let mut table = tx.open_table(TABLE_DOUBLE).map_err(from_redb_error)?;
					table.insert(key, *v).map_err(from_redb_error)?;
				}
			}
		}
		tx.commit().map_err(from_redb_error)?;
		Ok(())
	}

	fn clear(&mut self) -> PsResult<()> {
		let db = self.db()?;
		let tx = db.begin_write().map_err(from_redb_error)?;
		{
			tx.delete_table(TABLE_TEXT).map_err(from_redb_error)?;
			tx.delete_table(TABLE_INT).map_err(from_redb_error)?;
			tx.delete_table(TABLE_BOOL).map_err(from_redb_error)?;
			tx.delete_table(TABLE_FLOAT).map_err(from_redb_error)?;
			tx.delete_table(TABLE_DOUBLE).map_err(from_redb_error)?;
			// recreate so later reads see empty tables instead of missing ones
			tx.open_table(TABLE_TEXT).map_err(from_redb_error)?;
			tx.open_table(TABLE_INT).map_err(from_redb_error)?;
			tx.open_table(TABLE_BOOL).map_err(from_redb_error)?;
			tx.open_table(TABLE_FLOAT).map_err(from_redb_error)?;
			tx.open_table(TABLE_DOUBLE).map_err(from_redb_error)?;
		}
		tx.commit().map_err(from_redb_error)?;
		Ok(())
	}

	fn close(&mut self) {
		self.db = None;
	}

	fn max_key_len(&self) -> Option<usize> {
		Some(MAX_KEY_LEN)
	}
}

// vim: ts=4
