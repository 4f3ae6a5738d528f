//! The closed set of value kinds a setting can hold.
//!
//! Settings are limited to a small, fixed set of kinds so heterogeneous
//! registries can hold them in one homogeneous collection and the store
//! adapters can persist each kind through a native typed accessor.

use serde::{Deserialize, Serialize};

/// Discriminant of a [`SettingValue`], used to select the store's typed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKind {
	Text,
	Int,
	Bool,
	Float,
	Double,
}

/// A setting value of one of the supported kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
	Text(String),
	Int(i32),
	Bool(bool),
	Float(f32),
	Double(f64),
}

impl SettingValue {
	pub fn kind(&self) -> SettingKind {
		match self {
			SettingValue::Text(_) => SettingKind::Text,
			SettingValue::Int(_) => SettingKind::Int,
			SettingValue::Bool(_) => SettingKind::Bool,
			SettingValue::Float(_) => SettingKind::Float,
			SettingValue::Double(_) => SettingKind::Double,
		}
	}
}

// vim: ts=4
