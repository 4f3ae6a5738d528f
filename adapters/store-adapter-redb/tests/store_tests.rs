//! Integration tests for the redb store adapter: typed round-trips,
//! persistence across reopen, clear semantics and key probing.

use prefsync::store_adapter::SettingsStore;
use prefsync::value::{SettingKind, SettingValue};
use store_adapter_redb::{MAX_KEY_LEN, StoreAdapterRedb};

fn open_store(dir: &std::path::Path, namespace: &str) -> StoreAdapterRedb {
	let mut store = StoreAdapterRedb::new(dir);
	store.open(namespace).expect("Failed to open namespace");
	store
}

#[test]
fn save_and_load_every_kind() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir");
	let mut store = open_store(dir.path(), "test");

	let values = [
		("text", SettingValue::Text("hello".to_string())),
		("int", SettingValue::Int(-42)),
		("bool", SettingValue::Bool(true)),
		("float", SettingValue::Float(1.25)),
		("double", SettingValue::Double(-2.5)),
	];

	for (key, value) in &values {
		store.save(key, value).expect("Failed to save");
	}
	for (key, value) in &values {
		assert!(store.contains(key, value.kind()).expect("Failed to probe"));
		let loaded = store.load(key, value).expect("Failed to load");
		assert_eq!(&loaded, value);
	}
}

#[test]
fn load_missing_key_returns_default() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir");
	let store = open_store(dir.path(), "test");

	assert!(!store.contains("absent", SettingKind::Int).expect("Failed to probe"));
	let loaded = store.load("absent", &SettingValue::Int(7)).expect("Failed to load");
	assert_eq!(loaded, SettingValue::Int(7));
}

#[test]
fn values_survive_close_and_reopen() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir");
	let mut store = open_store(dir.path(), "persist");
	store.save("bar", &SettingValue::Int(7)).expect("Failed to save");
	store.close();

	let mut store = StoreAdapterRedb::new(dir.path());
	store.open("persist").expect("Failed to reopen namespace");
	assert!(store.contains("bar", SettingKind::Int).expect("Failed to probe"));
	let loaded = store.load("bar", &SettingValue::Int(0)).expect("Failed to load");
	assert_eq!(loaded, SettingValue::Int(7));
}

#[test]
fn namespaces_are_isolated() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir");
	let mut first = open_store(dir.path(), "one");
	first.save("key", &SettingValue::Bool(true)).expect("Failed to save");

	let other = open_store(dir.path(), "two");
	assert!(!other.contains("key", SettingKind::Bool).expect("Failed to probe"));
}

#[test]
fn clear_removes_every_key() {
	let dir = tempfile::tempdir().expect("Failed to create temp dir");
	let mut store = open_store(dir.path(), "test");
	store.save("a", &SettingValue::Int(1)).expect("Failed to save");
	store.save("b", &SettingValue::Text("x".to_string())).expect("Failed to save");

	store.clear().expect("Failed to clear");
	assert!(!store.contains("a", SettingKind::Int).expect("Failed to probe"));
	assert!(!store.contains("b", SettingKind::Text).expect("Failed to probe"));
	// store stays usable after clear
	store.save("a", &SettingValue::Int(2)).expect("Failed to save");
	let loaded = store.load("a", &SettingValue::Int(0)).expect("Failed to load");
	assert_eq!(loaded, SettingValue::Int(2));
}

#[test]
fn same_key_may_exist_per_kind() {
	// tables are segregated by kind, so kinds never collide
	let dir = tempfile::tempdir().expect("Failed to create temp dir");
	let mut store = open_store(dir.path(), "test");
	store.save("key", &SettingValue::Int(1)).expect("Failed to save");
	store.save("key", &SettingValue::Text("one".to_string())).expect("Failed to save");

	assert_eq!(
		store.load("key", &SettingValue::Int(0)).expect("Failed to load"),
		SettingValue::Int(1)
	);
	assert_eq!(
		store.load("key", &SettingValue::Text(String::new())).expect("Failed to load"),
		SettingValue::Text("one".to_string())
	);
}

#[test]
fn operations_fail_before_open() {
	let store = StoreAdapterRedb::new("/nonexistent-unused");
	assert!(store.contains("x", SettingKind::Int).is_err());
	assert!(store.load("x", &SettingValue::Int(0)).is_err());
}

#[test]
fn reports_key_length_limit() {
	let store = StoreAdapterRedb::new("/nonexistent-unused");
	assert_eq!(store.max_key_len(), Some(MAX_KEY_LEN));
}

// vim: ts=4
