//! Test fixtures: an inspectable in-memory store and helpers.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use prefsync_types::error::{Error, PsResult};
use prefsync_types::store_adapter::SettingsStore;
use prefsync_types::value::{SettingKind, SettingValue};

pub type SharedCells = Rc<RefCell<HashMap<String, SettingValue>>>;

/// In-memory `SettingsStore` whose cells stay inspectable from the test
/// after the store moves into a registry.
pub struct MemoryStore {
	cells: SharedCells,
	saves: Rc<Cell<usize>>,
	fail_open: bool,
	fail_clear: bool,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::with_cells(Rc::new(RefCell::new(HashMap::new())))
	}

	pub fn with_cells(cells: SharedCells) -> Self {
		Self {
			cells,
			saves: Rc::new(Cell::new(0)),
			fail_open: false,
			fail_clear: false,
		}
	}

	pub fn cells(&self) -> SharedCells {
		Rc::clone(&self.cells)
	}

	/// Counter of successful `save` calls, shared with the test.
	pub fn save_counter(&self) -> Rc<Cell<usize>> {
		Rc::clone(&self.saves)
	}

	pub fn failing_open(mut self) -> Self {
		self.fail_open = true;
		self
	}

	pub fn failing_clear(mut self) -> Self {
		self.fail_clear = true;
		self
	}
}

impl SettingsStore for MemoryStore {
	fn open(&mut self, namespace: &str) -> PsResult<()> {
		if self.fail_open {
			return Err(Error::StoreOpen(format!("simulated failure for '{}'", namespace)));
		}
		Ok(())
	}

	fn contains(&self, key: &str, kind: SettingKind) -> PsResult<bool> {
		Ok(self.cells.borrow().get(key).is_some_and(|v| v.kind() == kind))
	}

	fn load(&self, key: &str, default: &SettingValue) -> PsResult<SettingValue> {
		let cells = self.cells.borrow();
		Ok(cells
			.get(key)
			.filter(|v| v.kind() == default.kind())
			.cloned()
			.unwrap_or_else(|| default.clone()))
	}

	fn save(&mut self, key: &str, value: &SettingValue) -> PsResult<()> {
		self.cells.borrow_mut().insert(key.to_string(), value.clone());
		self.saves.set(self.saves.get() + 1);
		Ok(())
	}

	fn clear(&mut self) -> PsResult<()> {
		if self.fail_clear {
			return Err(Error::Store("simulated clear failure".to_string()));
		}
		self.cells.borrow_mut().clear();
		Ok(())
	}

	fn close(&mut self) {}

	fn max_key_len(&self) -> Option<usize> {
		Some(15)
	}
}

// vim: ts=4
