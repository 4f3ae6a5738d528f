//! The settings registry: lifecycle orchestration, dispatch paths and the
//! veto protocol.
//!
//! A registry owns one persisted namespace and one topic-prefix branch.
//! Settings are registered explicitly before `begin()` and addressed
//! afterwards through typed, copyable handles. All state is mutated from a
//! single control thread; bus handlers are dispatched synchronously from
//! the embedding application's poll loop. Hooks are invoked with the
//! registry borrow released, so a hook may read back through the registry
//! (`get`, `get_default`, including sibling settings); a mutating call from
//! inside a hook bypasses that hook, which is detached for the duration of
//! its invocation.

use std::cell::RefCell;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use prefsync_types::bus_adapter::SettingsBus;
use prefsync_types::prelude::*;
use prefsync_types::store_adapter::SettingsStore;

use crate::codec::{SettingType, decode_value, encode_value};
use crate::hook::{ChangeHook, ChangeOrigin};

/// Payload published on the reset topic as an availability marker.
/// Inbound reset messages are matched by topic, never by payload.
const RESET_SENTINEL: &str = "0";

/// Name segment of the namespace reset topic; reserved, never a setting name.
const RESET_KEY: &str = "reset";

/// Namespace name and topic prefix of a registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
	pub namespace: String,
	pub prefix: String,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self { namespace: "default".to_string(), prefix: "preferences/".to_string() }
	}
}

impl RegistryConfig {
	pub fn new(namespace: impl Into<String>) -> Self {
		Self { namespace: namespace.into(), ..Self::default() }
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}
}

/// Typed, copyable handle to a registered setting.
///
/// Returned by registration; replaces any direct reference between a
/// setting and its registry. A handle outliving its setting (after
/// `unregister`) yields `Error::UnknownSetting` on use.
pub struct SettingHandle<T: SettingType> {
	id: usize,
	_kind: PhantomData<fn() -> T>,
}

impl<T: SettingType> Clone for SettingHandle<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T: SettingType> Copy for SettingHandle<T> {}

impl<T: SettingType> fmt::Debug for SettingHandle<T> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "SettingHandle({})", self.id)
	}
}

/// One named, typed, persisted, bus-synchronized value.
struct SettingSlot {
	name: String,
	/// Compiled default; immutable after registration.
	default: SettingValue,
	current: SettingValue,
	hook: Option<ChangeHook>,
}

struct RegistryInner {
	config: RegistryConfig,
	store: Box<dyn SettingsStore>,
	/// False until `open` succeeds; degraded in-memory-only mode otherwise.
	store_ready: bool,
	started: bool,
	slots: Vec<Option<SettingSlot>>,
}

/// A persisted, bus-synchronized settings namespace.
pub struct SettingsRegistry {
	inner: Rc<RefCell<RegistryInner>>,
	bus: Rc<dyn SettingsBus>,
}

impl SettingsRegistry {
	pub fn new(
		config: RegistryConfig,
		store: Box<dyn SettingsStore>,
		bus: Rc<dyn SettingsBus>,
	) -> Self {
		let inner = RegistryInner {
			config,
			store,
			store_ready: false,
			started: false,
			slots: Vec::new(),
		};
		Self { inner: Rc::new(RefCell::new(inner)), bus }
	}

	pub fn namespace(&self) -> String {
		self.inner.borrow().config.namespace.clone()
	}

	pub fn prefix(&self) -> String {
		self.inner.borrow().config.prefix.clone()
	}

	/// Register a setting with a compiled default and no hook.
	pub fn register<T: SettingType>(
		&self,
		name: &str,
		default: T,
	) -> PsResult<SettingHandle<T>> {
		self.register_slot(name, default.into_value(), None)
			.map(|id| SettingHandle { id, _kind: PhantomData })
	}

	/// Register a setting with a change hook.
	pub fn register_with_hook<T: SettingType>(
		&self,
		name: &str,
		default: T,
		hook: ChangeHook,
	) -> PsResult<SettingHandle<T>> {
		self.register_slot(name, default.into_value(), Some(hook))
			.map(|id| SettingHandle { id, _kind: PhantomData })
	}

	fn register_slot(
		&self,
		name: &str,
		default: SettingValue,
		hook: Option<ChangeHook>,
	) -> PsResult<usize> {
		let mut inner = self.inner.borrow_mut();
		if inner.started {
			return Err(Error::AlreadyStarted);
		}
		// a setting named like the reset key would share the reset topic
		if name == RESET_KEY {
			return Err(Error::ReservedName(name.to_string()));
		}
		if let Some(limit) = inner.store.max_key_len() {
			if name.len() > limit {
				return Err(Error::KeyTooLong(name.to_string()));
			}
		}
		if inner.slots.iter().flatten().any(|slot| slot.name == name) {
			return Err(Error::DuplicateSetting(name.to_string()));
		}
		let id = inner.slots.len();
		inner.slots.push(Some(SettingSlot {
			name: name.to_string(),
			current: default.clone(),
			default,
			hook,
		}));
		Ok(id)
	}

	/// Open the store, load every setting and attach all subscriptions.
	///
	/// A store open failure is logged and non-fatal: the registry keeps
	/// running in a degraded, in-memory-only mode where nothing loaded or
	/// saved persists. For every setting the hook (if any) is fired once
	/// with `ChangeOrigin::Initial`; its veto result is ignored.
	pub fn begin(&self) {
		let (initials, subscriptions) = {
			let mut inner = self.inner.borrow_mut();
			if inner.started {
				warn!("registry '{}' already started", inner.config.namespace);
				return;
			}
			inner.started = true;
			open_store(&mut inner);
			load_all(&mut inner);
			let initials = inner
				.slots
				.iter()
				.enumerate()
				.filter_map(|(id, slot)| slot.as_ref().map(|slot| (id, slot.current.clone())))
				.collect::<Vec<_>>();
			let subscriptions = inner
				.slots
				.iter()
				.enumerate()
				.filter_map(|(id, slot)| {
					slot.as_ref().map(|slot| (id, value_topic(&inner.config, &slot.name)))
				})
				.collect::<Vec<_>>();
			(initials, subscriptions)
		};

		// one-time notification per setting; a veto result is ignored here
		for (id, current) in initials {
			let _ = invoke_hook(&self.inner, id, ChangeOrigin::Initial, &current);
		}

		for (id, topic) in subscriptions {
			let inner = Rc::clone(&self.inner);
			self.bus.subscribe(
				&topic,
				Box::new(move |payload| apply_inbound(&inner, id, payload)),
			);
		}

		// any payload on the reset topic wipes the namespace back to
		// compiled defaults
		let topic = reset_topic(&self.inner.borrow().config);
		let inner = Rc::clone(&self.inner);
		self.bus.subscribe(&topic, Box::new(move |_payload| run_defaults(&inner)));
	}

	/// Reset the whole namespace to compiled defaults.
	///
	/// Explicit two-phase sequence: clear the store (a failure is logged
	/// and the sequence proceeds), close and reopen it, then re-run the
	/// load phase so every setting re-adopts its default and rewrites it.
	pub fn defaults(&self) {
		run_defaults(&self.inner);
	}

	/// Publish the current value of every setting, then the reset-topic
	/// availability marker.
	pub fn publish(&self) {
		let messages = {
			let inner = self.inner.borrow();
			let mut messages: Vec<(String, String)> = inner
				.slots
				.iter()
				.flatten()
				.map(|slot| {
					(value_topic(&inner.config, &slot.name), encode_value(&slot.current))
				})
				.collect();
			messages.push((reset_topic(&inner.config), RESET_SENTINEL.to_string()));
			messages
		};
		for (topic, payload) in messages {
			self.bus.publish(&topic, &payload);
		}
	}

	/// Current value. Pure read, no side effects.
	pub fn get<T: SettingType>(&self, handle: SettingHandle<T>) -> PsResult<T> {
		let inner = self.inner.borrow();
		let slot = inner
			.slots
			.get(handle.id)
			.and_then(Option::as_ref)
			.ok_or(Error::UnknownSetting)?;
		T::from_value(&slot.current).ok_or(Error::KindMismatch)
	}

	/// Compiled default, unaffected by stored or received values.
	pub fn get_default<T: SettingType>(&self, handle: SettingHandle<T>) -> PsResult<T> {
		let inner = self.inner.borrow();
		let slot = inner
			.slots
			.get(handle.id)
			.and_then(Option::as_ref)
			.ok_or(Error::UnknownSetting)?;
		T::from_value(&slot.default).ok_or(Error::KindMismatch)
	}

	/// Adopt `value`, then persist and publish it.
	///
	/// No-op when `value` equals the current value. The hook is invoked
	/// with `ChangeOrigin::Set` after the value is live; a veto blocks
	/// persistence only, so the value stays applied for this session but
	/// will not survive a reload.
	pub fn set<T: SettingType>(&self, handle: SettingHandle<T>, value: T) -> PsResult<()> {
		self.set_value(handle.id, value.into_value())
	}

	/// Guarded assignment: veto precedes mutation.
	///
	/// The hook is invoked first with `ChangeOrigin::Assign` and the
	/// proposed value; a rejection leaves the current value untouched and
	/// publishes nothing, returning `Ok(false)`. On acceptance this
	/// proceeds exactly as [`set`](Self::set) and returns `Ok(true)`.
	pub fn update<T: SettingType>(
		&self,
		handle: SettingHandle<T>,
		value: T,
	) -> PsResult<bool> {
		let value = value.into_value();
		let name = {
			let inner = self.inner.borrow();
			let slot = inner
				.slots
				.get(handle.id)
				.and_then(Option::as_ref)
				.ok_or(Error::UnknownSetting)?;
			if slot.current.kind() != value.kind() {
				return Err(Error::KindMismatch);
			}
			slot.name.clone()
		};
		if !invoke_hook(&self.inner, handle.id, ChangeOrigin::Assign, &value) {
			debug!("update of '{}' rejected by hook", name);
			return Ok(false);
		}
		self.set_value(handle.id, value)?;
		Ok(true)
	}

	/// Attach, replace or remove the setting's change hook.
	///
	/// Allowed at any point in the lifecycle, including after `begin()`;
	/// the next change on any path goes through the new hook.
	pub fn set_hook<T: SettingType>(
		&self,
		handle: SettingHandle<T>,
		hook: Option<ChangeHook>,
	) -> PsResult<()> {
		let mut inner = self.inner.borrow_mut();
		let slot = inner
			.slots
			.get_mut(handle.id)
			.and_then(Option::as_mut)
			.ok_or(Error::UnknownSetting)?;
		slot.hook = hook;
		Ok(())
	}

	/// Unsubscribe the setting's topic and remove it from the registry.
	pub fn unregister<T: SettingType>(&self, handle: SettingHandle<T>) -> PsResult<()> {
		let topic = {
			let mut inner = self.inner.borrow_mut();
			let slot = inner
				.slots
				.get_mut(handle.id)
				.and_then(Option::take)
				.ok_or(Error::UnknownSetting)?;
			value_topic(&inner.config, &slot.name)
		};
		self.bus.unsubscribe(&topic);
		Ok(())
	}

	fn set_value(&self, id: usize, value: SettingValue) -> PsResult<()> {
		let (name, current) = {
			let mut inner = self.inner.borrow_mut();
			let slot = inner
				.slots
				.get_mut(id)
				.and_then(Option::as_mut)
				.ok_or(Error::UnknownSetting)?;
			if slot.current.kind() != value.kind() {
				return Err(Error::KindMismatch);
			}
			if slot.current == value {
				return Ok(());
			}
			slot.current = value;
			(slot.name.clone(), slot.current.clone())
		};
		let accepted = invoke_hook(&self.inner, id, ChangeOrigin::Set, &current);
		let (topic, payload) = {
			let mut inner = self.inner.borrow_mut();
			if accepted {
				persist(&mut inner, id);
			} else {
				debug!("persist of '{}' vetoed", name);
			}
			let topic = value_topic(&inner.config, &name);
			let payload = inner
				.slots
				.get(id)
				.and_then(Option::as_ref)
				.map_or_else(|| encode_value(&current), |slot| encode_value(&slot.current));
			(topic, payload)
		};
		self.bus.publish(&topic, &payload);
		Ok(())
	}
}

impl Drop for SettingsRegistry {
	fn drop(&mut self) {
		let topics = {
			let inner = self.inner.borrow();
			let mut topics: Vec<String> = inner
				.slots
				.iter()
				.flatten()
				.map(|slot| value_topic(&inner.config, &slot.name))
				.collect();
			topics.push(reset_topic(&inner.config));
			topics
		};
		for topic in &topics {
			self.bus.unsubscribe(topic);
		}
		self.inner.borrow_mut().store.close();
	}
}

fn value_topic(config: &RegistryConfig, name: &str) -> String {
	format!("{}{}/{}", config.prefix, config.namespace, name)
}

fn reset_topic(config: &RegistryConfig) -> String {
	format!("{}{}/{}", config.prefix, config.namespace, RESET_KEY)
}

fn open_store(inner: &mut RegistryInner) {
	let namespace = inner.config.namespace.clone();
	match inner.store.open(&namespace) {
		Ok(()) => inner.store_ready = true,
		Err(err) => {
			warn!("opening namespace '{}' failed: {}", namespace, err);
			inner.store_ready = false;
		}
	}
}

/// Load phase: seed absent keys with the compiled default, adopt stored
/// values otherwise. In degraded mode every setting falls back to its
/// default.
fn load_all(inner: &mut RegistryInner) {
	if !inner.store_ready {
		for slot in inner.slots.iter_mut().flatten() {
			slot.current = slot.default.clone();
		}
		return;
	}
	for id in 0..inner.slots.len() {
		let Some((name, default)) = inner.slots[id]
			.as_ref()
			.map(|slot| (slot.name.clone(), slot.default.clone()))
		else {
			continue;
		};
		let loaded = match inner.store.contains(&name, default.kind()) {
			Ok(true) => match inner.store.load(&name, &default) {
				Ok(value) => value,
				Err(err) => {
					warn!("loading '{}' failed: {}", name, err);
					default
				}
			},
			Ok(false) => {
				if let Err(err) = inner.store.save(&name, &default) {
					warn!("seeding '{}' failed: {}", name, err);
				}
				default
			}
			Err(err) => {
				warn!("probing '{}' failed: {}", name, err);
				default
			}
		};
		if let Some(slot) = inner.slots[id].as_mut() {
			slot.current = loaded;
		}
	}
}

/// Run the setting's hook with the registry borrow released, so the
/// callback may call back into the registry. The hook is detached for the
/// duration of the call; a hook installed from inside the callback wins
/// over reinstating the detached one.
fn invoke_hook(
	inner: &Rc<RefCell<RegistryInner>>,
	id: usize,
	origin: ChangeOrigin,
	value: &SettingValue,
) -> bool {
	let hook = {
		let mut guard = inner.borrow_mut();
		match guard.slots.get_mut(id).and_then(Option::as_mut) {
			Some(slot) => slot.hook.take(),
			None => return true,
		}
	};
	let Some(mut hook) = hook else {
		return true;
	};
	let accepted = hook.invoke(origin, value);
	let mut guard = inner.borrow_mut();
	if let Some(slot) = guard.slots.get_mut(id).and_then(Option::as_mut) {
		if slot.hook.is_none() {
			slot.hook = Some(hook);
		}
	}
	accepted
}

fn persist(inner: &mut RegistryInner, id: usize) {
	let Some((name, value)) = inner.slots[id]
		.as_ref()
		.map(|slot| (slot.name.clone(), slot.current.clone()))
	else {
		return;
	};
	if !inner.store_ready {
		return;
	}
	if let Err(err) = inner.store.save(&name, &value) {
		warn!("saving '{}' failed: {}", name, err);
	}
}

/// Inbound message on a value topic. The payload is decoded directly into
/// the current value (tolerantly, and unconditionally); the hook is then
/// invoked with `ChangeOrigin::Subscribe` and a veto blocks persistence
/// only. A vetoed value stays live until the next reload.
fn apply_inbound(inner: &Rc<RefCell<RegistryInner>>, id: usize, payload: &str) {
	let (name, current) = {
		let mut guard = inner.borrow_mut();
		let Some(slot) = guard.slots.get_mut(id).and_then(Option::as_mut) else {
			return;
		};
		slot.current = decode_value(slot.current.kind(), payload);
		trace!("received '{}' <- {:?}", slot.name, slot.current);
		(slot.name.clone(), slot.current.clone())
	};
	let accepted = invoke_hook(inner, id, ChangeOrigin::Subscribe, &current);
	let mut guard = inner.borrow_mut();
	if accepted {
		persist(&mut guard, id);
	} else {
		debug!("persist of received '{}' vetoed", name);
	}
}

fn run_defaults(inner: &Rc<RefCell<RegistryInner>>) {
	let mut inner = inner.borrow_mut();
	info!("defaults: {}", inner.config.namespace);
	if inner.store_ready {
		if let Err(err) = inner.store.clear() {
			warn!("clearing namespace '{}' failed: {}", inner.config.namespace, err);
		}
	}
	inner.store.close();
	inner.store_ready = false;
	open_store(&mut inner);
	load_all(&mut inner);
}

// vim: ts=4
