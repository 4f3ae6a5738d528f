//! Change-notification hooks and the veto protocol.
//!
//! A setting may carry one hook in one of two shapes: a plain notifier that
//! only observes changes, or a veto predicate that decides whether a newly
//! observed value is committed. What a rejection means depends on the path
//! that invoked it; see the rustdoc on the registry's `set`, `update` and
//! inbound-dispatch paths.

use prefsync_types::prelude::*;

/// Where a value change came from when a hook is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
	/// The one-time notification fired for every setting during `begin()`.
	/// A veto result is ignored here.
	Initial,
	/// An inbound bus message on the setting's topic. The value is already
	/// live; a veto only blocks persistence.
	Subscribe,
	/// A local `set` call. The value is already live; a veto only blocks
	/// persistence.
	Set,
	/// A local `update` call, fired with the proposed value before it is
	/// adopted. A veto blocks the mutation entirely.
	Assign,
}

/// Optional per-setting change hook.
pub enum ChangeHook {
	/// Plain notifier; never vetoes.
	Notify(Box<dyn FnMut()>),
	/// Veto predicate; returns `true` to accept the change.
	Veto(Box<dyn FnMut(ChangeOrigin, &SettingValue) -> bool>),
}

impl ChangeHook {
	pub fn notify<F>(f: F) -> Self
	where
		F: FnMut() + 'static,
	{
		ChangeHook::Notify(Box::new(f))
	}

	pub fn veto<F>(f: F) -> Self
	where
		F: FnMut(ChangeOrigin, &SettingValue) -> bool + 'static,
	{
		ChangeHook::Veto(Box::new(f))
	}

	/// Invoke the hook; `true` means accept.
	pub(crate) fn invoke(&mut self, origin: ChangeOrigin, value: &SettingValue) -> bool {
		match self {
			ChangeHook::Notify(f) => {
				f();
				true
			}
			ChangeHook::Veto(f) => f(origin, value),
		}
	}
}

impl std::fmt::Debug for ChangeHook {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			ChangeHook::Notify(_) => f.write_str("ChangeHook::Notify"),
			ChangeHook::Veto(_) => f.write_str("ChangeHook::Veto"),
		}
	}
}

// vim: ts=4
