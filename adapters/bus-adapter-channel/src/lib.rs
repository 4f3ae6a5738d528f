//! In-process channel-backed bus adapter.
//!
//! Implements the `SettingsBus` trait on top of a flume channel pair. The
//! adapter is the in-process edge of the messaging channel:
//!
//! - inbound messages are injected through a cloneable [`ChannelBus::sender`]
//!   handle and delivered to subscribed handlers by [`ChannelBus::poll`],
//!   which the embedding application drives from its loop;
//! - outbound `publish` calls are appended to a log readable through
//!   [`ChannelBus::take_published`], where a transport bridge (or a test)
//!   picks them up.
//!
//! Everything runs on the single control thread; handlers are dispatched
//! synchronously from `poll`.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use prefsync::bus_adapter::{BusHandler, SettingsBus};
use prefsync::prelude::*;

/// One topic/payload pair moving through the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
	pub topic: String,
	pub payload: String,
}

impl BusMessage {
	pub fn new(topic: impl Into<String>, payload: impl Into<String>) -> Self {
		Self { topic: topic.into(), payload: payload.into() }
	}
}

/// Channel-backed `SettingsBus` implementation.
pub struct ChannelBus {
	tx: flume::Sender<BusMessage>,
	rx: flume::Receiver<BusMessage>,
	handlers: RefCell<HashMap<String, BusHandler>>,
	outbound: RefCell<Vec<BusMessage>>,
}

impl ChannelBus {
	pub fn new() -> Self {
		let (tx, rx) = flume::unbounded();
		Self {
			tx,
			rx,
			handlers: RefCell::new(HashMap::new()),
			outbound: RefCell::new(Vec::new()),
		}
	}

	/// Cloneable injection handle for inbound messages.
	pub fn sender(&self) -> flume::Sender<BusMessage> {
		self.tx.clone()
	}

	/// Drain pending inbound messages, dispatching each to the handler
	/// subscribed to its topic (exact match). Messages without a subscriber
	/// are dropped. Returns the number of messages delivered.
	pub fn poll(&self) -> usize {
		let mut delivered = 0;
		while let Ok(message) = self.rx.try_recv() {
			let mut handlers = self.handlers.borrow_mut();
			if let Some(handler) = handlers.get_mut(&message.topic) {
				handler(&message.payload);
				delivered += 1;
			} else {
				trace!("no subscriber for '{}'", message.topic);
			}
		}
		delivered
	}

	/// Drain the outbound log.
	pub fn take_published(&self) -> Vec<BusMessage> {
		std::mem::take(&mut self.outbound.borrow_mut())
	}

	/// Number of topics currently subscribed.
	pub fn subscription_count(&self) -> usize {
		self.handlers.borrow().len()
	}
}

impl Default for ChannelBus {
	fn default() -> Self {
		Self::new()
	}
}

impl SettingsBus for ChannelBus {
	fn publish(&self, topic: &str, payload: &str) {
		debug!("publish {} <- {}", topic, payload);
		self.outbound.borrow_mut().push(BusMessage::new(topic, payload));
	}

	fn subscribe(&self, topic: &str, handler: BusHandler) {
		debug!("subscribe {}", topic);
		self.handlers.borrow_mut().insert(topic.to_string(), handler);
	}

	fn unsubscribe(&self, topic: &str) {
		debug!("unsubscribe {}", topic);
		self.handlers.borrow_mut().remove(topic);
	}
}

// vim: ts=4
