//! Adapter trait for the publish/subscribe messaging channel.
//!
//! The registry only publishes payloads and registers per-topic handlers.
//! The driving poll loop belongs to the embedding application and the
//! concrete adapter; handlers are dispatched synchronously from it and
//! must not block.

/// Handler invoked with the payload of each message on a subscribed topic.
pub type BusHandler = Box<dyn FnMut(&str)>;

/// Synchronous pub/sub transport.
///
/// Implementations take `&self` and use interior mutability where needed;
/// the whole system runs on a single control thread.
pub trait SettingsBus {
	/// Publish `payload` on `topic`.
	fn publish(&self, topic: &str, payload: &str);

	/// Register `handler` for messages on `topic`, replacing any previous
	/// handler for the same topic.
	fn subscribe(&self, topic: &str, handler: BusHandler);

	/// Drop the handler for `topic`, if any.
	fn unsubscribe(&self, topic: &str);
}

// vim: ts=4
