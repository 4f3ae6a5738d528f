//! Tests for the channel bus adapter: subscription dispatch, unsubscribe
//! semantics and the outbound log.

use std::cell::RefCell;
use std::rc::Rc;

use bus_adapter_channel::{BusMessage, ChannelBus};
use prefsync::bus_adapter::SettingsBus;

#[test]
fn dispatches_to_exact_topic() {
	let bus = ChannelBus::new();
	let seen = Rc::new(RefCell::new(Vec::new()));

	let sink = Rc::clone(&seen);
	bus.subscribe("a/b/c", Box::new(move |payload| sink.borrow_mut().push(payload.to_string())));

	let sender = bus.sender();
	sender.send(BusMessage::new("a/b/c", "1")).ok();
	sender.send(BusMessage::new("a/b", "2")).ok();
	sender.send(BusMessage::new("a/b/c/d", "3")).ok();
	sender.send(BusMessage::new("a/b/c", "4")).ok();

	let delivered = bus.poll();
	assert_eq!(delivered, 2);
	assert_eq!(*seen.borrow(), vec!["1".to_string(), "4".to_string()]);
}

#[test]
fn unsubscribe_stops_delivery() {
	let bus = ChannelBus::new();
	let seen = Rc::new(RefCell::new(0));

	let sink = Rc::clone(&seen);
	bus.subscribe("topic", Box::new(move |_| *sink.borrow_mut() += 1));
	assert_eq!(bus.subscription_count(), 1);

	bus.sender().send(BusMessage::new("topic", "x")).ok();
	bus.poll();
	assert_eq!(*seen.borrow(), 1);

	bus.unsubscribe("topic");
	assert_eq!(bus.subscription_count(), 0);

	bus.sender().send(BusMessage::new("topic", "y")).ok();
	assert_eq!(bus.poll(), 0);
	assert_eq!(*seen.borrow(), 1);
}

#[test]
fn resubscribe_replaces_handler() {
	let bus = ChannelBus::new();
	let seen = Rc::new(RefCell::new(Vec::new()));

	let sink = Rc::clone(&seen);
	bus.subscribe("t", Box::new(move |_| sink.borrow_mut().push("old")));
	let sink = Rc::clone(&seen);
	bus.subscribe("t", Box::new(move |_| sink.borrow_mut().push("new")));
	assert_eq!(bus.subscription_count(), 1);

	bus.sender().send(BusMessage::new("t", "x")).ok();
	bus.poll();
	assert_eq!(*seen.borrow(), vec!["new"]);
}

#[test]
fn outbound_log_preserves_order() {
	let bus = ChannelBus::new();
	bus.publish("t/1", "a");
	bus.publish("t/2", "b");

	let published = bus.take_published();
	assert_eq!(
		published,
		vec![BusMessage::new("t/1", "a"), BusMessage::new("t/2", "b")]
	);
	// the log is drained
	assert!(bus.take_published().is_empty());
}

#[test]
fn poll_on_empty_queue_is_harmless() {
	let bus = ChannelBus::new();
	assert_eq!(bus.poll(), 0);
}

// vim: ts=4
