use std::{env, path, rc::Rc, thread, time::Duration};

use bus_adapter_channel::{BusMessage, ChannelBus};
use prefsync_core::{ChangeHook, RegistryConfig, SettingsRegistry};
use store_adapter_redb::StoreAdapterRedb;
use tracing::info;

pub struct Config {
	pub data_dir: path::PathBuf,
}

fn main() {
	tracing_subscriber::fmt::init();

	let config = Config {
		data_dir: path::PathBuf::from(env::var("DATA_DIR").unwrap_or("./data".to_string())),
	};

	let bus = Rc::new(ChannelBus::new());
	let store = Box::new(StoreAdapterRedb::new(config.data_dir));
	let registry = SettingsRegistry::new(RegistryConfig::new("node"), store, bus.clone());

	let interval = registry.register("interval", 10_i32).unwrap();
	let label = registry.register("label", "basic-node".to_string()).unwrap();
	let gain = registry
		.register_with_hook(
			"gain",
			1.0_f32,
			// only positive gains are worth persisting
			ChangeHook::veto(|origin, value| {
				info!("gain change ({:?}): {:?}", origin, value);
				!matches!(value, prefsync_types::value::SettingValue::Float(v) if *v <= 0.0)
			}),
		)
		.unwrap();

	registry.begin();
	info!(
		"started: interval={} label={} gain={}",
		registry.get(interval).unwrap(),
		registry.get(label).unwrap(),
		registry.get(gain).unwrap()
	);

	// simulate a remote update arriving on the bus
	let sender = bus.sender();
	sender.send(BusMessage::new("preferences/node/gain", "0.5000000")).ok();

	for _ in 0..3 {
		bus.poll();
		registry.publish();
		for message in bus.take_published() {
			info!("out: {} <- {}", message.topic, message.payload);
		}
		thread::sleep(Duration::from_millis(200));
	}

	info!("final gain: {}", registry.get(gain).unwrap());
}

// vim: ts=4
