//! Settings registry engine for prefsync.
//!
//! Keeps a set of named, typed configuration values consistent across three
//! surfaces: the in-memory live value, a persistent key-value store and a
//! publish/subscribe channel. The store and the bus are supplied by adapter
//! crates through the traits in `prefsync-types`.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod hook;
pub mod registry;

// Re-export commonly used types
pub use codec::SettingType;
pub use hook::{ChangeHook, ChangeOrigin};
pub use registry::{RegistryConfig, SettingHandle, SettingsRegistry};

// vim: ts=4
