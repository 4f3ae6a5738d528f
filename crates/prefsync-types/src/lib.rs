//! Shared types and adapter traits for the prefsync settings registry.
//!
//! This crate contains the foundational types that are shared between the
//! registry core and all adapter implementations. Extracting these into a
//! separate crate keeps the adapter crates independent of the engine.

#![forbid(unsafe_code)]

pub mod bus_adapter;
pub mod error;
pub mod prelude;
pub mod store_adapter;
pub mod value;

// vim: ts=4
