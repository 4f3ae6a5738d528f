//! Per-type wire codec for bus payloads.
//!
//! The codec covers the messaging wire format only. Persistence always goes
//! through the store's typed accessors; a stored float is never stringified.
//! Decoding is tolerant: a malformed payload yields the kind's zero value
//! instead of an error, so a bad message can never stall the poll loop.

use prefsync_types::prelude::*;

/// Fractional digits used when encoding an `f32`.
pub const FLOAT_DIGITS: usize = 7;
/// Fractional digits used when encoding an `f64`.
pub const DOUBLE_DIGITS: usize = 12;

/// A value kind a setting can be registered with.
///
/// Implemented for exactly the five supported kinds; the set is closed.
pub trait SettingType: Clone + PartialEq + Sized {
	const KIND: SettingKind;

	/// Encode for the wire.
	fn encode(&self) -> String;

	/// Tolerant parse: malformed payloads decode to the kind's zero value.
	fn decode(payload: &str) -> Self;

	fn into_value(self) -> SettingValue;

	/// `None` when `value` holds a different kind.
	fn from_value(value: &SettingValue) -> Option<Self>;
}

impl SettingType for String {
	const KIND: SettingKind = SettingKind::Text;

	fn encode(&self) -> String {
		self.clone()
	}

	fn decode(payload: &str) -> Self {
		payload.to_string()
	}

	fn into_value(self) -> SettingValue {
		SettingValue::Text(self)
	}

	fn from_value(value: &SettingValue) -> Option<Self> {
		match value {
			SettingValue::Text(v) => Some(v.clone()),
			_ => None,
		}
	}
}

impl SettingType for i32 {
	const KIND: SettingKind = SettingKind::Int;

	fn encode(&self) -> String {
		self.to_string()
	}

	fn decode(payload: &str) -> Self {
		payload.trim().parse().unwrap_or(0)
	}

	fn into_value(self) -> SettingValue {
		SettingValue::Int(self)
	}

	fn from_value(value: &SettingValue) -> Option<Self> {
		match value {
			SettingValue::Int(v) => Some(*v),
			_ => None,
		}
	}
}

impl SettingType for bool {
	const KIND: SettingKind = SettingKind::Bool;

	fn encode(&self) -> String {
		if *self { "1".to_string() } else { "0".to_string() }
	}

	// Any nonzero integer is true; anything unparsable is false.
	fn decode(payload: &str) -> Self {
		payload.trim().parse::<i64>().map(|v| v != 0).unwrap_or(false)
	}

	fn into_value(self) -> SettingValue {
		SettingValue::Bool(self)
	}

	fn from_value(value: &SettingValue) -> Option<Self> {
		match value {
			SettingValue::Bool(v) => Some(*v),
			_ => None,
		}
	}
}

impl SettingType for f32 {
	const KIND: SettingKind = SettingKind::Float;

	fn encode(&self) -> String {
		format!("{:.*}", FLOAT_DIGITS, self)
	}

	fn decode(payload: &str) -> Self {
		payload.trim().parse().unwrap_or(0.0)
	}

	fn into_value(self) -> SettingValue {
		SettingValue::Float(self)
	}

	fn from_value(value: &SettingValue) -> Option<Self> {
		match value {
			SettingValue::Float(v) => Some(*v),
			_ => None,
		}
	}
}

impl SettingType for f64 {
	const KIND: SettingKind = SettingKind::Double;

	fn encode(&self) -> String {
		format!("{:.*}", DOUBLE_DIGITS, self)
	}

	fn decode(payload: &str) -> Self {
		payload.trim().parse().unwrap_or(0.0)
	}

	fn into_value(self) -> SettingValue {
		SettingValue::Double(self)
	}

	fn from_value(value: &SettingValue) -> Option<Self> {
		match value {
			SettingValue::Double(v) => Some(*v),
			_ => None,
		}
	}
}

/// Encode a dynamically typed value for the wire.
pub fn encode_value(value: &SettingValue) -> String {
	match value {
		SettingValue::Text(v) => v.encode(),
		SettingValue::Int(v) => v.encode(),
		SettingValue::Bool(v) => v.encode(),
		SettingValue::Float(v) => v.encode(),
		SettingValue::Double(v) => v.encode(),
	}
}

/// Decode a payload into the given kind, tolerantly.
pub fn decode_value(kind: SettingKind, payload: &str) -> SettingValue {
	match kind {
		SettingKind::Text => SettingValue::Text(String::decode(payload)),
		SettingKind::Int => SettingValue::Int(i32::decode(payload)),
		SettingKind::Bool => SettingValue::Bool(bool::decode(payload)),
		SettingKind::Float => SettingValue::Float(f32::decode(payload)),
		SettingKind::Double => SettingValue::Double(f64::decode(payload)),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn text_round_trip() {
		let v = "hello world".to_string();
		assert_eq!(String::decode(&v.encode()), v);
		// text is verbatim, including leading/trailing whitespace
		assert_eq!(String::decode("  spaced  "), "  spaced  ");
	}

	#[test]
	fn int_round_trip() {
		for v in [0, 1, -1, 42, i32::MAX, i32::MIN] {
			assert_eq!(i32::decode(&v.encode()), v);
		}
	}

	#[test]
	fn int_tolerant_decode() {
		assert_eq!(i32::decode("garbage"), 0);
		assert_eq!(i32::decode(""), 0);
		assert_eq!(i32::decode(" 7 "), 7);
	}

	#[test]
	fn bool_wire_format() {
		assert_eq!(true.encode(), "1");
		assert_eq!(false.encode(), "0");
		assert!(bool::decode("1"));
		assert!(!bool::decode("0"));
		assert!(bool::decode("-3"));
		assert!(!bool::decode("yes"));
		assert!(!bool::decode(""));
	}

	#[test]
	fn float_round_trip() {
		for v in [0.0_f32, 0.5, -1.25, 3.14] {
			let decoded = f32::decode(&v.encode());
			assert!((decoded - v).abs() < 1e-5, "{} -> {}", v, decoded);
		}
		assert_eq!(f32::decode("not a float"), 0.0);
	}

	#[test]
	fn double_round_trip() {
		for v in [0.0_f64, 0.5, -1.25, 2.718281828459] {
			let decoded = f64::decode(&v.encode());
			assert!((decoded - v).abs() < 1e-10, "{} -> {}", v, decoded);
		}
		assert_eq!(f64::decode(""), 0.0);
	}

	#[test]
	fn fractional_digit_counts() {
		let encoded = 1.0_f32.encode();
		assert_eq!(encoded, "1.0000000");
		let encoded = 1.0_f64.encode();
		assert_eq!(encoded, "1.000000000000");
	}

	#[test]
	fn dynamic_value_helpers() {
		let v = SettingValue::Int(42);
		assert_eq!(encode_value(&v), "42");
		assert_eq!(decode_value(SettingKind::Int, "42"), v);
		assert_eq!(decode_value(SettingKind::Bool, "junk"), SettingValue::Bool(false));
	}

	#[test]
	fn from_value_rejects_other_kinds() {
		assert_eq!(i32::from_value(&SettingValue::Bool(true)), None);
		assert_eq!(String::from_value(&SettingValue::Int(1)), None);
	}
}

// vim: ts=4
