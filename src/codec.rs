//! `application/x-www-form-urlencoded` helpers with `encodeURIComponent` semantics.
//!
//! [`stringify`] serializes an ordered [`FormData`] mapping, while [`extract_query_param`] pulls a
//! single named value out of a raw query string. Decoding never fails loudly: malformed
//! percent-encoding yields an empty value instead of an error.

// crates.io
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
// self
use crate::_prelude::*;

/// Characters left untouched by `encodeURIComponent`; everything else is escaped.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'!')
	.remove(b'~')
	.remove(b'*')
	.remove(b'\'')
	.remove(b'(')
	.remove(b')');

/// Ordered flat mapping with script-object merge semantics.
///
/// Inserting an existing key overwrites its value without moving it; new keys are appended.
/// A `None` value serializes as the empty string.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData(Vec<(String, Option<String>)>);
impl FormData {
	/// Creates an empty mapping.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts or overwrites `key`, returning the previous value when one existed.
	pub fn insert(
		&mut self,
		key: impl Into<String>,
		value: Option<impl Into<String>>,
	) -> Option<Option<String>> {
		let key = key.into();
		let value = value.map(Into::into);

		match self.0.iter_mut().find(|(existing, _)| *existing == key) {
			Some((_, slot)) => Some(std::mem::replace(slot, value)),
			None => {
				self.0.push((key, value));

				None
			},
		}
	}

	/// Builder-style variant of [`FormData::insert`] for present values.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.insert(key, Some(value));

		self
	}

	/// Copies every entry of `other` into `self`, later entries winning.
	pub fn extend_from(&mut self, other: &FormData) {
		for (key, value) in other.iter() {
			self.insert(key, value);
		}
	}

	/// Returns the value stored for `key`; `Some(None)` marks an explicitly absent value.
	pub fn get(&self, key: &str) -> Option<Option<&str>> {
		self.0.iter().find(|(existing, _)| existing == key).map(|(_, value)| value.as_deref())
	}

	/// Iterates over entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value.as_deref()))
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no entries are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl<K, V> FromIterator<(K, V)> for FormData
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut data = Self::new();

		for (key, value) in iter {
			data.insert(key, Some(value));
		}

		data
	}
}

/// Serializes `data` as `key=value` pairs joined by `&`, encoding keys and values separately.
pub fn stringify(data: &FormData) -> String {
	let mut buf = String::new();

	for (idx, (key, value)) in data.iter().enumerate() {
		if idx > 0 {
			buf.push('&');
		}

		buf.push_str(&encode_component(key));
		buf.push('=');
		buf.push_str(&encode_component(value.unwrap_or_default()));
	}

	buf
}

/// Returns the decoded value of the first `name=value` segment in `raw`, or `""`.
///
/// The name comparison is case-insensitive and must cover the whole segment name, so `id` never
/// matches `client_id`. A value with malformed percent-encoding also yields `""`.
pub fn extract_query_param(raw: &str, name: &str) -> String {
	let wanted = name.to_lowercase();

	raw.split('&')
		.filter_map(|segment| segment.split_once('='))
		.find(|(key, _)| key.to_lowercase() == wanted)
		.and_then(|(_, value)| decode_component(value))
		.unwrap_or_default()
}

/// Percent-encodes `value` the way `encodeURIComponent` does.
pub fn encode_component(value: &str) -> String {
	utf8_percent_encode(value, COMPONENT).to_string()
}

/// Strictly percent-decodes `value`.
///
/// Returns `None` when a `%` is not followed by two hex digits or when the decoded bytes are not
/// UTF-8. `+` is kept literally.
pub fn decode_component(value: &str) -> Option<String> {
	let bytes = value.as_bytes();
	let mut idx = 0;

	while let Some(offset) = bytes[idx..].iter().position(|b| *b == b'%') {
		let at = idx + offset;
		let well_formed = bytes
			.get(at + 1..at + 3)
			.is_some_and(|pair| pair.iter().all(u8::is_ascii_hexdigit));

		if !well_formed {
			return None;
		}

		idx = at + 3;
	}

	percent_decode_str(value).decode_utf8().ok().map(|decoded| decoded.into_owned())
}
