//! Filter input plumbing shared by every filter field

use crate::queryset::Lookup;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-field validation error, reported back to the submitter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
	/// The value has the wrong shape for the field (e.g. wrong number of parts)
	#[error("{0}")]
	Invalid(String),
	/// The value has the right shape but fails parsing or validation
	#[error("{0}")]
	Validation(String),
}

pub type FieldResult<T> = std::result::Result<T, FieldError>;

/// Submitted form data: every key may carry several values
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::FormData;
///
/// let data = FormData::from_urlencoded(b"export_format=csv&export_fields=a&export_fields=b&price_0=1").unwrap();
/// assert_eq!(data.get("export_format"), Some("csv"));
/// assert_eq!(data.get_all("export_fields"), vec!["a", "b"]);
/// assert_eq!(data.parts("price"), vec!["1"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormData {
	values: IndexMap<String, Vec<String>>,
}

impl FormData {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parse an `application/x-www-form-urlencoded` body
	pub fn from_urlencoded(body: &[u8]) -> std::result::Result<Self, serde_urlencoded::de::Error> {
		let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
		Ok(pairs.into_iter().collect())
	}

	/// Append a value under `key`
	pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.values.entry(key.into()).or_default().push(value.into());
	}

	/// Builder form of [`FormData::append`]
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.append(key, value);
		self
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.values.contains_key(key)
	}

	/// Last value submitted under `key`
	pub fn get(&self, key: &str) -> Option<&str> {
		self.values
			.get(key)
			.and_then(|values| values.last())
			.map(String::as_str)
	}

	/// Every value submitted under `key`
	pub fn get_all(&self, key: &str) -> Vec<&str> {
		self.values
			.get(key)
			.map(|values| values.iter().map(String::as_str).collect())
			.unwrap_or_default()
	}

	/// Parts of a split widget
	///
	/// Reads `<name>_0`, `<name>_1`, ... while they are present; when no suffixed
	/// key exists, falls back to the repeated values of `<name>`.
	pub fn parts(&self, name: &str) -> Vec<&str> {
		let suffixed: Vec<&str> = (0..)
			.map(|i| format!("{}_{}", name, i))
			.map_while(|key| self.get(&key))
			.collect();
		if suffixed.is_empty() {
			self.get_all(name)
		} else {
			suffixed
		}
	}
}

impl FromIterator<(String, String)> for FormData {
	fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
		let mut data = FormData::new();
		for (key, value) in iter {
			data.append(key, value);
		}
		data
	}
}

/// Rendering hint handed to the UI collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
	TextInput,
	Select { choices: Vec<(String, String)> },
	SelectMultiple { choices: Vec<(String, String)> },
	/// A split widget rendering one input per labelled part
	Range { parts: Vec<String> },
}

/// A cleaned, non-empty filter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
	Text(String),
	Bool(bool),
	/// Inclusive bounds; at least one is present
	Range { start: Option<Value>, end: Option<Value> },
	Key(Value),
	Keys(Vec<Value>),
}

/// A filter control bound to one model field
///
/// Each implementation parses its submitted parts into a [`FilterValue`] and
/// turns that value into lookups on its field. Lookups of different fields are
/// pure and combined with AND, so the order in which fields are applied never
/// changes the result.
pub trait FilterInput: Send + Sync {
	/// Model field name the filter applies to
	fn name(&self) -> &str;

	/// Human label of the field
	fn label(&self) -> &str;

	fn help_text(&self) -> &str;

	fn widget(&self) -> Widget;

	/// Parse the submitted data; `Ok(None)` means no filter was requested
	fn clean(&self, data: &FormData) -> FieldResult<Option<FilterValue>>;

	/// Lookups implementing the filter for a cleaned value
	fn lookups(&self, value: &FilterValue) -> Vec<Lookup>;
}

/// Form value of a filter left empty by the submitter
pub(crate) fn is_blank(value: &str) -> bool {
	value.trim().is_empty()
}
