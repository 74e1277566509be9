//! Record values handed over by the host data layer

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single field value of a stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	Decimal(Decimal),
	Text(String),
	Date(NaiveDate),
	Time(NaiveTime),
	DateTime(NaiveDateTime),
	/// Keys of many related records
	List(Vec<Value>),
}

impl Value {
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Compare two values of compatible types
	///
	/// Numbers compare across integer, float and decimal representations, and a
	/// date compares against a datetime at midnight. Returns `None` for nulls and
	/// incompatible types, so range lookups never match them.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_export_core::Value;
	/// use rust_decimal::Decimal;
	/// use std::cmp::Ordering;
	///
	/// assert_eq!(Value::Int(2).compare(&Value::Decimal(Decimal::new(15, 1))), Some(Ordering::Greater));
	/// assert_eq!(Value::Null.compare(&Value::Int(1)), None);
	/// assert_eq!(Value::Text("a".into()).compare(&Value::Int(1)), None);
	/// ```
	pub fn compare(&self, other: &Value) -> Option<Ordering> {
		match (self, other) {
			(Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
			(Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
			(Value::Int(a), Value::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
			(Value::Decimal(a), Value::Int(b)) => Some(a.cmp(&Decimal::from(*b))),
			(Value::Float(_), _) | (_, Value::Float(_)) => {
				self.as_f64()?.partial_cmp(&other.as_f64()?)
			}
			(Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
			(Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
			(Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
			(Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
			(Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
			(Value::Date(a), Value::DateTime(b)) => Some(a.and_time(NaiveTime::MIN).cmp(b)),
			(Value::DateTime(a), Value::Date(b)) => Some(a.cmp(&b.and_time(NaiveTime::MIN))),
			_ => None,
		}
	}

	/// Total order used for sorting
	///
	/// Nulls sort after every other value, and values of incompatible types fall
	/// back to a fixed rank per type so sorting never panics.
	pub fn sort_cmp(&self, other: &Value) -> Ordering {
		match (self.is_null(), other.is_null()) {
			(true, true) => Ordering::Equal,
			(true, false) => Ordering::Greater,
			(false, true) => Ordering::Less,
			(false, false) => self
				.compare(other)
				.unwrap_or_else(|| self.rank().cmp(&other.rank())),
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Value::Bool(_) => 0,
			Value::Int(_) | Value::Float(_) | Value::Decimal(_) => 1,
			Value::Text(_) => 2,
			Value::Date(_) | Value::DateTime(_) => 3,
			Value::Time(_) => 4,
			Value::List(_) => 5,
			Value::Null => 6,
		}
	}

	fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Int(i) => Some(*i as f64),
			Value::Float(f) => Some(*f),
			Value::Decimal(d) => d.to_f64(),
			_ => None,
		}
	}

	/// JSON representation used by text serializers
	///
	/// Decimals are emitted as strings to keep their precision, temporal values
	/// in ISO 8601.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Value::Null => serde_json::Value::Null,
			Value::Bool(b) => serde_json::Value::Bool(*b),
			Value::Int(i) => serde_json::Value::from(*i),
			Value::Float(f) => serde_json::Number::from_f64(*f)
				.map(serde_json::Value::Number)
				.unwrap_or(serde_json::Value::Null),
			Value::List(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
			other => serde_json::Value::String(other.to_string()),
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Null => Ok(()),
			Value::Bool(b) => write!(f, "{}", b),
			Value::Int(i) => write!(f, "{}", i),
			Value::Float(v) => write!(f, "{}", v),
			Value::Decimal(d) => write!(f, "{}", d),
			Value::Text(s) => f.write_str(s),
			Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
			Value::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
			Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
			Value::List(items) => {
				let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
				write!(f, "[{}]", parts.join(", "))
			}
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::Int(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::Int(i64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::Float(value)
	}
}

impl From<Decimal> for Value {
	fn from(value: Decimal) -> Self {
		Value::Decimal(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Text(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Text(value)
	}
}

impl From<NaiveDate> for Value {
	fn from(value: NaiveDate) -> Self {
		Value::Date(value)
	}
}

impl From<NaiveTime> for Value {
	fn from(value: NaiveTime) -> Self {
		Value::Time(value)
	}
}

impl From<NaiveDateTime> for Value {
	fn from(value: NaiveDateTime) -> Self {
		Value::DateTime(value)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map(Into::into).unwrap_or(Value::Null)
	}
}

impl<T: Into<Value>> From<Vec<T>> for Value {
	fn from(value: Vec<T>) -> Self {
		Value::List(value.into_iter().map(Into::into).collect())
	}
}

/// A stored record: primary key plus field values in declaration order
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{Record, Value};
///
/// let record = Record::new(1).with("field1", 1).with("field2", 2);
/// assert_eq!(record.get("field1"), Some(&Value::Int(1)));
/// assert_eq!(record.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
	pub pk: Value,
	pub fields: IndexMap<String, Value>,
}

impl Record {
	pub fn new(pk: impl Into<Value>) -> Self {
		Self {
			pk: pk.into(),
			fields: IndexMap::new(),
		}
	}

	/// Set a field value, keeping first-insertion order
	pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.fields.insert(name.into(), value.into());
		self
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.get(name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_nulls_sort_last() {
		let mut values = vec![Value::Null, Value::Int(3), Value::Int(1)];
		values.sort_by(|a, b| a.sort_cmp(b));
		assert_eq!(values, vec![Value::Int(1), Value::Int(3), Value::Null]);
	}

	#[rstest]
	fn test_date_compares_with_datetime_at_midnight() {
		let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
		let noon = date.and_hms_opt(12, 0, 0).unwrap();
		assert_eq!(Value::Date(date).compare(&Value::DateTime(noon)), Some(Ordering::Less));
	}

	#[rstest]
	fn test_float_compares_with_int() {
		assert_eq!(Value::Float(2.5).compare(&Value::Int(2)), Some(Ordering::Greater));
	}

	#[rstest]
	fn test_display_formats() {
		let dt = NaiveDate::from_ymd_opt(2024, 3, 1)
			.unwrap()
			.and_hms_opt(8, 30, 0)
			.unwrap();
		assert_eq!(Value::DateTime(dt).to_string(), "2024-03-01T08:30:00");
		assert_eq!(Value::from(vec![1, 2]).to_string(), "[1, 2]");
		assert_eq!(Value::Null.to_string(), "");
	}

	#[rstest]
	fn test_decimal_json_is_string() {
		let value = Value::Decimal(Decimal::new(1999, 2));
		assert_eq!(value.to_json(), serde_json::json!("19.99"));
	}
}
