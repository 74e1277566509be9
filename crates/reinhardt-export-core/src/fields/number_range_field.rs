use crate::field::{FieldError, FieldResult, FilterInput, FilterValue, FormData, Widget, is_blank};
use crate::queryset::{Lookup, LookupOp};
use crate::value::Value;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Numeric representation of a range filter's bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
	Integer,
	Float,
	Decimal,
}

impl NumberKind {
	/// Parse one bound, naming the offending text on failure
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_export_core::Value;
	/// use reinhardt_export_core::fields::NumberKind;
	///
	/// assert_eq!(NumberKind::Integer.parse("42"), Ok(Value::Int(42)));
	/// assert!(NumberKind::Integer.parse("4.2").is_err());
	/// assert!(NumberKind::Decimal.parse("abc").unwrap_err().contains("'abc'"));
	/// ```
	pub fn parse(&self, raw: &str) -> Result<Value, String> {
		let raw = raw.trim();
		match self {
			NumberKind::Integer => i64::from_str(raw)
				.map(Value::Int)
				.map_err(|_| format!("'{}' is not a valid whole number.", raw)),
			NumberKind::Float => match f64::from_str(raw) {
				Ok(v) if v.is_finite() => Ok(Value::Float(v)),
				_ => Err(format!("'{}' is not a valid number.", raw)),
			},
			NumberKind::Decimal => Decimal::from_str(raw)
				.map(Value::Decimal)
				.map_err(|_| format!("'{}' is not a valid decimal number.", raw)),
		}
	}
}

/// Inclusive min/max filter for integer, float and decimal fields
///
/// The widget submits two parts, `<name>_0` (minimum) and `<name>_1`
/// (maximum); either may be left empty to leave that side unbounded.
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{FilterInput, FilterValue, FormData, Value};
/// use reinhardt_export_core::fields::{NumberKind, NumberRangeFilter};
///
/// let filter = NumberRangeFilter::new("age", "age", NumberKind::Integer);
/// let data = FormData::new().with("age_0", "18").with("age_1", "");
/// assert_eq!(
///     filter.clean(&data).unwrap(),
///     Some(FilterValue::Range { start: Some(Value::Int(18)), end: None })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct NumberRangeFilter {
	name: String,
	label: String,
	help_text: String,
	kind: NumberKind,
}

impl NumberRangeFilter {
	pub fn new(name: impl Into<String>, label: impl Into<String>, kind: NumberKind) -> Self {
		let label = label.into();
		let help_text = format!(
			"Only objects with a '{}' within the provided range will be exported.",
			label.to_lowercase()
		);
		Self {
			name: name.into(),
			label,
			help_text,
			kind,
		}
	}

	pub fn kind(&self) -> NumberKind {
		self.kind
	}

	fn parse_bound(&self, raw: &str) -> FieldResult<Option<Value>> {
		if is_blank(raw) {
			return Ok(None);
		}
		self.kind.parse(raw).map(Some).map_err(FieldError::Validation)
	}
}

impl FilterInput for NumberRangeFilter {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> &str {
		&self.label
	}

	fn help_text(&self) -> &str {
		&self.help_text
	}

	fn widget(&self) -> Widget {
		Widget::Range {
			parts: vec!["Minimum".to_string(), "Maximum".to_string()],
		}
	}

	fn clean(&self, data: &FormData) -> FieldResult<Option<FilterValue>> {
		let parts = data.parts(&self.name);
		match parts.as_slice() {
			[] => Ok(None),
			[min, max] => {
				let start = self.parse_bound(min)?;
				let end = self.parse_bound(max)?;
				Ok(range_value(start, end))
			}
			_ => Err(FieldError::Invalid(format!(
				"Enter a minimum and a maximum; got {} values.",
				parts.len()
			))),
		}
	}

	fn lookups(&self, value: &FilterValue) -> Vec<Lookup> {
		range_lookups(&self.name, value)
	}
}

/// `None` when both bounds are empty
pub(crate) fn range_value(start: Option<Value>, end: Option<Value>) -> Option<FilterValue> {
	if start.is_none() && end.is_none() {
		return None;
	}
	Some(FilterValue::Range { start, end })
}

/// `gte` for the start bound and `lte` for the end bound, each only when present
pub(crate) fn range_lookups(name: &str, value: &FilterValue) -> Vec<Lookup> {
	let FilterValue::Range { start, end } = value else {
		return Vec::new();
	};
	let mut lookups = Vec::new();
	if let Some(start) = start {
		lookups.push(Lookup::new(name, LookupOp::Gte(start.clone())));
	}
	if let Some(end) = end {
		lookups.push(Lookup::new(name, LookupOp::Lte(end.clone())));
	}
	lookups
}
