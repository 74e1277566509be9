use super::number_range_field::{range_lookups, range_value};
use crate::field::{FieldError, FieldResult, FilterInput, FilterValue, FormData, Widget, is_blank};
use crate::queryset::Lookup;
use crate::settings::InputFormats;
use crate::value::Value;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

/// Temporal representation of a range filter's bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalKind {
	Date,
	DateTime,
	Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
	Start,
	End,
}

/// Inclusive start/end filter for date, datetime and time fields
///
/// Date and time ranges take two parts (start, end). Datetime ranges take four
/// parts (start date, start time, end date, end time) or two combined
/// `date time` parts. A datetime bound without a time covers the whole day:
/// the start bound begins at midnight and the end bound stops at 23:59:59.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use reinhardt_export_core::{FilterInput, FilterValue, FormData, InputFormats, Value};
/// use reinhardt_export_core::fields::{TemporalKind, TemporalRangeFilter};
///
/// let filter = TemporalRangeFilter::new("joined", "joined", TemporalKind::Date, InputFormats::default());
/// let data = FormData::new().with("joined_0", "01/15/2025").with("joined_1", "");
/// assert_eq!(
///     filter.clean(&data).unwrap(),
///     Some(FilterValue::Range {
///         start: Some(Value::Date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())),
///         end: None,
///     })
/// );
/// ```
#[derive(Debug, Clone)]
pub struct TemporalRangeFilter {
	name: String,
	label: String,
	help_text: String,
	kind: TemporalKind,
	input_formats: InputFormats,
}

impl TemporalRangeFilter {
	pub fn new(
		name: impl Into<String>,
		label: impl Into<String>,
		kind: TemporalKind,
		input_formats: InputFormats,
	) -> Self {
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
			input_formats,
		}
	}

	pub fn kind(&self) -> TemporalKind {
		self.kind
	}

	fn expected_parts(&self) -> &'static [&'static str] {
		match self.kind {
			TemporalKind::Date => &["Start date", "End date"],
			TemporalKind::Time => &["Start time", "End time"],
			TemporalKind::DateTime => &["Start date", "Start time", "End date", "End time"],
		}
	}

	fn parse_date(&self, raw: &str) -> FieldResult<NaiveDate> {
		let raw = raw.trim();
		self.input_formats
			.date
			.iter()
			.filter_map(|format| NaiveDate::parse_from_str(raw, format).ok())
			// Reject dates outside the 4-digit year range so that a 2-digit year
			// falls through to a `%y` format.
			.find(|date| (1000..=9999).contains(&date.year()))
			.ok_or_else(|| FieldError::Validation(format!("'{}' is not a valid date.", raw)))
	}

	fn parse_time(&self, raw: &str) -> FieldResult<NaiveTime> {
		let raw = raw.trim();
		self.input_formats
			.time
			.iter()
			.find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
			.ok_or_else(|| FieldError::Validation(format!("'{}' is not a valid time.", raw)))
	}

	fn parse_datetime(&self, raw: &str, bound: Bound) -> FieldResult<NaiveDateTime> {
		let raw = raw.trim();
		let parsed = self
			.input_formats
			.datetime
			.iter()
			.filter_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
			.find(|dt| (1000..=9999).contains(&dt.year()));
		match parsed {
			Some(dt) => Ok(dt),
			None => self
				.parse_date(raw)
				.map(|date| date.and_time(default_time(bound)))
				.map_err(|_| FieldError::Validation(format!("'{}' is not a valid date/time.", raw))),
		}
	}

	fn split_datetime(&self, date: &str, time: &str, bound: Bound) -> FieldResult<Option<Value>> {
		match (is_blank(date), is_blank(time)) {
			(true, true) => Ok(None),
			(true, false) => Err(FieldError::Validation("Enter a date.".to_string())),
			(false, true) => Ok(Some(Value::DateTime(
				self.parse_date(date)?.and_time(default_time(bound)),
			))),
			(false, false) => Ok(Some(Value::DateTime(
				self.parse_date(date)?.and_time(self.parse_time(time)?),
			))),
		}
	}

	fn single_bound(&self, raw: &str, bound: Bound) -> FieldResult<Option<Value>> {
		if is_blank(raw) {
			return Ok(None);
		}
		let value = match self.kind {
			TemporalKind::Date => Value::Date(self.parse_date(raw)?),
			TemporalKind::Time => Value::Time(self.parse_time(raw)?),
			TemporalKind::DateTime => Value::DateTime(self.parse_datetime(raw, bound)?),
		};
		Ok(Some(value))
	}
}

fn default_time(bound: Bound) -> NaiveTime {
	match bound {
		Bound::Start => NaiveTime::MIN,
		Bound::End => NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN),
	}
}

impl FilterInput for TemporalRangeFilter {
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
			parts: self.expected_parts().iter().map(|p| p.to_string()).collect(),
		}
	}

	fn clean(&self, data: &FormData) -> FieldResult<Option<FilterValue>> {
		let parts = data.parts(&self.name);
		if parts.is_empty() || parts.iter().all(|p| is_blank(p)) {
			return Ok(None);
		}
		let (start, end) = match (self.kind, parts.as_slice()) {
			(TemporalKind::DateTime, [start_date, start_time, end_date, end_time]) => (
				self.split_datetime(start_date, start_time, Bound::Start)?,
				self.split_datetime(end_date, end_time, Bound::End)?,
			),
			(_, [start, end]) => (
				self.single_bound(start, Bound::Start)?,
				self.single_bound(end, Bound::End)?,
			),
			_ => {
				return Err(FieldError::Invalid(format!(
					"Expected {} values ({}); got {}.",
					self.expected_parts().len(),
					self.expected_parts().join(", "),
					parts.len()
				)));
			}
		};
		Ok(range_value(start, end))
	}

	fn lookups(&self, value: &FilterValue) -> Vec<Lookup> {
		range_lookups(&self.name, value)
	}
}
