//! In-memory querysets
//!
//! A [`QuerySet`] holds the records of one model and narrows them with
//! field lookups, the way an ORM queryset chains `filter()` calls.

use crate::error::{ExportError, Result};
use crate::schema::ModelMeta;
use crate::value::{Record, Value};
use serde::{Deserialize, Serialize};

/// Comparison applied by a lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LookupOp {
	/// Case-insensitive substring match
	IContains(String),
	/// Equality; on list fields, membership of the value
	Exact(Value),
	/// Greater than or equal
	Gte(Value),
	/// Less than or equal
	Lte(Value),
	/// Value is one of the given values; on list fields, any overlap
	In(Vec<Value>),
}

/// A predicate on one field
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{Lookup, LookupOp, Record, Value};
///
/// let lookup = Lookup::new("name", LookupOp::IContains("ali".into()));
/// assert!(lookup.matches(&Record::new(1).with("name", "Natalie")));
/// assert!(!lookup.matches(&Record::new(2).with("name", "Bob")));
/// assert_eq!(lookup.to_query_param(), "name__icontains");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lookup {
	pub field: String,
	pub op: LookupOp,
}

impl Lookup {
	pub fn new(field: impl Into<String>, op: LookupOp) -> Self {
		Self {
			field: field.into(),
			op,
		}
	}

	/// Lookup key in `field__lookup` notation
	pub fn to_query_param(&self) -> String {
		let suffix = match self.op {
			LookupOp::IContains(_) => "icontains",
			LookupOp::Exact(_) => "exact",
			LookupOp::Gte(_) => "gte",
			LookupOp::Lte(_) => "lte",
			LookupOp::In(_) => "in",
		};
		format!("{}__{}", self.field, suffix)
	}

	/// Whether `record` satisfies the lookup; missing and null values never match
	pub fn matches(&self, record: &Record) -> bool {
		let Some(value) = record.get(&self.field) else {
			return false;
		};
		if value.is_null() {
			return false;
		}
		match (&self.op, value) {
			(LookupOp::IContains(needle), value) => value
				.to_string()
				.to_lowercase()
				.contains(&needle.to_lowercase()),
			(LookupOp::Exact(expected), Value::List(items)) => {
				items.iter().any(|item| same_value(item, expected))
			}
			(LookupOp::Exact(expected), value) => same_value(value, expected),
			(LookupOp::In(candidates), Value::List(items)) => items
				.iter()
				.any(|item| candidates.iter().any(|c| same_value(item, c))),
			(LookupOp::In(candidates), value) => candidates.iter().any(|c| same_value(value, c)),
			(LookupOp::Gte(bound), value) => value.compare(bound).is_some_and(|o| o.is_ge()),
			(LookupOp::Lte(bound), value) => value.compare(bound).is_some_and(|o| o.is_le()),
		}
	}
}

fn same_value(a: &Value, b: &Value) -> bool {
	a.compare(b).map(|o| o.is_eq()).unwrap_or(a == b)
}

/// Sort direction of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortDirection {
	#[default]
	Ascending,
	Descending,
}

impl SortDirection {
	/// Parse a submitted direction
	///
	/// `dsc`, `desc` and `descending` select descending order; every other value,
	/// including an empty one, is ascending.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_export_core::SortDirection;
	///
	/// assert_eq!(SortDirection::parse("dsc"), SortDirection::Descending);
	/// assert_eq!(SortDirection::parse("asc"), SortDirection::Ascending);
	/// assert_eq!(SortDirection::parse("sideways"), SortDirection::Ascending);
	/// ```
	pub fn parse(value: &str) -> Self {
		match value.trim().to_ascii_lowercase().as_str() {
			"dsc" | "desc" | "descending" => SortDirection::Descending,
			_ => SortDirection::Ascending,
		}
	}

	/// Form value of the direction
	pub fn as_str(&self) -> &'static str {
		match self {
			SortDirection::Ascending => "asc",
			SortDirection::Descending => "dsc",
		}
	}
}

/// Records of one model, narrowed by lookups and ordered on demand
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySet {
	model: ModelMeta,
	records: Vec<Record>,
}

impl QuerySet {
	pub fn new(model: ModelMeta, records: Vec<Record>) -> Self {
		Self { model, records }
	}

	pub fn model(&self) -> &ModelMeta {
		&self.model
	}

	pub fn records(&self) -> &[Record] {
		&self.records
	}

	pub fn into_records(self) -> Vec<Record> {
		self.records
	}

	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Keep only the records matching `lookup`
	///
	/// # Errors
	///
	/// Returns [`ExportError::UnknownField`] when the model does not declare the
	/// looked-up field.
	pub fn filter(mut self, lookup: &Lookup) -> Result<Self> {
		self.ensure_field(&lookup.field)?;
		self.records.retain(|record| lookup.matches(record));
		Ok(self)
	}

	/// Stable sort on one field
	///
	/// Descending order reverses the comparison, so records comparing equal keep
	/// their native relative order in both directions.
	///
	/// # Errors
	///
	/// Returns [`ExportError::UnknownField`] when the model does not declare `field`.
	pub fn order_by(mut self, field: &str, direction: SortDirection) -> Result<Self> {
		self.ensure_field(field)?;
		let null = Value::Null;
		self.records.sort_by(|a, b| {
			let left = a.get(field).unwrap_or(&null);
			let right = b.get(field).unwrap_or(&null);
			match direction {
				SortDirection::Ascending => left.sort_cmp(right),
				SortDirection::Descending => right.sort_cmp(left),
			}
		});
		Ok(self)
	}

	fn ensure_field(&self, field: &str) -> Result<()> {
		if self.model.get_field(field).is_none() {
			return Err(ExportError::UnknownField {
				model: self.model.label(),
				field: field.to_string(),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::{FieldDescriptor, FieldKind};
	use rstest::{fixture, rstest};

	#[fixture]
	fn model() -> ModelMeta {
		ModelMeta::new("test", "Item")
			.field(FieldDescriptor::new("f", FieldKind::Integer))
			.field(FieldDescriptor::new("name", FieldKind::Char))
			.field(FieldDescriptor::new("tags", FieldKind::ManyToMany).related_to("test.tag"))
	}

	fn pks(qs: &QuerySet) -> Vec<Value> {
		qs.records().iter().map(|r| r.pk.clone()).collect()
	}

	#[rstest]
	fn test_gte_without_upper_bound(model: ModelMeta) {
		let records = (1..=3).map(|i| Record::new(i).with("f", i)).collect();
		let qs = QuerySet::new(model, records)
			.filter(&Lookup::new("f", LookupOp::Gte(Value::Int(2))))
			.unwrap();
		assert_eq!(pks(&qs), vec![Value::Int(2), Value::Int(3)]);
	}

	#[rstest]
	fn test_in_on_list_field_matches_any_overlap(model: ModelMeta) {
		let records = vec![
			Record::new(1).with("tags", vec![1, 2]),
			Record::new(2).with("tags", vec![3]),
			Record::new(3).with("tags", Vec::<i64>::new()),
		];
		let qs = QuerySet::new(model, records)
			.filter(&Lookup::new("tags", LookupOp::In(vec![Value::Int(2), Value::Int(9)])))
			.unwrap();
		assert_eq!(pks(&qs), vec![Value::Int(1)]);
	}

	#[rstest]
	fn test_null_values_never_match(model: ModelMeta) {
		let records = vec![Record::new(1).with("f", Value::Null)];
		let qs = QuerySet::new(model, records)
			.filter(&Lookup::new("f", LookupOp::Lte(Value::Int(10))))
			.unwrap();
		assert!(qs.is_empty());
	}

	#[rstest]
	fn test_unknown_field_is_rejected(model: ModelMeta) {
		let result = QuerySet::new(model, vec![]).filter(&Lookup::new(
			"nope",
			LookupOp::Exact(Value::Int(1)),
		));
		assert!(matches!(result, Err(ExportError::UnknownField { .. })));
	}

	#[rstest]
	fn test_descending_reverses_but_keeps_ties_stable(model: ModelMeta) {
		let records = vec![
			Record::new(1).with("f", 2),
			Record::new(2).with("f", 1),
			Record::new(3).with("f", 2),
			Record::new(4).with("f", 3),
		];
		let asc = QuerySet::new(model.clone(), records.clone())
			.order_by("f", SortDirection::Ascending)
			.unwrap();
		let desc = QuerySet::new(model, records)
			.order_by("f", SortDirection::Descending)
			.unwrap();

		assert_eq!(pks(&asc), vec![Value::Int(2), Value::Int(1), Value::Int(3), Value::Int(4)]);
		assert_eq!(pks(&desc), vec![Value::Int(4), Value::Int(1), Value::Int(3), Value::Int(2)]);
	}
}
