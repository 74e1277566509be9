//! Query composition
//!
//! Narrows the full collection of a model with the lookups of a validated
//! [`ExportRequest`] and applies the requested ordering.

use crate::error::Result;
use crate::form::ExportRequest;
use crate::queryset::QuerySet;
use crate::schema::ModelMeta;
use crate::source::RecordSource;

/// Produce the filtered, ordered collection described by `request`
///
/// Filters are ANDed; a request without an ordering field keeps the source's
/// native order.
///
/// # Errors
///
/// Propagates source failures, and [`crate::ExportError::UnknownField`] when a
/// lookup or the ordering names a field the model does not declare.
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{
///     ExportFormBuilder, FieldDescriptor, FieldKind, FormData, InMemorySource, ModelMeta, Record,
///     Value, compose,
/// };
///
/// let model = ModelMeta::new("people", "Person").field(FieldDescriptor::new("name", FieldKind::Char));
/// let source = InMemorySource::new().with_records(
///     "people.person",
///     vec![
///         Record::new(1).with("name", "Alice"),
///         Record::new(2).with("name", "Bob"),
///         Record::new(3).with("name", "Natalie"),
///     ],
/// );
///
/// let mut form = ExportFormBuilder::new(&model).build(&source).unwrap();
/// form.bind(FormData::new().with("name", "ali"));
///
/// let queryset = compose(&model, form.export_request().unwrap(), &source).unwrap();
/// let names: Vec<String> = queryset.records().iter().map(|r| r.get("name").unwrap().to_string()).collect();
/// assert_eq!(names, vec!["Alice", "Natalie"]);
/// ```
pub fn compose(
	model: &ModelMeta,
	request: &ExportRequest,
	source: &dyn RecordSource,
) -> Result<QuerySet> {
	let mut queryset = QuerySet::new(model.clone(), source.records(model)?);
	for lookup in &request.lookups {
		let before = queryset.len();
		queryset = queryset.filter(lookup)?;
		tracing::debug!(
			lookup = %lookup.to_query_param(),
			before,
			after = queryset.len(),
			"applied export filter"
		);
	}

	match request.order_by.as_deref().filter(|f| !f.trim().is_empty()) {
		Some(field) => queryset.order_by(field, request.direction),
		None => {
			tracing::debug!(
				model = %model.label(),
				"no ordering field requested, keeping native order"
			);
			Ok(queryset)
		}
	}
}
