//! JSON serializer
//!
//! Emits an array of `{"model", "pk", "fields"}` objects.

use crate::error::Result;
use crate::serializer::{Payload, RecordSerializer, SerializeOptions, selected_fields};
use indexmap::IndexMap;
use reinhardt_export_core::{ModelMeta, Record};
use serde::Serialize;

#[derive(Serialize)]
struct JsonObject<'a> {
	model: &'a str,
	pk: serde_json::Value,
	fields: IndexMap<&'a str, serde_json::Value>,
}

/// JSON serializer
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{ModelMeta, Record};
/// use reinhardt_export_serializers::{JsonSerializer, RecordSerializer, SerializeOptions};
///
/// let model = ModelMeta::new("shop", "Product");
/// let records = vec![Record::new(1).with("name", "Lamp")];
/// let payload = JsonSerializer
///     .serialize(&model, &records, &SerializeOptions::new())
///     .unwrap();
///
/// assert_eq!(
///     payload.as_text(),
///     Some(r#"[{"model":"shop.product","pk":1,"fields":{"name":"Lamp"}}]"#)
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl RecordSerializer for JsonSerializer {
	fn format(&self) -> &str {
		"json"
	}

	fn content_type(&self) -> Option<&str> {
		Some("application/json")
	}

	fn serialize(
		&self,
		model: &ModelMeta,
		records: &[Record],
		options: &SerializeOptions,
	) -> Result<Payload> {
		let label = model.label();
		let objects: Vec<JsonObject<'_>> = records
			.iter()
			.map(|record| JsonObject {
				model: &label,
				pk: record.pk.to_json(),
				fields: selected_fields(record, options)
					.map(|(name, value)| (name.as_str(), value.to_json()))
					.collect(),
			})
			.collect();

		let text = match options.indent {
			Some(width) => {
				let indent = " ".repeat(width);
				let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
				let mut buf = Vec::new();
				let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
				objects.serialize(&mut serializer)?;
				String::from_utf8_lossy(&buf).into_owned()
			}
			None => serde_json::to_string(&objects)?,
		};
		Ok(Payload::Text(text))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_export_core::Value;
	use rstest::rstest;

	#[rstest]
	fn test_empty_collection_is_empty_array() {
		let payload = JsonSerializer
			.serialize(&ModelMeta::new("a", "B"), &[], &SerializeOptions::new().with_indent(4))
			.unwrap();
		assert!(payload.is_text());
		assert_eq!(payload.as_text(), Some("[]"));
	}

	#[rstest]
	fn test_indent_and_field_order() {
		let records = vec![Record::new(7).with("b", 2).with("a", Value::Null)];
		let payload = JsonSerializer
			.serialize(&ModelMeta::new("x", "Y"), &records, &SerializeOptions::new().with_indent(4))
			.unwrap();
		let expected = "[\n    {\n        \"model\": \"x.y\",\n        \"pk\": 7,\n        \"fields\": {\n            \"b\": 2,\n            \"a\": null\n        }\n    }\n]";
		assert_eq!(payload.as_text(), Some(expected));
	}
}
