//! Behaviour shared by every builtin format

use chrono::NaiveDate;
use reinhardt_export_core::{FieldDescriptor, FieldKind, ModelMeta, Record, Value};
use reinhardt_export_serializers::{Payload, SerializeOptions, SerializerRegistry};
use rstest::{fixture, rstest};
use rust_decimal::Decimal;

#[fixture]
fn model() -> ModelMeta {
	ModelMeta::new("export", "MockDjangoObject")
		.field(FieldDescriptor::new("field1", FieldKind::Integer))
		.field(FieldDescriptor::new("field2", FieldKind::Integer))
}

#[fixture]
fn registry() -> SerializerRegistry {
	SerializerRegistry::with_builtins()
}

#[rstest]
fn test_empty_json_is_text_array(model: ModelMeta, registry: SerializerRegistry) {
	// Act
	let payload = registry
		.serialize("json", &model, &[], &SerializeOptions::new().with_indent(4))
		.unwrap();

	// Assert
	assert!(payload.is_text());
	let parsed: serde_json::Value = serde_json::from_str(payload.as_text().unwrap()).unwrap();
	assert_eq!(parsed, serde_json::json!([]));
}

#[rstest]
fn test_json_field_subset(model: ModelMeta, registry: SerializerRegistry) {
	let records = vec![Record::new(1).with("field1", 1).with("field2", 2)];

	let all = registry
		.serialize("json", &model, &records, &SerializeOptions::new())
		.unwrap();
	let subset = registry
		.serialize("json", &model, &records, &SerializeOptions::new().with_fields(["field1"]))
		.unwrap();

	let all: serde_json::Value = serde_json::from_str(all.as_text().unwrap()).unwrap();
	let subset: serde_json::Value = serde_json::from_str(subset.as_text().unwrap()).unwrap();
	assert_eq!(all[0]["fields"]["field1"], 1);
	assert_eq!(all[0]["fields"]["field2"], 2);
	assert_eq!(subset[0]["fields"]["field1"], 1);
	assert!(subset[0]["fields"].get("field2").is_none());
}

#[rstest]
#[case("json")]
#[case("xml")]
#[case("csv")]
#[case("rust")]
fn test_every_builtin_format_is_deterministic(
	model: ModelMeta,
	registry: SerializerRegistry,
	#[case] format: &str,
) {
	let records = vec![
		Record::new(1)
			.with("field1", Decimal::new(1999, 2))
			.with("field2", NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
		Record::new(2).with("field1", Value::Null).with("field2", vec![1, 2]),
	];
	let options = SerializeOptions::new().with_indent(4);

	let first = registry.serialize(format, &model, &records, &options).unwrap();
	let second = registry.serialize(format, &model, &records, &options).unwrap();

	assert!(!first.to_bytes().is_empty());
	assert_eq!(first.to_bytes(), second.to_bytes());
	assert_eq!(matches!(first, Payload::Text(_)), format != "rust");
}

#[rstest]
fn test_json_keeps_decimal_precision(model: ModelMeta, registry: SerializerRegistry) {
	let records = vec![Record::new(1).with("field1", Decimal::new(10, 1))];
	let payload = registry
		.serialize("json", &model, &records, &SerializeOptions::new())
		.unwrap();
	assert!(payload.as_text().unwrap().contains("\"field1\":\"1.0\""));
}

#[rstest]
#[case::json("json", Some("application/json"))]
#[case::xml("xml", Some("application/xml"))]
#[case::csv("csv", Some("text/csv"))]
#[case::native("rust", None)]
fn test_builtin_content_types(
	registry: SerializerRegistry,
	#[case] format: &str,
	#[case] expected: Option<&str>,
) {
	let serializer = registry.get(format).unwrap();

	assert_eq!(serializer.content_type(), expected);
}
