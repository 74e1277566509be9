//! Form submission through query composition

use reinhardt_export_core::{
	ExportError, ExportFormBuilder, FieldDescriptor, FieldKind, FormData, InMemorySource, ModelMeta,
	Record, RecordSource, Result, Value, compose,
};
use reinhardt_export_core::testing::LogCapture;
use rstest::{fixture, rstest};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts record reads so tests can check the source is never touched
struct CountingSource {
	inner: InMemorySource,
	reads: AtomicUsize,
}

impl RecordSource for CountingSource {
	fn records(&self, model: &ModelMeta) -> Result<Vec<Record>> {
		self.reads.fetch_add(1, Ordering::SeqCst);
		self.inner.records(model)
	}

	fn related_choices(&self, related_model: &str) -> Result<Vec<reinhardt_export_core::Choice>> {
		self.inner.related_choices(related_model)
	}
}

#[fixture]
fn model() -> ModelMeta {
	ModelMeta::new("people", "Person")
		.field(FieldDescriptor::new("name", FieldKind::Char))
		.field(FieldDescriptor::new("score", FieldKind::Decimal))
		.field(FieldDescriptor::new("age", FieldKind::Integer))
}

#[fixture]
fn source() -> InMemorySource {
	InMemorySource::new().with_records(
		"people.person",
		vec![
			Record::new(1).with("name", "Alice").with("age", 30),
			Record::new(2).with("name", "Bob").with("age", 25),
			Record::new(3).with("name", "Natalie").with("age", 30),
			Record::new(4).with("name", "Carol").with("age", 41),
		],
	)
}

fn pks(records: &[Record]) -> Vec<Value> {
	records.iter().map(|r| r.pk.clone()).collect()
}

#[rstest]
fn test_text_filter_is_case_insensitive(model: ModelMeta, source: InMemorySource) {
	// Arrange
	let mut form = ExportFormBuilder::new(&model).build(&source).unwrap();
	form.bind(FormData::new().with("name", "ALI"));

	// Act
	let queryset = compose(&model, form.export_request().unwrap(), &source).unwrap();

	// Assert
	assert_eq!(pks(queryset.records()), vec![Value::Int(1), Value::Int(3)]);
}

#[rstest]
fn test_ascending_and_descending_are_reversed_apart_from_ties(
	model: ModelMeta,
	source: InMemorySource,
) {
	let mut asc = ExportFormBuilder::new(&model).build(&source).unwrap();
	asc.bind(FormData::new().with("export_order_by", "age").with("export_order_direction", "asc"));
	let mut desc = ExportFormBuilder::new(&model).build(&source).unwrap();
	desc.bind(FormData::new().with("export_order_by", "age").with("export_order_direction", "dsc"));

	let asc = compose(&model, asc.export_request().unwrap(), &source).unwrap();
	let desc = compose(&model, desc.export_request().unwrap(), &source).unwrap();

	assert_eq!(
		pks(asc.records()),
		vec![Value::Int(2), Value::Int(1), Value::Int(3), Value::Int(4)]
	);
	// Alice and Natalie tie on age and keep their native order
	assert_eq!(
		pks(desc.records()),
		vec![Value::Int(4), Value::Int(1), Value::Int(3), Value::Int(2)]
	);
}

#[rstest]
fn test_invalid_decimal_fails_before_source_is_read(model: ModelMeta, source: InMemorySource) {
	// Arrange
	let counting = CountingSource {
		inner: source,
		reads: AtomicUsize::new(0),
	};
	let mut form = ExportFormBuilder::new(&model).build(&counting).unwrap();

	// Act
	form.bind(FormData::new().with("score_0", "abc").with("score_1", "5"));
	let result = form
		.export_request()
		.and_then(|request| compose(&model, request, &counting));

	// Assert
	match result {
		Err(ExportError::InvalidInput { field, message }) => {
			assert_eq!(field, "score");
			assert!(message.contains("'abc'"));
		}
		other => panic!("expected invalid input, got {:?}", other.map(|qs| qs.len())),
	}
	assert_eq!(counting.reads.load(Ordering::SeqCst), 0);
}

#[rstest]
fn test_skipped_ordering_is_logged(model: ModelMeta, source: InMemorySource) {
	// Arrange
	let logs = LogCapture::new();
	let _guard = logs.install();
	let mut form = ExportFormBuilder::new(&model).build(&source).unwrap();
	form.bind(FormData::new());

	// Act
	let queryset = compose(&model, form.export_request().unwrap(), &source).unwrap();

	// Assert
	assert_eq!(queryset.len(), 4);
	assert!(
		logs.contains(tracing::Level::DEBUG, "no ordering field"),
		"captured: {:?}",
		logs.lines()
	);
	assert!(!logs.contains(tracing::Level::WARN, "no ordering field"));
}
