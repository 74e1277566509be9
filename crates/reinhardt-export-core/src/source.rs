//! Data access collaborator
//!
//! The export tool reads the full collection of a model and the choice lists
//! of related models through [`RecordSource`]. Consistency of those reads is
//! the host's concern.

use crate::error::{ExportError, Result};
use crate::schema::ModelMeta;
use crate::value::{Record, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A selectable related instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
	/// Primary key stored in relation fields
	pub key: Value,
	/// Display text
	pub label: String,
}

impl Choice {
	pub fn new(key: impl Into<Value>, label: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			label: label.into(),
		}
	}
}

/// Read access to stored records
pub trait RecordSource: Send + Sync {
	/// Full collection of the model in its native order
	fn records(&self, model: &ModelMeta) -> Result<Vec<Record>>;

	/// Instances of `related_model` offered by relation filters
	fn related_choices(&self, related_model: &str) -> Result<Vec<Choice>>;
}

/// [`RecordSource`] backed by vectors, keyed by model label
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{Choice, InMemorySource, ModelMeta, Record, RecordSource};
///
/// let model = ModelMeta::new("shop", "Product");
/// let source = InMemorySource::new()
///     .with_records("shop.product", vec![Record::new(1).with("name", "Widget")])
///     .with_choices("shop.category", vec![Choice::new(1, "Tools")]);
///
/// assert_eq!(source.records(&model).unwrap().len(), 1);
/// assert_eq!(source.related_choices("shop.category").unwrap()[0].label, "Tools");
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
	records: HashMap<String, Vec<Record>>,
	choices: HashMap<String, Vec<Choice>>,
}

impl InMemorySource {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_records(mut self, model_label: impl Into<String>, records: Vec<Record>) -> Self {
		self.records.insert(model_label.into(), records);
		self
	}

	pub fn with_choices(mut self, model_label: impl Into<String>, choices: Vec<Choice>) -> Self {
		self.choices.insert(model_label.into(), choices);
		self
	}
}

impl RecordSource for InMemorySource {
	fn records(&self, model: &ModelMeta) -> Result<Vec<Record>> {
		Ok(self.records.get(&model.label()).cloned().unwrap_or_default())
	}

	fn related_choices(&self, related_model: &str) -> Result<Vec<Choice>> {
		self.choices
			.get(related_model)
			.cloned()
			.ok_or_else(|| ExportError::Source(format!("no choices for model '{}'", related_model)))
	}
}
