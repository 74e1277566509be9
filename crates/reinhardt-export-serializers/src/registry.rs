//! Format-keyed serializer registry

use crate::csv::CsvSerializer;
use crate::error::{Result, SerializerError};
use crate::json::JsonSerializer;
use crate::native::NativeSerializer;
use crate::serializer::{Payload, RecordSerializer, SerializeOptions};
use crate::xml::XmlSerializer;
use indexmap::IndexMap;
use reinhardt_export_core::{ModelMeta, Record};
use std::sync::Arc;

/// Serializers available to the export tool, keyed by format name
///
/// # Examples
///
/// ```
/// use reinhardt_export_serializers::SerializerRegistry;
///
/// let mut registry = SerializerRegistry::with_builtins();
/// assert_eq!(registry.formats(), vec!["json", "xml", "csv", "rust"]);
/// assert_eq!(registry.get("rust").unwrap().extension(), "rs");
///
/// registry.unregister("xml");
/// assert!(registry.get("xml").is_err());
/// ```
#[derive(Clone, Default)]
pub struct SerializerRegistry {
	serializers: IndexMap<String, Arc<dyn RecordSerializer>>,
}

impl SerializerRegistry {
	/// An empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// A registry holding the `json`, `xml`, `csv` and `rust` serializers
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry
			.register(JsonSerializer)
			.register(XmlSerializer)
			.register(CsvSerializer)
			.register(NativeSerializer);
		registry
	}

	/// Register `serializer` under its format name, replacing any previous one
	pub fn register<S>(&mut self, serializer: S) -> &mut Self
	where
		S: RecordSerializer + 'static,
	{
		self.serializers
			.insert(serializer.format().to_string(), Arc::new(serializer));
		self
	}

	pub fn unregister(&mut self, format: &str) -> Option<Arc<dyn RecordSerializer>> {
		self.serializers.shift_remove(format)
	}

	/// Registered format names, in registration order
	pub fn formats(&self) -> Vec<&str> {
		self.serializers.keys().map(String::as_str).collect()
	}

	pub fn get(&self, format: &str) -> Result<Arc<dyn RecordSerializer>> {
		self.serializers
			.get(format)
			.cloned()
			.ok_or_else(|| SerializerError::UnsupportedFormat(format.to_string()))
	}

	/// Serialize with the serializer registered for `format`
	pub fn serialize(
		&self,
		format: &str,
		model: &ModelMeta,
		records: &[Record],
		options: &SerializeOptions,
	) -> Result<Payload> {
		let payload = self.get(format)?.serialize(model, records, options)?;
		tracing::debug!(
			format,
			model = %model.label(),
			records = records.len(),
			"serialized export"
		);
		Ok(payload)
	}
}

impl std::fmt::Debug for SerializerRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SerializerRegistry")
			.field("formats", &self.formats())
			.finish()
	}
}
