//! Serializer trait and shared helpers

use crate::error::Result;
use indexmap::IndexMap;
use reinhardt_export_core::{ModelMeta, Record, Value};
use std::fmt;

/// Options passed to every serializer call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SerializeOptions {
	/// Fields to emit per record; empty means every field
	pub fields: Vec<String>,
	/// Indentation of text formats; `None` renders compact output
	pub indent: Option<usize>,
}

impl SerializeOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_fields<I, S>(mut self, fields: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.fields = fields.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_indent(mut self, indent: usize) -> Self {
		self.indent = Some(indent);
		self
	}
}

/// A record in the in-memory object representation
#[derive(Debug, Clone, PartialEq)]
pub struct NativeObject {
	pub model: String,
	pub pk: Value,
	pub fields: IndexMap<String, Value>,
}

/// Output of a serializer
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
	/// Encoded document of a text format
	Text(String),
	/// In-memory objects of the native format
	Native(Vec<NativeObject>),
}

impl Payload {
	pub fn is_text(&self) -> bool {
		matches!(self, Payload::Text(_))
	}

	pub fn as_text(&self) -> Option<&str> {
		match self {
			Payload::Text(text) => Some(text),
			Payload::Native(_) => None,
		}
	}

	/// Bytes written to files and attachments
	///
	/// Native objects render as a pretty debug literal.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.to_string().into_bytes()
	}
}

impl fmt::Display for Payload {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Payload::Text(text) => f.write_str(text),
			Payload::Native(objects) => write!(f, "{:#?}", objects),
		}
	}
}

/// Encodes a collection of records of one model
pub trait RecordSerializer: Send + Sync {
	/// Registered format name
	fn format(&self) -> &str;

	/// Extension of generated files
	fn extension(&self) -> &str {
		self.format()
	}

	/// Media type of generated files; `None` lets the caller guess from the extension
	fn content_type(&self) -> Option<&str> {
		None
	}

	fn serialize(
		&self,
		model: &ModelMeta,
		records: &[Record],
		options: &SerializeOptions,
	) -> Result<Payload>;
}

/// Fields of `record` selected by `options`, in record order
pub(crate) fn selected_fields<'a>(
	record: &'a Record,
	options: &'a SerializeOptions,
) -> impl Iterator<Item = (&'a String, &'a Value)> {
	record
		.fields
		.iter()
		.filter(move |(name, _)| options.fields.is_empty() || options.fields.iter().any(|f| f == *name))
}

/// Column names shared by every record, in first-seen order
pub(crate) fn selected_columns(records: &[Record], options: &SerializeOptions) -> Vec<String> {
	let mut columns: Vec<String> = Vec::new();
	for record in records {
		for (name, _) in selected_fields(record, options) {
			if !columns.contains(name) {
				columns.push(name.clone());
			}
		}
	}
	columns
}
