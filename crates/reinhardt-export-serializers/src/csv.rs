//! CSV serializer
//!
//! One header row `pk, model, <fields...>` followed by one row per record,
//! every cell quoted. Nulls render as `NULL` and booleans as `TRUE`/`FALSE`;
//! text that would read back as one of those, or as a list, is wrapped in
//! single quotes.

use crate::error::{Result, SerializerError};
use crate::serializer::{Payload, RecordSerializer, SerializeOptions, selected_columns};
use csv::{QuoteStyle, WriterBuilder};
use reinhardt_export_core::{ModelMeta, Record, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSerializer;

/// Text form of one cell
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::Value;
/// use reinhardt_export_serializers::csv::cell;
///
/// assert_eq!(cell(&Value::Null), "NULL");
/// assert_eq!(cell(&Value::Bool(false)), "FALSE");
/// assert_eq!(cell(&Value::Text("NULL".into())), "'NULL'");
/// assert_eq!(cell(&Value::from(vec![1, 2])), "[1, 2]");
/// ```
pub fn cell(value: &Value) -> String {
	match value {
		Value::Null => "NULL".to_string(),
		Value::Bool(true) => "TRUE".to_string(),
		Value::Bool(false) => "FALSE".to_string(),
		Value::Text(text) if is_ambiguous(text) => format!("'{}'", text),
		other => other.to_string(),
	}
}

fn is_ambiguous(text: &str) -> bool {
	matches!(text, "NULL" | "TRUE" | "FALSE") || text.starts_with('[') || text.starts_with('\'')
}

fn csv_error(err: impl std::fmt::Display) -> SerializerError {
	SerializerError::Csv(err.to_string())
}

impl RecordSerializer for CsvSerializer {
	fn format(&self) -> &str {
		"csv"
	}

	fn content_type(&self) -> Option<&str> {
		Some("text/csv")
	}

	fn serialize(
		&self,
		model: &ModelMeta,
		records: &[Record],
		options: &SerializeOptions,
	) -> Result<Payload> {
		let columns = selected_columns(records, options);
		let mut writer = WriterBuilder::new()
			.quote_style(QuoteStyle::Always)
			.from_writer(Vec::new());

		let mut header = vec!["pk".to_string(), "model".to_string()];
		header.extend(columns.iter().cloned());
		writer.write_record(&header).map_err(csv_error)?;

		let label = model.label();
		for record in records {
			let mut row = vec![cell(&record.pk), label.clone()];
			row.extend(
				columns
					.iter()
					.map(|name| record.get(name).map(cell).unwrap_or_else(|| cell(&Value::Null))),
			);
			writer.write_record(&row).map_err(csv_error)?;
		}

		writer.flush().map_err(csv_error)?;
		let bytes = writer.into_inner().map_err(csv_error)?;
		let text = String::from_utf8(bytes).map_err(csv_error)?;
		Ok(Payload::Text(text))
	}
}
