//! Export tool settings
//!
//! Settings are plain serde structs loaded from TOML, with defaults matching
//! the conventional admin export behaviour.

use crate::error::{ExportError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Accepted textual input formats for date, time and datetime filter bounds
///
/// Formats are `chrono` strftime patterns, tried in order; the first one that
/// parses wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFormats {
	pub date: Vec<String>,
	pub time: Vec<String>,
	pub datetime: Vec<String>,
}

impl Default for InputFormats {
	fn default() -> Self {
		Self {
			date: vec![
				"%Y-%m-%d".to_string(),  // 2025-01-15
				"%m/%d/%Y".to_string(),  // 01/15/2025
				"%m/%d/%y".to_string(),  // 01/15/25
				"%b %d %Y".to_string(),  // Jan 15 2025
				"%b %d, %Y".to_string(), // Jan 15, 2025
				"%d %b %Y".to_string(),  // 15 Jan 2025
				"%d %b, %Y".to_string(), // 15 Jan, 2025
				"%B %d %Y".to_string(),  // January 15 2025
				"%B %d, %Y".to_string(), // January 15, 2025
				"%d %B %Y".to_string(),  // 15 January 2025
				"%d %B, %Y".to_string(), // 15 January, 2025
			],
			time: vec![
				"%H:%M:%S".to_string(),
				"%H:%M:%S%.f".to_string(),
				"%H:%M".to_string(),
			],
			datetime: vec![
				"%Y-%m-%d %H:%M:%S".to_string(),
				"%Y-%m-%d %H:%M:%S%.f".to_string(),
				"%Y-%m-%d %H:%M".to_string(),
				"%Y-%m-%dT%H:%M:%S".to_string(),
				"%m/%d/%Y %H:%M:%S".to_string(),
				"%m/%d/%Y %H:%M:%S%.f".to_string(),
				"%m/%d/%Y %H:%M".to_string(),
				"%m/%d/%y %H:%M:%S".to_string(),
				"%m/%d/%y %H:%M".to_string(),
			],
		}
	}
}

/// Settings of the export tool
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::ExportSettings;
///
/// let settings = ExportSettings::from_toml_str(r#"
/// default_format = "csv"
///
/// [input_formats]
/// date = ["%d.%m.%Y"]
/// "#).unwrap();
///
/// assert_eq!(settings.tool_name, "export");
/// assert_eq!(settings.default_format, "csv");
/// assert_eq!(settings.input_formats.date, vec!["%d.%m.%Y".to_string()]);
/// assert!(!settings.input_formats.time.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
	/// Tool name, used as the URL segment and the filename prefix
	pub tool_name: String,
	/// Format used when the form leaves `export_format` empty
	pub default_format: String,
	/// Indentation of text serializers
	pub indent: usize,
	pub input_formats: InputFormats,
	/// Sender address of export emails
	pub from_email: String,
	pub mail_subject: String,
	pub mail_body: String,
}

impl Default for ExportSettings {
	fn default() -> Self {
		Self {
			tool_name: "export".to_string(),
			default_format: "json".to_string(),
			indent: 4,
			input_formats: InputFormats::default(),
			from_email: "webmaster@localhost".to_string(),
			mail_subject: "Database Export".to_string(),
			mail_body: "Database Export Attached".to_string(),
		}
	}
}

impl ExportSettings {
	/// Parse settings from a TOML document; missing keys keep their defaults
	pub fn from_toml_str(content: &str) -> Result<Self> {
		toml::from_str(content)
			.map_err(|e| ExportError::Configuration(format!("invalid export settings: {}", e)))
	}

	/// Load settings from a TOML file
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| {
			ExportError::Configuration(format!("cannot read {}: {}", path.display(), e))
		})?;
		Self::from_toml_str(&content)
	}
}
