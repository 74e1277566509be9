//! Serializer errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SerializerError {
	/// No serializer is registered under the requested format
	#[error("Unsupported export format: '{0}'")]
	UnsupportedFormat(String),

	#[error("JSON encoding failed: {0}")]
	Json(#[from] serde_json::Error),

	#[error("XML encoding failed: {0}")]
	Xml(String),

	#[error("CSV encoding failed: {0}")]
	Csv(String),
}

pub type Result<T> = std::result::Result<T, SerializerError>;
