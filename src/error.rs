//! Errors of the export tool

use reinhardt_export_core::ExportError;
use reinhardt_export_mail::EmailError;
use reinhardt_export_serializers::SerializerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
	/// Configuration, validation or query failure
	#[error(transparent)]
	Export(#[from] ExportError),

	/// The requested format is unknown or its encoder failed
	#[error(transparent)]
	Serializer(#[from] SerializerError),

	/// Mail delivery failed
	#[error(transparent)]
	Delivery(#[from] EmailError),

	#[error("Rendering failed: {0}")]
	Render(String),

	#[error("HTTP error: {0}")]
	Http(#[from] http::Error),
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;
