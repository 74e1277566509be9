//! Error types for export filtering

use thiserror::Error;

/// Errors raised while building export forms or composing export querysets
#[derive(Debug, Error)]
pub enum ExportError {
	/// A field type on the target model has no filter mapping, or the form
	/// references a field the model does not declare.
	///
	/// Raised while the form is being built, never at submission time.
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// A submitted filter value could not be parsed into its expected type
	#[error("Invalid input for '{field}': {message}")]
	InvalidInput { field: String, message: String },

	/// A lookup or ordering referenced a field the model does not declare
	#[error("Unknown field '{field}' on model '{model}'")]
	UnknownField { model: String, field: String },

	/// The record source failed to produce the base collection
	#[error("Record source error: {0}")]
	Source(String),
}

impl ExportError {
	/// Build an [`ExportError::InvalidInput`] for `field`
	pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
		Self::InvalidInput {
			field: field.into(),
			message: message.into(),
		}
	}
}

/// Result type for export filtering operations
pub type Result<T> = std::result::Result<T, ExportError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_invalid_input_display_names_field() {
		let err = ExportError::invalid_input("price", "'abc' is not a valid number");
		assert_eq!(
			err.to_string(),
			"Invalid input for 'price': 'abc' is not a valid number"
		);
	}

	#[test]
	fn test_unknown_field_display() {
		let err = ExportError::UnknownField {
			model: "auth.user".into(),
			field: "nickname".into(),
		};
		assert_eq!(
			err.to_string(),
			"Unknown field 'nickname' on model 'auth.user'"
		);
	}
}
