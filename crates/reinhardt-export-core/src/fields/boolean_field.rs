use crate::field::{FieldError, FieldResult, FilterInput, FilterValue, FormData, Widget, is_blank};
use crate::queryset::{Lookup, LookupOp};
use crate::value::Value;

/// Tri-state filter for boolean fields: either, yes or no
#[derive(Debug, Clone)]
pub struct BooleanFilter {
	name: String,
	label: String,
	help_text: String,
}

impl BooleanFilter {
	pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
		let label = label.into();
		let help_text = format!(
			"Only objects having its '{}' field set as selected will be exported. Select 'Either' to ignore.",
			label.to_lowercase()
		);
		Self {
			name: name.into(),
			label,
			help_text,
		}
	}

	/// Choices offered by the select widget
	pub fn choices() -> Vec<(String, String)> {
		vec![
			(String::new(), "Either".to_string()),
			("True".to_string(), "Yes".to_string()),
			("False".to_string(), "No".to_string()),
		]
	}
}

impl FilterInput for BooleanFilter {
	fn name(&self) -> &str {
		&self.name
	}

	fn label(&self) -> &str {
		&self.label
	}

	fn help_text(&self) -> &str {
		&self.help_text
	}

	fn widget(&self) -> Widget {
		Widget::Select {
			choices: Self::choices(),
		}
	}

	fn clean(&self, data: &FormData) -> FieldResult<Option<FilterValue>> {
		let Some(raw) = data.get(&self.name).filter(|v| !is_blank(v)) else {
			return Ok(None);
		};
		match raw.trim().to_ascii_lowercase().as_str() {
			"true" | "1" | "on" | "yes" => Ok(Some(FilterValue::Bool(true))),
			"false" | "0" | "off" | "no" => Ok(Some(FilterValue::Bool(false))),
			_ => Err(FieldError::Validation(format!(
				"Select a valid choice. '{}' is not one of the available choices.",
				raw
			))),
		}
	}

	fn lookups(&self, value: &FilterValue) -> Vec<Lookup> {
		match value {
			FilterValue::Bool(flag) => vec![Lookup::new(&self.name, LookupOp::Exact(Value::Bool(*flag)))],
			_ => Vec::new(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("True", Some(true))]
	#[case("1", Some(true))]
	#[case("False", Some(false))]
	#[case("0", Some(false))]
	#[case("", None)]
	fn test_clean_tri_state(#[case] raw: &str, #[case] expected: Option<bool>) {
		let filter = BooleanFilter::new("is_staff", "staff status");
		let cleaned = filter.clean(&FormData::new().with("is_staff", raw)).unwrap();
		assert_eq!(cleaned, expected.map(FilterValue::Bool));
	}

	#[rstest]
	fn test_unknown_choice_is_rejected() {
		let filter = BooleanFilter::new("is_staff", "staff status");
		let result = filter.clean(&FormData::new().with("is_staff", "maybe"));
		assert!(matches!(result, Err(FieldError::Validation(msg)) if msg.contains("'maybe'")));
	}

	#[rstest]
	fn test_false_is_an_exact_lookup() {
		let filter = BooleanFilter::new("is_staff", "staff status");
		let lookups = filter.lookups(&FilterValue::Bool(false));
		assert_eq!(lookups, vec![Lookup::new("is_staff", LookupOp::Exact(Value::Bool(false)))]);
	}
}
