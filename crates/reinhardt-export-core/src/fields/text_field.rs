use crate::field::{FieldResult, FilterInput, FilterValue, FormData, Widget, is_blank};
use crate::queryset::{Lookup, LookupOp};

/// Case-insensitive substring filter for text-like fields
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{FilterInput, FilterValue, FormData};
/// use reinhardt_export_core::fields::TextFilter;
///
/// let filter = TextFilter::new("username", "username");
/// let data = FormData::new().with("username", "  ali ");
/// assert_eq!(filter.clean(&data).unwrap(), Some(FilterValue::Text("ali".into())));
/// assert_eq!(filter.clean(&FormData::new()).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct TextFilter {
	name: String,
	label: String,
	help_text: String,
}

impl TextFilter {
	pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
		let label = label.into();
		let help_text = format!(
			"Only objects containing the entered text in its '{}' field will be exported. Case is ignored.",
			label.to_lowercase()
		);
		Self {
			name: name.into(),
			label,
			help_text,
		}
	}
}

impl FilterInput for TextFilter {
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
		Widget::TextInput
	}

	fn clean(&self, data: &FormData) -> FieldResult<Option<FilterValue>> {
		match data.get(&self.name) {
			Some(value) if !is_blank(value) => Ok(Some(FilterValue::Text(value.trim().to_string()))),
			_ => Ok(None),
		}
	}

	fn lookups(&self, value: &FilterValue) -> Vec<Lookup> {
		match value {
			FilterValue::Text(text) => vec![Lookup::new(&self.name, LookupOp::IContains(text.clone()))],
			_ => Vec::new(),
		}
	}
}
