use crate::field::{FieldError, FieldResult, FilterInput, FilterValue, FormData, Widget, is_blank};
use crate::queryset::{Lookup, LookupOp};
use crate::source::Choice;
use crate::value::Value;

fn relation_help_text(label: &str) -> String {
	format!(
		"Only objects with relationships to the selected {} above will be exported.",
		label.to_lowercase()
	)
}

fn widget_choices(choices: &[Choice]) -> Vec<(String, String)> {
	choices
		.iter()
		.map(|choice| (choice.key.to_string(), choice.label.clone()))
		.collect()
}

/// Resolve a submitted key against the offered choices
fn resolve(choices: &[Choice], raw: &str) -> FieldResult<Value> {
	let raw = raw.trim();
	choices
		.iter()
		.find(|choice| choice.key.to_string() == raw)
		.map(|choice| choice.key.clone())
		.ok_or_else(|| {
			FieldError::Validation(format!(
				"Select a valid choice. '{}' is not one of the available choices.",
				raw
			))
		})
}

/// Single selection filter for foreign key and one-to-one fields
#[derive(Debug, Clone)]
pub struct ModelChoiceFilter {
	name: String,
	label: String,
	help_text: String,
	choices: Vec<Choice>,
}

impl ModelChoiceFilter {
	pub fn new(name: impl Into<String>, label: impl Into<String>, choices: Vec<Choice>) -> Self {
		let label = label.into();
		Self {
			name: name.into(),
			help_text: relation_help_text(&label),
			label,
			choices,
		}
	}

	pub fn choices(&self) -> &[Choice] {
		&self.choices
	}
}

impl FilterInput for ModelChoiceFilter {
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
		let mut choices = vec![(String::new(), "---------".to_string())];
		choices.extend(widget_choices(&self.choices));
		Widget::Select { choices }
	}

	fn clean(&self, data: &FormData) -> FieldResult<Option<FilterValue>> {
		match data.get(&self.name).filter(|v| !is_blank(v)) {
			Some(raw) => resolve(&self.choices, raw).map(|key| Some(FilterValue::Key(key))),
			None => Ok(None),
		}
	}

	fn lookups(&self, value: &FilterValue) -> Vec<Lookup> {
		match value {
			FilterValue::Key(key) => vec![Lookup::new(&self.name, LookupOp::Exact(key.clone()))],
			_ => Vec::new(),
		}
	}
}

/// Multiple selection filter for many-to-many fields
///
/// A record matches when any of its related keys is among the selected ones.
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{Choice, FilterInput, FilterValue, FormData, Value};
/// use reinhardt_export_core::fields::ModelMultipleChoiceFilter;
///
/// let filter = ModelMultipleChoiceFilter::new(
///     "groups",
///     "groups",
///     vec![Choice::new(1, "Editors"), Choice::new(2, "Admins")],
/// );
/// let data = FormData::new().with("groups", "1").with("groups", "2");
/// assert_eq!(
///     filter.clean(&data).unwrap(),
///     Some(FilterValue::Keys(vec![Value::Int(1), Value::Int(2)]))
/// );
/// assert!(filter.clean(&FormData::new().with("groups", "7")).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ModelMultipleChoiceFilter {
	name: String,
	label: String,
	help_text: String,
	choices: Vec<Choice>,
}

impl ModelMultipleChoiceFilter {
	pub fn new(name: impl Into<String>, label: impl Into<String>, choices: Vec<Choice>) -> Self {
		let label = label.into();
		Self {
			name: name.into(),
			help_text: relation_help_text(&label),
			label,
			choices,
		}
	}

	pub fn choices(&self) -> &[Choice] {
		&self.choices
	}
}

impl FilterInput for ModelMultipleChoiceFilter {
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
		Widget::SelectMultiple {
			choices: widget_choices(&self.choices),
		}
	}

	fn clean(&self, data: &FormData) -> FieldResult<Option<FilterValue>> {
		let keys = data
			.get_all(&self.name)
			.into_iter()
			.filter(|raw| !is_blank(raw))
			.map(|raw| resolve(&self.choices, raw))
			.collect::<FieldResult<Vec<Value>>>()?;
		if keys.is_empty() {
			return Ok(None);
		}
		Ok(Some(FilterValue::Keys(keys)))
	}

	fn lookups(&self, value: &FilterValue) -> Vec<Lookup> {
		match value {
			FilterValue::Keys(keys) => vec![Lookup::new(&self.name, LookupOp::In(keys.clone()))],
			_ => Vec::new(),
		}
	}
}
