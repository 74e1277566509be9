//! Export form: option controls plus one filter per model field
//!
//! The form is built once per request for a model. Binding submitted data
//! validates every control, collecting per-field errors instead of raising them;
//! a valid form yields an [`ExportRequest`].

use crate::error::{ExportError, Result};
use crate::field::{FieldError, FilterInput, FormData, Widget, is_blank};
use crate::queryset::{Lookup, SortDirection};
use crate::registry::{FilterContext, FilterRegistry};
use crate::schema::{ModelMeta, capfirst};
use crate::settings::ExportSettings;
use crate::source::RecordSource;
use indexmap::IndexMap;
use serde::Serialize;

pub const FORMAT_FIELD: &str = "export_format";
pub const FIELDS_FIELD: &str = "export_fields";
pub const ORDER_BY_FIELD: &str = "export_order_by";
pub const ORDER_DIRECTION_FIELD: &str = "export_order_direction";

/// Description shown above the filter controls
pub const FILTERS_DESCRIPTION: &str = "Objects will be filtered to match the criteria as specified in the fields below. If a value is not specified for a field the field is ignored during the filter process.";

/// A non-data control of the export form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionField {
	pub name: String,
	pub label: String,
	pub help_text: String,
	pub widget: Widget,
}

/// A titled group of form controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fieldset {
	pub title: String,
	pub description: Option<String>,
	pub fields: Vec<String>,
}

/// Validated export submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRequest {
	/// Serializer format name
	pub format: String,
	/// Fields to emit; empty means every field
	pub fields: Vec<String>,
	pub order_by: Option<String>,
	pub direction: SortDirection,
	/// Lookups of every non-empty filter, in form order
	pub lookups: Vec<Lookup>,
}

/// Builds an [`ExportForm`] for one model
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{
///     ExportFormBuilder, FieldDescriptor, FieldKind, FormData, InMemorySource, ModelMeta,
/// };
///
/// let model = ModelMeta::new("shop", "Product")
///     .field(FieldDescriptor::new("name", FieldKind::Char))
///     .field(FieldDescriptor::new("price", FieldKind::Decimal));
///
/// let mut form = ExportFormBuilder::new(&model)
///     .formats(["json", "csv"])
///     .build(&InMemorySource::new())
///     .unwrap();
///
/// form.bind(FormData::new().with("export_format", "csv").with("name", "lamp"));
/// assert!(form.is_valid());
///
/// let request = form.export_request().unwrap();
/// assert_eq!(request.format, "csv");
/// assert_eq!(request.lookups[0].to_query_param(), "name__icontains");
/// ```
pub struct ExportFormBuilder<'a> {
	model: &'a ModelMeta,
	formats: Vec<String>,
	filter_fields: Option<Vec<String>>,
	registry: Option<&'a FilterRegistry>,
	settings: Option<&'a ExportSettings>,
}

impl<'a> ExportFormBuilder<'a> {
	pub fn new(model: &'a ModelMeta) -> Self {
		Self {
			model,
			formats: Vec::new(),
			filter_fields: None,
			registry: None,
			settings: None,
		}
	}

	/// Formats offered by the format control
	pub fn formats<I, S>(mut self, formats: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.formats = formats.into_iter().map(Into::into).collect();
		self
	}

	/// Restrict filters to the named fields
	///
	/// The field subset and ordering controls still offer every editable field.
	pub fn filter_fields<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.filter_fields = Some(names.into_iter().map(Into::into).collect());
		self
	}

	pub fn registry(mut self, registry: &'a FilterRegistry) -> Self {
		self.registry = Some(registry);
		self
	}

	pub fn settings(mut self, settings: &'a ExportSettings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Construct the option controls and one filter per eligible field
	///
	/// # Errors
	///
	/// Returns [`ExportError::Configuration`] when a field type has no filter
	/// mapping or an explicitly named filter field is not an editable field of
	/// the model.
	pub fn build(self, source: &dyn RecordSource) -> Result<ExportForm> {
		let default_registry = FilterRegistry::default();
		let default_settings = ExportSettings::default();
		let registry = self.registry.unwrap_or(&default_registry);
		let settings = self.settings.unwrap_or(&default_settings);
		let context = FilterContext {
			input_formats: &settings.input_formats,
			source,
		};

		if let Some(names) = &self.filter_fields {
			for name in names {
				if !self.model.editable_fields().any(|f| &f.name == name) {
					return Err(ExportError::Configuration(format!(
						"'{}' is not an editable field of '{}'",
						name,
						self.model.label()
					)));
				}
			}
		}

		let filters = self
			.model
			.editable_fields()
			.filter(|field| match &self.filter_fields {
				Some(names) => names.contains(&field.name),
				None => true,
			})
			.map(|field| registry.build(field, &context))
			.collect::<Result<Vec<_>>>()?;

		let field_choices: Vec<(String, String)> = self
			.model
			.editable_fields()
			.map(|field| (field.name.clone(), capfirst(&field.label())))
			.collect();

		tracing::debug!(
			model = %self.model.label(),
			filters = filters.len(),
			"built export form"
		);

		Ok(ExportForm {
			model: self.model.clone(),
			options: option_fields(&self.formats, &field_choices),
			filters,
			formats: self.formats,
			field_choices,
			default_format: settings.default_format.clone(),
			data: None,
			errors: IndexMap::new(),
			request: None,
		})
	}
}

fn option_fields(formats: &[String], field_choices: &[(String, String)]) -> Vec<OptionField> {
	let mut format_choices = vec![(String::new(), "---------".to_string())];
	format_choices.extend(formats.iter().map(|f| (f.clone(), f.clone())));
	let mut order_choices = vec![(String::new(), "---------".to_string())];
	order_choices.extend(field_choices.iter().cloned());

	vec![
		OptionField {
			name: FORMAT_FIELD.to_string(),
			label: "Export format".to_string(),
			help_text: "Designates export format.".to_string(),
			widget: Widget::Select {
				choices: format_choices,
			},
		},
		OptionField {
			name: FIELDS_FIELD.to_string(),
			label: "Export fields".to_string(),
			help_text: "Fields to be included in the exported data. If none are selected all fields will be exported.".to_string(),
			widget: Widget::SelectMultiple {
				choices: field_choices.to_vec(),
			},
		},
		OptionField {
			name: ORDER_BY_FIELD.to_string(),
			label: "Export order by".to_string(),
			help_text: "Field to use for ordering the exported data.".to_string(),
			widget: Widget::Select {
				choices: order_choices,
			},
		},
		OptionField {
			name: ORDER_DIRECTION_FIELD.to_string(),
			label: "Export order direction".to_string(),
			help_text: "Sort elements in ascending or descending order.".to_string(),
			widget: Widget::Select {
				choices: vec![
					(SortDirection::Ascending.as_str().to_string(), "Ascending".to_string()),
					(SortDirection::Descending.as_str().to_string(), "Descending".to_string()),
				],
			},
		},
	]
}

fn invalid_choice(value: &str) -> String {
	format!(
		"Select a valid choice. '{}' is not one of the available choices.",
		value
	)
}

/// The export form of one model
pub struct ExportForm {
	model: ModelMeta,
	options: Vec<OptionField>,
	filters: Vec<Box<dyn FilterInput>>,
	formats: Vec<String>,
	field_choices: Vec<(String, String)>,
	default_format: String,
	data: Option<FormData>,
	errors: IndexMap<String, Vec<String>>,
	request: Option<ExportRequest>,
}

impl ExportForm {
	pub fn model(&self) -> &ModelMeta {
		&self.model
	}

	pub fn options(&self) -> &[OptionField] {
		&self.options
	}

	pub fn filters(&self) -> &[Box<dyn FilterInput>] {
		&self.filters
	}

	pub fn get_filter(&self, name: &str) -> Option<&dyn FilterInput> {
		self.filters
			.iter()
			.find(|f| f.name() == name)
			.map(|f| f.as_ref())
	}

	/// The "Options" and "Filters" groups, in display order
	pub fn fieldsets(&self) -> Vec<Fieldset> {
		vec![
			Fieldset {
				title: "Options".to_string(),
				description: None,
				fields: self.options.iter().map(|o| o.name.clone()).collect(),
			},
			Fieldset {
				title: "Filters".to_string(),
				description: Some(FILTERS_DESCRIPTION.to_string()),
				fields: self.filters.iter().map(|f| f.name().to_string()).collect(),
			},
		]
	}

	/// Bind submitted data and validate every control
	pub fn bind(&mut self, data: FormData) {
		self.errors.clear();
		self.request = None;

		let format = self.clean_format(&data);
		let fields = self.clean_fields(&data);
		let order_by = self.clean_order_by(&data);
		let direction = SortDirection::parse(data.get(ORDER_DIRECTION_FIELD).unwrap_or_default());

		let mut lookups = Vec::new();
		let mut field_errors = Vec::new();
		for filter in &self.filters {
			match filter.clean(&data) {
				Ok(Some(value)) => {
					lookups.extend(filter.lookups(&value));
				}
				Ok(None) => {}
				Err(err) => field_errors.push((filter.name().to_string(), err)),
			}
		}
		for (name, err) in field_errors {
			self.add_error(&name, err);
		}

		if self.errors.is_empty() {
			self.request = Some(ExportRequest {
				format,
				fields,
				order_by,
				direction,
				lookups,
			});
		} else {
			tracing::debug!(
				model = %self.model.label(),
				errors = ?self.errors,
				"export form is invalid"
			);
		}
		self.data = Some(data);
	}

	fn add_error(&mut self, field: &str, error: FieldError) {
		self.errors
			.entry(field.to_string())
			.or_default()
			.push(error.to_string());
	}

	fn clean_format(&mut self, data: &FormData) -> String {
		match data.get(FORMAT_FIELD).filter(|v| !is_blank(v)) {
			None => self.default_format.clone(),
			Some(format) if self.formats.iter().any(|f| f == format) => format.to_string(),
			Some(format) => {
				self.add_error(FORMAT_FIELD, FieldError::Validation(invalid_choice(format)));
				format.to_string()
			}
		}
	}

	fn clean_fields(&mut self, data: &FormData) -> Vec<String> {
		let mut fields = Vec::new();
		for name in data.get_all(FIELDS_FIELD) {
			if is_blank(name) {
				continue;
			}
			if self.is_field_choice(name) {
				fields.push(name.to_string());
			} else {
				self.add_error(FIELDS_FIELD, FieldError::Validation(invalid_choice(name)));
			}
		}
		fields
	}

	fn clean_order_by(&mut self, data: &FormData) -> Option<String> {
		let name = data.get(ORDER_BY_FIELD).filter(|v| !is_blank(v))?;
		if self.is_field_choice(name) {
			Some(name.to_string())
		} else {
			self.add_error(ORDER_BY_FIELD, FieldError::Validation(invalid_choice(name)));
			None
		}
	}

	fn is_field_choice(&self, name: &str) -> bool {
		self.field_choices.iter().any(|(value, _)| value == name)
	}

	pub fn is_bound(&self) -> bool {
		self.data.is_some()
	}

	/// Whether the form is bound and every control validated
	pub fn is_valid(&self) -> bool {
		self.is_bound() && self.errors.is_empty()
	}

	/// Per-field validation messages
	pub fn errors(&self) -> &IndexMap<String, Vec<String>> {
		&self.errors
	}

	pub fn data(&self) -> Option<&FormData> {
		self.data.as_ref()
	}

	/// The validated submission
	///
	/// # Errors
	///
	/// Returns [`ExportError::InvalidInput`] naming the first invalid field, or
	/// when the form has not been bound.
	pub fn export_request(&self) -> Result<&ExportRequest> {
		if let Some((field, messages)) = self.errors.first() {
			return Err(ExportError::invalid_input(
				field.clone(),
				messages.join(" "),
			));
		}
		self.request
			.as_ref()
			.ok_or_else(|| ExportError::invalid_input("__all__", "the form has not been submitted"))
	}
}
