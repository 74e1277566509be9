//! Form rendering collaborator
//!
//! The export tool hands a [`RenderContext`] to a [`FormRenderer`] whenever it
//! shows the form page. Hosts plug in their template engine; the default
//! [`JsonFormRenderer`] serializes the context itself.

use crate::error::{ToolError, ToolResult};
use bytes::Bytes;
use reinhardt_export_core::{ExportForm, Widget};
use serde::Serialize;

/// One control as shown to the operator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
	pub name: String,
	pub label: String,
	pub help_text: String,
	pub widget: Widget,
	/// Submitted values, empty on a fresh form
	pub values: Vec<String>,
	pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldsetView {
	pub title: String,
	pub description: Option<String>,
	pub fields: Vec<FieldView>,
}

/// Everything the form page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderContext {
	pub title: String,
	pub help_text: String,
	/// `<app_label>.<model_name>` of the exported model
	pub model: String,
	pub fieldsets: Vec<FieldsetView>,
	/// Flash messages for the operator
	pub messages: Vec<String>,
}

impl RenderContext {
	pub fn from_form(
		title: impl Into<String>,
		help_text: impl Into<String>,
		form: &ExportForm,
		messages: Vec<String>,
	) -> Self {
		let values = |name: &str| -> Vec<String> {
			let Some(data) = form.data() else {
				return Vec::new();
			};
			let direct = data.get_all(name);
			if !direct.is_empty() {
				return direct.into_iter().map(str::to_string).collect();
			}
			data.parts(name).into_iter().map(str::to_string).collect()
		};
		let errors = |name: &str| form.errors().get(name).cloned().unwrap_or_default();

		let fieldsets = form
			.fieldsets()
			.into_iter()
			.map(|fieldset| {
				let fields = fieldset
					.fields
					.iter()
					.filter_map(|name| {
						if let Some(option) = form.options().iter().find(|o| &o.name == name) {
							return Some(FieldView {
								name: option.name.clone(),
								label: option.label.clone(),
								help_text: option.help_text.clone(),
								widget: option.widget.clone(),
								values: values(name),
								errors: errors(name),
							});
						}
						form.get_filter(name).map(|filter| FieldView {
							name: filter.name().to_string(),
							label: reinhardt_export_core::schema::capfirst(filter.label()),
							help_text: filter.help_text().to_string(),
							widget: filter.widget(),
							values: values(name),
							errors: errors(name),
						})
					})
					.collect();
				FieldsetView {
					title: fieldset.title,
					description: fieldset.description,
					fields,
				}
			})
			.collect();

		Self {
			title: title.into(),
			help_text: help_text.into(),
			model: form.model().label(),
			fieldsets,
			messages,
		}
	}
}

/// Turns a [`RenderContext`] into a response body
pub trait FormRenderer: Send + Sync {
	fn render(&self, context: &RenderContext) -> ToolResult<Bytes>;

	/// Content type of rendered pages
	fn content_type(&self) -> &str;
}

/// Renders the context as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormRenderer;

impl FormRenderer for JsonFormRenderer {
	fn render(&self, context: &RenderContext) -> ToolResult<Bytes> {
		serde_json::to_vec_pretty(context)
			.map(Bytes::from)
			.map_err(|e| ToolError::Render(e.to_string()))
	}

	fn content_type(&self) -> &str {
		"application/json"
	}
}
