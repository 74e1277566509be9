//! The export object tool
//!
//! An [`ExportTool`] is bound to one model. `GET` renders the export form;
//! `POST` validates it and either returns the export as a file download or,
//! when the `_export_mail` flag is submitted, emails it zipped to the
//! requesting operator.

use crate::error::ToolResult;
use crate::render::{FormRenderer, JsonFormRenderer, RenderContext};
use bytes::Bytes;
use http::{Method, Request, Response, StatusCode, header};
use reinhardt_export_core::{
	ExportError, ExportForm, ExportFormBuilder, ExportRequest, ExportSettings, FilterRegistry,
	FormData, ModelMeta, RecordSource, compose,
};
use reinhardt_export_mail::{
	ConsoleBackend, EmailBackend, MailOptions, TaskBackend, TaskId, mail_export,
};
use reinhardt_export_serializers::{Payload, SerializeOptions, SerializerRegistry};
use std::sync::Arc;

/// Form key distinguishing "email me" from "download now"
pub const MAIL_FLAG: &str = "_export_mail";

/// The operator making the request, stored in the request extensions by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
	pub email: Option<String>,
}

impl Operator {
	pub fn new(email: impl Into<String>) -> Self {
		Self {
			email: Some(email.into()),
		}
	}
}

/// A serialized export ready for delivery
#[derive(Debug, Clone, PartialEq)]
pub struct ExportResult {
	pub format: String,
	pub filename: String,
	pub payload: Payload,
}

/// How an emailed export left the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailDispatch {
	/// Handed to the task backend; delivery happens later
	Queued(TaskId),
	/// Sent before returning, with the number of delivered messages
	Sent(usize),
}

/// Export tool for one model
///
/// Cloning is cheap; clones share their collaborators.
#[derive(Clone)]
pub struct ExportTool {
	model: ModelMeta,
	label: String,
	help_text: String,
	settings: Arc<ExportSettings>,
	source: Arc<dyn RecordSource>,
	serializers: Arc<SerializerRegistry>,
	filters: Arc<FilterRegistry>,
	filter_fields: Option<Vec<String>>,
	mailer: Arc<dyn EmailBackend>,
	tasks: Option<Arc<dyn TaskBackend>>,
	renderer: Arc<dyn FormRenderer>,
}

/// Builder for [`ExportTool`]
pub struct ExportToolBuilder {
	tool: ExportTool,
}

impl ExportToolBuilder {
	pub fn settings(mut self, settings: ExportSettings) -> Self {
		self.tool.settings = Arc::new(settings);
		self
	}

	pub fn serializers(mut self, serializers: SerializerRegistry) -> Self {
		self.tool.serializers = Arc::new(serializers);
		self
	}

	pub fn filter_registry(mut self, registry: FilterRegistry) -> Self {
		self.tool.filters = Arc::new(registry);
		self
	}

	/// Only offer filters for the named fields
	pub fn filter_fields<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.tool.filter_fields = Some(names.into_iter().map(Into::into).collect());
		self
	}

	pub fn email_backend(mut self, backend: Arc<dyn EmailBackend>) -> Self {
		self.tool.mailer = backend;
		self
	}

	/// Run emailed exports in the background on `backend`
	pub fn task_backend(mut self, backend: Arc<dyn TaskBackend>) -> Self {
		self.tool.tasks = Some(backend);
		self
	}

	pub fn renderer(mut self, renderer: Arc<dyn FormRenderer>) -> Self {
		self.tool.renderer = renderer;
		self
	}

	pub fn build(self) -> ExportTool {
		self.tool
	}
}

impl ExportTool {
	/// Start building a tool for `model` reading from `source`
	///
	/// Defaults: builtin serializers and filters, default settings, console
	/// mail backend, no task backend and the JSON renderer.
	pub fn builder(model: ModelMeta, source: Arc<dyn RecordSource>) -> ExportToolBuilder {
		ExportToolBuilder {
			tool: ExportTool {
				model,
				label: "Export".to_string(),
				help_text: "Export filtered objects for download.".to_string(),
				settings: Arc::new(ExportSettings::default()),
				source,
				serializers: Arc::new(SerializerRegistry::with_builtins()),
				filters: Arc::new(FilterRegistry::default()),
				filter_fields: None,
				mailer: Arc::new(ConsoleBackend),
				tasks: None,
				renderer: Arc::new(JsonFormRenderer),
			},
		}
	}

	/// Tool name, used as URL segment and filename prefix
	pub fn name(&self) -> &str {
		&self.settings.tool_name
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn model(&self) -> &ModelMeta {
		&self.model
	}

	/// Path the tool is served under
	pub fn path(&self) -> String {
		format!(
			"/object-tools/{}/{}/{}/",
			self.model.app_label,
			self.model.model_name(),
			self.name()
		)
	}

	/// `<tool>-<app_label>-<model_name>.<extension>`
	///
	/// The extension is the serializer's, falling back to the format name for
	/// unregistered formats.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_export::{ExportTool, InMemorySource, ModelMeta};
	/// use std::sync::Arc;
	///
	/// let tool = ExportTool::builder(ModelMeta::new("export", "MockDjangoObject"), Arc::new(InMemorySource::new())).build();
	/// assert_eq!(tool.gen_filename("json"), "export-export-mockdjangoobject.json");
	/// assert_eq!(tool.gen_filename("rust"), "export-export-mockdjangoobject.rs");
	/// ```
	pub fn gen_filename(&self, format: &str) -> String {
		let extension = self
			.serializers
			.get(format)
			.map(|s| s.extension().to_string())
			.unwrap_or_else(|_| format.to_string());
		format!(
			"{}-{}-{}.{}",
			self.name(),
			self.model.app_label,
			self.model.model_name(),
			extension
		)
	}

	/// Build the unbound export form
	pub fn form(&self) -> ToolResult<ExportForm> {
		let mut builder = ExportFormBuilder::new(&self.model)
			.formats(self.serializers.formats())
			.registry(&self.filters)
			.settings(&self.settings);
		if let Some(names) = &self.filter_fields {
			builder = builder.filter_fields(names.iter().cloned());
		}
		Ok(builder.build(self.source.as_ref())?)
	}

	/// Filter, order and serialize the records described by `request`
	pub fn get_data(&self, request: &ExportRequest) -> ToolResult<ExportResult> {
		let queryset = compose(&self.model, request, self.source.as_ref())?;
		let options = SerializeOptions {
			fields: request.fields.clone(),
			indent: Some(self.settings.indent),
		};
		let payload = self.serializers.serialize(
			&request.format,
			&self.model,
			queryset.records(),
			&options,
		)?;
		Ok(ExportResult {
			format: request.format.clone(),
			filename: self.gen_filename(&request.format),
			payload,
		})
	}

	/// File download of an export
	pub fn export_response(&self, result: &ExportResult) -> ToolResult<Response<Bytes>> {
		let declared = self
			.serializers
			.get(&result.format)
			.ok()
			.and_then(|serializer| serializer.content_type().map(str::to_string));
		let content_type = declared.unwrap_or_else(|| {
			mime_guess::from_path(&result.filename)
				.first_or_octet_stream()
				.to_string()
		});
		let response = Response::builder()
			.status(StatusCode::OK)
			.header(header::CONTENT_TYPE, content_type)
			.header(
				header::CONTENT_DISPOSITION,
				format!("attachment; filename={}", result.filename),
			)
			.body(Bytes::from(result.payload.to_bytes()))?;
		Ok(response)
	}

	/// Export `request` and email it to `recipient`
	pub async fn mail_export(&self, request: &ExportRequest, recipient: &str) -> ToolResult<usize> {
		let result = self.get_data(request)?;
		let options = MailOptions {
			from_email: self.settings.from_email.clone(),
			subject: self.settings.mail_subject.clone(),
			body: self.settings.mail_body.clone(),
		};
		let sent = mail_export(
			self.mailer.as_ref(),
			&options,
			recipient,
			&result.filename,
			&result.payload.to_bytes(),
		)
		.await?;
		Ok(sent)
	}

	/// Email the export, on the task backend when one is configured
	pub async fn mail_response(
		&self,
		request: &ExportRequest,
		recipient: &str,
	) -> ToolResult<MailDispatch> {
		let Some(tasks) = &self.tasks else {
			return Ok(MailDispatch::Sent(self.mail_export(request, recipient).await?));
		};

		let tool = self.clone();
		let request = request.clone();
		let recipient = recipient.to_string();
		let id = tasks.submit(
			"mail_export",
			Box::pin(async move {
				if let Err(e) = tool.mail_export(&request, &recipient).await {
					tracing::error!(error = %e, recipient = %recipient, "export mail failed");
				}
			}),
		);
		Ok(MailDispatch::Queued(id))
	}

	/// Handle a request to the tool's page
	pub async fn view(&self, request: Request<Bytes>) -> ToolResult<Response<Bytes>> {
		let mut form = self.form()?;
		match *request.method() {
			Method::GET | Method::HEAD => self.render(&form, Vec::new()),
			Method::POST => {
				let data = FormData::from_urlencoded(request.body())
					.map_err(|e| ExportError::invalid_input("__all__", e.to_string()))?;
				let wants_mail = data.contains_key(MAIL_FLAG);
				form.bind(data);
				if !form.is_valid() {
					return self.render(&form, Vec::new());
				}
				let export_request = form.export_request()?;

				if !wants_mail {
					let result = self.get_data(export_request)?;
					tracing::info!(
						model = %self.model.label(),
						format = %result.format,
						filename = %result.filename,
						"exported records for download"
					);
					return self.export_response(&result);
				}

				let recipient = request
					.extensions()
					.get::<Operator>()
					.and_then(|operator| operator.email.clone())
					.ok_or_else(|| {
						ExportError::invalid_input(MAIL_FLAG, "the requesting operator has no email address")
					})?;
				let dispatch = self.mail_response(export_request, &recipient).await?;
				tracing::info!(
					model = %self.model.label(),
					recipient = %recipient,
					dispatch = ?dispatch,
					"export queued for email"
				);
				let message = format!(
					"The export has been generated and will be emailed to {}.",
					recipient
				);
				self.render(&form, vec![message])
			}
			_ => Ok(Response::builder()
				.status(StatusCode::METHOD_NOT_ALLOWED)
				.header(header::ALLOW, "GET, POST")
				.body(Bytes::new())?),
		}
	}

	fn render(&self, form: &ExportForm, messages: Vec<String>) -> ToolResult<Response<Bytes>> {
		let context = RenderContext::from_form(&self.label, &self.help_text, form, messages);
		let body = self.renderer.render(&context)?;
		let response = Response::builder()
			.status(StatusCode::OK)
			.header(header::CONTENT_TYPE, self.renderer.content_type())
			.body(body)?;
		Ok(response)
	}
}

impl std::fmt::Debug for ExportTool {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ExportTool")
			.field("model", &self.model.label())
			.field("name", &self.name())
			.field("serializers", &self.serializers)
			.field("has_task_backend", &self.tasks.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_export_core::{FieldDescriptor, FieldKind, InMemorySource};
	use rstest::{fixture, rstest};

	#[fixture]
	fn tool() -> ExportTool {
		let model = ModelMeta::new("shop", "Product").field(FieldDescriptor::new("name", FieldKind::Char));
		ExportTool::builder(model, Arc::new(InMemorySource::new())).build()
	}

	#[rstest]
	fn test_path(tool: ExportTool) {
		assert_eq!(tool.path(), "/object-tools/shop/product/export/");
	}

	#[rstest]
	fn test_filename_uses_tool_name_from_settings() {
		let settings = ExportSettings {
			tool_name: "dump".to_string(),
			..ExportSettings::default()
		};
		let tool = ExportTool::builder(ModelMeta::new("shop", "Product"), Arc::new(InMemorySource::new()))
			.settings(settings)
			.build();
		assert_eq!(tool.gen_filename("csv"), "dump-shop-product.csv");
		assert_eq!(tool.gen_filename("yaml"), "dump-shop-product.yaml");
	}

	#[rstest]
	#[tokio::test]
	async fn test_unsupported_method(tool: ExportTool) {
		let request = Request::builder()
			.method(Method::DELETE)
			.uri(tool.path())
			.body(Bytes::new())
			.unwrap();
		let response = tool.view(request).await.unwrap();
		assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
	}
}
