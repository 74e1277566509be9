//! End-to-end requests against the export tool

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, Request, StatusCode, header};
use reinhardt_export::{
	EmailBackend, EmailError, ExportTool, FieldDescriptor, FieldKind, FormData, InMemorySource,
	MailDispatch, MemoryBackend, ModelMeta, Operator, Record, TokioTaskBackend, ToolError, ToolSite,
};
use reinhardt_export::export_core::testing::LogCapture;
use reinhardt_export::mail::{EmailMessage, EmailResult};
use rstest::{fixture, rstest};
use std::io::{Cursor, Read};
use std::sync::Arc;

/// Rejects every message
struct FailingBackend;

#[async_trait]
impl EmailBackend for FailingBackend {
	async fn send_messages(&self, _messages: &[EmailMessage]) -> EmailResult<usize> {
		Err(EmailError::BackendError("relay refused".to_string()))
	}
}

#[fixture]
fn model() -> ModelMeta {
	ModelMeta::new("export", "MockDjangoObject")
		.field(FieldDescriptor::new("char", FieldKind::Char))
		.field(FieldDescriptor::new("number", FieldKind::Integer))
}

#[fixture]
fn source() -> Arc<InMemorySource> {
	let records = vec![
		Record::new(1).with("char", "alpha").with("number", 20),
		Record::new(2).with("char", "beta").with("number", 5),
		Record::new(3).with("char", "gamma").with("number", 12),
	];
	Arc::new(InMemorySource::new().with_records("export.mockdjangoobject", records))
}

#[fixture]
fn tool(model: ModelMeta, source: Arc<InMemorySource>) -> ExportTool {
	ExportTool::builder(model, source).build()
}

fn post(tool: &ExportTool, body: &str) -> Request<Bytes> {
	Request::builder()
		.method(Method::POST)
		.uri(tool.path())
		.body(Bytes::from(body.to_string()))
		.unwrap()
}

fn post_as(tool: &ExportTool, body: &str, email: &str) -> Request<Bytes> {
	let mut request = post(tool, body);
	request.extensions_mut().insert(Operator::new(email));
	request
}

fn pks(body: &[u8]) -> Vec<i64> {
	let json: serde_json::Value = serde_json::from_slice(body).unwrap();
	json.as_array()
		.unwrap()
		.iter()
		.map(|object| object["pk"].as_i64().unwrap())
		.collect()
}

#[rstest]
#[tokio::test]
async fn test_get_renders_form(tool: ExportTool) {
	// Arrange
	let request = Request::builder()
		.method(Method::GET)
		.uri(tool.path())
		.body(Bytes::new())
		.unwrap();

	// Act
	let response = tool.view(request).await.unwrap();

	// Assert
	assert_eq!(response.status(), StatusCode::OK);
	let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
	assert_eq!(json["title"], "Export");
	assert_eq!(json["model"], "export.mockdjangoobject");
	assert_eq!(json["fieldsets"][0]["fields"][0]["name"], "export_format");
	assert_eq!(json["fieldsets"][1]["title"], "Filters");
	assert_eq!(json["fieldsets"][1]["fields"][1]["name"], "number");
}

#[rstest]
#[case::json("json", "application/json", "export-export-mockdjangoobject.json")]
#[case::csv("csv", "text/csv", "export-export-mockdjangoobject.csv")]
#[case::xml("xml", "application/xml", "export-export-mockdjangoobject.xml")]
#[tokio::test]
async fn test_download_per_format(
	tool: ExportTool,
	#[case] format: &str,
	#[case] content_type: &str,
	#[case] filename: &str,
) {
	// Act
	let response = tool
		.view(post(&tool, &format!("export_format={}", format)))
		.await
		.unwrap();

	// Assert
	assert_eq!(response.status(), StatusCode::OK);
	assert_eq!(response.headers()[header::CONTENT_TYPE], content_type);
	assert_eq!(
		response.headers()[header::CONTENT_DISPOSITION],
		format!("attachment; filename={}", filename).as_str()
	);
	assert!(!response.body().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_empty_format_falls_back_to_json(tool: ExportTool) {
	let response = tool.view(post(&tool, "export_format=")).await.unwrap();

	assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
	assert_eq!(pks(response.body()), vec![1, 2, 3]);
}

#[rstest]
#[case::ascending("asc", vec![2, 3, 1])]
#[case::descending("dsc", vec![1, 3, 2])]
#[tokio::test]
async fn test_ordering(tool: ExportTool, #[case] direction: &str, #[case] expected: Vec<i64>) {
	// Act
	let body = format!(
		"export_format=json&export_order_by=number&export_order_direction={}",
		direction
	);
	let response = tool.view(post(&tool, &body)).await.unwrap();

	// Assert
	assert_eq!(pks(response.body()), expected);
}

#[rstest]
#[tokio::test]
async fn test_filters_and_field_subset(tool: ExportTool) {
	// Act
	let response = tool
		.view(post(
			&tool,
			"export_format=json&export_fields=char&number_0=10&number_1=",
		))
		.await
		.unwrap();

	// Assert
	let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
	let objects = json.as_array().unwrap();
	assert_eq!(objects.len(), 2);
	assert_eq!(objects[0]["fields"], serde_json::json!({ "char": "alpha" }));
	assert_eq!(objects[1]["fields"], serde_json::json!({ "char": "gamma" }));
}

#[rstest]
#[tokio::test]
async fn test_csv_download_contents(tool: ExportTool) {
	let response = tool
		.view(post(&tool, "export_format=csv&char=BET"))
		.await
		.unwrap();

	let text = String::from_utf8(response.body().to_vec()).unwrap();
	let lines: Vec<&str> = text.lines().collect();
	assert_eq!(lines.len(), 2);
	assert!(lines[0].starts_with("\"pk\",\"model\""));
	assert!(lines[1].contains("\"beta\""));
}

#[rstest]
#[tokio::test]
async fn test_invalid_submission_rerenders_form(tool: ExportTool) {
	// Act
	let response = tool
		.view(post(&tool, "export_format=yaml&number_0=many&number_1="))
		.await
		.unwrap();

	// Assert
	assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
	let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
	assert!(json.get("fieldsets").is_some());
	let format_field = &json["fieldsets"][0]["fields"][0];
	assert_eq!(format_field["values"][0], "yaml");
	assert!(!format_field["errors"].as_array().unwrap().is_empty());
	let number_field = &json["fieldsets"][1]["fields"][1];
	assert_eq!(number_field["errors"][0], "'many' is not a valid whole number.");
}

#[rstest]
#[tokio::test]
async fn test_mail_without_task_backend_sends_before_returning(
	model: ModelMeta,
	source: Arc<InMemorySource>,
) {
	// Arrange
	let outbox = MemoryBackend::new();
	let tool = ExportTool::builder(model, source)
		.email_backend(Arc::new(outbox.clone()))
		.build();

	// Act
	let response = tool
		.view(post_as(&tool, "export_format=csv&_export_mail=1", "ops@example.com"))
		.await
		.unwrap();

	// Assert
	let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
	assert_eq!(
		json["messages"][0],
		"The export has been generated and will be emailed to ops@example.com."
	);
	let messages = outbox.messages();
	assert_eq!(messages.len(), 1);
	assert_eq!(messages[0].to(), ["ops@example.com".to_string()]);
	assert_eq!(messages[0].subject(), "Database Export");

	let attachment = &messages[0].attachments()[0];
	assert_eq!(attachment.filename(), "export-export-mockdjangoobject.csv.zip");
	let mut archive = zip::ZipArchive::new(Cursor::new(attachment.content().to_vec())).unwrap();
	let mut member = archive.by_name("export-export-mockdjangoobject.csv").unwrap();
	let mut content = String::new();
	member.read_to_string(&mut content).unwrap();
	assert_eq!(content.lines().count(), 4);
}

#[rstest]
#[tokio::test]
async fn test_mail_with_task_backend_is_queued(model: ModelMeta, source: Arc<InMemorySource>) {
	// Arrange
	let outbox = MemoryBackend::new();
	let tasks = Arc::new(TokioTaskBackend::try_current().unwrap());
	let tool = ExportTool::builder(model, source)
		.email_backend(Arc::new(outbox.clone()))
		.task_backend(tasks.clone())
		.build();

	// Act
	let response = tool
		.view(post_as(&tool, "export_format=xml&_export_mail=1", "ops@example.com"))
		.await
		.unwrap();

	// Assert
	assert_eq!(response.status(), StatusCode::OK);
	let json: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
	assert_eq!(
		json["messages"][0],
		"The export has been generated and will be emailed to ops@example.com."
	);
	assert!(outbox.messages().is_empty());

	tasks.join_all().await;
	let messages = outbox.messages();
	assert_eq!(messages.len(), 1);
	assert_eq!(
		messages[0].attachments()[0].filename(),
		"export-export-mockdjangoobject.xml.zip"
	);
}

#[rstest]
#[tokio::test]
async fn test_mail_response_reports_queued_task(model: ModelMeta, source: Arc<InMemorySource>) {
	// Arrange
	let outbox = MemoryBackend::new();
	let tasks = Arc::new(TokioTaskBackend::try_current().unwrap());
	let tool = ExportTool::builder(model, source)
		.email_backend(Arc::new(outbox.clone()))
		.task_backend(tasks.clone())
		.build();
	let mut form = tool.form().unwrap();
	form.bind(FormData::new().with("export_format", "csv"));
	let export_request = form.export_request().unwrap().clone();

	// Act
	let dispatch = tool
		.mail_response(&export_request, "ops@example.com")
		.await
		.unwrap();

	// Assert
	assert!(matches!(dispatch, MailDispatch::Queued(_)));
	assert!(outbox.messages().is_empty());
	tasks.join_all().await;
	assert_eq!(outbox.messages().len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_failed_background_mail_is_logged(model: ModelMeta, source: Arc<InMemorySource>) {
	// Arrange
	let logs = LogCapture::new();
	let _guard = logs.install();
	let tasks = Arc::new(TokioTaskBackend::try_current().unwrap());
	let tool = ExportTool::builder(model, source)
		.email_backend(Arc::new(FailingBackend))
		.task_backend(tasks.clone())
		.build();

	// Act
	let response = tool
		.view(post_as(&tool, "_export_mail=1", "ops@example.com"))
		.await
		.unwrap();
	tasks.join_all().await;

	// Assert
	assert_eq!(response.status(), StatusCode::OK);
	assert!(
		logs.contains(tracing::Level::ERROR, "export mail failed"),
		"captured: {:?}",
		logs.lines()
	);
}

#[rstest]
#[tokio::test]
async fn test_mail_requires_operator_email(tool: ExportTool) {
	let result = tool.view(post(&tool, "export_format=json&_export_mail=1")).await;

	assert!(matches!(result, Err(ToolError::Export(_))));
	assert!(result.unwrap_err().to_string().contains("_export_mail"));
}

#[rstest]
#[tokio::test]
async fn test_site_routes_registered_tools(tool: ExportTool) {
	// Arrange
	let mut site = ToolSite::new();
	site.register(tool);
	let other = ExportTool::builder(ModelMeta::new("shop", "Product"), Arc::new(InMemorySource::new())).build();
	site.register(other);

	// Act
	let found = site
		.dispatch(
			Request::builder()
				.method(Method::POST)
				.uri("/object-tools/export/mockdjangoobject/export?ignored=1")
				.body(Bytes::from_static(b"export_format=json"))
				.unwrap(),
		)
		.await
		.unwrap();
	let missing = site
		.dispatch(
			Request::builder()
				.uri("/object-tools/export/unknown/export/")
				.body(Bytes::new())
				.unwrap(),
		)
		.await
		.unwrap();

	// Assert
	assert_eq!(
		site.paths(),
		vec![
			"/object-tools/export/mockdjangoobject/export/",
			"/object-tools/shop/product/export/",
		]
	);
	assert_eq!(pks(found.body()), vec![1, 2, 3]);
	assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
