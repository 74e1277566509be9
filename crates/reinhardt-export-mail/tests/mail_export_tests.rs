//! Export mails through the memory backend

use reinhardt_export_mail::{
	EmailError, MailOptions, MemoryBackend, TaskBackend, TokioTaskBackend, mail_export,
};
use rstest::{fixture, rstest};
use std::io::{Cursor, Read};

#[fixture]
fn backend() -> MemoryBackend {
	MemoryBackend::new()
}

#[rstest]
#[tokio::test]
async fn test_export_is_zipped_and_attached(backend: MemoryBackend) {
	// Act
	let sent = mail_export(
		&backend,
		&MailOptions::default(),
		"ops@example.com",
		"export-shop-product.csv",
		b"\"pk\",\"model\"\n",
	)
	.await
	.unwrap();

	// Assert
	assert_eq!(sent, 1);
	let messages = backend.messages();
	let message = &messages[0];
	assert_eq!(message.subject(), "Database Export");
	assert_eq!(message.body(), "Database Export Attached");
	assert_eq!(message.from_email(), "webmaster@localhost");
	assert_eq!(message.to(), ["ops@example.com".to_string()]);

	let attachment = &message.attachments()[0];
	assert_eq!(attachment.filename(), "export-shop-product.csv.zip");
	assert_eq!(attachment.mime_type(), "application/zip");

	let mut archive = zip::ZipArchive::new(Cursor::new(attachment.content().to_vec())).unwrap();
	let mut member = archive.by_name("export-shop-product.csv").unwrap();
	let mut content = String::new();
	member.read_to_string(&mut content).unwrap();
	assert_eq!(content, "\"pk\",\"model\"\n");
}

#[rstest]
#[tokio::test]
async fn test_invalid_recipient_sends_nothing(backend: MemoryBackend) {
	let result = mail_export(&backend, &MailOptions::default(), "nobody", "x.json", b"[]").await;

	assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
	assert_eq!(backend.count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_mail_job_runs_on_task_backend(backend: MemoryBackend) {
	// Arrange
	let tasks = TokioTaskBackend::try_current().unwrap();
	let outbox = backend.clone();

	// Act
	tasks.submit(
		"mail_export",
		Box::pin(async move {
			mail_export(&outbox, &MailOptions::default(), "ops@example.com", "a.xml", b"<objects/>")
				.await
				.unwrap();
		}),
	);
	tasks.join_all().await;

	// Assert
	assert_eq!(backend.count(), 1);
}
