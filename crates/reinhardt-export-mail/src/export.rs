//! The export mail job

use crate::archive::zip_single;
use crate::backends::EmailBackend;
use crate::message::{Attachment, EmailMessage};
use crate::EmailResult;

/// Sender and wording of export emails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailOptions {
	pub from_email: String,
	pub subject: String,
	pub body: String,
}

impl Default for MailOptions {
	fn default() -> Self {
		Self {
			from_email: "webmaster@localhost".to_string(),
			subject: "Database Export".to_string(),
			body: "Database Export Attached".to_string(),
		}
	}
}

/// Zip `data` as `filename` and email it to `recipient` as `<filename>.zip`
pub async fn mail_export(
	backend: &dyn EmailBackend,
	options: &MailOptions,
	recipient: &str,
	filename: &str,
	data: &[u8],
) -> EmailResult<usize> {
	let archive = zip_single(filename, data)?;
	let message = EmailMessage::builder()
		.from(options.from_email.as_str())
		.to(vec![recipient.to_string()])
		.subject(options.subject.as_str())
		.body(options.body.as_str())
		.attachment(
			Attachment::new(format!("{}.zip", filename), archive).with_mime_type("application/zip"),
		)
		.build()?;

	let sent = backend.send_messages(&[message]).await?;
	tracing::info!(recipient, filename, "mailed export");
	Ok(sent)
}
