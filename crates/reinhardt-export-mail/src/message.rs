//! Email messages and attachments

use crate::{EmailError, EmailResult};

/// A file attached to an email
///
/// # Examples
///
/// ```
/// use reinhardt_export_mail::Attachment;
///
/// let attachment = Attachment::new("export.csv.zip", b"PK".to_vec());
/// assert_eq!(attachment.mime_type(), "application/zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
	filename: String,
	content: Vec<u8>,
	mime_type: String,
}

impl Attachment {
	/// Create an attachment whose MIME type is guessed from the filename
	pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
		let filename = filename.into();
		let mime_type = mime_guess::from_path(&filename)
			.first_or_octet_stream()
			.to_string();
		Self {
			filename,
			content,
			mime_type,
		}
	}

	pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
		self.mime_type = mime_type.into();
		self
	}

	pub fn filename(&self) -> &str {
		&self.filename
	}

	pub fn content(&self) -> &[u8] {
		&self.content
	}

	pub fn mime_type(&self) -> &str {
		&self.mime_type
	}
}

/// A plain-text email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
	subject: String,
	body: String,
	from_email: String,
	to: Vec<String>,
	attachments: Vec<Attachment>,
}

impl EmailMessage {
	pub fn builder() -> EmailMessageBuilder {
		EmailMessageBuilder::default()
	}

	pub fn subject(&self) -> &str {
		&self.subject
	}

	pub fn body(&self) -> &str {
		&self.body
	}

	pub fn from_email(&self) -> &str {
		&self.from_email
	}

	pub fn to(&self) -> &[String] {
		&self.to
	}

	pub fn attachments(&self) -> &[Attachment] {
		&self.attachments
	}
}

#[derive(Debug, Default)]
pub struct EmailMessageBuilder {
	subject: String,
	body: String,
	from_email: String,
	to: Vec<String>,
	attachments: Vec<Attachment>,
}

impl EmailMessageBuilder {
	pub fn subject(mut self, subject: impl Into<String>) -> Self {
		self.subject = subject.into();
		self
	}

	pub fn body(mut self, body: impl Into<String>) -> Self {
		self.body = body.into();
		self
	}

	pub fn from(mut self, from: impl Into<String>) -> Self {
		self.from_email = from.into();
		self
	}

	pub fn to(mut self, to: Vec<String>) -> Self {
		self.to = to;
		self
	}

	pub fn attachment(mut self, attachment: Attachment) -> Self {
		self.attachments.push(attachment);
		self
	}

	/// Build the message, checking its addresses
	pub fn build(self) -> EmailResult<EmailMessage> {
		if self.to.is_empty() {
			return Err(EmailError::MissingField("to".to_string()));
		}
		for address in self.to.iter().chain(std::iter::once(&self.from_email)) {
			validate_address(address)?;
		}
		if self.subject.contains(['\r', '\n']) {
			return Err(EmailError::BackendError(
				"subject must not contain line breaks".to_string(),
			));
		}

		Ok(EmailMessage {
			subject: self.subject,
			body: self.body,
			from_email: self.from_email,
			to: self.to,
			attachments: self.attachments,
		})
	}
}

/// Parse `address` as a bare RFC 5321 mailbox address
fn validate_address(address: &str) -> EmailResult<()> {
	address
		.parse::<lettre::Address>()
		.map(|_| ())
		.map_err(|_| EmailError::InvalidAddress(address.to_string()))
}
