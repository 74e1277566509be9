//! Email backends

use crate::EmailResult;
use crate::message::EmailMessage;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Delivers email messages
#[async_trait]
pub trait EmailBackend: Send + Sync {
	/// Send `messages`, returning how many were delivered
	async fn send_messages(&self, messages: &[EmailMessage]) -> EmailResult<usize>;
}

/// Keeps sent messages in memory, for tests
///
/// Clones share the same outbox.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
	outbox: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MemoryBackend {
	pub fn new() -> Self {
		Self::default()
	}

	/// Messages sent so far
	pub fn messages(&self) -> Vec<EmailMessage> {
		self.outbox.lock().map(|m| m.clone()).unwrap_or_default()
	}

	pub fn count(&self) -> usize {
		self.outbox.lock().map(|m| m.len()).unwrap_or_default()
	}

	pub fn clear(&self) {
		if let Ok(mut outbox) = self.outbox.lock() {
			outbox.clear();
		}
	}
}

#[async_trait]
impl EmailBackend for MemoryBackend {
	async fn send_messages(&self, messages: &[EmailMessage]) -> EmailResult<usize> {
		let mut outbox = self
			.outbox
			.lock()
			.map_err(|e| crate::EmailError::BackendError(e.to_string()))?;
		outbox.extend_from_slice(messages);
		Ok(messages.len())
	}
}

/// Writes messages to stdout, for development
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleBackend;

#[async_trait]
impl EmailBackend for ConsoleBackend {
	async fn send_messages(&self, messages: &[EmailMessage]) -> EmailResult<usize> {
		for message in messages {
			println!("From: {}", message.from_email());
			println!("To: {}", message.to().join(", "));
			println!("Subject: {}", message.subject());
			println!();
			println!("{}", message.body());
			for attachment in message.attachments() {
				println!(
					"[attachment: {} ({}, {} bytes)]",
					attachment.filename(),
					attachment.mime_type(),
					attachment.content().len()
				);
			}
			println!("{}", "-".repeat(79));
		}
		Ok(messages.len())
	}
}

#[cfg(feature = "smtp")]
mod smtp {
	use super::EmailBackend;
	use crate::message::EmailMessage;
	use crate::{EmailError, EmailResult};
	use async_trait::async_trait;
	use lettre::message::header::ContentType;
	use lettre::message::{Attachment as LettreAttachment, Mailbox, MultiPart, SinglePart};
	use lettre::transport::smtp::authentication::Credentials;
	use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
	use std::time::Duration;

	/// Transport security of an SMTP connection
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
	pub enum SmtpSecurity {
		None,
		#[default]
		StartTls,
		Tls,
	}

	#[derive(Debug, Clone)]
	pub struct SmtpConfig {
		pub host: String,
		pub port: u16,
		pub username: Option<String>,
		pub password: Option<String>,
		pub security: SmtpSecurity,
		pub timeout: Option<Duration>,
	}

	impl SmtpConfig {
		pub fn new(host: impl Into<String>, port: u16) -> Self {
			Self {
				host: host.into(),
				port,
				username: None,
				password: None,
				security: SmtpSecurity::default(),
				timeout: None,
			}
		}

		pub fn with_credentials(mut self, username: String, password: String) -> Self {
			self.username = Some(username);
			self.password = Some(password);
			self
		}

		pub fn with_security(mut self, security: SmtpSecurity) -> Self {
			self.security = security;
			self
		}

		pub fn with_timeout(mut self, timeout: Duration) -> Self {
			self.timeout = Some(timeout);
			self
		}
	}

	/// Sends messages through an SMTP relay
	pub struct SmtpBackend {
		transport: AsyncSmtpTransport<Tokio1Executor>,
	}

	impl SmtpBackend {
		/// Build the transport; the connection itself is opened lazily
		pub fn new(config: SmtpConfig) -> EmailResult<Self> {
			let host = config.host.as_str();
			let mut builder = match config.security {
				SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
					.map_err(|e| EmailError::SmtpError(e.to_string()))?,
				SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
					.map_err(|e| EmailError::SmtpError(e.to_string()))?,
				SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
			}
			.port(config.port)
			.timeout(config.timeout);

			if let (Some(user), Some(pass)) = (config.username, config.password) {
				builder = builder.credentials(Credentials::new(user, pass));
			}

			Ok(Self {
				transport: builder.build(),
			})
		}

		fn to_lettre(message: &EmailMessage) -> EmailResult<Message> {
			let mut builder = Message::builder()
				.from(
					message
						.from_email()
						.parse()
						.map_err(|_| EmailError::InvalidAddress(message.from_email().to_string()))?,
				)
				.subject(message.subject());
			for to in message.to() {
				let mailbox: Mailbox = to
					.parse()
					.map_err(|_| EmailError::InvalidAddress(to.clone()))?;
				builder = builder.to(mailbox);
			}

			let mut body = MultiPart::mixed().singlepart(SinglePart::plain(message.body().to_string()));
			for attachment in message.attachments() {
				let content_type = ContentType::parse(attachment.mime_type())
					.map_err(|e| EmailError::AttachmentError(e.to_string()))?;
				body = body.singlepart(
					LettreAttachment::new(attachment.filename().to_string())
						.body(attachment.content().to_vec(), content_type),
				);
			}

			builder
				.multipart(body)
				.map_err(|e| EmailError::BackendError(e.to_string()))
		}
	}

	#[async_trait]
	impl EmailBackend for SmtpBackend {
		async fn send_messages(&self, messages: &[EmailMessage]) -> EmailResult<usize> {
			let mut sent = 0;
			for message in messages {
				let email = Self::to_lettre(message)?;
				self.transport
					.send(email)
					.await
					.map_err(|e| EmailError::SmtpError(e.to_string()))?;
				sent += 1;
			}
			Ok(sent)
		}
	}

}

#[cfg(feature = "smtp")]
pub use smtp::{SmtpBackend, SmtpConfig, SmtpSecurity};
