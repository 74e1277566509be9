//! Email delivery of zipped exports
//!
//! - [`message`]: email messages and attachments
//! - [`backends`]: the [`EmailBackend`] trait with memory, console and SMTP backends
//! - [`archive`]: single-entry zip archives
//! - [`tasks`]: the optional [`TaskBackend`] collaborator for fire-and-forget jobs
//! - [`export`]: the export mail job itself
//!
//! ## Example
//!
//! ```
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use reinhardt_export_mail::{MailOptions, MemoryBackend, mail_export};
//!
//! let backend = MemoryBackend::new();
//! mail_export(&backend, &MailOptions::default(), "ops@example.com", "export-shop-product.json", b"[]").await?;
//!
//! let sent = backend.messages();
//! assert_eq!(sent[0].subject(), "Database Export");
//! assert_eq!(sent[0].attachments()[0].filename(), "export-shop-product.json.zip");
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod backends;
pub mod export;
pub mod message;
pub mod tasks;

use thiserror::Error;

pub use archive::zip_single;
pub use backends::{ConsoleBackend, EmailBackend, MemoryBackend};
#[cfg(feature = "smtp")]
pub use backends::{SmtpBackend, SmtpConfig, SmtpSecurity};
pub use export::{MailOptions, mail_export};
pub use message::{Attachment, EmailMessage, EmailMessageBuilder};
pub use tasks::{TaskBackend, TaskId, TokioTaskBackend};

#[derive(Debug, Error)]
pub enum EmailError {
	#[error("Invalid email address: {0}")]
	InvalidAddress(String),

	#[error("Missing required field: {0}")]
	MissingField(String),

	#[error("Backend error: {0}")]
	BackendError(String),

	#[error("SMTP error: {0}")]
	SmtpError(String),

	#[error("IO error: {0}")]
	IoError(#[from] std::io::Error),

	#[error("Attachment error: {0}")]
	AttachmentError(String),
}

pub type EmailResult<T> = std::result::Result<T, EmailError>;
