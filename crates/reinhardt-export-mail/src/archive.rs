//! Zip archives holding one exported file

use crate::{EmailError, EmailResult};
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Compress `content` into an archive with a single member named `member_name`
///
/// # Examples
///
/// ```
/// use reinhardt_export_mail::zip_single;
///
/// let archive = zip_single("data.json", b"[]").unwrap();
/// assert_eq!(&archive[..2], b"PK");
/// ```
pub fn zip_single(member_name: &str, content: &[u8]) -> EmailResult<Vec<u8>> {
	let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
	let options =
		SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
	writer
		.start_file(member_name, options)
		.map_err(|e| EmailError::AttachmentError(e.to_string()))?;
	writer.write_all(content)?;
	let cursor = writer
		.finish()
		.map_err(|e| EmailError::AttachmentError(e.to_string()))?;
	Ok(cursor.into_inner())
}
