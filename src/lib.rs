//! # Reinhardt Export
//!
//! Admin object tool that filters a model's records, orders them, and exports
//! the result as a file download or a zipped email attachment.
//!
//! ## Crates
//!
//! - [`reinhardt_export_core`]: field-to-filter registry, export form, query composition
//! - [`reinhardt_export_serializers`]: `json`, `xml`, `csv` and native serializers
//! - [`reinhardt_export_mail`]: email backends, zip archives and task dispatch
//!
//! ## Example
//!
//! ```
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use bytes::Bytes;
//! use http::{Method, Request, header};
//! use reinhardt_export::{
//!     ExportTool, FieldDescriptor, FieldKind, InMemorySource, ModelMeta, Record, ToolSite,
//! };
//! use std::sync::Arc;
//!
//! let model = ModelMeta::new("shop", "Product").field(FieldDescriptor::new("name", FieldKind::Char));
//! let source = InMemorySource::new().with_records("shop.product", vec![Record::new(1).with("name", "Lamp")]);
//!
//! let mut site = ToolSite::new();
//! site.register(ExportTool::builder(model, Arc::new(source)).build());
//!
//! let request = Request::builder()
//!     .method(Method::POST)
//!     .uri("/object-tools/shop/product/export/")
//!     .body(Bytes::from_static(b"export_format=csv"))?;
//! let response = site.dispatch(request).await?;
//!
//! assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
//! assert_eq!(
//!     response.headers()[header::CONTENT_DISPOSITION],
//!     "attachment; filename=export-shop-product.csv"
//! );
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod render;
pub mod site;
pub mod tool;

pub use error::{ToolError, ToolResult};
pub use render::{FieldView, FieldsetView, FormRenderer, JsonFormRenderer, RenderContext};
pub use site::ToolSite;
pub use tool::{ExportResult, ExportTool, ExportToolBuilder, MAIL_FLAG, MailDispatch, Operator};

pub use reinhardt_export_core::{
	Choice, CustomFieldType, ExportError, ExportForm, ExportFormBuilder, ExportRequest,
	ExportSettings, FieldDescriptor, FieldKind, FieldType, FilterInput, FilterMapping,
	FilterRegistry, FilterValue, FormData, InMemorySource, InputFormats, ModelMeta, Record,
	RecordSource, SortDirection, Value,
};
pub use reinhardt_export_mail::{
	ConsoleBackend, EmailBackend, EmailError, MemoryBackend, TaskBackend, TaskId,
	TokioTaskBackend,
};
#[cfg(feature = "smtp")]
pub use reinhardt_export_mail::{SmtpBackend, SmtpConfig, SmtpSecurity};
pub use reinhardt_export_serializers::{
	Payload, RecordSerializer, SerializeOptions, SerializerError, SerializerRegistry,
};

pub use reinhardt_export_core as export_core;
pub use reinhardt_export_mail as mail;
pub use reinhardt_export_serializers as serializers;
