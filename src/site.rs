//! Explicit registration of object tools
//!
//! Hosts build an [`ExportTool`] per model and register it on a [`ToolSite`],
//! which routes `/object-tools/<app_label>/<model_name>/<tool>/` to it.

use crate::error::ToolResult;
use crate::tool::ExportTool;
use bytes::Bytes;
use http::{Request, Response, StatusCode};
use indexmap::IndexMap;

/// Registry of object tools, keyed by path
///
/// # Examples
///
/// ```
/// use reinhardt_export::{ExportTool, InMemorySource, ModelMeta, ToolSite};
/// use std::sync::Arc;
///
/// let mut site = ToolSite::new();
/// site.register(ExportTool::builder(ModelMeta::new("shop", "Product"), Arc::new(InMemorySource::new())).build());
///
/// assert!(site.get("/object-tools/shop/product/export/").is_some());
/// assert_eq!(site.paths(), vec!["/object-tools/shop/product/export/"]);
/// ```
#[derive(Debug, Default)]
pub struct ToolSite {
	tools: IndexMap<String, ExportTool>,
}

impl ToolSite {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `tool` under its path, replacing a tool already registered there
	pub fn register(&mut self, tool: ExportTool) -> &mut Self {
		let path = tool.path();
		tracing::debug!(path = %path, model = %tool.model().label(), "registered object tool");
		self.tools.insert(path, tool);
		self
	}

	pub fn get(&self, path: &str) -> Option<&ExportTool> {
		self.tools.get(path)
	}

	/// Registered paths, in registration order
	pub fn paths(&self) -> Vec<&str> {
		self.tools.keys().map(String::as_str).collect()
	}

	/// Route `request` to the tool registered under its path
	///
	/// A path without a trailing slash matches the same tool; unknown paths get
	/// a 404 response.
	pub async fn dispatch(&self, request: Request<Bytes>) -> ToolResult<Response<Bytes>> {
		let path = request.uri().path();
		let tool = self
			.tools
			.get(path)
			.or_else(|| self.tools.get(&format!("{}/", path)));
		match tool {
			Some(tool) => tool.view(request).await,
			None => Ok(Response::builder()
				.status(StatusCode::NOT_FOUND)
				.body(Bytes::new())?),
		}
	}
}
