//! Field-to-filter mapping, export forms and query composition
//!
//! This crate holds the request-independent half of the export tool:
//!
//! - [`schema`]: model metadata described by the host application
//! - [`registry`]: resolves field types to filter inputs, walking custom type ancestry
//! - [`form`]: builds and validates the export form of a model
//! - [`query`]: applies validated filters and ordering to a model's records
//!
//! ## Example
//!
//! ```
//! use reinhardt_export_core::{
//!     ExportFormBuilder, FieldDescriptor, FieldKind, FormData, InMemorySource, ModelMeta, Record,
//!     compose,
//! };
//!
//! let model = ModelMeta::new("inventory", "Item").field(FieldDescriptor::new("count", FieldKind::Integer));
//! let source = InMemorySource::new().with_records(
//!     "inventory.item",
//!     (1..=3).map(|i| Record::new(i).with("count", i)).collect(),
//! );
//!
//! let mut form = ExportFormBuilder::new(&model).build(&source).unwrap();
//! form.bind(FormData::new().with("count_0", "2").with("count_1", ""));
//!
//! let queryset = compose(&model, form.export_request().unwrap(), &source).unwrap();
//! assert_eq!(queryset.len(), 2);
//! ```

pub mod error;
pub mod field;
pub mod fields;
pub mod form;
pub mod query;
pub mod queryset;
pub mod registry;
pub mod schema;
pub mod settings;
pub mod source;
#[cfg(feature = "testing")]
pub mod testing;
pub mod value;

pub use error::{ExportError, Result};
pub use field::{FieldError, FieldResult, FilterInput, FilterValue, FormData, Widget};
pub use form::{
	ExportForm, ExportFormBuilder, ExportRequest, FIELDS_FIELD, FILTERS_DESCRIPTION, FORMAT_FIELD,
	Fieldset, ORDER_BY_FIELD, ORDER_DIRECTION_FIELD, OptionField,
};
pub use query::compose;
pub use queryset::{Lookup, LookupOp, QuerySet, SortDirection};
pub use registry::{FilterConstructor, FilterContext, FilterMapping, FilterRegistry};
pub use schema::{CustomFieldType, FieldDescriptor, FieldKind, FieldType, ModelMeta};
pub use settings::{ExportSettings, InputFormats};
pub use source::{Choice, InMemorySource, RecordSource};
pub use value::{Record, Value};
