//! Record serializers for the export tool
//!
//! A [`SerializerRegistry`] maps format names to [`RecordSerializer`]s. The
//! builtin set covers `json`, `xml`, `csv` and the native object form `rust`;
//! hosts register additional formats the same way.

pub mod csv;
pub mod error;
pub mod json;
pub mod native;
pub mod registry;
pub mod serializer;
pub mod xml;

pub use self::csv::CsvSerializer;
pub use error::{Result, SerializerError};
pub use json::JsonSerializer;
pub use native::NativeSerializer;
pub use registry::SerializerRegistry;
pub use serializer::{NativeObject, Payload, RecordSerializer, SerializeOptions};
pub use xml::XmlSerializer;
