//! Native object serializer
//!
//! Produces in-memory [`NativeObject`]s instead of an encoded document.
//! Generated files hold their pretty debug representation, hence the `rs`
//! extension.

use crate::error::Result;
use crate::serializer::{NativeObject, Payload, RecordSerializer, SerializeOptions, selected_fields};
use reinhardt_export_core::{ModelMeta, Record};

#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSerializer;

impl RecordSerializer for NativeSerializer {
	fn format(&self) -> &str {
		"rust"
	}

	fn extension(&self) -> &str {
		"rs"
	}

	fn serialize(
		&self,
		model: &ModelMeta,
		records: &[Record],
		options: &SerializeOptions,
	) -> Result<Payload> {
		let label = model.label();
		let objects = records
			.iter()
			.map(|record| NativeObject {
				model: label.clone(),
				pk: record.pk.clone(),
				fields: selected_fields(record, options)
					.map(|(name, value)| (name.clone(), value.clone()))
					.collect(),
			})
			.collect();
		Ok(Payload::Native(objects))
	}
}
