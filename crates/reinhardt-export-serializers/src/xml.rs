//! XML serializer
//!
//! Each record becomes an `<object>` element holding one `<field>` per value.
//! Relation fields carry `rel` and `to` attributes; many-to-many values list
//! their keys as nested `<object pk=".."/>` elements.

use crate::error::{Result, SerializerError};
use crate::serializer::{Payload, RecordSerializer, SerializeOptions, selected_fields};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use reinhardt_export_core::{FieldKind, ModelMeta, Record, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSerializer;

fn xml_error(err: impl std::fmt::Display) -> SerializerError {
	SerializerError::Xml(err.to_string())
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
	writer.write_event(event).map_err(xml_error)
}

impl XmlSerializer {
	fn write_field(
		&self,
		writer: &mut Writer<Vec<u8>>,
		model: &ModelMeta,
		name: &str,
		value: &Value,
	) -> Result<()> {
		let descriptor = model.get_field(name);
		let kind = descriptor.and_then(|f| f.field_type.builtin_kind());
		let mut start = BytesStart::new("field");
		start.push_attribute(("name", name));
		match (kind, descriptor.and_then(|f| f.related_model.as_deref())) {
			(Some(FieldKind::ManyToMany), Some(to)) => {
				start.push_attribute(("rel", "ManyToManyRel"));
				start.push_attribute(("to", to));
			}
			(Some(FieldKind::ForeignKey | FieldKind::OneToOne), Some(to)) => {
				start.push_attribute(("rel", "ManyToOneRel"));
				start.push_attribute(("to", to));
			}
			_ => {
				if let Some(ty) = descriptor.map(|f| f.field_type.type_name()) {
					start.push_attribute(("type", ty));
				}
			}
		}

		write(writer, Event::Start(start))?;
		match value {
			Value::Null => write(writer, Event::Empty(BytesStart::new("None")))?,
			Value::List(items) => {
				for item in items {
					let pk = item.to_string();
					let mut object = BytesStart::new("object");
					object.push_attribute(("pk", pk.as_str()));
					write(writer, Event::Empty(object))?;
				}
			}
			other => {
				let text = other.to_string();
				write(writer, Event::Text(BytesText::new(&text)))?;
			}
		}
		write(writer, Event::End(BytesEnd::new("field")))
	}
}

impl RecordSerializer for XmlSerializer {
	fn format(&self) -> &str {
		"xml"
	}

	fn content_type(&self) -> Option<&str> {
		Some("application/xml")
	}

	fn serialize(
		&self,
		model: &ModelMeta,
		records: &[Record],
		options: &SerializeOptions,
	) -> Result<Payload> {
		let mut writer = match options.indent {
			Some(width) => Writer::new_with_indent(Vec::new(), b' ', width),
			None => Writer::new(Vec::new()),
		};
		let label = model.label();

		write(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
		let mut root = BytesStart::new("objects");
		root.push_attribute(("version", "1.0"));
		write(&mut writer, Event::Start(root))?;

		for record in records {
			let pk = record.pk.to_string();
			let mut object = BytesStart::new("object");
			object.push_attribute(("model", label.as_str()));
			object.push_attribute(("pk", pk.as_str()));
			write(&mut writer, Event::Start(object))?;
			for (name, value) in selected_fields(record, options) {
				self.write_field(&mut writer, model, name, value)?;
			}
			write(&mut writer, Event::End(BytesEnd::new("object")))?;
		}

		write(&mut writer, Event::End(BytesEnd::new("objects")))?;
		let text = String::from_utf8(writer.into_inner()).map_err(xml_error)?;
		Ok(Payload::Text(text))
	}
}
