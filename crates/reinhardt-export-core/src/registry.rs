//! Field-to-filter registry
//!
//! Every builtin [`FieldKind`] maps to a filter through an exhaustive match, so a
//! new kind cannot be added without a mapping. Custom field types resolve through
//! filters registered under their name or, failing that, through their declared
//! ancestry; the first ancestor with a mapping wins.

use crate::error::{ExportError, Result};
use crate::field::FilterInput;
use crate::fields::{
	BooleanFilter, ModelChoiceFilter, ModelMultipleChoiceFilter, NumberKind, NumberRangeFilter,
	TemporalKind, TemporalRangeFilter, TextFilter,
};
use crate::schema::{FieldDescriptor, FieldKind, FieldType};
use crate::settings::InputFormats;
use crate::source::RecordSource;
use std::collections::HashMap;
use std::sync::Arc;

/// Filter shape a field type resolves to
#[derive(Clone)]
pub enum FilterMapping {
	Text,
	Boolean,
	NumberRange(NumberKind),
	TemporalRange(TemporalKind),
	ModelChoice,
	ModelMultipleChoice,
	/// Host-provided constructor for a custom field type
	Custom(FilterConstructor),
}

impl std::fmt::Debug for FilterMapping {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			FilterMapping::Text => write!(f, "Text"),
			FilterMapping::Boolean => write!(f, "Boolean"),
			FilterMapping::NumberRange(kind) => write!(f, "NumberRange({:?})", kind),
			FilterMapping::TemporalRange(kind) => write!(f, "TemporalRange({:?})", kind),
			FilterMapping::ModelChoice => write!(f, "ModelChoice"),
			FilterMapping::ModelMultipleChoice => write!(f, "ModelMultipleChoice"),
			FilterMapping::Custom(_) => write!(f, "Custom(..)"),
		}
	}
}

/// Builds the filter of a custom field type
pub type FilterConstructor =
	Arc<dyn Fn(&FieldDescriptor, &FilterContext<'_>) -> Result<Box<dyn FilterInput>> + Send + Sync>;

/// Collaborators available while filters are constructed
pub struct FilterContext<'a> {
	pub input_formats: &'a InputFormats,
	pub source: &'a dyn RecordSource,
}

impl FilterMapping {
	/// Mapping of a builtin field kind
	pub fn for_kind(kind: FieldKind) -> Self {
		match kind {
			FieldKind::Char
			| FieldKind::Text
			| FieldKind::Email
			| FieldKind::Url
			| FieldKind::Slug
			| FieldKind::FilePath
			| FieldKind::File
			| FieldKind::Image
			| FieldKind::IpAddress
			| FieldKind::GenericIpAddress => FilterMapping::Text,
			FieldKind::Boolean | FieldKind::NullBoolean => FilterMapping::Boolean,
			FieldKind::Integer
			| FieldKind::BigInteger
			| FieldKind::SmallInteger
			| FieldKind::PositiveInteger
			| FieldKind::PositiveSmallInteger => FilterMapping::NumberRange(NumberKind::Integer),
			FieldKind::Float => FilterMapping::NumberRange(NumberKind::Float),
			FieldKind::Decimal => FilterMapping::NumberRange(NumberKind::Decimal),
			FieldKind::Date => FilterMapping::TemporalRange(TemporalKind::Date),
			FieldKind::DateTime => FilterMapping::TemporalRange(TemporalKind::DateTime),
			FieldKind::Time => FilterMapping::TemporalRange(TemporalKind::Time),
			FieldKind::ForeignKey | FieldKind::OneToOne => FilterMapping::ModelChoice,
			FieldKind::ManyToMany => FilterMapping::ModelMultipleChoice,
		}
	}

	/// Construct the filter for `field`
	///
	/// # Errors
	///
	/// Relation filters fail with [`ExportError::Configuration`] when the field
	/// declares no related model, and propagate source errors while loading
	/// their choices.
	pub fn build(
		&self,
		field: &FieldDescriptor,
		context: &FilterContext<'_>,
	) -> Result<Box<dyn FilterInput>> {
		let name = field.name.clone();
		let label = field.label();
		let filter: Box<dyn FilterInput> = match self {
			FilterMapping::Text => Box::new(TextFilter::new(name, label)),
			FilterMapping::Boolean => Box::new(BooleanFilter::new(name, label)),
			FilterMapping::NumberRange(kind) => Box::new(NumberRangeFilter::new(name, label, *kind)),
			FilterMapping::TemporalRange(kind) => Box::new(TemporalRangeFilter::new(
				name,
				label,
				*kind,
				context.input_formats.clone(),
			)),
			FilterMapping::ModelChoice => Box::new(ModelChoiceFilter::new(
				name,
				label,
				related_choices(field, context)?,
			)),
			FilterMapping::ModelMultipleChoice => Box::new(ModelMultipleChoiceFilter::new(
				name,
				label,
				related_choices(field, context)?,
			)),
			FilterMapping::Custom(constructor) => constructor(field, context)?,
		};
		Ok(filter)
	}
}

fn related_choices(
	field: &FieldDescriptor,
	context: &FilterContext<'_>,
) -> Result<Vec<crate::source::Choice>> {
	let related = field.related_model.as_deref().ok_or_else(|| {
		ExportError::Configuration(format!(
			"relation field '{}' does not declare a related model",
			field.name
		))
	})?;
	context.source.related_choices(related)
}

/// Resolves field types to filter mappings
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{CustomFieldType, FieldKind, FieldType, FilterMapping, FilterRegistry};
/// use reinhardt_export_core::fields::NumberKind;
///
/// let registry = FilterRegistry::new();
/// let money = FieldType::Custom(
///     CustomFieldType::new("MoneyField").extends(FieldType::Builtin(FieldKind::Decimal)),
/// );
///
/// assert!(matches!(
///     registry.resolve(&money).unwrap(),
///     FilterMapping::NumberRange(NumberKind::Decimal)
/// ));
/// assert!(registry.resolve(&FieldType::Custom(CustomFieldType::new("GeometryField"))).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
	custom: HashMap<String, FilterMapping>,
}

impl FilterRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Map a custom field type name to an existing filter shape
	pub fn register(&mut self, type_name: impl Into<String>, mapping: FilterMapping) -> &mut Self {
		self.custom.insert(type_name.into(), mapping);
		self
	}

	/// Map a custom field type name to a host-built filter
	pub fn register_with<F>(&mut self, type_name: impl Into<String>, constructor: F) -> &mut Self
	where
		F: Fn(&FieldDescriptor, &FilterContext<'_>) -> Result<Box<dyn FilterInput>>
			+ Send
			+ Sync
			+ 'static,
	{
		self.register(type_name, FilterMapping::Custom(Arc::new(constructor)))
	}

	/// Resolve `field_type`, walking its ancestry until a mapping is found
	///
	/// # Errors
	///
	/// Returns [`ExportError::Configuration`] when neither the type nor any
	/// ancestor has a mapping.
	pub fn resolve(&self, field_type: &FieldType) -> Result<FilterMapping> {
		field_type
			.ancestry()
			.find_map(|ty| match ty {
				FieldType::Builtin(kind) => Some(FilterMapping::for_kind(*kind)),
				FieldType::Custom(custom) => self.custom.get(&custom.name).cloned(),
			})
			.ok_or_else(|| {
				ExportError::Configuration(format!(
					"no export filter is mapped to field type '{}' or any of its ancestors",
					field_type.type_name()
				))
			})
	}

	/// Resolve and construct the filter for `field`
	pub fn build(
		&self,
		field: &FieldDescriptor,
		context: &FilterContext<'_>,
	) -> Result<Box<dyn FilterInput>> {
		self.resolve(&field.field_type)?.build(field, context)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::schema::CustomFieldType;
	use crate::source::{Choice, InMemorySource};
	use rstest::rstest;

	#[rstest]
	fn test_every_builtin_kind_resolves() {
		let registry = FilterRegistry::new();
		for kind in FieldKind::ALL {
			assert!(registry.resolve(&FieldType::Builtin(kind)).is_ok(), "{:?}", kind);
		}
	}

	#[rstest]
	#[case(FieldKind::Email, "Text")]
	#[case(FieldKind::NullBoolean, "Boolean")]
	#[case(FieldKind::PositiveSmallInteger, "NumberRange(Integer)")]
	#[case(FieldKind::DateTime, "TemporalRange(DateTime)")]
	#[case(FieldKind::OneToOne, "ModelChoice")]
	#[case(FieldKind::ManyToMany, "ModelMultipleChoice")]
	fn test_builtin_mapping(#[case] kind: FieldKind, #[case] expected: &str) {
		assert_eq!(format!("{:?}", FilterMapping::for_kind(kind)), expected);
	}

	#[rstest]
	fn test_registered_name_wins_over_ancestry() {
		let mut registry = FilterRegistry::new();
		registry.register("TagsField", FilterMapping::Text);
		let tags = FieldType::Custom(
			CustomFieldType::new("TagsField").extends(FieldType::Builtin(FieldKind::ManyToMany)),
		);
		assert!(matches!(registry.resolve(&tags).unwrap(), FilterMapping::Text));
	}

	#[rstest]
	fn test_first_mapped_ancestor_wins() {
		let mut registry = FilterRegistry::new();
		registry.register("MoneyField", FilterMapping::NumberRange(NumberKind::Float));
		let money = CustomFieldType::new("MoneyField").extends(FieldType::Builtin(FieldKind::Decimal));
		let price = FieldType::Custom(CustomFieldType::new("PriceField").extends(FieldType::Custom(money)));
		assert!(matches!(
			registry.resolve(&price).unwrap(),
			FilterMapping::NumberRange(NumberKind::Float)
		));
	}

	#[rstest]
	fn test_orphan_custom_type_is_configuration_error() {
		let registry = FilterRegistry::new();
		let err = registry
			.resolve(&FieldType::Custom(CustomFieldType::new("GeometryField")))
			.unwrap_err();
		assert!(matches!(err, ExportError::Configuration(ref m) if m.contains("GeometryField")));
	}

	#[rstest]
	fn test_relation_without_related_model_is_configuration_error() {
		let source = InMemorySource::new();
		let formats = InputFormats::default();
		let context = FilterContext {
			input_formats: &formats,
			source: &source,
		};
		let field = FieldDescriptor::new("owner", FieldKind::ForeignKey);
		let result = FilterRegistry::new().build(&field, &context);
		assert!(matches!(result, Err(ExportError::Configuration(_))));
	}

	#[rstest]
	fn test_custom_constructor_is_used() {
		let mut registry = FilterRegistry::new();
		registry.register_with("ColorField", |field, _| {
			Ok(Box::new(TextFilter::new(field.name.clone(), "colour")) as Box<dyn FilterInput>)
		});
		let source = InMemorySource::new().with_choices("x.y", vec![Choice::new(1, "one")]);
		let formats = InputFormats::default();
		let context = FilterContext {
			input_formats: &formats,
			source: &source,
		};
		let field = FieldDescriptor::new("color", CustomFieldType::new("ColorField"));
		let filter = registry.build(&field, &context).unwrap();
		assert_eq!(filter.label(), "colour");
	}
}
