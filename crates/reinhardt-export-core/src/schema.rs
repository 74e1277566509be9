//! Model metadata consumed from the host schema
//!
//! The export tool never owns these definitions. The host application describes
//! each exportable model with a [`ModelMeta`], and every field with a
//! [`FieldDescriptor`] whose [`FieldType`] is either one of the builtin
//! [`FieldKind`]s or a custom type declaring its ancestry.

use serde::{Deserialize, Serialize};

/// Closed set of builtin model field kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
	Char,
	Text,
	Email,
	Url,
	Slug,
	FilePath,
	File,
	Image,
	IpAddress,
	GenericIpAddress,
	Boolean,
	NullBoolean,
	Integer,
	BigInteger,
	SmallInteger,
	PositiveInteger,
	PositiveSmallInteger,
	Float,
	Decimal,
	Date,
	DateTime,
	Time,
	ForeignKey,
	OneToOne,
	ManyToMany,
}

impl FieldKind {
	/// Every builtin field kind
	pub const ALL: [FieldKind; 25] = [
		FieldKind::Char,
		FieldKind::Text,
		FieldKind::Email,
		FieldKind::Url,
		FieldKind::Slug,
		FieldKind::FilePath,
		FieldKind::File,
		FieldKind::Image,
		FieldKind::IpAddress,
		FieldKind::GenericIpAddress,
		FieldKind::Boolean,
		FieldKind::NullBoolean,
		FieldKind::Integer,
		FieldKind::BigInteger,
		FieldKind::SmallInteger,
		FieldKind::PositiveInteger,
		FieldKind::PositiveSmallInteger,
		FieldKind::Float,
		FieldKind::Decimal,
		FieldKind::Date,
		FieldKind::DateTime,
		FieldKind::Time,
		FieldKind::ForeignKey,
		FieldKind::OneToOne,
		FieldKind::ManyToMany,
	];

	/// Host-facing type name, used by serializers that annotate field types
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_export_core::FieldKind;
	///
	/// assert_eq!(FieldKind::Char.type_name(), "CharField");
	/// assert_eq!(FieldKind::ManyToMany.type_name(), "ManyToManyField");
	/// ```
	pub fn type_name(&self) -> &'static str {
		match self {
			FieldKind::Char => "CharField",
			FieldKind::Text => "TextField",
			FieldKind::Email => "EmailField",
			FieldKind::Url => "URLField",
			FieldKind::Slug => "SlugField",
			FieldKind::FilePath => "FilePathField",
			FieldKind::File => "FileField",
			FieldKind::Image => "ImageField",
			FieldKind::IpAddress => "IPAddressField",
			FieldKind::GenericIpAddress => "GenericIPAddressField",
			FieldKind::Boolean => "BooleanField",
			FieldKind::NullBoolean => "NullBooleanField",
			FieldKind::Integer => "IntegerField",
			FieldKind::BigInteger => "BigIntegerField",
			FieldKind::SmallInteger => "SmallIntegerField",
			FieldKind::PositiveInteger => "PositiveIntegerField",
			FieldKind::PositiveSmallInteger => "PositiveSmallIntegerField",
			FieldKind::Float => "FloatField",
			FieldKind::Decimal => "DecimalField",
			FieldKind::Date => "DateField",
			FieldKind::DateTime => "DateTimeField",
			FieldKind::Time => "TimeField",
			FieldKind::ForeignKey => "ForeignKey",
			FieldKind::OneToOne => "OneToOneField",
			FieldKind::ManyToMany => "ManyToManyField",
		}
	}

	/// Whether this kind references other model instances
	pub fn is_relation(&self) -> bool {
		matches!(
			self,
			FieldKind::ForeignKey | FieldKind::OneToOne | FieldKind::ManyToMany
		)
	}
}

/// A host-defined field type outside the builtin set
///
/// The declared `parent` chain is walked by the filter registry until a type
/// with a known mapping is found.
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{CustomFieldType, FieldKind, FieldType};
///
/// let money = CustomFieldType::new("MoneyField").extends(FieldType::Builtin(FieldKind::Decimal));
/// let price = CustomFieldType::new("PriceField").extends(FieldType::Custom(money));
///
/// assert_eq!(price.name, "PriceField");
/// assert!(price.parent.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldType {
	pub name: String,
	pub parent: Option<Box<FieldType>>,
}

impl CustomFieldType {
	/// Create a custom type without ancestry
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			parent: None,
		}
	}

	/// Declare the type this custom type derives from
	pub fn extends(mut self, parent: FieldType) -> Self {
		self.parent = Some(Box::new(parent));
		self
	}
}

/// Declared type of a model field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
	Builtin(FieldKind),
	Custom(CustomFieldType),
}

impl FieldType {
	/// Name of the declared type, custom or builtin
	pub fn type_name(&self) -> &str {
		match self {
			FieldType::Builtin(kind) => kind.type_name(),
			FieldType::Custom(custom) => &custom.name,
		}
	}

	/// Iterate the type and its declared ancestors, nearest first
	pub fn ancestry(&self) -> impl Iterator<Item = &FieldType> {
		std::iter::successors(Some(self), |current| match *current {
			FieldType::Custom(custom) => custom.parent.as_deref(),
			FieldType::Builtin(_) => None,
		})
	}

	/// The first builtin kind found in the ancestry, if any
	pub fn builtin_kind(&self) -> Option<FieldKind> {
		self.ancestry().find_map(|ty| match ty {
			FieldType::Builtin(kind) => Some(*kind),
			FieldType::Custom(_) => None,
		})
	}
}

impl From<FieldKind> for FieldType {
	fn from(kind: FieldKind) -> Self {
		FieldType::Builtin(kind)
	}
}

impl From<CustomFieldType> for FieldType {
	fn from(custom: CustomFieldType) -> Self {
		FieldType::Custom(custom)
	}
}

/// Metadata describing one model field
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{FieldDescriptor, FieldKind};
///
/// let field = FieldDescriptor::new("date_joined", FieldKind::DateTime);
/// assert_eq!(field.label(), "date joined");
/// assert!(field.editable);
///
/// let groups = FieldDescriptor::new("groups", FieldKind::ManyToMany).related_to("auth.group");
/// assert_eq!(groups.related_model.as_deref(), Some("auth.group"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
	pub name: String,
	pub field_type: FieldType,
	pub verbose_name: Option<String>,
	pub editable: bool,
	/// Label of the model a relation field points to
	pub related_model: Option<String>,
}

impl FieldDescriptor {
	/// Create an editable field of the given type
	pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
		Self {
			name: name.into(),
			field_type: field_type.into(),
			verbose_name: None,
			editable: true,
			related_model: None,
		}
	}

	/// Set the human readable name
	pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
		self.verbose_name = Some(verbose_name.into());
		self
	}

	/// Mark the field as not editable; such fields are never exported or filtered
	pub fn non_editable(mut self) -> Self {
		self.editable = false;
		self
	}

	/// Set the related model label for relation fields
	pub fn related_to(mut self, model: impl Into<String>) -> Self {
		self.related_model = Some(model.into());
		self
	}

	/// Human label: the verbose name, or the field name with underscores as spaces
	pub fn label(&self) -> String {
		self.verbose_name
			.clone()
			.unwrap_or_else(|| self.name.replace('_', " "))
	}
}

/// Metadata describing an exportable model
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::{FieldDescriptor, FieldKind, ModelMeta};
///
/// let model = ModelMeta::new("auth", "User")
///     .field(FieldDescriptor::new("id", FieldKind::Integer).non_editable())
///     .field(FieldDescriptor::new("username", FieldKind::Char));
///
/// assert_eq!(model.label(), "auth.user");
/// assert_eq!(model.model_name(), "user");
/// assert_eq!(model.editable_fields().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMeta {
	pub app_label: String,
	pub object_name: String,
	pub fields: Vec<FieldDescriptor>,
}

impl ModelMeta {
	pub fn new(app_label: impl Into<String>, object_name: impl Into<String>) -> Self {
		Self {
			app_label: app_label.into(),
			object_name: object_name.into(),
			fields: Vec::new(),
		}
	}

	/// Append a field declaration
	pub fn field(mut self, field: FieldDescriptor) -> Self {
		self.fields.push(field);
		self
	}

	/// Lower-cased object name
	pub fn model_name(&self) -> String {
		self.object_name.to_lowercase()
	}

	/// `<app_label>.<model_name>`
	pub fn label(&self) -> String {
		format!("{}.{}", self.app_label, self.model_name())
	}

	/// Look up a declared field by name
	pub fn get_field(&self, name: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|f| f.name == name)
	}

	/// Persisted, editable fields in declaration order
	pub fn editable_fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
		self.fields.iter().filter(|f| f.editable)
	}
}

/// Upper-case the first character, leaving the rest untouched
///
/// # Examples
///
/// ```
/// use reinhardt_export_core::schema::capfirst;
///
/// assert_eq!(capfirst("date joined"), "Date joined");
/// assert_eq!(capfirst(""), "");
/// ```
pub fn capfirst(value: &str) -> String {
	let mut chars = value.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_ancestry_walks_nearest_first() {
		let base = CustomFieldType::new("Base").extends(FieldKind::Char.into());
		let derived = FieldType::Custom(CustomFieldType::new("Derived").extends(FieldType::Custom(base)));

		let names: Vec<&str> = derived.ancestry().map(|t| t.type_name()).collect();
		assert_eq!(names, vec!["Derived", "Base", "CharField"]);
		assert_eq!(derived.builtin_kind(), Some(FieldKind::Char));
	}

	#[rstest]
	fn test_orphan_custom_type_has_no_builtin_kind() {
		let orphan = FieldType::Custom(CustomFieldType::new("Orphan"));
		assert_eq!(orphan.builtin_kind(), None);
	}

	#[rstest]
	#[case("username", None, "username")]
	#[case("first_name", None, "first name")]
	#[case("is_staff", Some("staff status"), "staff status")]
	fn test_field_label(#[case] name: &str, #[case] verbose: Option<&str>, #[case] expected: &str) {
		let mut field = FieldDescriptor::new(name, FieldKind::Char);
		if let Some(verbose) = verbose {
			field = field.with_verbose_name(verbose);
		}
		assert_eq!(field.label(), expected);
	}

	#[rstest]
	fn test_relation_kinds() {
		let relations: Vec<_> = FieldKind::ALL.iter().filter(|k| k.is_relation()).collect();
		assert_eq!(relations.len(), 3);
	}
}
