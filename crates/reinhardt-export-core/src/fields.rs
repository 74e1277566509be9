//! Filter fields, one per input shape

pub mod boolean_field;
pub mod model_choice_field;
pub mod number_range_field;
pub mod temporal_range_field;
pub mod text_field;

pub use boolean_field::BooleanFilter;
pub use model_choice_field::{ModelChoiceFilter, ModelMultipleChoiceFilter};
pub use number_range_field::{NumberKind, NumberRangeFilter};
pub use temporal_range_field::{TemporalKind, TemporalRangeFilter};
pub use text_field::TextFilter;
