//! Field definitions, the fields builder, and descriptor layout.

mod builder;
mod descriptor;
mod field;
pub(crate) mod validation;

pub use builder::FieldsBuilder;
pub use descriptor::Descriptor;
pub use field::{DisplayAlign, DisplayFormat, Field, LaidOutField};
