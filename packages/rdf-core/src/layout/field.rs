//! Field definitions before and after layout.

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_DISPLAY_WIDTH;
use crate::error::{RdfError, Result};
use crate::types::FieldType;

/// Column alignment used when rendering a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayAlign {
    Left,
    #[default]
    Right,
}

/// Display hint for rendering a field in headers and record dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayFormat {
    pub width: usize,
    #[serde(default)]
    pub align: DisplayAlign,
}

impl Default for DisplayFormat {
    fn default() -> Self {
        Self {
            width: DEFAULT_DISPLAY_WIDTH,
            align: DisplayAlign::Right,
        }
    }
}

impl DisplayFormat {
    pub fn right(width: usize) -> Self {
        Self {
            width,
            align: DisplayAlign::Right,
        }
    }

    pub fn left(width: usize) -> Self {
        Self {
            width,
            align: DisplayAlign::Left,
        }
    }

    /// Pads `text` into this column.
    pub fn apply(&self, text: &str) -> String {
        match self.align {
            DisplayAlign::Left => format!("{:<width$}", text, width = self.width),
            DisplayAlign::Right => format!("{:>width$}", text, width = self.width),
        }
    }
}

/// A named, typed schema element that has not been laid out yet.
///
/// A `Field` has no offset. Only a [`Descriptor`](super::Descriptor) can turn
/// it into a [`LaidOutField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    description: String,
    field_type: FieldType,
    payload: usize,
    format: Option<DisplayFormat>,
}

impl Field {
    /// Creates a field.
    ///
    /// `payload` is the maximum number of content bytes reserved after the
    /// length prefix. It must be non-zero for string-like types and zero for
    /// everything else.
    ///
    /// # Errors
    /// `EmptyFieldName`, `MissingPayload` or `UnexpectedPayload`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        field_type: FieldType,
        payload: usize,
    ) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(RdfError::EmptyFieldName);
        }
        if field_type.is_string_like() && payload == 0 {
            return Err(RdfError::MissingPayload {
                field: name,
                type_name: field_type.name(),
            });
        }
        if !field_type.is_string_like() && payload != 0 {
            return Err(RdfError::UnexpectedPayload {
                field: name,
                type_name: field_type.name(),
                payload,
            });
        }
        Ok(Self {
            name,
            description: description.into(),
            field_type,
            payload,
            format: None,
        })
    }

    /// Sets the display hint.
    pub fn with_format(mut self, format: DisplayFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Maximum content bytes for string-like fields, 0 otherwise.
    pub fn payload(&self) -> usize {
        self.payload
    }

    /// Intrinsic type size (the length prefix for strings).
    pub fn type_size(&self) -> usize {
        self.field_type.size()
    }

    /// Bytes this field occupies in a record.
    pub fn size(&self) -> usize {
        self.type_size() + self.payload
    }

    pub fn align(&self) -> usize {
        self.field_type.align()
    }

    /// Explicit display hint, if any.
    pub fn format(&self) -> Option<DisplayFormat> {
        self.format
    }
}

/// A field with its final offset and logical index, owned by a descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaidOutField {
    field: Field,
    offset: usize,
    index: usize,
}

impl LaidOutField {
    pub(crate) fn new(field: Field, offset: usize, index: usize) -> Self {
        Self {
            field,
            offset,
            index,
        }
    }

    /// The schema definition this field was laid out from.
    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn name(&self) -> &str {
        self.field.name()
    }

    pub fn description(&self) -> &str {
        self.field.description()
    }

    pub fn field_type(&self) -> FieldType {
        self.field.field_type()
    }

    pub fn payload(&self) -> usize {
        self.field.payload()
    }

    pub fn size(&self) -> usize {
        self.field.size()
    }

    pub fn align(&self) -> usize {
        self.field.align()
    }

    /// Byte offset within the record.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Position in the caller-supplied field list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the end offset of this field (offset + size).
    pub fn end_offset(&self) -> usize {
        self.offset + self.size()
    }

    pub fn format(&self) -> Option<DisplayFormat> {
        self.field.format()
    }
}
