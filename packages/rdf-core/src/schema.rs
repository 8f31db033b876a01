//! JSON schema files describing a descriptor.
//!
//! ```json
//! {
//!   "name": "trade",
//!   "pack": true,
//!   "fields": [
//!     { "name": "sym", "type": "*key8*", "payload": 7, "width": 8, "align": "left" },
//!     { "name": "ts",  "type": "tstamp" },
//!     { "name": "qty", "type": "i32", "description": "quantity" }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{LayoutConfig, DEFAULT_DISPLAY_WIDTH, DEFAULT_TIME_FORMAT};
use crate::error::{RdfError, Result};
use crate::layout::{Descriptor, DisplayAlign, DisplayFormat, Field};
use crate::types::FieldType;

fn default_pack() -> bool {
    true
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

/// One field entry of a schema file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Catalog display name, e.g. `"i32"` or `"*key8*"`
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub payload: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<DisplayAlign>,
}

fn is_zero(n: &usize) -> bool {
    *n == 0
}

impl FieldSchema {
    fn to_field(&self) -> Result<Field> {
        let field_type = FieldType::from_name(&self.type_name)?;
        let field = Field::new(
            self.name.clone(),
            self.description.clone(),
            field_type,
            self.payload,
        )?;
        Ok(match (self.width, self.align) {
            (None, None) => field,
            (width, align) => field.with_format(DisplayFormat {
                width: width.unwrap_or(DEFAULT_DISPLAY_WIDTH),
                align: align.unwrap_or_default(),
            }),
        })
    }

    fn from_field(field: &Field) -> Self {
        let format = field.format();
        Self {
            name: field.name().to_string(),
            description: field.description().to_string(),
            type_name: field.field_type().name().to_string(),
            payload: field.payload(),
            width: format.map(|f| f.width),
            align: format.map(|f| f.align),
        }
    }
}

/// Serializable form of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    pub name: String,
    #[serde(default = "default_pack")]
    pub pack: bool,
    #[serde(default = "default_time_format")]
    pub time_format: String,
    #[serde(default = "default_time_format")]
    pub time_parse: String,
    pub fields: Vec<FieldSchema>,
    /// Expected [`Descriptor::fingerprint`]; checked on load when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<u32>,
}

impl SchemaFile {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RdfError::Schema(e.to_string()))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RdfError::Io(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loading schema file");
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| RdfError::Schema(e.to_string()))
    }

    /// Layout options carried by this file.
    pub fn config(&self) -> LayoutConfig {
        LayoutConfig::default()
            .with_pack(self.pack)
            .with_time_format(self.time_format.clone())
            .with_time_parse(self.time_parse.clone())
    }

    /// Builds the descriptor and checks the recorded fingerprint.
    ///
    /// # Errors
    /// `UnknownType` for a bad type name, any descriptor construction error,
    /// or `Schema` when the computed fingerprint differs from the recorded one.
    pub fn into_descriptor(self) -> Result<Descriptor> {
        let fields = self
            .fields
            .iter()
            .map(FieldSchema::to_field)
            .collect::<Result<Vec<_>>>()?;
        let descriptor = Descriptor::with_config(self.name.clone(), fields, &self.config())?;

        if let Some(expected) = self.fingerprint {
            let actual = descriptor.fingerprint();
            if actual != expected {
                tracing::warn!(
                    descriptor = %self.name,
                    expected = %format!("{:08x}", expected),
                    actual = %format!("{:08x}", actual),
                    "schema fingerprint mismatch"
                );
                return Err(RdfError::Schema(format!(
                    "fingerprint mismatch for '{}': file has {:08x}, layout is {:08x}",
                    self.name, expected, actual
                )));
            }
        }
        Ok(descriptor)
    }

    /// Exports `descriptor`, recording its fingerprint.
    pub fn from_descriptor(descriptor: &Descriptor) -> Self {
        Self {
            name: descriptor.name().to_string(),
            pack: descriptor.is_packed(),
            time_format: descriptor.time_format().to_string(),
            time_parse: descriptor.time_parse().to_string(),
            fields: descriptor
                .fields()
                .iter()
                .map(|f| FieldSchema::from_field(f.field()))
                .collect(),
            fingerprint: Some(descriptor.fingerprint()),
        }
    }
}
