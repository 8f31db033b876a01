//! Descriptor: computes and owns the binary layout of a record.
//!
//! Each descriptor has:
//! - Fields in the caller's logical order, each with a final offset
//! - A physical placement order (declaration order, or packed)
//! - Record size padded to the widest field alignment
//! - Name lookup, key/timestamp shortcuts, and timestamp formats

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;

use crate::config::LayoutConfig;
use crate::error::{RdfError, Result};
use crate::time::{self, Timestamp};
use crate::types::FieldType;

use super::field::{DisplayFormat, Field, LaidOutField};
use super::validation;

/// Immutable record schema with computed offsets.
#[derive(Debug, Clone)]
pub struct Descriptor {
    name: String,
    /// Fields in logical (declaration) order
    fields: Vec<LaidOutField>,
    by_name: HashMap<String, usize>,
    /// Logical indices sorted by offset
    physical: Vec<usize>,
    mem_size: usize,
    mem_align: usize,
    /// Packing was requested
    packed: bool,
    /// The packed placement won over declaration order
    packing_applied: bool,
    key_index: Option<usize>,
    timestamp_index: Option<usize>,
    time_parse: String,
    time_format: String,
    display_width: usize,
}

/// Offsets for one candidate placement.
struct Placement {
    order: Vec<usize>,
    offsets: Vec<usize>,
    mem_size: usize,
    mem_align: usize,
}

impl Descriptor {
    /// Lays out `fields` with default formats.
    ///
    /// # Arguments
    /// * `name` - Descriptor name
    /// * `fields` - Fields in logical order
    /// * `pack` - Place fields by descending alignment to reduce padding
    ///
    /// # Errors
    /// `EmptyDescriptor` for an empty list, `DuplicateField` when two fields
    /// share a name.
    pub fn new(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = Field>,
        pack: bool,
    ) -> Result<Self> {
        Self::with_config(name, fields, &LayoutConfig::default().with_pack(pack))
    }

    /// Lays out `fields` using the packing flag and formats from `config`.
    pub fn with_config(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = Field>,
        config: &LayoutConfig,
    ) -> Result<Self> {
        let name = name.into();
        let fields: Vec<Field> = fields.into_iter().collect();

        if fields.is_empty() {
            return Err(RdfError::EmptyDescriptor { descriptor: name });
        }

        let mut by_name = HashMap::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if by_name.insert(field.name().to_string(), index).is_some() {
                return Err(RdfError::DuplicateField {
                    descriptor: name,
                    field: field.name().to_string(),
                });
            }
        }

        let declared = place(&fields, (0..fields.len()).collect())?;
        let (placement, packing_applied) = if config.pack {
            let packed = place(&fields, packed_order(&fields))?;
            // Strings with odd payloads can make alignment-sorted placement
            // lose; never grow the record.
            if packed.mem_size <= declared.mem_size {
                (packed, true)
            } else {
                tracing::debug!(
                    descriptor = %name,
                    packed_size = packed.mem_size,
                    declared_size = declared.mem_size,
                    "packing would grow record, keeping declaration order"
                );
                (declared, false)
            }
        } else {
            (declared, false)
        };

        let Placement {
            order,
            offsets,
            mem_size,
            mem_align,
        } = placement;

        let fields: Vec<LaidOutField> = fields
            .into_iter()
            .zip(offsets)
            .enumerate()
            .map(|(index, (field, offset))| LaidOutField::new(field, offset, index))
            .collect();

        validation::validate_record_size(&fields, mem_size)?;
        validation::validate_field_layout(&fields)?;
        if mem_size % mem_align != 0 {
            return Err(RdfError::InvalidLayout(format!(
                "record size {} not a multiple of alignment {}",
                mem_size, mem_align
            )));
        }

        let key_index = fields.iter().position(|f| f.field_type().is_key());
        let timestamp_index = fields
            .iter()
            .position(|f| f.field_type() == FieldType::Timestamp);

        let descriptor = Self {
            name,
            fields,
            by_name,
            physical: order,
            mem_size,
            mem_align,
            packed: config.pack,
            packing_applied,
            key_index,
            timestamp_index,
            time_parse: config.time_parse.clone(),
            time_format: config.time_format.clone(),
            display_width: config.default_display_width,
        };

        tracing::debug!(
            descriptor = %descriptor.name,
            mem_size = descriptor.mem_size,
            mem_align = descriptor.mem_align,
            fields = descriptor.fields.len(),
            packed = descriptor.packed,
            packing_applied = descriptor.packing_applied,
            "laid out descriptor"
        );
        tracing::trace!("\n{}", descriptor.describe(true));

        Ok(descriptor)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in logical order.
    pub fn fields(&self) -> &[LaidOutField] {
        &self.fields
    }

    /// Field at logical `index`.
    pub fn field(&self, index: usize) -> Result<&LaidOutField> {
        self.fields
            .get(index)
            .ok_or(RdfError::FieldIndexOutOfRange {
                index,
                len: self.fields.len(),
            })
    }

    /// Field named `name`, if present.
    pub fn get(&self, name: &str) -> Option<&LaidOutField> {
        self.by_name.get(name).map(|&i| &self.fields[i])
    }

    /// Field named `name`.
    pub fn find_by_name(&self, name: &str) -> Result<&LaidOutField> {
        self.get(name).ok_or_else(|| RdfError::FieldNotFound {
            descriptor: self.name.clone(),
            field: name.to_string(),
        })
    }

    /// Byte offset of the field named `name`.
    pub fn offset(&self, name: &str) -> Result<usize> {
        self.find_by_name(name).map(LaidOutField::offset)
    }

    /// Fields in physical (offset) order.
    pub fn physical_fields(&self) -> impl Iterator<Item = &LaidOutField> + '_ {
        self.physical.iter().map(move |&i| &self.fields[i])
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false`: empty descriptors cannot be built.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Record size in bytes, padded to `mem_align`.
    pub fn mem_size(&self) -> usize {
        self.mem_size
    }

    /// Largest field alignment; record buffers must be aligned to it.
    pub fn mem_align(&self) -> usize {
        self.mem_align
    }

    /// Whether packing was requested.
    ///
    /// A request is kept even when packing lost to declaration order; see
    /// [`Descriptor::packing_applied`].
    pub fn is_packed(&self) -> bool {
        self.packed
    }

    /// Whether fields were placed in packed order. `false` when packing was
    /// not requested or would have grown the record.
    pub fn packing_applied(&self) -> bool {
        self.packing_applied
    }

    /// Logical index of the first key field.
    pub fn key_index(&self) -> Option<usize> {
        self.key_index
    }

    pub fn key_offset(&self) -> Option<usize> {
        self.key_index.map(|i| self.fields[i].offset())
    }

    /// Logical index of the first timestamp field.
    pub fn timestamp_index(&self) -> Option<usize> {
        self.timestamp_index
    }

    pub fn timestamp_offset(&self) -> Option<usize> {
        self.timestamp_index.map(|i| self.fields[i].offset())
    }

    pub fn time_parse(&self) -> &str {
        &self.time_parse
    }

    pub fn time_format(&self) -> &str {
        &self.time_format
    }

    /// Parses a timestamp string with this descriptor's parse pattern.
    pub fn str_to_time(&self, input: &str) -> Result<Timestamp> {
        time::parse_timestamp(input, &self.time_parse)
    }

    /// Formats a timestamp with this descriptor's print pattern.
    pub fn time_to_str(&self, ts: Timestamp) -> Result<String> {
        time::format_timestamp(ts, &self.time_format)
    }

    /// Column format used for `field` in headers and record dumps.
    pub fn display_format(&self, field: &LaidOutField) -> DisplayFormat {
        field
            .format()
            .unwrap_or_else(|| DisplayFormat::right(self.display_width))
    }

    /// CRC-32 over every field's name, type, payload and offset plus the
    /// record size and alignment. Equal fingerprints mean equal layouts.
    pub fn fingerprint(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        for field in &self.fields {
            hasher.update(field.name().as_bytes());
            hasher.update(&[0, field.field_type() as u8]);
            hasher.update(&(field.payload() as u64).to_le_bytes());
            hasher.update(&(field.offset() as u64).to_le_bytes());
        }
        hasher.update(&(self.mem_size as u64).to_le_bytes());
        hasher.update(&(self.mem_align as u64).to_le_bytes());
        hasher.finalize()
    }

    /// Human-readable layout table.
    ///
    /// Rows follow logical order, or physical order when `by_offset` is set.
    pub fn describe(&self, by_offset: bool) -> String {
        let name_width = self
            .fields
            .iter()
            .map(|f| f.name().len())
            .max()
            .unwrap_or(0)
            .max(4);

        let mut out = format!(
            "descriptor '{}' (mem_size={}, mem_align={}, packed={}, packing_applied={})\n",
            self.name, self.mem_size, self.mem_align, self.packed, self.packing_applied
        );
        out.push_str(&format!(
            "{:>4}  {:<nw$}  {:<8}  {:>5}  {:>5}  {:>6}  {}\n",
            "idx",
            "name",
            "type",
            "size",
            "align",
            "offset",
            "description",
            nw = name_width
        ));

        let rows: Vec<&LaidOutField> = if by_offset {
            self.physical_fields().collect()
        } else {
            self.fields.iter().collect()
        };
        for f in rows {
            out.push_str(&format!(
                "{:>4}  {:<nw$}  {:<8}  {:>5}  {:>5}  {:>6}  {}\n",
                f.index(),
                f.name(),
                f.field_type().name(),
                f.size(),
                f.align(),
                f.offset(),
                f.description(),
                nw = name_width
            ));
        }
        out
    }

    /// Field names padded to their display columns.
    pub fn header(&self) -> String {
        self.fields
            .iter()
            .map(|f| self.display_format(f).apply(f.name()))
            .collect()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(false))
    }
}

/// Widest alignment first. Among equal alignments, fields whose size is a
/// whole multiple of their alignment go first so they leave no gap; the
/// original index breaks remaining ties.
///
/// The size-multiple key makes this differ from a plain sort by descending
/// alignment then index. With `[*key16* payload 1, u16]` that sort places
/// the key at 0 and the `u16` at 4; this one places the `u16` at 0 and the
/// key at 2. Packed records written by a layout engine using the plain sort
/// may therefore have different offsets. Compare [`Descriptor::fingerprint`]
/// or write unpacked records when exchanging files.
fn packed_order(fields: &[Field]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..fields.len()).collect();
    order.sort_by_key(|&i| {
        let f = &fields[i];
        (Reverse(f.align()), f.size() % f.align() != 0, i)
    });
    order
}

/// Assigns each field the lowest aligned offset after its physical predecessor.
fn place(fields: &[Field], order: Vec<usize>) -> Result<Placement> {
    let mut offsets = vec![0; fields.len()];
    let mut cursor = 0usize;
    let mut mem_align = 1usize;

    for &i in &order {
        let field = &fields[i];
        let offset = validation::align_up(cursor, field.align())?;
        offsets[i] = offset;
        cursor = offset
            .checked_add(field.size())
            .ok_or(RdfError::CapacityOverflow {
                operation: "record layout",
            })?;
        mem_align = mem_align.max(field.align());
    }

    let mem_size = validation::align_up(cursor, mem_align)?;
    Ok(Placement {
        order,
        offsets,
        mem_size,
        mem_align,
    })
}
