//! Layout invariant checks.

use super::field::LaidOutField;
use crate::error::{RdfError, Result};

/// Validates that all fields fit within the record size.
pub(crate) fn validate_record_size(fields: &[LaidOutField], record_size: usize) -> Result<()> {
    for field in fields {
        let field_end = field
            .offset()
            .checked_add(field.size())
            .ok_or(RdfError::CapacityOverflow {
                operation: "field bounds calculation",
            })?;

        if field_end > record_size {
            return Err(RdfError::InvalidLayout(format!(
                "field '{}' (offset={}, size={}) exceeds record size {}",
                field.name(),
                field.offset(),
                field.size(),
                record_size
            )));
        }
    }
    Ok(())
}

/// Validates field alignment and that no two fields overlap.
pub(crate) fn validate_field_layout(fields: &[LaidOutField]) -> Result<()> {
    for field in fields {
        if field.offset() % field.align() != 0 {
            return Err(RdfError::InvalidLayout(format!(
                "field '{}' offset {} not aligned to {}",
                field.name(),
                field.offset(),
                field.align()
            )));
        }
    }

    let mut ranges: Vec<(usize, usize)> = fields
        .iter()
        .map(|f| (f.offset(), f.end_offset()))
        .collect();
    ranges.sort_by_key(|&(start, _)| start);

    for pair in ranges.windows(2) {
        if pair[0].1 > pair[1].0 {
            return Err(RdfError::InvalidLayout(format!(
                "overlapping field ranges {:?} and {:?}",
                pair[0], pair[1]
            )));
        }
    }

    Ok(())
}

/// Rounds `offset` up to the next multiple of `align`.
pub(crate) fn align_up(offset: usize, align: usize) -> Result<usize> {
    if align <= 1 {
        return Ok(offset);
    }
    let remainder = offset % align;
    if remainder == 0 {
        Ok(offset)
    } else {
        offset
            .checked_add(align - remainder)
            .ok_or(RdfError::CapacityOverflow {
                operation: "offset alignment",
            })
    }
}
