//! Records and record spans interpreted through a descriptor.
//!
//! A record is exactly `mem_size` bytes aligned to `mem_align`. Views borrow
//! caller-owned bytes, for example a read-only file mapping, and never copy.

use std::iter::FusedIterator;
use std::slice::{ChunksExact, ChunksExactMut};

use crate::codec::{self, FieldValue};
use crate::error::{RdfError, Result};
use crate::layout::{Descriptor, LaidOutField};
use crate::types::Value;

fn check_span(descriptor: &Descriptor, bytes: &[u8], exact: bool) -> Result<()> {
    let record_size = descriptor.mem_size();
    let len = bytes.len();
    let whole = if exact {
        len == record_size
    } else {
        len % record_size == 0
    };
    if !whole {
        return Err(RdfError::RecordSizeMismatch { len, record_size });
    }
    let address = bytes.as_ptr() as usize;
    let align = descriptor.mem_align();
    if !bytes.is_empty() && address % align != 0 {
        return Err(RdfError::Misaligned { address, align });
    }
    Ok(())
}

fn checked_field<'d, 'v, V: FieldValue<'v>>(
    descriptor: &'d Descriptor,
    name: &str,
) -> Result<&'d LaidOutField> {
    let field = descriptor.find_by_name(name)?;
    if !V::accepts(field.field_type()) {
        return Err(RdfError::TypeMismatch {
            field: field.name().to_string(),
            expected: field.field_type().name(),
            got: std::any::type_name::<V>(),
        });
    }
    Ok(field)
}

/// Read-only view of one record.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    descriptor: &'a Descriptor,
    bytes: &'a [u8],
}

impl<'a> Record<'a> {
    /// Wraps `bytes` as one record of `descriptor`.
    ///
    /// # Errors
    /// `RecordSizeMismatch` unless `bytes` is exactly `mem_size` long,
    /// `Misaligned` unless it starts at a multiple of `mem_align`.
    pub fn new(descriptor: &'a Descriptor, bytes: &'a [u8]) -> Result<Self> {
        check_span(descriptor, bytes, true)?;
        Ok(Self::from_aligned(descriptor, bytes))
    }

    pub(crate) fn from_aligned(descriptor: &'a Descriptor, bytes: &'a [u8]) -> Self {
        Self { descriptor, bytes }
    }

    pub fn descriptor(&self) -> &'a Descriptor {
        self.descriptor
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Reads the field named `name`.
    ///
    /// Unlike the raw codec, the Rust type is always checked against the
    /// declared type here, and string contents are validated.
    ///
    /// # Errors
    /// `FieldNotFound`, `TypeMismatch`, or `CorruptField` for a string whose
    /// prefix exceeds its capacity or whose bytes are not UTF-8.
    pub fn get<V: FieldValue<'a>>(&self, name: &str) -> Result<V> {
        let field = checked_field::<V>(self.descriptor, name)?;
        codec::try_read(self.bytes, field)
    }

    /// Reads `field` without a name lookup or type check.
    #[inline]
    pub fn read<V: FieldValue<'a>>(&self, field: &LaidOutField) -> V {
        codec::read(self.bytes, field)
    }

    /// Reads the field at logical `index` as a dynamic value.
    pub fn value_at(&self, index: usize) -> Result<Value<'a>> {
        let field = self.descriptor.field(index)?;
        codec::read_value(self.bytes, field)
    }

    /// Reads the field named `name` as a dynamic value.
    pub fn value(&self, name: &str) -> Result<Value<'a>> {
        let field = self.descriptor.find_by_name(name)?;
        codec::read_value(self.bytes, field)
    }

    /// All values in logical order.
    pub fn values(&self) -> impl Iterator<Item = Result<Value<'a>>> + 'a {
        let bytes = self.bytes;
        self.descriptor
            .fields()
            .iter()
            .map(move |field| codec::read_value(bytes, field))
    }

    /// One line with every value padded to its display column, in logical
    /// order. Timestamps use the descriptor's print format.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        for field in self.descriptor.fields() {
            let text = match codec::read_value(self.bytes, field)? {
                Value::Timestamp(ts) => self.descriptor.time_to_str(ts)?,
                value => value.to_string(),
            };
            out.push_str(&self.descriptor.display_format(field).apply(&text));
        }
        Ok(out)
    }
}

/// Writable view of one record.
#[derive(Debug)]
pub struct RecordMut<'a> {
    descriptor: &'a Descriptor,
    bytes: &'a mut [u8],
}

impl<'a> RecordMut<'a> {
    /// Wraps `bytes` as one writable record, with the checks of [`Record::new`].
    pub fn new(descriptor: &'a Descriptor, bytes: &'a mut [u8]) -> Result<Self> {
        check_span(descriptor, bytes, true)?;
        Ok(Self::from_aligned(descriptor, bytes))
    }

    pub(crate) fn from_aligned(descriptor: &'a Descriptor, bytes: &'a mut [u8]) -> Self {
        Self { descriptor, bytes }
    }

    pub fn descriptor(&self) -> &'a Descriptor {
        self.descriptor
    }

    /// Writes `value` into the field named `name`.
    ///
    /// # Errors
    /// `FieldNotFound`, `TypeMismatch`, or the string errors of the codec.
    pub fn set<'v, V: FieldValue<'v>>(&mut self, name: &str, value: V) -> Result<()> {
        let field = checked_field::<V>(self.descriptor, name)?;
        codec::write(self.bytes, field, value)
    }

    /// Writes `field` without a name lookup or type check.
    #[inline]
    pub fn write<'v, V: FieldValue<'v>>(&mut self, field: &LaidOutField, value: V) -> Result<()> {
        codec::write(self.bytes, field, value)
    }

    pub fn set_value(&mut self, name: &str, value: &Value<'_>) -> Result<()> {
        let field = self.descriptor.find_by_name(name)?;
        codec::write_value(self.bytes, field, value)
    }

    pub fn set_value_at(&mut self, index: usize, value: &Value<'_>) -> Result<()> {
        let field = self.descriptor.field(index)?;
        codec::write_value(self.bytes, field, value)
    }

    /// Reads back through a shared view.
    pub fn as_record(&self) -> Record<'_> {
        Record::from_aligned(self.descriptor, self.bytes)
    }

    /// Zeroes the record.
    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }
}

/// Read-only view of a contiguous run of records.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    descriptor: &'a Descriptor,
    bytes: &'a [u8],
}

impl<'a> RecordView<'a> {
    /// Wraps `bytes` as consecutive records of `descriptor`.
    ///
    /// # Errors
    /// `RecordSizeMismatch` if a trailing partial record is present,
    /// `Misaligned` if `bytes` does not start at a multiple of `mem_align`.
    pub fn new(descriptor: &'a Descriptor, bytes: &'a [u8]) -> Result<Self> {
        check_span(descriptor, bytes, false)?;
        Ok(Self::from_aligned(descriptor, bytes))
    }

    pub(crate) fn from_aligned(descriptor: &'a Descriptor, bytes: &'a [u8]) -> Self {
        Self { descriptor, bytes }
    }

    pub fn descriptor(&self) -> &'a Descriptor {
        self.descriptor
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.bytes.len() / self.descriptor.mem_size()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Record at `index`.
    pub fn get(&self, index: usize) -> Result<Record<'a>> {
        let len = self.len();
        if index >= len {
            return Err(RdfError::RecordIndexOutOfRange { index, len });
        }
        let size = self.descriptor.mem_size();
        Ok(Record::from_aligned(
            self.descriptor,
            &self.bytes[index * size..(index + 1) * size],
        ))
    }

    pub fn iter(&self) -> Records<'a> {
        Records {
            descriptor: self.descriptor,
            chunks: self.bytes.chunks_exact(self.descriptor.mem_size()),
        }
    }

    /// Parallel iterator over the records.
    #[cfg(feature = "parallel")]
    pub fn par_iter(&self) -> impl rayon::iter::IndexedParallelIterator<Item = Record<'a>> + 'a {
        use rayon::prelude::*;

        let descriptor = self.descriptor;
        self.bytes
            .par_chunks_exact(descriptor.mem_size())
            .map(move |bytes| Record::from_aligned(descriptor, bytes))
    }
}

impl<'a> IntoIterator for RecordView<'a> {
    type Item = Record<'a>;
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &RecordView<'a> {
    type Item = Record<'a>;
    type IntoIter = Records<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the records of a [`RecordView`].
#[derive(Debug, Clone)]
pub struct Records<'a> {
    descriptor: &'a Descriptor,
    chunks: ChunksExact<'a, u8>,
}

impl<'a> Iterator for Records<'a> {
    type Item = Record<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks
            .next()
            .map(|bytes| Record::from_aligned(self.descriptor, bytes))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.chunks
            .nth(n)
            .map(|bytes| Record::from_aligned(self.descriptor, bytes))
    }
}

impl DoubleEndedIterator for Records<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.chunks
            .next_back()
            .map(|bytes| Record::from_aligned(self.descriptor, bytes))
    }
}

impl ExactSizeIterator for Records<'_> {}

impl FusedIterator for Records<'_> {}

/// Writable view of a contiguous run of records.
#[derive(Debug)]
pub struct RecordViewMut<'a> {
    descriptor: &'a Descriptor,
    bytes: &'a mut [u8],
}

impl<'a> RecordViewMut<'a> {
    /// Wraps `bytes` as writable records, with the checks of [`RecordView::new`].
    pub fn new(descriptor: &'a Descriptor, bytes: &'a mut [u8]) -> Result<Self> {
        check_span(descriptor, bytes, false)?;
        Ok(Self::from_aligned(descriptor, bytes))
    }

    pub(crate) fn from_aligned(descriptor: &'a Descriptor, bytes: &'a mut [u8]) -> Self {
        Self { descriptor, bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / self.descriptor.mem_size()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Shared view over the same records.
    pub fn as_view(&self) -> RecordView<'_> {
        RecordView::from_aligned(self.descriptor, self.bytes)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<RecordMut<'_>> {
        let len = self.len();
        if index >= len {
            return Err(RdfError::RecordIndexOutOfRange { index, len });
        }
        let size = self.descriptor.mem_size();
        Ok(RecordMut::from_aligned(
            self.descriptor,
            &mut self.bytes[index * size..(index + 1) * size],
        ))
    }

    pub fn iter_mut(&mut self) -> RecordsMut<'_> {
        let size = self.descriptor.mem_size();
        RecordsMut {
            descriptor: self.descriptor,
            chunks: self.bytes.chunks_exact_mut(size),
        }
    }

    /// Parallel iterator over writable records.
    #[cfg(feature = "parallel")]
    pub fn par_iter_mut(
        &mut self,
    ) -> impl rayon::iter::IndexedParallelIterator<Item = RecordMut<'_>> + '_ {
        use rayon::prelude::*;

        let descriptor = self.descriptor;
        self.bytes
            .par_chunks_exact_mut(descriptor.mem_size())
            .map(move |bytes| RecordMut::from_aligned(descriptor, bytes))
    }
}

/// Iterator over the records of a [`RecordViewMut`].
#[derive(Debug)]
pub struct RecordsMut<'a> {
    descriptor: &'a Descriptor,
    chunks: ChunksExactMut<'a, u8>,
}

impl<'a> Iterator for RecordsMut<'a> {
    type Item = RecordMut<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let descriptor = self.descriptor;
        self.chunks
            .next()
            .map(|bytes| RecordMut::from_aligned(descriptor, bytes))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl DoubleEndedIterator for RecordsMut<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let descriptor = self.descriptor;
        self.chunks
            .next_back()
            .map(|bytes| RecordMut::from_aligned(descriptor, bytes))
    }
}

impl ExactSizeIterator for RecordsMut<'_> {}

impl FusedIterator for RecordsMut<'_> {}
