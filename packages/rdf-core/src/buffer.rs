//! Owned, aligned storage for a run of records.

use crate::error::{RdfError, Result};
use crate::layout::Descriptor;
use crate::record::{Record, RecordMut, RecordView, RecordViewMut};

/// Storage unit; its alignment covers every catalog type.
type Word = u128;
const WORD: usize = std::mem::size_of::<Word>();

/// Zero-initialized bytes for `len` records of one descriptor.
///
/// The allocation is aligned to 16 bytes, which satisfies `mem_align` of any
/// descriptor, so every record and field inside it is correctly aligned.
#[derive(Debug, Clone)]
pub struct RecordBuffer<'d> {
    descriptor: &'d Descriptor,
    words: Vec<Word>,
    len: usize,
}

impl<'d> RecordBuffer<'d> {
    /// Allocates `len` zeroed records.
    pub fn new(descriptor: &'d Descriptor, len: usize) -> Result<Self> {
        let bytes = descriptor
            .mem_size()
            .checked_mul(len)
            .ok_or(RdfError::CapacityOverflow {
                operation: "record buffer",
            })?;
        let words = vec![0; bytes.div_ceil(WORD)];
        tracing::trace!(
            descriptor = %descriptor.name(),
            records = len,
            bytes,
            "allocated record buffer"
        );
        Ok(Self {
            descriptor,
            words,
            len,
        })
    }

    pub fn descriptor(&self) -> &'d Descriptor {
        self.descriptor
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exactly `len * mem_size` bytes.
    pub fn as_bytes(&self) -> &[u8] {
        let len = self.len * self.descriptor.mem_size();
        // SAFETY: `words` holds at least `len` initialized bytes and u8 has
        // no alignment or validity requirements.
        unsafe { std::slice::from_raw_parts(self.words.as_ptr().cast::<u8>(), len) }
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len * self.descriptor.mem_size();
        // SAFETY: as in `as_bytes`; the exclusive borrow of `self` covers the
        // returned slice.
        unsafe { std::slice::from_raw_parts_mut(self.words.as_mut_ptr().cast::<u8>(), len) }
    }

    /// Read-only record at `index`.
    pub fn record(&self, index: usize) -> Result<Record<'_>> {
        self.view().get(index)
    }

    /// Writable record at `index`.
    pub fn record_mut(&mut self, index: usize) -> Result<RecordMut<'_>> {
        let len = self.len;
        let size = self.descriptor.mem_size();
        if index >= len {
            return Err(RdfError::RecordIndexOutOfRange { index, len });
        }
        let descriptor = self.descriptor;
        let bytes = &mut self.as_bytes_mut()[index * size..(index + 1) * size];
        Ok(RecordMut::from_aligned(descriptor, bytes))
    }

    pub fn view(&self) -> RecordView<'_> {
        RecordView::from_aligned(self.descriptor, self.as_bytes())
    }

    pub fn view_mut(&mut self) -> RecordViewMut<'_> {
        let descriptor = self.descriptor;
        RecordViewMut::from_aligned(descriptor, self.as_bytes_mut())
    }

    /// Zeroes every record.
    pub fn clear(&mut self) {
        self.words.fill(0);
    }
}
