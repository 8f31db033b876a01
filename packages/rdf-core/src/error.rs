//! Record layout error types.

use thiserror::Error;

/// Errors raised while building descriptors or encoding record values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RdfError {
    /// Descriptor built from an empty field list
    #[error("Descriptor '{descriptor}' has no fields")]
    EmptyDescriptor { descriptor: String },

    /// Two fields share a name within one descriptor
    #[error("Field '{field}' already exists in descriptor '{descriptor}'")]
    DuplicateField { descriptor: String, field: String },

    /// Field declared without a name
    #[error("Field name must not be empty")]
    EmptyFieldName,

    /// String-like field declared without a maximum payload
    #[error("Field '{field}' of type {type_name} requires a payload capacity")]
    MissingPayload {
        field: String,
        type_name: &'static str,
    },

    /// Fixed-width field declared with a payload
    #[error("Field '{field}' of type {type_name} cannot carry a payload (got {payload})")]
    UnexpectedPayload {
        field: String,
        type_name: &'static str,
        payload: usize,
    },

    /// String value longer than the field's payload capacity
    #[error("Value for field '{field}' is {len} bytes, capacity is {capacity}")]
    PayloadOverflow {
        field: String,
        len: usize,
        capacity: usize,
    },

    /// String value longer than its length prefix can express
    #[error("Value for field '{field}' is {len} bytes, length prefix holds at most {max}")]
    PrefixOverflow { field: String, len: usize, max: usize },

    /// Field name not present in descriptor
    #[error("Field '{field}' not found in descriptor '{descriptor}'")]
    FieldNotFound { descriptor: String, field: String },

    /// Logical field index past the end of the descriptor
    #[error("Field index {index} out of range (descriptor has {len} fields)")]
    FieldIndexOutOfRange { index: usize, len: usize },

    /// Byte span does not match the record size
    #[error("Span of {len} bytes is not a whole number of {record_size}-byte records")]
    RecordSizeMismatch { len: usize, record_size: usize },

    /// Record index past the end of a view or buffer
    #[error("Record index {index} out of range (span holds {len} records)")]
    RecordIndexOutOfRange { index: usize, len: usize },

    /// Record bytes do not start at the descriptor's alignment
    #[error("Record span at address {address:#x} is not aligned to {align} bytes")]
    Misaligned { address: usize, align: usize },

    /// Stored bytes could not have been written by the codec
    #[error("Field '{field}' holds corrupt data: {reason}")]
    CorruptField { field: String, reason: String },

    /// Checked arithmetic overflowed while sizing a layout or buffer
    #[error("Capacity overflow during {operation}")]
    CapacityOverflow { operation: &'static str },

    /// Computed layout broke an offset/alignment invariant
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// Dynamic value does not match the field's declared type
    #[error("Type mismatch for field '{field}': expected {expected}, got {got}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        got: &'static str,
    },

    /// Type display name not present in the catalog
    #[error("Unknown field type '{0}'")]
    UnknownType(String),

    /// Timestamp string did not match the parse format
    #[error("Failed to parse timestamp '{input}' with format '{format}': {message}")]
    TimeParse {
        input: String,
        format: String,
        message: String,
    },

    /// Timestamp format string could not be rendered
    #[error("Invalid timestamp format '{format}'")]
    TimeFormat { format: String },

    /// Schema file could not be decoded or did not match its layout
    #[error("Schema error: {0}")]
    Schema(String),

    /// I/O error while reading a schema file
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RdfError>;
