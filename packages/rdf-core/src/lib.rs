//! Binary record layouts for fixed-size records.
//!
//! A [`Descriptor`] turns an ordered list of typed [`Field`]s into a fixed,
//! aligned byte layout. Records are read and written in place through the
//! [`codec`] or the [`Record`] / [`RecordView`] wrappers, so a record span can
//! come straight from a memory-mapped file with no copy or decode step.
//!
//! ```
//! use rdf_core::{Descriptor, Field, FieldType, FieldsBuilder, RecordBuffer};
//!
//! let fields = FieldsBuilder::new()
//!     .push(Field::new("sym", "symbol", FieldType::Key8, 7)?)
//!     .push(Field::new("ts", "trade time", FieldType::Timestamp, 0)?)
//!     .push(Field::new("qty", "quantity", FieldType::Int32, 0)?);
//! let trade = Descriptor::new("trade", fields, true)?;
//! assert_eq!(trade.mem_size(), 24);
//!
//! let mut buf = RecordBuffer::new(&trade, 1)?;
//! buf.record_mut(0)?.set("sym", "AAPL")?;
//! assert_eq!(buf.record(0)?.get::<&str>("sym")?, "AAPL");
//! # Ok::<(), rdf_core::RdfError>(())
//! ```

pub mod buffer;
pub mod codec;
pub mod config;
pub mod error;
pub mod layout;
pub mod record;
pub mod schema;
pub mod time;
pub mod types;

pub use buffer::RecordBuffer;
pub use codec::FieldValue;
pub use config::LayoutConfig;
pub use error::{RdfError, Result};
pub use layout::{Descriptor, DisplayAlign, DisplayFormat, Field, FieldsBuilder, LaidOutField};
pub use record::{Record, RecordMut, RecordView, RecordViewMut};
pub use schema::{FieldSchema, SchemaFile};
pub use time::Timestamp;
pub use types::{FieldType, Value};
