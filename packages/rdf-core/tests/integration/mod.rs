//! Integration test suite.
//!
//! 1. Layout scenarios from the record format description
//! 2. Record views over byte spans and files
//! 3. Schema files on disk
//! 4. Layout properties over generated field lists

pub mod helpers;
pub mod layout_properties;
pub mod record_view_tests;
pub mod scenario_tests;
pub mod schema_file_tests;
