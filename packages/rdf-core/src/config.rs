//! Layout configuration.

use serde::{Deserialize, Serialize};

/// Default chrono pattern used for both parsing and printing timestamps.
pub const DEFAULT_TIME_FORMAT: &str = "%Y%m%d %H:%M:%S";

/// Default column width for rendered field values.
pub const DEFAULT_DISPLAY_WIDTH: usize = 16;

/// Options applied when a descriptor computes its layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Reorder physical placement by descending alignment (default: true)
    pub pack: bool,
    /// chrono pattern for parsing timestamp strings
    pub time_parse: String,
    /// chrono pattern for printing timestamps
    pub time_format: String,
    /// Column width used by fields without an explicit display format
    pub default_display_width: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pack: true,
            time_parse: DEFAULT_TIME_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            default_display_width: DEFAULT_DISPLAY_WIDTH,
        }
    }
}

impl LayoutConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables packing.
    pub fn with_pack(mut self, pack: bool) -> Self {
        self.pack = pack;
        self
    }

    /// Sets the timestamp parse pattern.
    pub fn with_time_parse(mut self, pattern: impl Into<String>) -> Self {
        self.time_parse = pattern.into();
        self
    }

    /// Sets the timestamp print pattern.
    pub fn with_time_format(mut self, pattern: impl Into<String>) -> Self {
        self.time_format = pattern.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LayoutConfig::default();
        assert!(config.pack);
        assert_eq!(config.time_parse, DEFAULT_TIME_FORMAT);
        assert_eq!(config.time_format, DEFAULT_TIME_FORMAT);
        assert_eq!(config.default_display_width, 16);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: LayoutConfig = serde_json::from_str(r#"{"pack": false}"#).unwrap();
        assert!(!config.pack);
        assert_eq!(config.time_format, DEFAULT_TIME_FORMAT);
    }
}
