//! Compressor configuration supplied by the host.

use serde::{Deserialize, Serialize};

use crate::decode::{FilterType, MAX_DIMENSION};
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::Quality;

/// Tunables for a compressor session. Every field has a default, so hosts can
/// pass `{}` or only the keys they care about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompressorConfig {
    /// Longest edge allowed in the output.
    pub max_dimension: u32,
    /// Initial slider position, 0-100.
    pub default_quality: u8,
    /// Entries kept in the session log.
    pub history_capacity: usize,
    /// Interpolation used when downscaling.
    pub filter: FilterType,
    /// Prepended to the source name when exporting.
    pub export_prefix: String,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            max_dimension: MAX_DIMENSION,
            default_quality: Quality::DEFAULT_PERCENT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            filter: FilterType::default(),
            export_prefix: "compressed_".to_string(),
        }
    }
}

impl CompressorConfig {
    /// Clamp out-of-range values instead of failing.
    pub fn normalized(mut self) -> Self {
        if self.max_dimension == 0 {
            self.max_dimension = MAX_DIMENSION;
        }
        self.default_quality = self.default_quality.min(100);
        self
    }

    /// File name the export is saved under.
    pub fn export_name(&self, source_name: &str) -> String {
        format!("{}{}", self.export_prefix, source_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompressorConfig::default();
        assert_eq!(config.max_dimension, 1920);
        assert_eq!(config.default_quality, 80);
        assert_eq!(config.history_capacity, 5);
        assert_eq!(config.filter, FilterType::Bilinear);
        assert_eq!(config.export_name("cat.png"), "compressed_cat.png");
    }

    #[test]
    fn test_normalized() {
        let config = CompressorConfig {
            max_dimension: 0,
            default_quality: 140,
            ..Default::default()
        }
        .normalized();

        assert_eq!(config.max_dimension, MAX_DIMENSION);
        assert_eq!(config.default_quality, 100);
    }
}
