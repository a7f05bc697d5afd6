//! The quality fraction handed to the encoder.

use serde::{Deserialize, Serialize};

/// Encoder quality in `[0, 1]`. Lower means smaller output with more artifacts.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(f32);

impl Quality {
    /// Slider position used until the user moves it.
    pub const DEFAULT_PERCENT: u8 = 80;

    /// Build from a fraction, clamping into `[0, 1]`. NaN maps to the default.
    pub fn new(fraction: f32) -> Self {
        if fraction.is_nan() {
            return Self::default();
        }
        Self(fraction.clamp(0.0, 1.0))
    }

    /// Build from a slider percentage. Values above 100 are clamped.
    pub fn from_percent(percent: u8) -> Self {
        Self(f32::from(percent.min(100)) / 100.0)
    }

    pub fn fraction(self) -> f32 {
        self.0
    }

    /// Nearest whole percentage.
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::from_percent(Self::DEFAULT_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_eighty_percent() {
        let q = Quality::default();
        assert_eq!(q.percent(), 80);
        assert!((q.fraction() - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_percent_clamps() {
        assert_eq!(Quality::from_percent(0).fraction(), 0.0);
        assert_eq!(Quality::from_percent(100).fraction(), 1.0);
        assert_eq!(Quality::from_percent(250).fraction(), 1.0);
    }

    #[test]
    fn test_new_clamps_and_handles_nan() {
        assert_eq!(Quality::new(-0.5).fraction(), 0.0);
        assert_eq!(Quality::new(3.0).fraction(), 1.0);
        assert_eq!(Quality::new(f32::NAN), Quality::default());
    }
}
