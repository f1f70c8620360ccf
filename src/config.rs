use serde::{Deserialize, Serialize};

/// Tuning knobs for one analysis run.
///
/// The minimum dimensions separate real inspection photos from icons,
/// logos and other decorative graphics embedded in the reports. There is
/// no single correct threshold; observed deployments range from 200x200
/// up to 650x450, so both axes are caller-configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Minimum pixel width for an image to count as a photo.
    pub min_width: u32,
    /// Minimum pixel height for an image to count as a photo.
    pub min_height: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            min_width: 650,
            min_height: 450,
        }
    }
}

impl AnalysisConfig {
    pub fn new(min_width: u32, min_height: u32) -> Self {
        Self {
            min_width,
            min_height,
        }
    }

    /// Size filter predicate: does an image of these dimensions qualify
    /// as an inspection photo?
    pub fn keeps(&self, width: u32, height: u32) -> bool {
        width >= self.min_width && height >= self.min_height
    }
}
